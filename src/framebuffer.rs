use embedded_graphics::{
    Pixel,
    draw_target::DrawTarget,
    geometry::{Dimensions, OriginDimensions, Size},
    pixelcolor::{Rgb565, raw::RawU16},
    prelude::*,
    primitives::Rectangle,
};
use std::io::{self, Write};

/// Owned RGB565 frame. Drawn into off-screen, then pushed to the panel in one go.
pub struct Framebuffer {
    buf: Vec<u16>,
    width: u32,
    height: u32,
}

impl Framebuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            buf: vec![0; (width * height) as usize],
            width,
            height,
        }
    }

    pub fn pixels(&self) -> &[u16] {
        &self.buf
    }

    pub fn pixel(&self, point: Point) -> Option<Rgb565> {
        self.index(point)
            .map(|idx| Rgb565::from(RawU16::new(self.buf[idx])))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Binary PPM (P6), 8 bits per channel.
    pub fn write_ppm<W: Write>(&self, mut out: W) -> io::Result<()> {
        write!(out, "P6\n{} {}\n255\n", self.width, self.height)?;

        let mut row = Vec::with_capacity(self.width as usize * 3);
        for line in self.buf.chunks(self.width as usize) {
            row.clear();
            for &raw in line {
                let c = Rgb565::from(RawU16::new(raw));
                row.extend_from_slice(&[
                    expand(c.r(), 5),
                    expand(c.g(), 6),
                    expand(c.b(), 5),
                ]);
            }
            out.write_all(&row)?;
        }
        out.flush()
    }

    fn index(&self, point: Point) -> Option<usize> {
        let (x, y) = (point.x, point.y);
        if x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height {
            Some((y as u32 * self.width + x as u32) as usize)
        } else {
            None
        }
    }
}

fn expand(channel: u8, bits: u32) -> u8 {
    let max = (1u16 << bits) - 1;
    ((channel as u16 * 255 + max / 2) / max) as u8
}

impl OriginDimensions for Framebuffer {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl DrawTarget for Framebuffer {
    type Color = Rgb565;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if let Some(idx) = self.index(point) {
                self.buf[idx] = RawU16::from(color).into_inner();
            }
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let raw = RawU16::from(color).into_inner();
        let area = area.intersection(&self.bounding_box());
        let w = self.width;
        for y in area.rows() {
            let row_start = (y as u32 * w) as usize;
            for x in area.columns() {
                self.buf[row_start + x as usize] = raw;
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.buf.fill(RawU16::from(color).into_inner());
        Ok(())
    }
}
