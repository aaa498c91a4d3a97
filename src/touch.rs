use crate::ui::layout::touch_to_screen;
use anyhow::{Context, Result};
use embedded_graphics::prelude::Point;
use esp_idf_svc::hal::gpio::{Gpio19, Gpio20};
use esp_idf_svc::hal::i2c::{I2C0, I2cConfig, I2cDriver};
use esp_idf_svc::hal::units::Hertz;
use log::{debug, info};

const GT911_ADDR: u8 = 0x5D;
const REG_STATUS: u16 = 0x814E;
const REG_POINT_1: u16 = 0x8150;
const STATUS_READY: u8 = 0x80;
const I2C_TIMEOUT_TICKS: u32 = 100;

/// GT911 capacitive controller, first touch point only.
pub struct Gt911 {
    i2c: I2cDriver<'static>,
    current: Option<Point>,
    errors: u32,
}

impl Gt911 {
    pub fn new(i2c: I2C0, sda: Gpio19, scl: Gpio20) -> Result<Self> {
        let config = I2cConfig::new().baudrate(Hertz::from(400_000));
        let i2c = I2cDriver::new(i2c, sda, scl, &config)
            .context("Failed to initialize touch I2C driver")?;

        info!("\x1b[38;5;27m👆 GT911 touch ready at 0x{:02X}\x1b[0m", GT911_ADDR);
        Ok(Self {
            i2c,
            current: None,
            errors: 0,
        })
    }

    /// Current touch in screen coordinates, `None` when nothing is pressed.
    /// Between fresh samples the previous reading is repeated.
    pub fn read(&mut self) -> Option<Point> {
        match self.read_point() {
            Ok(Some(sample)) => self.current = sample,
            Ok(None) => {}
            Err(e) => {
                self.errors += 1;
                if self.errors % 100 == 1 {
                    debug!("👆 GT911 read failed ({} so far): {:?}", self.errors, e);
                }
            }
        }
        self.current
    }

    /// `Ok(None)` when the controller has nothing new to report.
    fn read_point(&mut self) -> Result<Option<Option<Point>>> {
        let mut status = [0u8; 1];
        self.read_reg(REG_STATUS, &mut status)?;

        if status[0] & STATUS_READY == 0 {
            return Ok(None);
        }

        let touches = status[0] & 0x0F;
        let point = if touches > 0 {
            let mut raw = [0u8; 4];
            self.read_reg(REG_POINT_1, &mut raw)?;
            let x = u16::from_le_bytes([raw[0], raw[1]]);
            let y = u16::from_le_bytes([raw[2], raw[3]]);
            Some(touch_to_screen(x, y))
        } else {
            None
        };

        let [hi, lo] = REG_STATUS.to_be_bytes();
        self.i2c.write(GT911_ADDR, &[hi, lo, 0], I2C_TIMEOUT_TICKS)?;

        Ok(Some(point))
    }

    fn read_reg(&mut self, reg: u16, buf: &mut [u8]) -> Result<()> {
        self.i2c
            .write_read(GT911_ADDR, &reg.to_be_bytes(), buf, I2C_TIMEOUT_TICKS)?;
        Ok(())
    }
}
