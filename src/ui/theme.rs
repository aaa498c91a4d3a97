use crate::units::TempBand;
use embedded_graphics::pixelcolor::Rgb565;

/// `0xRRGGBB` to Rgb565.
pub const fn hex(rgb: u32) -> Rgb565 {
    let r = (rgb >> 16) as u8;
    let g = (rgb >> 8) as u8;
    let b = rgb as u8;
    Rgb565::new(r >> 3, g >> 2, b >> 3)
}

// ── Accents (identical in both themes) ──────────────────────────────

pub const WARM: Rgb565 = hex(0xF97316);
pub const COLD: Rgb565 = hex(0x3B82F6);
pub const GREEN: Rgb565 = hex(0x22C55E);
pub const RED: Rgb565 = hex(0xEF4444);
pub const CYAN: Rgb565 = hex(0x06B6D4);
pub const ICON_YELLOW: Rgb565 = hex(0xFBBF24);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    pub fn palette(self) -> &'static Palette {
        match self {
            Theme::Dark => &DARK,
            Theme::Light => &LIGHT,
        }
    }
}

/// Semantic colour of a widget; resolved against the active palette when drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Text,
    Dim,
    Cold,
    Cool,
    Normal,
    Warm,
    Hot,
    Good,
    Bad,
    Icon,
}

impl From<TempBand> for Tone {
    fn from(band: TempBand) -> Self {
        match band {
            TempBand::Cold => Tone::Cold,
            TempBand::Cool => Tone::Cool,
            TempBand::Normal => Tone::Normal,
            TempBand::Warm => Tone::Warm,
            TempBand::Hot => Tone::Hot,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub bg: Rgb565,
    pub card: Rgb565,
    pub text: Rgb565,
    pub dim: Rgb565,
    pub status_bar: Rgb565,
    pub bar_track: Rgb565,
    pub btn_bg: Rgb565,
    pub btn_border: Rgb565,
}

pub const DARK: Palette = Palette {
    bg: hex(0x0D1117),
    card: hex(0x21262D),
    text: hex(0xFFFFFF),
    dim: hex(0x8B949E),
    status_bar: hex(0x161B22),
    bar_track: hex(0x30363D),
    btn_bg: hex(0x30363D),
    btn_border: hex(0x484F58),
};

pub const LIGHT: Palette = Palette {
    bg: hex(0xF0F2F5),
    card: hex(0xFFFFFF),
    text: hex(0x1F2328),
    dim: hex(0x656D76),
    status_bar: hex(0xD0D7DE),
    bar_track: hex(0xD0D7DE),
    btn_bg: hex(0xD0D7DE),
    btn_border: hex(0xAFB8C1),
};

impl Palette {
    pub fn resolve(&self, tone: Tone) -> Rgb565 {
        match tone {
            Tone::Text => self.text,
            Tone::Dim => self.dim,
            Tone::Cold => COLD,
            Tone::Cool => CYAN,
            Tone::Normal | Tone::Good => GREEN,
            Tone::Warm => WARM,
            Tone::Hot | Tone::Bad => RED,
            Tone::Icon => ICON_YELLOW,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::prelude::RgbColor;

    #[test]
    fn hex_keeps_the_high_bits() {
        assert_eq!(hex(0xFFFFFF), Rgb565::WHITE);
        assert_eq!(hex(0x000000), Rgb565::BLACK);
        assert_eq!(hex(0xF97316), Rgb565::new(0x1F, 0x1C, 0x02));
    }

    #[test]
    fn text_tones_follow_the_theme_accents_do_not() {
        assert_ne!(DARK.resolve(Tone::Text), LIGHT.resolve(Tone::Text));
        assert_ne!(DARK.resolve(Tone::Dim), LIGHT.resolve(Tone::Dim));
        assert_eq!(DARK.resolve(Tone::Warm), LIGHT.resolve(Tone::Warm));
        assert_eq!(DARK.resolve(Tone::Cold), COLD);
    }

    #[test]
    fn bands_map_onto_the_accent_ladder() {
        let p = Theme::Dark.palette();
        assert_eq!(p.resolve(TempBand::ambient(-5.0).into()), COLD);
        assert_eq!(p.resolve(TempBand::ambient(10.0).into()), CYAN);
        assert_eq!(p.resolve(TempBand::ambient(20.0).into()), GREEN);
        assert_eq!(p.resolve(TempBand::ambient(27.0).into()), WARM);
        assert_eq!(p.resolve(TempBand::ambient(31.0).into()), RED);
        assert_eq!(p.resolve(TempBand::sauna(45.0).into()), WARM);
    }

    #[test]
    fn theme_toggles_back_and_forth() {
        assert_eq!(Theme::default(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled().toggled(), Theme::Dark);
        assert_eq!(*Theme::Light.palette(), LIGHT);
    }
}
