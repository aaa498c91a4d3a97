//! Temperature units and the Celsius colour bands used by the gauges.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TempUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TempUnit {
    pub fn toggled(self) -> Self {
        match self {
            TempUnit::Celsius => TempUnit::Fahrenheit,
            TempUnit::Fahrenheit => TempUnit::Celsius,
        }
    }

    pub fn suffix(self) -> &'static str {
        match self {
            TempUnit::Celsius => "C",
            TempUnit::Fahrenheit => "F",
        }
    }

    /// Converts a stored Celsius value for display.
    pub fn from_celsius(self, celsius: f32) -> f32 {
        match self {
            TempUnit::Celsius => celsius,
            TempUnit::Fahrenheit => to_fahrenheit(celsius),
        }
    }
}

pub fn to_fahrenheit(celsius: f32) -> f32 {
    celsius * 9.0 / 5.0 + 32.0
}

pub fn to_celsius(fahrenheit: f32) -> f32 {
    (fahrenheit - 32.0) * 5.0 / 9.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TempBand {
    Cold,
    Cool,
    Normal,
    Warm,
    Hot,
}

impl TempBand {
    /// Ambient thresholds, always in Celsius whatever the display unit.
    pub fn ambient(celsius: f32) -> Self {
        if celsius < 0.0 {
            TempBand::Cold
        } else if celsius < 15.0 {
            TempBand::Cool
        } else if celsius < 25.0 {
            TempBand::Normal
        } else if celsius < 30.0 {
            TempBand::Warm
        } else {
            TempBand::Hot
        }
    }

    pub fn sauna(celsius: f32) -> Self {
        if celsius >= 60.0 {
            TempBand::Hot
        } else if celsius >= 30.0 {
            TempBand::Warm
        } else {
            TempBand::Cool
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn freezing_point_converts_both_ways() {
        assert_eq!(to_fahrenheit(0.0), 32.0);
        assert_eq!(to_celsius(32.0), 0.0);
        assert_eq!(to_fahrenheit(to_celsius(32.0)), 32.0);
        assert_eq!(to_fahrenheit(100.0), 212.0);
    }

    #[test]
    fn toggling_unit_leaves_the_stored_value_alone() {
        let stored = 21.5_f32;
        let unit = TempUnit::default().toggled();

        assert_eq!(unit, TempUnit::Fahrenheit);
        assert!((unit.from_celsius(stored) - 70.7).abs() < 1e-4);
        assert_eq!(stored, 21.5);
        assert_eq!(unit.toggled().from_celsius(stored), stored);
    }

    #[test]
    fn ambient_band_edges() {
        assert_eq!(TempBand::ambient(-0.1), TempBand::Cold);
        assert_eq!(TempBand::ambient(0.0), TempBand::Cool);
        assert_eq!(TempBand::ambient(14.9), TempBand::Cool);
        assert_eq!(TempBand::ambient(15.0), TempBand::Normal);
        assert_eq!(TempBand::ambient(25.0), TempBand::Warm);
        assert_eq!(TempBand::ambient(29.9), TempBand::Warm);
        assert_eq!(TempBand::ambient(30.0), TempBand::Hot);
    }

    #[test]
    fn sauna_band_edges() {
        assert_eq!(TempBand::sauna(29.9), TempBand::Cool);
        assert_eq!(TempBand::sauna(30.0), TempBand::Warm);
        assert_eq!(TempBand::sauna(59.9), TempBand::Warm);
        assert_eq!(TempBand::sauna(60.0), TempBand::Hot);
        assert_eq!(TempBand::sauna(95.0), TempBand::Hot);
    }

    proptest! {
        #[test]
        fn conversion_is_inverse_within_float_error(c in -60.0f32..130.0) {
            prop_assert!((to_celsius(to_fahrenheit(c)) - c).abs() < 1e-3);
        }

        #[test]
        fn warmer_never_maps_to_a_colder_band(a in -40.0f32..60.0, b in -40.0f32..60.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(rank(TempBand::ambient(lo)) <= rank(TempBand::ambient(hi)));
        }
    }

    fn rank(band: TempBand) -> u8 {
        match band {
            TempBand::Cold => 0,
            TempBand::Cool => 1,
            TempBand::Normal => 2,
            TempBand::Warm => 3,
            TempBand::Hot => 4,
        }
    }
}
