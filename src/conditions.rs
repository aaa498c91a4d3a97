//! Home Assistant weather condition codes mapped to an icon and a short label.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WeatherIcon {
    Sunny,
    ClearNight,
    PartlyCloudy,
    #[default]
    Cloudy,
    Fog,
    Rain,
    Pouring,
    Snow,
    Sleet,
    Hail,
    Lightning,
    Storm,
    Wind,
    Exceptional,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConditionDisplay {
    pub icon: WeatherIcon,
    pub label: &'static str,
}

pub const UNKNOWN_CONDITION: ConditionDisplay = ConditionDisplay {
    icon: WeatherIcon::Cloudy,
    label: "Unknown",
};

const fn entry(code: &'static str, icon: WeatherIcon, label: &'static str) -> (&'static str, ConditionDisplay) {
    (code, ConditionDisplay { icon, label })
}

/// Every condition a Home Assistant weather entity can report.
pub const CONDITIONS: [(&str, ConditionDisplay); 15] = [
    entry("clear-night", WeatherIcon::ClearNight, "Clear"),
    entry("cloudy", WeatherIcon::Cloudy, "Cloudy"),
    entry("exceptional", WeatherIcon::Exceptional, "Exceptional"),
    entry("fog", WeatherIcon::Fog, "Fog"),
    entry("hail", WeatherIcon::Hail, "Hail"),
    entry("lightning", WeatherIcon::Lightning, "Lightning"),
    entry("lightning-rainy", WeatherIcon::Storm, "Storm"),
    entry("partlycloudy", WeatherIcon::PartlyCloudy, "Partly Cloudy"),
    entry("pouring", WeatherIcon::Pouring, "Pouring"),
    entry("rainy", WeatherIcon::Rain, "Rainy"),
    entry("snowy", WeatherIcon::Snow, "Snowy"),
    entry("snowy-rainy", WeatherIcon::Sleet, "Sleet"),
    entry("sunny", WeatherIcon::Sunny, "Sunny"),
    entry("windy", WeatherIcon::Wind, "Windy"),
    entry("windy-variant", WeatherIcon::Wind, "Windy"),
];

pub fn display_for(condition: &str) -> ConditionDisplay {
    CONDITIONS
        .iter()
        .find(|(code, _)| *code == condition)
        .map(|(_, display)| *display)
        .unwrap_or(UNKNOWN_CONDITION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_table_entry_resolves_to_itself() {
        for (code, display) in CONDITIONS {
            assert_eq!(display_for(code), display, "{code}");
            assert_ne!(display, UNKNOWN_CONDITION, "{code}");
        }
    }

    #[test]
    fn codes_are_unique() {
        for (i, (a, _)) in CONDITIONS.iter().enumerate() {
            assert!(CONDITIONS[i + 1..].iter().all(|(b, _)| a != b), "{a} listed twice");
        }
    }

    #[test]
    fn unknown_codes_fall_back() {
        assert_eq!(display_for(""), UNKNOWN_CONDITION);
        assert_eq!(display_for("unavailable"), UNKNOWN_CONDITION);
        assert_eq!(display_for("Sunny"), UNKNOWN_CONDITION);
    }

    #[test]
    fn common_codes() {
        assert_eq!(display_for("partlycloudy").label, "Partly Cloudy");
        assert_eq!(display_for("rainy").icon, WeatherIcon::Rain);
        assert_eq!(display_for("windy-variant").icon, WeatherIcon::Wind);
    }
}
