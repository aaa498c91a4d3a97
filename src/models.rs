use serde::Serialize;

pub const FORECAST_DAYS: usize = 3;

/// A single temperature in Celsius. `value` is meaningless while `valid` is false.
#[derive(Serialize, Clone, Copy, Debug, Default, PartialEq)]
pub struct TemperatureReading {
    pub value: f32,
    pub valid: bool,
}

impl TemperatureReading {
    pub fn celsius(value: f32) -> Self {
        Self { value, valid: true }
    }

    pub fn invalid() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<f32> {
        self.valid.then_some(self.value)
    }
}

#[derive(Serialize, Clone, Debug, Default, PartialEq)]
pub struct CurrentWeather {
    /// Home Assistant condition code, e.g. `partlycloudy`.
    pub condition: String,
    pub temperature: f32,
    pub humidity: f32,
    /// km/h
    pub wind_speed: f32,
    pub valid: bool,
}

#[derive(Serialize, Clone, Debug, Default, PartialEq)]
pub struct ForecastDay {
    /// Three-letter English weekday, or `???` when the date did not parse.
    pub day_name: String,
    pub condition: String,
    pub temp_high: f32,
    pub temp_low: f32,
    pub valid: bool,
}

/// Everything one poll cycle produced. Replaced wholesale on every fetch; failures are
/// expressed per field through the `valid` flags.
#[derive(Serialize, Clone, Debug, Default, PartialEq)]
pub struct WeatherSnapshot {
    pub indoor: TemperatureReading,
    pub outdoor: TemperatureReading,
    pub sauna: TemperatureReading,
    pub current: CurrentWeather,
    /// Soonest first.
    pub forecast: [ForecastDay; FORECAST_DAYS],
    /// `HH:MM` local time, or `<m>m<s>s` since boot when the clock is not set.
    pub last_updated: String,
    /// A fetch cycle has completed, regardless of how many fields came back valid.
    pub has_data: bool,
}

impl WeatherSnapshot {
    /// Fixed, fully valid data for the host preview and for tests.
    pub fn preview() -> Self {
        let day = |name: &str, condition: &str, high: f32, low: f32| ForecastDay {
            day_name: name.to_string(),
            condition: condition.to_string(),
            temp_high: high,
            temp_low: low,
            valid: true,
        };

        Self {
            indoor: TemperatureReading::celsius(22.4),
            outdoor: TemperatureReading::celsius(-2.1),
            sauna: TemperatureReading::celsius(68.5),
            current: CurrentWeather {
                condition: "partlycloudy".to_string(),
                temperature: 5.0,
                humidity: 72.0,
                wind_speed: 14.0,
                valid: true,
            },
            forecast: [
                day("Wed", "cloudy", 8.0, 2.0),
                day("Thu", "rainy", 12.0, 5.0),
                day("Fri", "sunny", 18.0, 9.0),
            ],
            last_updated: "14:32".to_string(),
            has_data: true,
        }
    }

    pub fn valid_forecast_days(&self) -> usize {
        self.forecast.iter().filter(|d| d.valid).count()
    }
}
