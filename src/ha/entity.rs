//! Decoding of `GET /api/states/<entity_id>` bodies.

use super::FetchError;
use crate::models::CurrentWeather;
use serde::Deserialize;
use serde_json::{Map, Value};

/// States Home Assistant uses for "no real reading".
pub const SENTINEL_STATES: [&str; 2] = ["unavailable", "unknown"];

#[derive(Debug, Clone, Deserialize)]
pub struct EntityState {
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

impl EntityState {
    pub fn parse(body: &str) -> Result<Self, FetchError> {
        Ok(serde_json::from_str(body)?)
    }

    /// The top-level state, rejecting the sentinel values.
    pub fn live_state(&self) -> Result<&str, FetchError> {
        let state = self.state.as_deref().ok_or(FetchError::MissingField("state"))?;
        if SENTINEL_STATES.contains(&state) {
            return Err(FetchError::Unavailable(state.to_string()));
        }
        Ok(state)
    }

    /// A numeric attribute; absent, null and non-numeric values all read as `None`.
    pub fn number_attribute(&self, key: &str) -> Option<f32> {
        self.attributes.get(key).and_then(Value::as_f64).map(|v| v as f32)
    }

    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }
}

/// Plain sensor: the reading is the state itself.
pub fn sensor_temperature(entity: &EntityState) -> Result<f32, FetchError> {
    let state = entity.live_state()?;
    state
        .trim()
        .parse::<f32>()
        .map_err(|_| FetchError::NotANumber(state.to_string()))
}

/// Climate entity: the state is the HVAC mode, the reading lives in the attributes.
pub fn climate_temperature(entity: &EntityState) -> Result<f32, FetchError> {
    entity.live_state()?;
    entity
        .number_attribute("current_temperature")
        .ok_or(FetchError::MissingField("attributes.current_temperature"))
}

/// Weather entity. Missing attributes default to zero and still count as valid.
pub fn current_weather(entity: &EntityState) -> CurrentWeather {
    CurrentWeather {
        condition: entity.state.clone().unwrap_or_default(),
        temperature: entity.number_attribute("temperature").unwrap_or(0.0),
        humidity: entity.number_attribute("humidity").unwrap_or(0.0),
        wind_speed: entity.number_attribute("wind_speed").unwrap_or(0.0),
        valid: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(body: &str) -> EntityState {
        EntityState::parse(body).unwrap()
    }

    #[test]
    fn sensor_state_is_parsed_as_float() {
        let e = entity(r#"{"state": "21.4", "attributes": {"unit_of_measurement": "°C"}}"#);
        assert_eq!(sensor_temperature(&e).unwrap(), 21.4);
    }

    #[test]
    fn sentinel_states_are_unavailable() {
        for sentinel in SENTINEL_STATES {
            let e = entity(&format!(r#"{{"state": "{sentinel}", "attributes": {{}}}}"#));
            assert!(matches!(sensor_temperature(&e), Err(FetchError::Unavailable(_))));
            assert!(matches!(climate_temperature(&e), Err(FetchError::Unavailable(_))));
        }
    }

    #[test]
    fn non_numeric_sensor_state_is_rejected() {
        let e = entity(r#"{"state": "warm"}"#);
        assert!(matches!(sensor_temperature(&e), Err(FetchError::NotANumber(_))));
    }

    #[test]
    fn missing_state_is_rejected() {
        let e = entity(r#"{"attributes": {}}"#);
        assert!(matches!(sensor_temperature(&e), Err(FetchError::MissingField("state"))));
    }

    #[test]
    fn climate_reads_nested_current_temperature() {
        let e = entity(r#"{"state": "heat", "attributes": {"current_temperature": 72.5}}"#);
        assert_eq!(climate_temperature(&e).unwrap(), 72.5);
    }

    #[test]
    fn climate_without_current_temperature_is_invalid() {
        let e = entity(r#"{"state": "off", "attributes": {"temperature": 80}}"#);
        assert!(matches!(climate_temperature(&e), Err(FetchError::MissingField(_))));

        let e = entity(r#"{"state": "off", "attributes": {"current_temperature": null}}"#);
        assert!(climate_temperature(&e).is_err());
    }

    #[test]
    fn weather_attributes_default_to_zero_but_stay_valid() {
        let e = entity(r#"{"state": "rainy", "attributes": {"temperature": 4.5}}"#);
        let w = current_weather(&e);
        assert_eq!(w.condition, "rainy");
        assert_eq!(w.temperature, 4.5);
        assert_eq!(w.humidity, 0.0);
        assert_eq!(w.wind_speed, 0.0);
        assert!(w.valid);
    }

    #[test]
    fn body_that_is_not_an_object_fails_to_decode() {
        assert!(matches!(EntityState::parse("[1, 2]"), Err(FetchError::Decode(_))));
        assert!(matches!(EntityState::parse("<html>"), Err(FetchError::Decode(_))));
    }
}
