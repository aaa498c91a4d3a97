//! Daily forecast extraction.
//!
//! Home Assistant has exposed the forecast in three places over the years. Each
//! location is a pure strategy over a decoded response; the fetcher tries them in
//! order and takes the first array found, without merging.

use crate::models::{FORECAST_DAYS, ForecastDay};
use chrono::{Datelike, NaiveDate};
use serde_json::Value;

pub const UNKNOWN_DAY: &str = "???";
const DAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// `attributes.forecast` on the weather entity state (older integrations). Only a
/// non-empty array counts.
pub fn from_attributes(state: &Value) -> Option<&[Value]> {
    state
        .get("attributes")?
        .get("forecast")?
        .as_array()
        .filter(|days| !days.is_empty())
        .map(Vec::as_slice)
}

/// `{ "<entity_id>": { "forecast": [...] } }` from `weather.get_forecasts`.
pub fn from_service_response<'a>(response: &'a Value, entity_id: &str) -> Option<&'a [Value]> {
    response
        .get(entity_id)?
        .get("forecast")?
        .as_array()
        .map(Vec::as_slice)
}

/// The same payload wrapped under `service_response`.
pub fn from_wrapped_service_response<'a>(
    response: &'a Value,
    entity_id: &str,
) -> Option<&'a [Value]> {
    from_service_response(response.get("service_response")?, entity_id)
}

/// Tries the service-call shapes in order.
pub fn from_any_service_shape<'a>(response: &'a Value, entity_id: &str) -> Option<&'a [Value]> {
    from_service_response(response, entity_id)
        .or_else(|| from_wrapped_service_response(response, entity_id))
}

/// Fills up to three days from a forecast array; missing days stay invalid.
pub fn parse_days(entries: &[Value]) -> [ForecastDay; FORECAST_DAYS] {
    let mut days: [ForecastDay; FORECAST_DAYS] = Default::default();
    for (slot, entry) in days.iter_mut().zip(entries) {
        *slot = parse_day(entry);
    }
    days
}

pub fn parse_day(entry: &Value) -> ForecastDay {
    let number = |key: &str| entry.get(key).and_then(Value::as_f64).unwrap_or(0.0) as f32;

    ForecastDay {
        day_name: entry
            .get("datetime")
            .and_then(Value::as_str)
            .and_then(weekday_abbrev)
            .unwrap_or(UNKNOWN_DAY)
            .to_string(),
        condition: entry
            .get("condition")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        temp_high: number("temperature"),
        temp_low: number("templow"),
        valid: true,
    }
}

/// Weekday of a `YYYY-MM-DD...` timestamp. Only the calendar date is read, so
/// the offset suffix never shifts the day.
pub fn weekday_abbrev(datetime: &str) -> Option<&'static str> {
    let date = NaiveDate::parse_from_str(datetime.get(..10)?, "%Y-%m-%d").ok()?;
    Some(DAY_NAMES[date.weekday().num_days_from_sunday() as usize])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const ENTITY: &str = "weather.forecast_home";

    fn day(datetime: &str, condition: &str, high: f64, low: f64) -> Value {
        json!({ "datetime": datetime, "condition": condition, "temperature": high, "templow": low })
    }

    #[test]
    fn monday_is_derived_from_the_date() {
        assert_eq!(weekday_abbrev("2024-01-15T00:00:00"), Some("Mon"));
        assert_eq!(weekday_abbrev("2024-01-14T23:00:00+00:00"), Some("Sun"));
        assert_eq!(weekday_abbrev("2024-02-29"), Some("Thu"));
    }

    #[test]
    fn malformed_dates_get_the_placeholder() {
        assert_eq!(weekday_abbrev("yesterday"), None);
        assert_eq!(weekday_abbrev("2024-13-01T00:00:00"), None);
        assert_eq!(weekday_abbrev(""), None);

        let parsed = parse_day(&json!({ "datetime": "15/01/2024", "condition": "sunny" }));
        assert_eq!(parsed.day_name, UNKNOWN_DAY);
        assert!(parsed.valid);
    }

    #[test]
    fn missing_fields_default() {
        let parsed = parse_day(&json!({}));
        assert_eq!(parsed.day_name, UNKNOWN_DAY);
        assert_eq!(parsed.condition, "");
        assert_eq!(parsed.temp_high, 0.0);
        assert_eq!(parsed.temp_low, 0.0);
        assert!(parsed.valid);
    }

    #[test]
    fn attribute_strategy_needs_a_non_empty_array() {
        let state = json!({ "state": "sunny", "attributes": { "forecast": [day("2024-01-15", "sunny", 5.0, 1.0)] } });
        assert_eq!(from_attributes(&state).map(<[Value]>::len), Some(1));

        let empty = json!({ "state": "sunny", "attributes": { "forecast": [] } });
        assert!(from_attributes(&empty).is_none());

        let absent = json!({ "state": "sunny", "attributes": {} });
        assert!(from_attributes(&absent).is_none());
    }

    #[test]
    fn direct_service_shape() {
        let response = json!({ ENTITY: { "forecast": [day("2024-01-15", "rainy", 8.0, 2.0)] } });
        let days = from_any_service_shape(&response, ENTITY).unwrap();
        assert_eq!(days[0]["condition"], "rainy");
    }

    #[test]
    fn wrapped_service_shape() {
        let response = json!({
            "changed_states": [],
            "service_response": { ENTITY: { "forecast": [day("2024-01-16", "snowy", -1.0, -6.0)] } }
        });
        assert!(from_service_response(&response, ENTITY).is_none());
        let days = from_any_service_shape(&response, ENTITY).unwrap();
        assert_eq!(days[0]["condition"], "snowy");
    }

    #[test]
    fn direct_shape_wins_over_wrapped() {
        let response = json!({
            ENTITY: { "forecast": [day("2024-01-15", "sunny", 1.0, 0.0)] },
            "service_response": { ENTITY: { "forecast": [day("2024-01-15", "hail", 1.0, 0.0)] } }
        });
        assert_eq!(from_any_service_shape(&response, ENTITY).unwrap()[0]["condition"], "sunny");
    }

    #[test]
    fn other_entities_do_not_match() {
        let response = json!({ "weather.elsewhere": { "forecast": [day("2024-01-15", "sunny", 1.0, 0.0)] } });
        assert!(from_any_service_shape(&response, ENTITY).is_none());
    }

    #[test]
    fn long_arrays_are_truncated_short_ones_leave_gaps() {
        let long: Vec<Value> = (15..22)
            .map(|d| day(&format!("2024-01-{d}T00:00:00"), "cloudy", d as f64, 0.0))
            .collect();
        let days = parse_days(&long);
        assert_eq!(
            days.iter().map(|d| d.day_name.as_str()).collect::<Vec<_>>(),
            ["Mon", "Tue", "Wed"]
        );
        assert_eq!(days[2].temp_high, 17.0);

        let short = parse_days(&long[..1]);
        assert!(short[0].valid);
        assert!(!short[1].valid);
        assert!(!short[2].valid);
    }
}
