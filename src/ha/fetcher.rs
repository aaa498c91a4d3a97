use super::client::{FORECAST_SERVICE_PATH, HaTransport, forecast_request_body, state_path};
use super::entity::{self, EntityState};
use super::{FetchError, forecast};
use crate::config::{
    HA_ENTITY_INDOOR_TEMP, HA_ENTITY_OUTDOOR_TEMP, HA_ENTITY_SAUNA_TEMP, HA_ENTITY_WEATHER,
};
use crate::logging::{log_fetch_error, log_forecast_source};
use crate::models::{CurrentWeather, FORECAST_DAYS, ForecastDay, TemperatureReading, WeatherSnapshot};
use crate::time_utils::{Clock, format_updated_at};
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct EntityIds {
    pub indoor: String,
    pub outdoor: String,
    pub sauna: String,
    pub weather: String,
}

impl Default for EntityIds {
    fn default() -> Self {
        Self {
            indoor: HA_ENTITY_INDOOR_TEMP.to_string(),
            outdoor: HA_ENTITY_OUTDOOR_TEMP.to_string(),
            sauna: HA_ENTITY_SAUNA_TEMP.to_string(),
            weather: HA_ENTITY_WEATHER.to_string(),
        }
    }
}

/// Reads every dashboard entity once and folds the results into a snapshot.
pub struct HaFetcher<T, C> {
    transport: T,
    clock: C,
    entities: EntityIds,
}

impl<T: HaTransport, C: Clock> HaFetcher<T, C> {
    pub fn new(transport: T, clock: C, entities: EntityIds) -> Self {
        Self {
            transport,
            clock,
            entities,
        }
    }

    /// One full poll. Every sub-request is attempted exactly once; any failure only
    /// invalidates its own field.
    pub fn fetch_all(&mut self) -> WeatherSnapshot {
        let ids = self.entities.clone();
        let indoor = self.temperature(&ids.indoor, entity::sensor_temperature);
        let outdoor = self.temperature(&ids.outdoor, entity::sensor_temperature);
        let sauna = self.temperature(&ids.sauna, entity::climate_temperature);

        let weather_state = self.weather_state();
        let current = match &weather_state {
            Some((entity, _)) => entity::current_weather(entity),
            None => CurrentWeather::default(),
        };
        let forecast = self.forecast(weather_state.as_ref().map(|(_, raw)| raw));

        WeatherSnapshot {
            indoor,
            outdoor,
            sauna,
            current,
            forecast,
            last_updated: format_updated_at(self.clock.local_time(), self.clock.uptime()),
            has_data: true,
        }
    }

    pub fn into_parts(self) -> (T, C) {
        (self.transport, self.clock)
    }

    fn temperature(
        &mut self,
        entity_id: &str,
        extract: fn(&EntityState) -> Result<f32, FetchError>,
    ) -> TemperatureReading {
        let result = self
            .transport
            .get(&state_path(entity_id))
            .and_then(|body| EntityState::parse(&body))
            .and_then(|state| extract(&state));

        match result {
            Ok(value) => TemperatureReading::celsius(value),
            Err(e) => {
                log_fetch_error(entity_id, &e);
                TemperatureReading::invalid()
            }
        }
    }

    /// The weather entity is decoded twice from the same body: typed for the current
    /// conditions, raw for the attribute forecast strategy.
    fn weather_state(&mut self) -> Option<(EntityState, Value)> {
        let entity_id = self.entities.weather.clone();
        let result = self.transport.get(&state_path(&entity_id)).and_then(|body| {
            let raw: Value = serde_json::from_str(&body)?;
            let typed: EntityState = serde_json::from_value(raw.clone())?;
            Ok((typed, raw))
        });

        match result {
            Ok(pair) => Some(pair),
            Err(e) => {
                log_fetch_error(&entity_id, &e);
                None
            }
        }
    }

    fn forecast(&mut self, weather_state: Option<&Value>) -> [ForecastDay; FORECAST_DAYS] {
        if let Some(days) = weather_state.and_then(forecast::from_attributes) {
            log_forecast_source("entity attributes");
            return forecast::parse_days(days);
        }

        let entity_id = self.entities.weather.clone();
        let body = forecast_request_body(&entity_id);
        let response = self
            .transport
            .post(FORECAST_SERVICE_PATH, &body)
            .and_then(|raw| Ok(serde_json::from_str::<Value>(&raw)?));

        match response {
            Ok(response) => match forecast::from_any_service_shape(&response, &entity_id) {
                Some(days) => {
                    log_forecast_source("service call");
                    forecast::parse_days(days)
                }
                None => {
                    log_fetch_error("forecast", &FetchError::MissingField("forecast"));
                    Default::default()
                }
            },
            Err(e) => {
                log_fetch_error("forecast", &e);
                Default::default()
            }
        }
    }
}
