//! Home Assistant REST reads, normalised into one [`WeatherSnapshot`](crate::models::WeatherSnapshot).

pub mod client;
pub mod entity;
pub mod fetcher;
pub mod forecast;

pub use client::{
    FORECAST_SERVICE_PATH, HaTransport, HttpMethod, HttpRequest, HttpResponse, HttpSession,
    RestTransport, state_path,
};
pub use fetcher::{EntityIds, HaFetcher};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("HTTP status {0}")]
    Status(u16),
    #[error("malformed JSON: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("entity reports '{0}'")]
    Unavailable(String),
    #[error("missing field '{0}'")]
    MissingField(&'static str),
    #[error("'{0}' is not a number")]
    NotANumber(String),
}
