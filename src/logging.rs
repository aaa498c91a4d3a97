use crate::connectivity::LinkState;
use crate::ha::FetchError;
use crate::models::WeatherSnapshot;
use crate::time_utils::{get_formatted_timestamp, get_uptime_string};
use log::{debug, error, info, warn};

const SPLASH_SCREEN: &str = r#"
  _  _   _         ___          _
 | || | /_\   ___ |   \ __ _ __| |_
 | __ |/ _ \ |___|| |) / _` (_-< ' \
 |_||_/_/ \_\     |___/\__,_/__/_||_|
                                      "#;

pub(crate) enum LogLevel {
    Info,
    Warn,
    Error,
}

pub fn print_splash_screen() {
    info!("{}", SPLASH_SCREEN);
}

pub fn log_snapshot(data: &WeatherSnapshot) {
    let ts = get_formatted_timestamp();

    let temps = format!(
        "[ 🏠 Indoor {} | 🌳 Outdoor {} | 🔥 Sauna {} ]",
        reading(data.indoor.get()),
        reading(data.outdoor.get()),
        reading(data.sauna.get()),
    );
    log_message(LogLevel::Info, &temps, &ts);

    if data.current.valid {
        let now = format!(
            "⛅ {} {:.1}C | 💧 {:.0}% | 🌬️ {:.0} km/h",
            data.current.condition,
            data.current.temperature,
            data.current.humidity,
            data.current.wind_speed
        );
        log_message(LogLevel::Info, &now, &ts);
    }

    for day in data.forecast.iter().filter(|d| d.valid) {
        let line = format!(
            "📅 {}: {} H:{:.0} L:{:.0}",
            day.day_name, day.condition, day.temp_high, day.temp_low
        );
        log_message(LogLevel::Info, &line, &ts);
    }

    match serde_json::to_string(data) {
        Ok(json) => debug!("📦 {}", json),
        Err(e) => debug!("📦 snapshot not serializable: {}", e),
    }
}

pub fn log_fetch_error(what: &str, error: &FetchError) {
    let ts = get_formatted_timestamp();
    let level = match error {
        FetchError::Unavailable(_) => LogLevel::Warn,
        _ => LogLevel::Error,
    };

    log_message(level, &format!("🚫 {} fetch failed: {}", what, error), &ts);
}

pub fn log_forecast_source(source: &str) {
    let ts = get_formatted_timestamp();

    log_message(LogLevel::Info, &format!("📅 Forecast from {}", source), &ts);
}

pub fn log_connectivity(state: LinkState, note: &str) {
    let ts = get_formatted_timestamp();
    let level = match state {
        LinkState::Connected => LogLevel::Info,
        LinkState::Connecting => LogLevel::Warn,
        LinkState::Disconnected => LogLevel::Error,
    };

    log_message(level, &format!("📶 {:?}: {}", state, note), &ts);
}

pub(crate) fn log_message(level: LogLevel, message: &str, custom_ts: &str) {
    let uptime = get_uptime_string();
    let prefix = format!("{} [{}]", uptime, custom_ts);

    match level {
        LogLevel::Error => error!("\x1b[31m{} {}\x1b[0m", prefix, message),
        LogLevel::Warn => warn!("\x1b[38;5;11m{} {}\x1b[0m", prefix, message),
        LogLevel::Info => info!("\x1b[38;5;40m{} {}\x1b[0m", prefix, message),
    }
}

fn reading(value: Option<f32>) -> String {
    match value {
        Some(v) => format!("{:.1}C", v),
        None => "n/a".to_string(),
    }
}
