//! Compile-time configuration. Secrets come from `.env` via `build.rs`.

const fn env_or(value: Option<&'static str>, fallback: &'static str) -> &'static str {
    match value {
        Some(v) => v,
        None => fallback,
    }
}

pub const WIFI_SSID: &str = env_or(option_env!("WIFI_SSID"), "");
pub const WIFI_PASS: &str = env_or(option_env!("WIFI_PASS"), "");
pub const HA_BASE_URL: &str = env_or(option_env!("HA_BASE_URL"), "http://homeassistant.local:8123");
pub const HA_TOKEN: &str = env_or(option_env!("HA_TOKEN"), "");
pub const TIMEZONE: &str = env_or(option_env!("TIMEZONE"), "UTC");

pub const HA_ENTITY_INDOOR_TEMP: &str = "sensor.h5071_50bc_temperature";
pub const HA_ENTITY_OUTDOOR_TEMP: &str = "sensor.xiamoi_t3_thermometer_temperature";
pub const HA_ENTITY_SAUNA_TEMP: &str = "climate.itc_308_wifi_thermostat";
pub const HA_ENTITY_WEATHER: &str = "weather.forecast_home";

pub const POLL_INTERVAL_MS: u64 = 30_000;
pub const WIFI_TIMEOUT_MS: u64 = 15_000;
pub const WIFI_STATUS_POLL_MS: u64 = 250;
pub const RECONNECT_COOLDOWN_MS: u64 = 10_000;
pub const HTTP_TIMEOUT_MS: u64 = 5_000;
pub const HTTP_MAX_BODY_BYTES: usize = 64 * 1024;

pub const TIMESTAMP_PATTERN: &str = "%Y-%m-%d %H:%M:%S";

pub const SCREEN_WIDTH: u32 = 800;
pub const SCREEN_HEIGHT: u32 = 480;
pub const LEFT_PANEL_W: u32 = 220;
pub const RIGHT_PANEL_W: u32 = SCREEN_WIDTH - LEFT_PANEL_W;
pub const STATUS_BAR_H: u32 = 36;
