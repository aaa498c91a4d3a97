//! Home Assistant weather dashboard for an 800x480 ESP32-S3 touch panel.
//!
//! Everything outside the ESP-IDF-only modules builds and tests on the host.

pub mod config;
pub mod conditions;
pub mod connectivity;
pub mod framebuffer;
pub mod ha;
pub mod logging;
pub mod models;
pub mod scheduler;
pub mod time_utils;
pub mod ui;
pub mod units;

#[cfg(target_os = "espidf")]
pub mod display;
#[cfg(target_os = "espidf")]
pub mod http;
#[cfg(target_os = "espidf")]
pub mod network;
#[cfg(target_os = "espidf")]
pub mod tasks;
#[cfg(target_os = "espidf")]
pub mod touch;
