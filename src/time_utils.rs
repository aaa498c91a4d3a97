use crate::config::{TIMESTAMP_PATTERN, TIMEZONE};
use chrono::{DateTime, NaiveTime, Timelike, Utc};
use chrono_tz::Tz;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

static TIME_SYNCED: AtomicBool = AtomicBool::new(false);

/// Where the fetcher gets its "last updated" stamp from.
pub trait Clock {
    /// Local wall-clock time, `None` until the clock has been set.
    fn local_time(&self) -> Option<NaiveTime>;
    fn uptime(&self) -> Duration;
}

/// SNTP-backed wall clock plus the monotonic boot timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn local_time(&self) -> Option<NaiveTime> {
        is_time_synced().then(|| get_current_time_in_timezone().time())
    }

    fn uptime(&self) -> Duration {
        uptime()
    }
}

/// `HH:MM` when the wall clock is known, otherwise minutes and seconds since boot.
pub fn format_updated_at(local: Option<NaiveTime>, uptime: Duration) -> String {
    match local {
        Some(t) => format!("{:02}:{:02}", t.hour(), t.minute()),
        None => {
            let s = uptime.as_secs();
            format!("{}m{}s", s / 60, s % 60)
        }
    }
}

pub fn is_time_synced() -> bool {
    // Off-device the host OS keeps the clock in sync for us.
    cfg!(not(target_os = "espidf")) || TIME_SYNCED.load(Ordering::Relaxed)
}

#[cfg(target_os = "espidf")]
pub fn uptime() -> Duration {
    let micros = unsafe { esp_idf_svc::sys::esp_timer_get_time() };
    Duration::from_micros(micros.max(0) as u64)
}

#[cfg(not(target_os = "espidf"))]
pub fn uptime() -> Duration {
    static BOOT: OnceLock<std::time::Instant> = OnceLock::new();
    BOOT.get_or_init(std::time::Instant::now).elapsed()
}

pub fn uptime_millis() -> u64 {
    uptime().as_millis() as u64
}

pub fn get_uptime_string() -> String {
    let up = uptime();
    format!("[{:>4}.{:03}s]", up.as_secs(), up.subsec_millis())
}

pub fn get_formatted_timestamp() -> String {
    if !is_time_synced() {
        return "--:--:--".to_string();
    }
    get_current_time_in_timezone()
        .format(TIMESTAMP_PATTERN)
        .to_string()
}

fn get_current_time_in_timezone() -> DateTime<Tz> {
    Utc::now().with_timezone(cached_timezone())
}

fn cached_timezone() -> &'static Tz {
    static TZ: OnceLock<Tz> = OnceLock::new();
    TZ.get_or_init(|| TIMEZONE.parse().unwrap_or(chrono_tz::UTC))
}

#[cfg(target_os = "espidf")]
pub use sntp::{ntp_sync_watcher, setup_ntp};

#[cfg(target_os = "espidf")]
mod sntp {
    use super::TIME_SYNCED;
    use anyhow::Context;
    use embassy_time::Timer;
    use esp_idf_svc::sntp::{EspSntp, SyncStatus};
    use log::info;
    use std::sync::atomic::Ordering;

    /// Starts SNTP without waiting for it; until the first sync lands the dashboard
    /// stamps updates with uptime instead of wall-clock time.
    pub fn setup_ntp() -> anyhow::Result<EspSntp<'static>> {
        let ntp_client = EspSntp::new_default().context("‼️ Failed to init NTP")?;
        info!("\x1b[38;5;27m ⏳ Time sync started in background");
        Ok(ntp_client)
    }

    pub async fn ntp_sync_watcher(ntp_client: EspSntp<'static>) {
        loop {
            if ntp_client.get_sync_status() == SyncStatus::Completed {
                if !super::is_time_synced() {
                    info!("📡 NTP Sync Complete! Time is now valid.");
                }

                mark_time_synced();

                Timer::after_secs(60).await;
            } else {
                Timer::after_secs(1).await;
            }
        }
    }

    fn mark_time_synced() {
        TIME_SYNCED.store(true, Ordering::Relaxed);
    }
}
