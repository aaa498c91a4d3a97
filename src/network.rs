use crate::config::{WIFI_PASS, WIFI_SSID, WIFI_STATUS_POLL_MS, WIFI_TIMEOUT_MS};
use crate::connectivity::WifiLink;
use anyhow::{Context, Result, anyhow};
use embassy_time::{Duration, Instant, Timer};
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::modem::Modem;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::wifi::{AuthMethod, ClientConfiguration, Configuration as WifiConfig, EspWifi};
use log::{info, warn};

/// Station-mode radio. Association is started once at boot, later retries go
/// through [`WifiLink::reassociate`].
pub struct EspWifiLink {
    wifi: EspWifi<'static>,
}

impl EspWifiLink {
    /// Starts the station and waits up to `WIFI_TIMEOUT_MS` for it to come up.
    /// A timeout is not an error; the poll cycle keeps retrying.
    pub async fn init(
        modem: Modem,
        sys_loop: EspSystemEventLoop,
        nvs: EspDefaultNvsPartition,
    ) -> Result<Self> {
        let mut wifi = EspWifi::new(modem, sys_loop, Some(nvs))?;

        let auth_method = if WIFI_PASS.is_empty() {
            AuthMethod::None
        } else {
            AuthMethod::WPA2Personal
        };

        wifi.set_configuration(&WifiConfig::Client(ClientConfiguration {
            ssid: WIFI_SSID
                .try_into()
                .map_err(|_| anyhow!("SSID is too long"))?,
            password: WIFI_PASS
                .try_into()
                .map_err(|_| anyhow!("Password is too long"))?,
            auth_method,
            ..Default::default()
        }))?;
        wifi.start()?;
        info!("📶 WiFi starting, joining '{}'...", WIFI_SSID);

        if let Err(e) = wifi.connect() {
            warn!("📶 Connect call failed: {:?}", e);
        }

        let started = Instant::now();
        let timeout = Duration::from_millis(WIFI_TIMEOUT_MS);
        while !wifi.is_up().unwrap_or(false) && started.elapsed() < timeout {
            Timer::after(Duration::from_millis(WIFI_STATUS_POLL_MS)).await;
        }

        let link = Self { wifi };
        match link.wifi.sta_netif().get_ip_info() {
            Ok(ip_info) if link.is_connected() => info!("📶 WiFi Connected! IP: {}", ip_info.ip),
            _ => warn!(
                "📶 WiFi not up after {}ms, will keep retrying in the background",
                WIFI_TIMEOUT_MS
            ),
        }

        Ok(link)
    }
}

impl WifiLink for EspWifiLink {
    fn is_connected(&self) -> bool {
        self.wifi.is_up().unwrap_or(false)
    }

    fn reassociate(&mut self) -> anyhow::Result<()> {
        // Fails when already idle, which is fine.
        let _ = self.wifi.disconnect();
        self.wifi.connect().context("WiFi connect call failed")
    }
}
