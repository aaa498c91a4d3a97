use crate::config::{POLL_INTERVAL_MS, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::connectivity::{ConnectivityManager, WifiLink, init_retry_delay_ms};
use crate::display::Display;
use crate::framebuffer::Framebuffer;
use crate::ha::{EntityIds, HaFetcher};
use crate::http::ha_transport;
use crate::network::EspWifiLink;
use crate::scheduler::PollScheduler;
use crate::time_utils::{SystemClock, ntp_sync_watcher, setup_ntp, uptime_millis};
use crate::touch::Gt911;
use crate::ui::{PresentationState, TapTracker, UiEvent, render};
use embassy_executor::Spawner;
use embassy_futures::select::{Either, select};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_time::{Duration, Timer};
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::modem::Modem;
use esp_idf_svc::hal::peripheral::Peripheral;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::sntp::EspSntp;
use log::{error, info, warn};

const TOUCH_POLL_MS: u64 = 20;

pub static UI_EVENTS: Channel<CriticalSectionRawMutex, UiEvent, 4> = Channel::new();

fn redraw(ui: &PresentationState, frame: &mut Framebuffer, display: &mut Display) {
    if let Err(never) = render::draw(ui, frame) {
        match never {}
    }
    if let Err(e) = display.flush(frame) {
        error!("🖥️ Display flush failed: {:#}", e);
    }
}

/// Owns the screen and the poll cycle. Touch input arrives through [`UI_EVENTS`]
/// and is handled between polls, so a fetch and a redraw never overlap.
#[embassy_executor::task]
pub async fn dashboard_task(
    spawner: Spawner,
    mut display: Display,
    mut modem: Modem,
    sys_loop: EspSystemEventLoop,
    nvs: EspDefaultNvsPartition,
) {
    let mut ui = PresentationState::create();
    let mut frame = Framebuffer::new(SCREEN_WIDTH, SCREEN_HEIGHT);
    redraw(&ui, &mut frame, &mut display);

    let mut attempt = 0;
    let link = loop {
        // SAFETY: a failed init has already dropped its driver, so the modem is free.
        let modem = unsafe { modem.clone_unchecked() };
        match EspWifiLink::init(modem, sys_loop.clone(), nvs.clone()).await {
            Ok(link) => break link,
            Err(e) => {
                attempt += 1;
                let delay = init_retry_delay_ms(attempt);
                error!("‼️ WiFi driver init failed, retrying in {}s: {:#}", delay / 1000, e);
                ui.set_wifi_status(false);
                redraw(&ui, &mut frame, &mut display);
                Timer::after(Duration::from_millis(delay)).await;
            }
        }
    };
    ui.set_wifi_status(link.is_connected());
    redraw(&ui, &mut frame, &mut display);

    match setup_ntp() {
        Ok(ntp) => {
            if let Err(e) = spawner.spawn(ntp_task(ntp)) {
                warn!("⏳ Could not spawn NTP task: {:?}", e);
            }
        }
        Err(e) => warn!("{:#}", e),
    }

    let fetcher = HaFetcher::new(ha_transport(), SystemClock, EntityIds::default());
    let mut scheduler = PollScheduler::new(
        fetcher,
        ConnectivityManager::new(link),
        POLL_INTERVAL_MS,
    );

    info!("📊 Dashboard running, polling every {}s", POLL_INTERVAL_MS / 1000);

    loop {
        if scheduler.tick(uptime_millis(), &mut ui).is_some() {
            redraw(&ui, &mut frame, &mut display);
        }

        let wait = Duration::from_millis(scheduler.millis_until_due(uptime_millis()));
        if let Either::Second(event) = select(Timer::after(wait), UI_EVENTS.receive()).await
            && ui.handle_event(event)
        {
            redraw(&ui, &mut frame, &mut display);
        }
    }
}

#[embassy_executor::task]
pub async fn touch_task(mut touch: Gt911) {
    let mut taps = TapTracker::default();

    loop {
        if let Some(event) = taps.sample(touch.read()) {
            UI_EVENTS.send(event).await;
        }
        Timer::after(Duration::from_millis(TOUCH_POLL_MS)).await;
    }
}

#[embassy_executor::task]
pub async fn ntp_task(ntp: EspSntp<'static>) {
    ntp_sync_watcher(ntp).await;
}
