//! The fixed-period poll cycle, kept free of any executor or timer types.

use crate::connectivity::{ConnectivityManager, WifiLink};
use crate::ha::{HaFetcher, HaTransport};
use crate::logging::log_snapshot;
use crate::models::WeatherSnapshot;
use crate::time_utils::Clock;
use crate::ui::PresentationState;

/// Anything that can produce a complete snapshot on demand.
pub trait SnapshotSource {
    fn fetch_all(&mut self) -> WeatherSnapshot;
}

impl<T: HaTransport, C: Clock> SnapshotSource for HaFetcher<T, C> {
    fn fetch_all(&mut self) -> WeatherSnapshot {
        HaFetcher::fetch_all(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Link down, nothing fetched.
    Offline,
    /// A snapshot was fetched and presented; `first` is set exactly once per boot.
    Fetched { first: bool },
}

pub struct PollScheduler<S, L> {
    source: S,
    connectivity: ConnectivityManager<L>,
    snapshot: WeatherSnapshot,
    interval_ms: u64,
    next_due_ms: Option<u64>,
    first_fetch_done: bool,
}

impl<S: SnapshotSource, L: WifiLink> PollScheduler<S, L> {
    pub fn new(source: S, connectivity: ConnectivityManager<L>, interval_ms: u64) -> Self {
        Self {
            source,
            connectivity,
            snapshot: WeatherSnapshot::default(),
            interval_ms,
            next_due_ms: None,
            first_fetch_done: false,
        }
    }

    /// Runs a cycle if one is due. The first call is always due.
    pub fn tick(&mut self, now_ms: u64, ui: &mut PresentationState) -> Option<CycleOutcome> {
        if !self.is_due(now_ms) {
            return None;
        }
        self.next_due_ms = Some(now_ms.saturating_add(self.interval_ms));
        Some(self.run_cycle(now_ms, ui))
    }

    /// One cycle, unconditionally: reconnect check, status, fetch, present.
    pub fn run_cycle(&mut self, now_ms: u64, ui: &mut PresentationState) -> CycleOutcome {
        self.connectivity.check_reconnect(now_ms);

        let connected = self.connectivity.is_connected();
        ui.set_wifi_status(connected);
        if !connected {
            return CycleOutcome::Offline;
        }

        self.snapshot = self.source.fetch_all();
        log_snapshot(&self.snapshot);
        ui.update(&self.snapshot);

        let first = !self.first_fetch_done;
        if first {
            ui.show_loading(false);
            self.first_fetch_done = true;
        }

        CycleOutcome::Fetched { first }
    }

    pub fn is_due(&self, now_ms: u64) -> bool {
        self.next_due_ms.is_none_or(|due| now_ms >= due)
    }

    pub fn millis_until_due(&self, now_ms: u64) -> u64 {
        self.next_due_ms
            .map_or(0, |due| due.saturating_sub(now_ms))
    }

    pub fn snapshot(&self) -> &WeatherSnapshot {
        &self.snapshot
    }

    pub fn connectivity(&self) -> &ConnectivityManager<L> {
        &self.connectivity
    }

    pub fn connectivity_mut(&mut self) -> &mut ConnectivityManager<L> {
        &mut self.connectivity
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::POLL_INTERVAL_MS;
    use crate::connectivity::LinkState;
    use crate::connectivity::tests::FakeLink;
    use crate::ha::EntityIds;
    use crate::ha::fetcher::tests::{FixedClock, healthy_transport};
    use crate::ui::WifiIndicator;
    use crate::ui::tests::full_snapshot;
    use chrono::NaiveTime;
    use std::time::Duration;

    struct StubSource {
        snapshot: WeatherSnapshot,
        calls: u32,
    }

    impl StubSource {
        fn new(snapshot: WeatherSnapshot) -> Self {
            Self { snapshot, calls: 0 }
        }
    }

    impl SnapshotSource for StubSource {
        fn fetch_all(&mut self) -> WeatherSnapshot {
            self.calls += 1;
            self.snapshot.clone()
        }
    }

    fn scheduler(link: FakeLink) -> PollScheduler<StubSource, FakeLink> {
        PollScheduler::new(
            StubSource::new(full_snapshot()),
            ConnectivityManager::new(link),
            POLL_INTERVAL_MS,
        )
    }

    #[test]
    fn first_tick_is_immediate_then_every_interval() {
        let mut s = scheduler(FakeLink::up());
        let mut ui = PresentationState::create();

        assert!(s.is_due(0));
        assert_eq!(s.millis_until_due(0), 0);
        assert_eq!(s.tick(0, &mut ui), Some(CycleOutcome::Fetched { first: true }));
        assert_eq!(s.tick(1_000, &mut ui), None);
        assert_eq!(s.tick(29_999, &mut ui), None);
        assert_eq!(s.millis_until_due(20_000), 10_000);
        assert_eq!(s.tick(30_000, &mut ui), Some(CycleOutcome::Fetched { first: false }));
        assert_eq!(s.source().calls, 2);
    }

    #[test]
    fn disconnected_cycle_skips_the_fetch() {
        let mut s = scheduler(FakeLink::down());
        let mut ui = PresentationState::create();

        assert_eq!(s.run_cycle(0, &mut ui), CycleOutcome::Offline);
        assert_eq!(s.source().calls, 0);
        assert!(!s.snapshot().has_data);
        assert_eq!(ui.status.wifi, WifiIndicator::Disconnected);
    }

    #[test]
    fn offline_cycle_asks_for_a_reconnect() {
        let mut s = scheduler(FakeLink::down());
        let mut ui = PresentationState::create();

        s.run_cycle(0, &mut ui);
        s.run_cycle(3_000, &mut ui);
        assert_eq!(s.connectivity_mut().link_mut().attempts, 1);

        s.run_cycle(30_000, &mut ui);
        assert_eq!(s.connectivity_mut().link_mut().attempts, 2);
    }

    #[test]
    fn overlay_hides_once_and_only_after_a_fetch() {
        let mut s = scheduler(FakeLink::down());
        let mut ui = PresentationState::create();

        assert_eq!(s.tick(0, &mut ui), Some(CycleOutcome::Offline));
        assert!(ui.loading_visible);
        assert_eq!(ui.status.wifi, WifiIndicator::Disconnected);
        assert!(!ui.last_rendered().has_data);

        s.connectivity_mut().link_mut().connected = true;
        assert_eq!(s.tick(30_000, &mut ui), Some(CycleOutcome::Fetched { first: true }));
        assert!(!ui.loading_visible);
        assert_eq!(ui.status.wifi, WifiIndicator::Connected);
        assert_eq!(s.connectivity().state(), LinkState::Connected);
        assert_eq!(ui.indoor.value.text, "22.4°C");
        assert_eq!(ui.forecast[2].day.text, "Fri");
        assert_eq!(*s.snapshot(), full_snapshot());

        ui.show_loading(true);
        assert_eq!(s.tick(60_000, &mut ui), Some(CycleOutcome::Fetched { first: false }));
        assert!(ui.loading_visible);
    }

    #[test]
    fn runs_against_the_real_fetcher() {
        let clock = FixedClock(NaiveTime::from_hms_opt(9, 41, 0), Duration::ZERO);
        let fetcher = HaFetcher::new(healthy_transport(), clock, EntityIds::default());
        let mut s = PollScheduler::new(fetcher, ConnectivityManager::new(FakeLink::up()), POLL_INTERVAL_MS);
        let mut ui = PresentationState::create();

        assert_eq!(s.tick(0, &mut ui), Some(CycleOutcome::Fetched { first: true }));
        assert_eq!(ui.sauna.value.text, "71.0°C");
        assert_eq!(ui.current.condition.text, "Partly Cloudy");
        assert_eq!(ui.status.updated.text, "Updated: 09:41");
    }
}
