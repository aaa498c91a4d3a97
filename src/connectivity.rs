//! Station-link bookkeeping: live status plus a throttled reconnect policy.

use crate::config::RECONNECT_COOLDOWN_MS;
use crate::logging::log_connectivity;

const INIT_RETRY_BASE_MS: u64 = 5_000;
const INIT_RETRY_MAX_MS: u64 = 300_000;

/// Delay before the next attempt at bringing up a driver that failed `attempt` times
/// (1-based): 5 s doubling up to 5 min.
pub fn init_retry_delay_ms(attempt: u32) -> u64 {
    let doublings = attempt.saturating_sub(1).min(16);
    (INIT_RETRY_BASE_MS << doublings).min(INIT_RETRY_MAX_MS)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Disconnected,
    Connecting,
    Connected,
}

/// The radio side of the link. `is_connected` must query the driver every time.
pub trait WifiLink {
    fn is_connected(&self) -> bool;

    /// Starts a new association attempt and returns without waiting for it.
    fn reassociate(&mut self) -> anyhow::Result<()>;
}

pub struct ConnectivityManager<L> {
    link: L,
    state: LinkState,
    last_reconnect_attempt_ms: Option<u64>,
    cooldown_ms: u64,
}

impl<L: WifiLink> ConnectivityManager<L> {
    /// Wraps a link whose initial association has already run (or timed out).
    pub fn new(link: L) -> Self {
        let state = if link.is_connected() {
            LinkState::Connected
        } else {
            LinkState::Disconnected
        };

        Self {
            link,
            state,
            last_reconnect_attempt_ms: None,
            cooldown_ms: RECONNECT_COOLDOWN_MS,
        }
    }

    pub fn is_connected(&mut self) -> bool {
        let connected = self.link.is_connected();
        let observed = if connected {
            LinkState::Connected
        } else {
            LinkState::Disconnected
        };

        if observed != self.state {
            let note = if connected { "link is up" } else { "link is down" };
            log_connectivity(observed, note);
            self.state = observed;
        }

        connected
    }

    /// Issues at most one reassociation per cooldown window while the link is down.
    /// Returns whether an attempt was made.
    pub fn check_reconnect(&mut self, now_ms: u64) -> bool {
        if self.link.is_connected() {
            return false;
        }

        if let Some(last) = self.last_reconnect_attempt_ms
            && now_ms.saturating_sub(last) < self.cooldown_ms
        {
            return false;
        }

        self.last_reconnect_attempt_ms = Some(now_ms);
        self.state = LinkState::Connecting;
        log_connectivity(self.state, "reassociating");

        if let Err(e) = self.link.reassociate() {
            self.state = LinkState::Disconnected;
            log_connectivity(self.state, &format!("reconnect call failed: {:#}", e));
        }

        true
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    pub fn last_reconnect_attempt_ms(&self) -> Option<u64> {
        self.last_reconnect_attempt_ms
    }

    pub fn link_mut(&mut self) -> &mut L {
        &mut self.link
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    #[derive(Default)]
    pub(crate) struct FakeLink {
        pub connected: bool,
        pub attempts: u32,
        pub refuse: bool,
    }

    impl FakeLink {
        pub fn down() -> Self {
            Self::default()
        }

        pub fn up() -> Self {
            Self {
                connected: true,
                ..Self::default()
            }
        }
    }

    impl WifiLink for FakeLink {
        fn is_connected(&self) -> bool {
            self.connected
        }

        fn reassociate(&mut self) -> anyhow::Result<()> {
            self.attempts += 1;
            if self.refuse {
                anyhow::bail!("driver busy");
            }
            Ok(())
        }
    }

    #[test]
    fn driver_init_retries_back_off_to_a_ceiling() {
        assert_eq!(init_retry_delay_ms(0), 5_000);
        assert_eq!(init_retry_delay_ms(1), 5_000);
        assert_eq!(init_retry_delay_ms(2), 10_000);
        assert_eq!(init_retry_delay_ms(4), 40_000);
        assert_eq!(init_retry_delay_ms(7), 300_000);
        assert_eq!(init_retry_delay_ms(u32::MAX), 300_000);
    }

    #[test]
    fn initial_state_follows_the_link() {
        assert_eq!(ConnectivityManager::new(FakeLink::down()).state(), LinkState::Disconnected);
        assert_eq!(ConnectivityManager::new(FakeLink::up()).state(), LinkState::Connected);
    }

    #[test]
    fn connected_link_never_reassociates() {
        let mut manager = ConnectivityManager::new(FakeLink::up());
        assert!(!manager.check_reconnect(0));
        assert!(!manager.check_reconnect(60_000));
        assert_eq!(manager.link_mut().attempts, 0);
    }

    #[test]
    fn calls_inside_the_cooldown_make_one_attempt() {
        let mut manager = ConnectivityManager::new(FakeLink::down());
        assert!(manager.check_reconnect(20_000));
        assert!(!manager.check_reconnect(23_000));
        assert_eq!(manager.link_mut().attempts, 1);
        assert_eq!(manager.last_reconnect_attempt_ms(), Some(20_000));
    }

    #[test]
    fn calls_a_cooldown_apart_each_attempt() {
        let mut manager = ConnectivityManager::new(FakeLink::down());
        assert!(manager.check_reconnect(1_000));
        assert!(manager.check_reconnect(11_000));
        assert!(manager.check_reconnect(25_000));
        assert_eq!(manager.link_mut().attempts, 3);
    }

    #[test]
    fn first_attempt_is_not_delayed() {
        let mut manager = ConnectivityManager::new(FakeLink::down());
        assert!(manager.check_reconnect(0));
        assert_eq!(manager.state(), LinkState::Connecting);
    }

    #[test]
    fn refused_attempt_still_starts_the_cooldown() {
        let link = FakeLink {
            refuse: true,
            ..FakeLink::down()
        };
        let mut manager = ConnectivityManager::new(link);
        assert!(manager.check_reconnect(5_000));
        assert_eq!(manager.state(), LinkState::Disconnected);
        assert!(!manager.check_reconnect(9_000));
        assert_eq!(manager.link_mut().attempts, 1);
    }

    #[test]
    fn is_connected_is_a_live_query() {
        let mut manager = ConnectivityManager::new(FakeLink::down());
        assert!(!manager.is_connected());

        manager.link_mut().connected = true;
        assert!(manager.is_connected());
        assert_eq!(manager.state(), LinkState::Connected);

        manager.link_mut().connected = false;
        assert!(!manager.is_connected());
        assert_eq!(manager.state(), LinkState::Disconnected);
    }
}
