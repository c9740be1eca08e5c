//! Live `NewWave` observation with scoped teardown.

use crate::config::DedupePolicy;
use crate::state::SharedState;
use crate::PortalError;
use std::cell::Cell;
use std::rc::Rc;
use tracing::{info, warn};
use wp_api_types::EventCursor;
use wp_chain_client::WavePortal;

/// Owns a contract handle and a cursor; each `pump` applies the appends
/// observed since the previous one.
pub struct WaveSubscription<P> {
    portal: P,
    cursor: EventCursor,
    state: SharedState,
    dedupe: DedupePolicy,
    active: Rc<Cell<bool>>,
}

/// Dropping the guard unregisters the subscription. Pumps already in
/// flight apply nothing once they resume.
pub struct SubscriptionGuard {
    active: Rc<Cell<bool>>,
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        if self.active.replace(false) {
            info!("unsubscribed from NewWave");
        }
    }
}

impl<P: WavePortal> WaveSubscription<P> {
    pub(crate) fn open(
        portal: P,
        cursor: EventCursor,
        state: SharedState,
        dedupe: DedupePolicy,
    ) -> (Self, SubscriptionGuard) {
        let active = Rc::new(Cell::new(true));
        let guard = SubscriptionGuard {
            active: active.clone(),
        };
        let subscription = Self {
            portal,
            cursor,
            state,
            dedupe,
            active,
        };
        (subscription, guard)
    }

    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    pub fn cursor(&self) -> EventCursor {
        self.cursor
    }

    /// Poll once. Returns how many records were appended to the log.
    pub async fn pump(&mut self) -> Result<usize, PortalError> {
        if !self.is_active() {
            return Err(PortalError::SubscriptionClosed);
        }

        let waves = self
            .portal
            .poll_new_waves(&mut self.cursor)
            .await
            .map_err(PortalError::query)?;

        let mut appended = 0;
        for wave in waves {
            if !self.is_active() {
                return Err(PortalError::SubscriptionClosed);
            }

            info!("NewWave {} {} {:?}", wave.sender, wave.timestamp, wave.message);
            let dedupe = self.dedupe;
            if self.state.with_mut(|s| s.append_wave(wave, dedupe)) {
                appended += 1;
            }

            match self.portal.total_waves().await {
                Ok(total) if self.is_active() => self.state.with_mut(|s| s.set_total_waves(total)),
                Ok(_) => return Err(PortalError::SubscriptionClosed),
                Err(err) => warn!("count refresh after NewWave failed: {err:#}"),
            }
        }
        Ok(appended)
    }
}

#[cfg(test)]
mod tests {
    use crate::testing::{FakeChain, FakeHost, init_tracing};
    use crate::{DedupePolicy, Portal, PortalConfig, PortalError};

    fn portal(chain: &FakeChain, dedupe: DedupePolicy) -> Portal<FakeHost> {
        init_tracing();
        let config = PortalConfig {
            dedupe,
            ..PortalConfig::default()
        };
        Portal::new(FakeHost::present(chain), config)
    }

    #[tokio::test]
    async fn appends_live_waves_and_refreshes_count() {
        let chain = FakeChain::with_history(1);
        let portal = portal(&chain, DedupePolicy::default());
        portal.refresh_waves().await.expect("refresh");

        let (mut subscription, _guard) = portal.subscribe().await.expect("subscribed");
        assert_eq!(subscription.pump().await, Ok(0));

        chain.push_external_wave("0x1234", "first");
        chain.push_external_wave("0x5678", "second");
        assert_eq!(subscription.pump().await, Ok(2));

        let state = portal.state().snapshot();
        let messages: Vec<&str> = state.waves.iter().map(|w| w.message.as_str()).collect();
        assert_eq!(messages, vec!["wave 0", "first", "second"]);
        assert_eq!(state.total_waves, 3);
    }

    #[tokio::test]
    async fn history_before_subscribing_is_not_replayed() {
        let chain = FakeChain::with_history(2);
        let portal = portal(&chain, DedupePolicy::default());
        let (mut subscription, _guard) = portal.subscribe().await.expect("subscribed");

        assert_eq!(subscription.pump().await, Ok(0));
        assert!(portal.state().with(|s| s.waves.is_empty()));
    }

    #[tokio::test]
    async fn dedupes_event_already_loaded_by_refresh() {
        let chain = FakeChain::default();
        let portal = portal(&chain, DedupePolicy::SenderAndTimestamp);
        let (mut subscription, _guard) = portal.subscribe().await.expect("subscribed");

        chain.push_external_wave("0xABCD", "raced");
        portal.refresh_waves().await.expect("refresh");
        assert_eq!(subscription.pump().await, Ok(0));
        assert_eq!(portal.state().with(|s| s.waves.len()), 1);
    }

    #[tokio::test]
    async fn duplicates_kept_when_policy_allows() {
        let chain = FakeChain::default();
        let portal = portal(&chain, DedupePolicy::AcceptDuplicates);
        let (mut subscription, _guard) = portal.subscribe().await.expect("subscribed");

        chain.push_external_wave("0xABCD", "raced");
        portal.refresh_waves().await.expect("refresh");
        assert_eq!(subscription.pump().await, Ok(1));
        assert_eq!(portal.state().with(|s| s.waves.len()), 2);
    }

    #[tokio::test]
    async fn dropping_guard_closes_subscription() {
        let chain = FakeChain::default();
        let portal = portal(&chain, DedupePolicy::default());
        let (mut subscription, guard) = portal.subscribe().await.expect("subscribed");
        assert!(subscription.is_active());

        drop(guard);
        chain.push_external_wave("0x1234", "after teardown");

        assert!(!subscription.is_active());
        assert_eq!(subscription.pump().await, Err(PortalError::SubscriptionClosed));
        assert!(portal.state().with(|s| s.waves.is_empty()));
    }

    #[tokio::test]
    async fn own_wave_is_seen_once() {
        let chain = FakeChain::default();
        chain.authorize("0xabc");
        let portal = portal(&chain, DedupePolicy::default());
        let (mut subscription, _guard) = portal.subscribe().await.expect("subscribed");

        portal.wave().await.expect("mined");
        assert_eq!(subscription.pump().await, Ok(0));

        let state = portal.state().snapshot();
        assert_eq!(state.waves.len(), 1);
        assert_eq!(state.total_waves, 1);
    }
}
