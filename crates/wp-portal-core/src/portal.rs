use crate::config::PortalConfig;
use crate::state::{PortalState, SharedState};
use crate::subscription::{SubscriptionGuard, WaveSubscription};
use crate::view::ViewModel;
use crate::PortalError;
use time::UtcOffset;
use tracing::{debug, info, warn};
use wp_api_types::{AccountAddress, TxReceipt};
use wp_chain_client::{ProviderHost, WalletProvider, WavePortal};

pub struct Portal<H> {
    host: H,
    config: PortalConfig,
    state: SharedState,
}

/// Holds the loading flag up until dropped, whichever way the submit ends.
struct LoadingGuard<'a> {
    state: &'a SharedState,
}

impl<'a> LoadingGuard<'a> {
    fn engage(state: &'a SharedState) -> Self {
        state.with_mut(|s| s.set_loading(true));
        Self { state }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.state.with_mut(|s| s.set_loading(false));
    }
}

impl<H: ProviderHost> Portal<H> {
    pub fn new(host: H, config: PortalConfig) -> Self {
        let state = SharedState::new(PortalState::new(config.initial_draft.clone()));
        Self {
            host,
            config,
            state,
        }
    }

    pub fn state(&self) -> &SharedState {
        &self.state
    }

    pub fn config(&self) -> &PortalConfig {
        &self.config
    }

    pub fn view<F>(&self, offset_at: F) -> ViewModel
    where
        F: Fn(u64) -> UtcOffset,
    {
        self.state.with(|s| ViewModel::project(s, offset_at))
    }

    pub fn set_draft(&self, draft: impl Into<String>) {
        let draft = draft.into();
        self.state.with_mut(|s| s.set_draft(draft));
    }

    /// A fresh contract handle, or `None` without a provider.
    pub fn bind(&self) -> Option<H::Portal> {
        self.host.bind_portal(&self.config.contract_address)
    }

    /// Silent startup check. Adopts an already-authorized account and
    /// hydrates the counter and the log.
    pub async fn check_if_wallet_is_connected(&self) -> Result<Option<AccountAddress>, PortalError> {
        let wallet = self.host.wallet().ok_or(PortalError::NoProvider)?;
        let accounts = wallet.accounts().await.map_err(PortalError::authorization)?;

        let Some(account) = accounts.into_iter().next() else {
            info!("no authorized account found");
            return Ok(None);
        };

        info!("found an authorized account: {}", account);
        self.state.with_mut(|s| s.adopt_account(account.clone()));

        let count = self.refresh_total_waves().await;
        let log = self.refresh_waves().await;
        count?;
        log?;
        Ok(Some(account))
    }

    /// Ask the wallet for an account. No prompt when one is already adopted.
    pub async fn connect_wallet(&self) -> Result<AccountAddress, PortalError> {
        if let Some(account) = self.state.with(|s| s.account.clone()) {
            debug!("already connected as {}", account);
            return Ok(account);
        }

        let wallet = self.host.wallet().ok_or(PortalError::NoProvider)?;
        let account = wallet
            .request_accounts()
            .await
            .map_err(PortalError::authorization)?
            .into_iter()
            .next()
            .ok_or(PortalError::NoAccount)?;

        info!("connected {}", account);
        self.state.with_mut(|s| s.adopt_account(account.clone()));
        Ok(account)
    }

    /// Submit the current draft as-is and wait for it to be mined.
    pub async fn wave(&self) -> Result<TxReceipt, PortalError> {
        let portal = self.bind().ok_or(PortalError::NoProvider)?;
        let message = self.state.with(|s| s.draft.clone());

        let loading = LoadingGuard::engage(&self.state);
        let tx_hash = portal
            .wave(&message, self.config.gas_limit)
            .await
            .map_err(PortalError::transaction)?;
        info!("mining... {}", tx_hash);

        let receipt = portal
            .wait_for_confirmation(&tx_hash)
            .await
            .map_err(PortalError::transaction)?;
        info!("mined -- {}", tx_hash);
        drop(loading);

        // The wave is on chain; a stale read does not undo that.
        if let Err(err) = self.refresh_total_waves().await {
            warn!("count refresh after {} failed: {}", tx_hash, err);
        }
        if let Err(err) = self.refresh_waves().await {
            warn!("log refresh after {} failed: {}", tx_hash, err);
        }
        Ok(receipt)
    }

    pub async fn refresh_total_waves(&self) -> Result<u64, PortalError> {
        let portal = self.bind().ok_or(PortalError::NoProvider)?;
        let total = portal.total_waves().await.map_err(PortalError::query)?;
        debug!("retrieved total wave count: {}", total);
        self.state.with_mut(|s| s.set_total_waves(total));
        Ok(total)
    }

    pub async fn refresh_waves(&self) -> Result<usize, PortalError> {
        let portal = self.bind().ok_or(PortalError::NoProvider)?;
        let waves = portal.waves().await.map_err(PortalError::query)?;
        let count = waves.len();
        debug!("retrieved {} waves", count);
        self.state.with_mut(|s| s.replace_waves(waves));
        Ok(count)
    }

    /// Start observing append notifications. Dropping the guard ends it.
    pub async fn subscribe(
        &self,
    ) -> Result<(WaveSubscription<H::Portal>, SubscriptionGuard), PortalError> {
        let portal = self.bind().ok_or(PortalError::NoProvider)?;
        let cursor = portal.watch_new_waves().await.map_err(PortalError::query)?;
        info!("subscribed to NewWave on {}", portal.address());
        Ok(WaveSubscription::open(
            portal,
            cursor,
            self.state.clone(),
            self.config.dedupe,
        ))
    }
}
