use anyhow::Result;
use async_trait::async_trait;
use wp_api_types::{AccountAddress, ContractAddress, EventCursor, GasLimit, TxHash, TxReceipt, WaveRecord};

/// Injected wallet: account discovery and authorization.
///
/// Browser providers hand back `!Send` futures, so these seams are `?Send`.
#[async_trait(?Send)]
pub trait WalletProvider {
    /// Accounts the user has already authorized. Never prompts.
    async fn accounts(&self) -> Result<Vec<AccountAddress>>;

    /// Ask the user to authorize an account. May prompt.
    async fn request_accounts(&self) -> Result<Vec<AccountAddress>>;
}

/// Callable handle to the deployed WavePortal contract.
#[async_trait(?Send)]
pub trait WavePortal {
    fn address(&self) -> &ContractAddress;

    /// Submit `wave(message)` signed by the current account.
    async fn wave(&self, message: &str, gas_limit: GasLimit) -> Result<TxHash>;

    /// Block until the transaction is mined. A revert is an error.
    async fn wait_for_confirmation(&self, tx_hash: &TxHash) -> Result<TxReceipt>;

    async fn total_waves(&self) -> Result<u64>;

    /// Every wave the contract holds, in storage order.
    async fn waves(&self) -> Result<Vec<WaveRecord>>;

    /// Start observing `NewWave` from the current head onward.
    async fn watch_new_waves(&self) -> Result<EventCursor>;

    /// Appends observed since `cursor`; advances the cursor past them.
    async fn poll_new_waves(&self, cursor: &mut EventCursor) -> Result<Vec<WaveRecord>>;
}

/// Where the injected provider lives.
///
/// Both lookups are repeated on every call: the provider can appear or go
/// away between calls and nothing is cached.
pub trait ProviderHost {
    type Wallet: WalletProvider;
    type Portal: WavePortal;

    fn wallet(&self) -> Option<Self::Wallet>;

    /// Contract binder. `None` when no provider is present.
    fn bind_portal(&self, address: &ContractAddress) -> Option<Self::Portal>;
}
