//! Wave portal component logic, independent of any DOM.
//!
//! `Portal` owns the shared `PortalState` and drives the wallet provider and
//! contract handle supplied by a `ProviderHost`. The view layer renders
//! `ViewModel::project` whenever the state notifies a change.

pub mod config;
pub mod portal;
pub mod state;
pub mod subscription;
pub mod view;

#[cfg(test)]
mod testing;

pub use config::{DedupePolicy, PortalConfig};
pub use portal::Portal;
pub use state::{PortalState, SharedState};
pub use subscription::{SubscriptionGuard, WaveSubscription};
pub use view::{ViewModel, WaveButton, WaveRow, format_wave_date, truncate_address};

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PortalError {
    #[error("no wallet provider found")]
    NoProvider,
    #[error("wallet granted no accounts")]
    NoAccount,
    #[error("authorization failed: {0}")]
    Authorization(String),
    #[error("transaction failed: {0}")]
    Transaction(String),
    #[error("query failed: {0}")]
    Query(String),
    #[error("subscription closed")]
    SubscriptionClosed,
    #[error("invalid config: {0}")]
    Config(String),
}

impl PortalError {
    pub(crate) fn authorization(err: anyhow::Error) -> Self {
        Self::Authorization(format!("{err:#}"))
    }

    pub(crate) fn transaction(err: anyhow::Error) -> Self {
        Self::Transaction(format!("{err:#}"))
    }

    pub(crate) fn query(err: anyhow::Error) -> Self {
        Self::Query(format!("{err:#}"))
    }
}
