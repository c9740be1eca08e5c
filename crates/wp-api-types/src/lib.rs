use serde::{Deserialize, Serialize};
use std::fmt;

/// Deployed WavePortal contract the front-end talks to.
pub const WAVE_PORTAL_ADDRESS: &str = "0x2c8E29586a2E1159cEB2a6FA3CCB4d4C67e65145";

/// Gas ceiling attached to every `wave` transaction.
pub const DEFAULT_GAS_LIMIT: GasLimit = GasLimit(300_000);

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct AccountAddress(pub String);

impl AccountAddress {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Addresses come back lowercase from the wallet and checksummed from
    /// contract data, so equality between the two ignores ASCII case.
    pub fn same_as(&self, other: &AccountAddress) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct ContractAddress(pub String);

impl Default for ContractAddress {
    fn default() -> Self {
        Self(WAVE_PORTAL_ADDRESS.to_owned())
    }
}

impl fmt::Display for ContractAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct TxHash(pub String);

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct GasLimit(pub u64);

impl Default for GasLimit {
    fn default() -> Self {
        DEFAULT_GAS_LIMIT
    }
}

/// One wave as recorded by the contract. Never mutated once observed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WaveRecord {
    pub sender: AccountAddress,
    /// Seconds since the Unix epoch, as stamped by the contract.
    pub timestamp: u64,
    pub message: String,
}

impl WaveRecord {
    pub fn new(sender: AccountAddress, timestamp: u64, message: impl Into<String>) -> Self {
        Self {
            sender,
            timestamp,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TxReceipt {
    pub tx_hash: TxHash,
    pub block_number: Option<u64>,
    pub success: bool,
}

/// Position in the chain from which append notifications are still unseen.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct EventCursor {
    pub next_block: u64,
}

impl EventCursor {
    pub fn starting_after(block: u64) -> Self {
        Self {
            next_block: block.saturating_add(1),
        }
    }
}
