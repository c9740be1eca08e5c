use crate::PortalError;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use wp_api_types::{ContractAddress, GasLimit};

pub const DEFAULT_POLL_INTERVAL_MS: u64 = 4_000;
pub const DEFAULT_CONFIRMATION_TIMEOUT_MS: u64 = 10 * 60 * 1_000;
pub const DEFAULT_DRAFT: &str = "Leave your message here";

/// What to do with an append notification for a wave already in the log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DedupePolicy {
    /// Skip it when the (sender, timestamp) pair is already present.
    #[default]
    SenderAndTimestamp,
    AcceptDuplicates,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    pub contract_address: ContractAddress,
    pub gas_limit: GasLimit,
    pub poll_interval_ms: u64,
    /// How long a submitted wave may stay unmined before the submit fails.
    pub confirmation_timeout_ms: u64,
    pub dedupe: DedupePolicy,
    pub initial_draft: String,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            contract_address: ContractAddress::default(),
            gas_limit: GasLimit::default(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            confirmation_timeout_ms: DEFAULT_CONFIRMATION_TIMEOUT_MS,
            dedupe: DedupePolicy::default(),
            initial_draft: DEFAULT_DRAFT.to_owned(),
        }
    }
}

impl PortalConfig {
    /// Parse overrides; absent fields keep their defaults.
    pub fn from_json(raw: &str) -> Result<Self, PortalError> {
        let config: Self =
            serde_json::from_str(raw).map_err(|err| PortalError::Config(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), PortalError> {
        wp_abi::parse_address(&self.contract_address.0).map_err(|err| {
            PortalError::Config(format!("contract_address {}: {err}", self.contract_address))
        })?;
        if self.gas_limit.0 == 0 {
            return Err(PortalError::Config("gas_limit must be positive".into()));
        }
        if self.poll_interval_ms == 0 {
            return Err(PortalError::Config("poll_interval_ms must be positive".into()));
        }
        if self.confirmation_timeout_ms < self.poll_interval_ms {
            return Err(PortalError::Config(
                "confirmation_timeout_ms must cover at least one poll".into(),
            ));
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn confirmation_timeout(&self) -> Duration {
        Duration::from_millis(self.confirmation_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wp_api_types::{DEFAULT_GAS_LIMIT, WAVE_PORTAL_ADDRESS};

    #[test]
    fn defaults_point_at_the_deployed_contract() {
        let config = PortalConfig::default();
        assert_eq!(config.contract_address.0, WAVE_PORTAL_ADDRESS);
        assert_eq!(config.gas_limit, DEFAULT_GAS_LIMIT);
        assert_eq!(config.initial_draft, DEFAULT_DRAFT);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = PortalConfig::from_json(r#"{ "dedupe": "accept_duplicates", "poll_interval_ms": 250 }"#)
            .expect("valid config");
        assert_eq!(config.dedupe, DedupePolicy::AcceptDuplicates);
        assert_eq!(config.poll_interval(), Duration::from_millis(250));
        assert_eq!(config.gas_limit.0, 300_000);
    }

    #[test]
    fn rejects_malformed_address() {
        let err = PortalConfig::from_json(r#"{ "contract_address": "0x1234" }"#).unwrap_err();
        assert!(matches!(err, PortalError::Config(_)));
    }

    #[test]
    fn rejects_zero_gas() {
        assert!(PortalConfig::from_json(r#"{ "gas_limit": 0 }"#).is_err());
    }

    #[test]
    fn confirmation_timeout_is_bounded_and_overridable() {
        assert_eq!(
            PortalConfig::default().confirmation_timeout(),
            Duration::from_secs(600)
        );
        let config = PortalConfig::from_json(r#"{ "confirmation_timeout_ms": 30000 }"#)
            .expect("valid config");
        assert_eq!(config.confirmation_timeout(), Duration::from_secs(30));
        assert!(PortalConfig::from_json(r#"{ "confirmation_timeout_ms": 1 }"#).is_err());
    }
}
