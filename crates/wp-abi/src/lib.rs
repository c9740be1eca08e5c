//! WavePortal interface description.
//!
//! The contract surface is declared once with `sol!`; this crate turns the
//! generated call and event types into the portal's own records.

use alloy_primitives::{Address, B256, U256};
use alloy_sol_types::{SolCall, SolEvent, sol};
use thiserror::Error;
use wp_api_types::{AccountAddress, WaveRecord};

sol! {
    struct Wave {
        address addr;
        uint256 timestamp;
        string msg;
    }

    event NewWave(address indexed from, uint256 timestamp, string message);

    function wave(string message) external;
    function getTotalWaves() external view returns (uint256);
    function getWavesList() external view returns (Wave[] memory);
}

#[derive(Debug, Error)]
pub enum AbiError {
    #[error("abi decode: {0}")]
    Decode(#[from] alloy_sol_types::Error),
    #[error("integer does not fit in 64 bits")]
    Overflow,
    #[error("invalid address {0}")]
    InvalidAddress(String),
    #[error("log topic is not NewWave(address,uint256,string)")]
    UnexpectedTopic,
}

pub fn new_wave_topic() -> B256 {
    NewWave::SIGNATURE_HASH
}

/// EIP-55 mixed-case rendering.
pub fn checksum(address: &Address) -> String {
    address.to_checksum(None)
}

pub fn parse_address(value: &str) -> Result<Address, AbiError> {
    value
        .parse::<Address>()
        .map_err(|err| AbiError::InvalidAddress(format!("{value}: {err}")))
}

fn to_u64(value: U256) -> Result<u64, AbiError> {
    u64::try_from(value).map_err(|_| AbiError::Overflow)
}

fn record(sender: Address, timestamp: U256, message: String) -> Result<WaveRecord, AbiError> {
    Ok(WaveRecord::new(
        AccountAddress(checksum(&sender)),
        to_u64(timestamp)?,
        message,
    ))
}

// ── Calls ──

pub fn encode_wave_call(message: &str) -> Vec<u8> {
    waveCall {
        message: message.to_owned(),
    }
    .abi_encode()
}

pub fn encode_total_waves_call() -> Vec<u8> {
    getTotalWavesCall {}.abi_encode()
}

pub fn encode_waves_list_call() -> Vec<u8> {
    getWavesListCall {}.abi_encode()
}

/// Counts beyond `u64` are rejected rather than truncated.
pub fn decode_total_waves(data: &[u8]) -> Result<u64, AbiError> {
    to_u64(getTotalWavesCall::abi_decode_returns(data)?)
}

/// Records in contract order, senders checksummed.
pub fn decode_waves_list(data: &[u8]) -> Result<Vec<WaveRecord>, AbiError> {
    getWavesListCall::abi_decode_returns(data)?
        .into_iter()
        .map(|wave| record(wave.addr, wave.timestamp, wave.msg))
        .collect()
}

// ── Events ──

pub fn decode_new_wave_log(topics: &[B256], data: &[u8]) -> Result<WaveRecord, AbiError> {
    if topics.first() != Some(&NewWave::SIGNATURE_HASH) {
        return Err(AbiError::UnexpectedTopic);
    }
    let event = NewWave::decode_raw_log(topics.iter().copied(), data)?;
    record(event.from, event.timestamp, event.message)
}
