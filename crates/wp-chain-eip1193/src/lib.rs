use alloy_primitives::{B256, Bytes, U64, hex};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, warn};
use wp_abi::{
    decode_new_wave_log, decode_total_waves, decode_waves_list, encode_total_waves_call,
    encode_wave_call, encode_waves_list_call, new_wave_topic,
};
use wp_api_types::{AccountAddress, ContractAddress, EventCursor, GasLimit, TxHash, TxReceipt, WaveRecord};
use wp_chain_client::{ProviderHost, WalletProvider, WavePortal};

/// An EIP-1193 `request({ method, params })` endpoint.
#[async_trait(?Send)]
pub trait Eip1193Transport {
    async fn request(&self, method: &str, params: Value) -> Result<Value>;

    /// Suspend between polls. Runtime specific.
    async fn sleep(&self, duration: Duration);
}

/// Looks up a transport on demand; `None` means no provider is present.
pub trait TransportSource {
    type Transport: Eip1193Transport + Clone;

    fn locate(&self) -> Option<Self::Transport>;
}

// ── Wallet ───────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct Eip1193Wallet<T> {
    transport: T,
}

impl<T> Eip1193Wallet<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }
}

fn parse_accounts(value: Value) -> Result<Vec<AccountAddress>> {
    let raw: Vec<String> = serde_json::from_value(value).context("accounts response is not a list of strings")?;
    Ok(raw.into_iter().map(AccountAddress).collect())
}

#[async_trait(?Send)]
impl<T: Eip1193Transport> WalletProvider for Eip1193Wallet<T> {
    async fn accounts(&self) -> Result<Vec<AccountAddress>> {
        let value = self
            .transport
            .request("eth_accounts", json!([]))
            .await
            .context("eth_accounts")?;
        parse_accounts(value)
    }

    async fn request_accounts(&self) -> Result<Vec<AccountAddress>> {
        let value = self
            .transport
            .request("eth_requestAccounts", json!([]))
            .await
            .context("eth_requestAccounts")?;
        parse_accounts(value)
    }
}

// ── Contract handle ──────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RpcReceipt {
    #[serde(default)]
    block_number: Option<U64>,
    /// Absent on pre-Byzantium chains.
    #[serde(default)]
    status: Option<U64>,
}

#[derive(Debug, Deserialize)]
struct RpcLog {
    topics: Vec<B256>,
    data: Bytes,
    #[serde(default)]
    removed: bool,
}

/// Receipt and log polling cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Polling {
    pub interval: Duration,
    /// Give up on a transaction that has not been mined after this long.
    pub confirmation_timeout: Duration,
}

#[derive(Clone)]
pub struct Eip1193WavePortal<T> {
    transport: T,
    address: ContractAddress,
    polling: Polling,
}

impl<T: Eip1193Transport> Eip1193WavePortal<T> {
    pub fn new(transport: T, address: ContractAddress, polling: Polling) -> Self {
        Self {
            transport,
            address,
            polling,
        }
    }

    async fn signer(&self) -> Result<AccountAddress> {
        let value = self
            .transport
            .request("eth_accounts", json!([]))
            .await
            .context("eth_accounts for signer")?;
        parse_accounts(value)?
            .into_iter()
            .next()
            .context("no authorized account to sign with")
    }

    async fn call(&self, data: Vec<u8>) -> Result<Bytes> {
        let params = json!([
            { "to": self.address.0, "data": hex::encode_prefixed(data) },
            "latest"
        ]);
        let result = self
            .transport
            .request("eth_call", params)
            .await
            .context("eth_call transport")?;
        serde_json::from_value(result).context("eth_call returned non-hex data")
    }

    async fn block_number(&self) -> Result<u64> {
        let result = self
            .transport
            .request("eth_blockNumber", json!([]))
            .await
            .context("eth_blockNumber")?;
        let head: U64 = serde_json::from_value(result).context("eth_blockNumber parse")?;
        Ok(head.to::<u64>())
    }
}

#[async_trait(?Send)]
impl<T: Eip1193Transport> WavePortal for Eip1193WavePortal<T> {
    fn address(&self) -> &ContractAddress {
        &self.address
    }

    async fn wave(&self, message: &str, gas_limit: GasLimit) -> Result<TxHash> {
        let from = self.signer().await?;
        let params = json!([{
            "from": from.0,
            "to": self.address.0,
            "data": hex::encode_prefixed(encode_wave_call(message)),
            "gas": U64::from(gas_limit.0),
        }]);
        let result = self
            .transport
            .request("eth_sendTransaction", params)
            .await
            .context("eth_sendTransaction")?;
        let hash = result
            .as_str()
            .context("eth_sendTransaction returned a non-string hash")?;
        Ok(TxHash(hash.to_owned()))
    }

    async fn wait_for_confirmation(&self, tx_hash: &TxHash) -> Result<TxReceipt> {
        let mut waited = Duration::ZERO;
        loop {
            let result = self
                .transport
                .request("eth_getTransactionReceipt", json!([tx_hash.0]))
                .await
                .context("eth_getTransactionReceipt")?;

            if result.is_null() {
                if waited >= self.polling.confirmation_timeout {
                    anyhow::bail!("transaction {tx_hash} not mined after {waited:?}");
                }
                debug!("{} not mined yet", tx_hash);
                self.transport.sleep(self.polling.interval).await;
                waited += self.polling.interval;
                continue;
            }

            let receipt: RpcReceipt = serde_json::from_value(result).context("receipt parse")?;
            let block_number = receipt.block_number.map(|block| block.to::<u64>());
            if receipt.status == Some(U64::ZERO) {
                anyhow::bail!("transaction {tx_hash} reverted");
            }

            return Ok(TxReceipt {
                tx_hash: tx_hash.clone(),
                block_number,
                success: true,
            });
        }
    }

    async fn total_waves(&self) -> Result<u64> {
        let data = self.call(encode_total_waves_call()).await?;
        Ok(decode_total_waves(&data)?)
    }

    async fn waves(&self) -> Result<Vec<WaveRecord>> {
        let data = self.call(encode_waves_list_call()).await?;
        Ok(decode_waves_list(&data)?)
    }

    async fn watch_new_waves(&self) -> Result<EventCursor> {
        let head = self.block_number().await?;
        Ok(EventCursor::starting_after(head))
    }

    async fn poll_new_waves(&self, cursor: &mut EventCursor) -> Result<Vec<WaveRecord>> {
        let head = self.block_number().await?;
        if head < cursor.next_block {
            return Ok(Vec::new());
        }

        let filter = json!([{
            "address": self.address.0,
            "topics": [new_wave_topic()],
            "fromBlock": U64::from(cursor.next_block),
            "toBlock": U64::from(head),
        }]);
        let result = self
            .transport
            .request("eth_getLogs", filter)
            .await
            .context("eth_getLogs")?;
        let logs: Vec<RpcLog> = serde_json::from_value(result).context("eth_getLogs parse")?;

        let mut waves = Vec::with_capacity(logs.len());
        for log in logs.iter().filter(|log| !log.removed) {
            match decode_new_wave_log(&log.topics, &log.data) {
                Ok(wave) => waves.push(wave),
                Err(err) => warn!("skipping undecodable NewWave log: {err:#}"),
            }
        }

        cursor.next_block = head + 1;
        Ok(waves)
    }
}

// ── Host ─────────────────────────────────────────────────────────────

pub struct Eip1193Host<S> {
    source: S,
    polling: Polling,
}

impl<S> Eip1193Host<S> {
    pub fn new(source: S, polling: Polling) -> Self {
        Self { source, polling }
    }
}

impl<S: TransportSource> ProviderHost for Eip1193Host<S> {
    type Wallet = Eip1193Wallet<S::Transport>;
    type Portal = Eip1193WavePortal<S::Transport>;

    fn wallet(&self) -> Option<Self::Wallet> {
        self.source.locate().map(Eip1193Wallet::new)
    }

    fn bind_portal(&self, address: &ContractAddress) -> Option<Self::Portal> {
        self.source
            .locate()
            .map(|transport| Eip1193WavePortal::new(transport, address.clone(), self.polling))
    }
}
