//! In-memory wallet and contract used by the unit tests.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::cell::RefCell;
use std::rc::Rc;
use wp_api_types::{AccountAddress, ContractAddress, EventCursor, GasLimit, TxHash, TxReceipt, WaveRecord};
use wp_chain_client::{ProviderHost, WalletProvider, WavePortal};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[derive(Default)]
struct Ledger {
    authorized: Vec<AccountAddress>,
    grant: Vec<AccountAddress>,
    reject_requests: bool,
    prompts: u32,
    waves: Vec<WaveRecord>,
    pending: Vec<(TxHash, WaveRecord)>,
    fail_sends: bool,
    revert: bool,
    last_message: Option<String>,
    last_gas: Option<u64>,
    clock: u64,
}

impl Ledger {
    fn tick(&mut self) -> u64 {
        self.clock += 1;
        1_700_000_000 + self.clock
    }
}

/// Wallet and contract in one; blocks are indices into the wave list.
#[derive(Clone, Default)]
pub struct FakeChain {
    ledger: Rc<RefCell<Ledger>>,
    address: ContractAddress,
}

impl FakeChain {
    pub fn with_history(count: usize) -> Self {
        let chain = Self::default();
        for i in 0..count {
            chain.push_external_wave(&format!("0x{i:04}"), &format!("wave {i}"));
        }
        chain
    }

    pub fn authorize(&self, account: &str) {
        self.ledger.borrow_mut().authorized = vec![AccountAddress::new(account)];
    }

    pub fn grant_on_request(&self, account: &str) {
        self.ledger.borrow_mut().grant = vec![AccountAddress::new(account)];
    }

    pub fn reject_requests(&self) {
        self.ledger.borrow_mut().reject_requests = true;
    }

    pub fn fail_sends(&self) {
        self.ledger.borrow_mut().fail_sends = true;
    }

    pub fn revert_confirmations(&self) {
        self.ledger.borrow_mut().revert = true;
    }

    pub fn push_external_wave(&self, sender: &str, message: &str) {
        let mut ledger = self.ledger.borrow_mut();
        let timestamp = ledger.tick();
        ledger
            .waves
            .push(WaveRecord::new(AccountAddress::new(sender), timestamp, message));
    }

    pub fn prompts(&self) -> u32 {
        self.ledger.borrow().prompts
    }

    pub fn last_message(&self) -> Option<String> {
        self.ledger.borrow().last_message.clone()
    }

    pub fn last_gas(&self) -> Option<u64> {
        self.ledger.borrow().last_gas
    }
}

#[async_trait(?Send)]
impl WalletProvider for FakeChain {
    async fn accounts(&self) -> Result<Vec<AccountAddress>> {
        Ok(self.ledger.borrow().authorized.clone())
    }

    async fn request_accounts(&self) -> Result<Vec<AccountAddress>> {
        let mut ledger = self.ledger.borrow_mut();
        ledger.prompts += 1;
        if ledger.reject_requests {
            anyhow::bail!("user rejected the request");
        }
        ledger.authorized = ledger.grant.clone();
        Ok(ledger.authorized.clone())
    }
}

#[async_trait(?Send)]
impl WavePortal for FakeChain {
    fn address(&self) -> &ContractAddress {
        &self.address
    }

    async fn wave(&self, message: &str, gas_limit: GasLimit) -> Result<TxHash> {
        let mut ledger = self.ledger.borrow_mut();
        if ledger.fail_sends {
            anyhow::bail!("user rejected transaction");
        }
        let sender = ledger
            .authorized
            .first()
            .cloned()
            .context("no authorized account to sign with")?;
        ledger.last_message = Some(message.to_owned());
        ledger.last_gas = Some(gas_limit.0);

        let timestamp = ledger.tick();
        let tx_hash = TxHash(format!("0xtx{}", ledger.pending.len() + ledger.waves.len()));
        ledger
            .pending
            .push((tx_hash.clone(), WaveRecord::new(sender, timestamp, message)));
        Ok(tx_hash)
    }

    async fn wait_for_confirmation(&self, tx_hash: &TxHash) -> Result<TxReceipt> {
        let mut ledger = self.ledger.borrow_mut();
        let index = ledger
            .pending
            .iter()
            .position(|(hash, _)| hash == tx_hash)
            .context("unknown transaction")?;
        let (_, record) = ledger.pending.remove(index);
        if ledger.revert {
            anyhow::bail!("transaction {tx_hash} reverted");
        }
        ledger.waves.push(record);
        Ok(TxReceipt {
            tx_hash: tx_hash.clone(),
            block_number: Some(ledger.waves.len() as u64),
            success: true,
        })
    }

    async fn total_waves(&self) -> Result<u64> {
        Ok(self.ledger.borrow().waves.len() as u64)
    }

    async fn waves(&self) -> Result<Vec<WaveRecord>> {
        Ok(self.ledger.borrow().waves.clone())
    }

    async fn watch_new_waves(&self) -> Result<EventCursor> {
        Ok(EventCursor {
            next_block: self.ledger.borrow().waves.len() as u64,
        })
    }

    async fn poll_new_waves(&self, cursor: &mut EventCursor) -> Result<Vec<WaveRecord>> {
        let ledger = self.ledger.borrow();
        let from = (cursor.next_block as usize).min(ledger.waves.len());
        cursor.next_block = ledger.waves.len() as u64;
        Ok(ledger.waves[from..].to_vec())
    }
}

pub struct FakeHost {
    chain: Option<FakeChain>,
}

impl FakeHost {
    pub fn present(chain: &FakeChain) -> Self {
        Self {
            chain: Some(chain.clone()),
        }
    }

    pub fn absent() -> Self {
        Self { chain: None }
    }
}

impl ProviderHost for FakeHost {
    type Wallet = FakeChain;
    type Portal = FakeChain;

    fn wallet(&self) -> Option<FakeChain> {
        self.chain.clone()
    }

    fn bind_portal(&self, _address: &ContractAddress) -> Option<FakeChain> {
        self.chain.clone()
    }
}
