//! Component state and its transitions.
//!
//! `SharedState` is a single-threaded cell: the browser runs one event loop,
//! so an `Rc<RefCell<_>>` is enough. Borrows never span an `.await`; every
//! mutation goes through `with_mut`, which notifies listeners afterwards.

use crate::config::DedupePolicy;
use std::cell::RefCell;
use std::rc::Rc;
use wp_api_types::{AccountAddress, WaveRecord};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PortalState {
    pub account: Option<AccountAddress>,
    pub loading: bool,
    pub draft: String,
    /// Insertion order. Rendered newest first.
    pub waves: Vec<WaveRecord>,
    /// The contract's own counter, not `waves.len()`.
    pub total_waves: u64,
}

impl PortalState {
    pub fn new(draft: impl Into<String>) -> Self {
        Self {
            draft: draft.into(),
            ..Self::default()
        }
    }

    pub fn adopt_account(&mut self, account: AccountAddress) {
        self.account = Some(account);
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn set_draft(&mut self, draft: impl Into<String>) {
        self.draft = draft.into();
    }

    pub fn set_total_waves(&mut self, total: u64) {
        self.total_waves = total;
    }

    pub fn replace_waves(&mut self, waves: Vec<WaveRecord>) {
        self.waves = waves;
    }

    pub fn contains_wave(&self, record: &WaveRecord) -> bool {
        self.waves
            .iter()
            .any(|w| w.timestamp == record.timestamp && w.sender.same_as(&record.sender))
    }

    /// Returns whether the record was appended.
    pub fn append_wave(&mut self, record: WaveRecord, policy: DedupePolicy) -> bool {
        if policy == DedupePolicy::SenderAndTimestamp && self.contains_wave(&record) {
            return false;
        }
        self.waves.push(record);
        true
    }
}

type Listener = Box<dyn Fn(&PortalState)>;

struct Inner {
    state: RefCell<PortalState>,
    listeners: RefCell<Vec<Listener>>,
}

#[derive(Clone)]
pub struct SharedState {
    inner: Rc<Inner>,
}

impl SharedState {
    pub fn new(state: PortalState) -> Self {
        Self {
            inner: Rc::new(Inner {
                state: RefCell::new(state),
                listeners: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Run a closure with shared read access to the state.
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&PortalState) -> R,
    {
        f(&self.inner.state.borrow())
    }

    /// Run a closure with mutable access, then notify listeners.
    pub fn with_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut PortalState) -> R,
    {
        let result = f(&mut self.inner.state.borrow_mut());
        self.notify();
        result
    }

    pub fn snapshot(&self) -> PortalState {
        self.with(PortalState::clone)
    }

    /// Register a change listener. Listeners must not mutate the state.
    pub fn on_change<F>(&self, listener: F)
    where
        F: Fn(&PortalState) + 'static,
    {
        self.inner.listeners.borrow_mut().push(Box::new(listener));
    }

    fn notify(&self) {
        let state = self.inner.state.borrow();
        for listener in self.inner.listeners.borrow().iter() {
            listener(&state);
        }
    }
}
