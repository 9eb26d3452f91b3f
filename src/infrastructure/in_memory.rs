use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::funds::{Amount, Balance};
use crate::domain::identity::Identity;
use crate::domain::ledger::LedgerSnapshot;
use crate::domain::ports::{LedgerStore, SettlementGateway, TransferError};
use crate::domain::submission::{SubmissionId, SubmissionRecord};
use crate::error::Result;

#[derive(Debug)]
struct StoredState {
    guard: Identity,
    records: BTreeMap<SubmissionId, SubmissionRecord>,
    pool: Balance,
}

/// A thread-safe in-memory ledger store.
///
/// Uses `Arc<RwLock<..>>` to allow shared concurrent access, so clones see
/// the same committed state. Ideal for testing or one-shot runs where
/// persistence is not required.
#[derive(Default, Clone)]
pub struct InMemoryLedgerStore {
    inner: Arc<RwLock<Option<StoredState>>>,
}

impl InMemoryLedgerStore {
    /// Creates a new, empty in-memory ledger store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedgerStore {
    async fn load(&self) -> Result<Option<LedgerSnapshot>> {
        let inner = self.inner.read().await;
        Ok(inner.as_ref().map(|state| LedgerSnapshot {
            guard: state.guard.clone(),
            records: state.records.values().cloned().collect(),
            pool: state.pool,
        }))
    }

    async fn commit(
        &self,
        guard: &Identity,
        pool: Balance,
        changed: &[SubmissionRecord],
    ) -> Result<()> {
        let mut inner = self.inner.write().await;
        match inner.as_mut() {
            Some(state) => {
                state.pool = pool;
                for record in changed {
                    state.records.insert(record.id, record.clone());
                }
            }
            None => {
                let mut records = BTreeMap::new();
                for record in changed {
                    records.insert(record.id, record.clone());
                }
                *inner = Some(StoredState {
                    guard: guard.clone(),
                    records,
                    pool,
                });
            }
        }
        Ok(())
    }
}

#[derive(Default)]
struct SettlementBook {
    received: HashMap<Identity, Balance>,
    closed: HashSet<Identity>,
}

/// A settlement gateway that keeps the money in a ledger of its own.
///
/// Transfers accumulate per destination; destinations can be closed to make
/// transfers fail on demand. This is the gateway used by tests and by runs
/// without a real settlement backend.
#[derive(Default, Clone)]
pub struct InMemorySettlement {
    book: Arc<RwLock<SettlementBook>>,
}

impl InMemorySettlement {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes future transfers to `identity` fail.
    pub async fn close_account(&self, identity: Identity) {
        self.book.write().await.closed.insert(identity);
    }

    pub async fn reopen_account(&self, identity: &Identity) {
        self.book.write().await.closed.remove(identity);
    }

    /// Total value settled to `identity` so far.
    pub async fn received_by(&self, identity: &Identity) -> Balance {
        self.book
            .read()
            .await
            .received
            .get(identity)
            .copied()
            .unwrap_or_default()
    }
}

#[async_trait]
impl SettlementGateway for InMemorySettlement {
    async fn transfer(
        &self,
        to: &Identity,
        amount: Amount,
    ) -> std::result::Result<(), TransferError> {
        let mut book = self.book.write().await;
        if book.closed.contains(to) {
            return Err(TransferError(format!("account {to} is closed")));
        }
        *book.received.entry(to.clone()).or_default() += Balance::from(amount);
        Ok(())
    }
}
