use async_trait::async_trait;

use crate::domain::funds::{Amount, Balance};
use crate::domain::identity::Identity;
use crate::domain::ledger::LedgerSnapshot;
use crate::domain::submission::SubmissionRecord;
use crate::error::Result;

/// Why an external transfer was refused. The board treats the reason as
/// opaque text; it only decides whether to roll back.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct TransferError(pub String);

#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Loads the last committed snapshot, or `None` for a fresh store.
    async fn load(&self) -> Result<Option<LedgerSnapshot>>;

    /// Durably applies one transition: the new pool balance plus the records
    /// created or updated by it. Must be all-or-nothing.
    async fn commit(
        &self,
        guard: &Identity,
        pool: Balance,
        changed: &[SubmissionRecord],
    ) -> Result<()>;
}

#[async_trait]
pub trait SettlementGateway: Send + Sync {
    /// Moves `amount` out of custody to `to`. Either the whole amount
    /// arrives or the error describes why nothing moved.
    async fn transfer(
        &self,
        to: &Identity,
        amount: Amount,
    ) -> std::result::Result<(), TransferError>;
}

pub type LedgerStoreBox = Box<dyn LedgerStore>;
pub type SettlementBox = Box<dyn SettlementGateway>;
