use rust_decimal::Decimal;
use thiserror::Error;

use crate::domain::identity::Identity;
use crate::domain::submission::SubmissionId;

/// Failure taxonomy for ledger operations.
///
/// Every operation is all-or-nothing: a returned error means zero state
/// changes were applied, including changes attempted before the failing
/// check. The exception is `Storage`, which reports a commit that failed
/// after the in-memory transition already landed; callers must treat it
/// as fatal rather than retry past it.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("submission {0} not found")]
    NotFound(SubmissionId),
    #[error("caller {0} is not the guard")]
    Unauthorized(Identity),
    #[error("submission {0} is already finalized")]
    AlreadyFinalized(SubmissionId),
    #[error("insufficient funds: requested {requested}, pool holds {available}")]
    InsufficientFunds {
        requested: Decimal,
        available: Decimal,
    },
    #[error("transfer to {to} failed: {reason}")]
    TransferFailure { to: Identity, reason: String },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T> = std::result::Result<T, LedgerError>;
