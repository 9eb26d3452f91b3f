use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::identity::Identity;
use crate::domain::submission::SubmissionId;

#[derive(Debug, Deserialize, PartialEq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Submit,
    Fund,
    Award,
    Withdraw,
}

/// One row of the operation stream. Which fields are required depends on the
/// kind; the engine rejects rows whose required fields are missing.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct Operation {
    pub op: OperationKind,
    pub caller: Identity,
    pub id: Option<SubmissionId>,
    pub amount: Option<Decimal>,
    pub link: Option<String>,
    pub description: Option<String>,
}
