use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};

use crate::domain::identity::Identity;
use crate::error::{LedgerError, Result};

/// Sequential record identifier, assigned from 0 and never reused.
pub type SubmissionId = u64;

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum WinnerStatus {
    Pending,
    Finalized,
}

/// One registered entry pointing at external work.
///
/// Immutable once created, except for the winner status which transitions
/// `Pending -> Finalized` at most once and never reverts.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct SubmissionRecord {
    /// The stable identifier assigned at creation.
    pub id: SubmissionId,
    /// Identity of the creating caller.
    pub participant: Identity,
    /// Link to the submitted work; never empty.
    pub link: String,
    /// Free-form description; may be empty.
    pub description: String,
    /// Timestamp captured when the record was appended.
    pub created_at: DateTime<Utc>,
    /// The winner state (Pending or Finalized).
    #[serde(
        rename = "winner",
        serialize_with = "serialize_bool",
        deserialize_with = "deserialize_bool"
    )]
    pub status: WinnerStatus,
}

fn serialize_bool<S>(status: &WinnerStatus, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_bool(*status == WinnerStatus::Finalized)
}

fn deserialize_bool<'de, D>(deserializer: D) -> std::result::Result<WinnerStatus, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let winner = bool::deserialize(deserializer)?;
    if winner {
        Ok(WinnerStatus::Finalized)
    } else {
        Ok(WinnerStatus::Pending)
    }
}

impl SubmissionRecord {
    pub fn new(
        id: SubmissionId,
        participant: Identity,
        link: String,
        description: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            participant,
            link,
            description,
            created_at,
            status: WinnerStatus::Pending,
        }
    }

    pub fn is_winner(&self) -> bool {
        self.status == WinnerStatus::Finalized
    }

    /// One-way transition to `Finalized`.
    pub(crate) fn finalize(&mut self) -> Result<()> {
        if self.is_winner() {
            return Err(LedgerError::AlreadyFinalized(self.id));
        }
        self.status = WinnerStatus::Finalized;
        Ok(())
    }

    /// Undoes a finalization whose outbound transfer did not settle.
    /// Only the payout rollback path may call this; the reverted state is
    /// never observable outside the failed operation.
    pub(crate) fn reopen(&mut self) {
        self.status = WinnerStatus::Pending;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> SubmissionRecord {
        SubmissionRecord::new(
            0,
            Identity::from("alice"),
            "github.com/alice/widget".to_string(),
            "entry".to_string(),
            Utc::now(),
        )
    }

    #[test]
    fn test_new_record_is_pending() {
        let record = record();
        assert!(!record.is_winner());
        assert_eq!(record.status, WinnerStatus::Pending);
    }

    #[test]
    fn test_finalize_is_one_way() {
        let mut record = record();
        assert!(record.finalize().is_ok());
        assert!(record.is_winner());

        let again = record.finalize();
        assert!(matches!(again, Err(LedgerError::AlreadyFinalized(0))));
        assert!(record.is_winner());
    }

    #[test]
    fn test_reopen_reverts_failed_finalization() {
        let mut record = record();
        record.finalize().unwrap();
        record.reopen();
        assert!(!record.is_winner());
    }

    #[test]
    fn test_status_serializes_as_winner_bool() {
        let mut record = record();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["winner"], serde_json::json!(false));

        record.finalize().unwrap();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["winner"], serde_json::json!(true));
    }

    #[test]
    fn test_record_json_round_trip() {
        let mut record = record();
        record.finalize().unwrap();

        let bytes = serde_json::to_vec(&record).unwrap();
        let restored: SubmissionRecord = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(restored, record);
    }
}
