use chrono::{DateTime, Utc};
use std::collections::HashMap;

use crate::domain::identity::Identity;
use crate::domain::submission::{SubmissionId, SubmissionRecord};
use crate::error::{LedgerError, Result};

/// Append-only store of submission records with a per-participant index.
///
/// Ids are assigned sequentially from 0 and never reused; a record's slot in
/// `records` is its id. The index is derived purely from the write stream:
/// every id listed under a participant names a record that participant
/// created, in creation order.
#[derive(Debug, Default)]
pub struct SubmissionRegistry {
    records: Vec<SubmissionRecord>,
    by_participant: HashMap<Identity, Vec<SubmissionId>>,
}

impl SubmissionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a registry from a persisted record stream. The index is
    /// derived data and is reconstructed here rather than persisted.
    pub fn from_records(mut records: Vec<SubmissionRecord>) -> Self {
        // Slot k must hold the record with id k.
        records.sort_by_key(|record| record.id);
        let mut by_participant: HashMap<Identity, Vec<SubmissionId>> = HashMap::new();
        for record in &records {
            by_participant
                .entry(record.participant.clone())
                .or_default()
                .push(record.id);
        }
        Self {
            records,
            by_participant,
        }
    }

    /// Appends a new record and returns its id.
    ///
    /// The link must be non-empty; nothing else is validated, and repeated
    /// links are allowed both within and across participants.
    pub fn create(
        &mut self,
        participant: Identity,
        link: String,
        description: String,
        now: DateTime<Utc>,
    ) -> Result<SubmissionId> {
        if link.is_empty() {
            return Err(LedgerError::InvalidInput(
                "link must not be empty".to_string(),
            ));
        }

        let id = self.records.len() as SubmissionId;
        self.by_participant
            .entry(participant.clone())
            .or_default()
            .push(id);
        self.records
            .push(SubmissionRecord::new(id, participant, link, description, now));
        Ok(id)
    }

    pub fn get(&self, id: SubmissionId) -> Result<&SubmissionRecord> {
        self.records
            .get(id as usize)
            .ok_or(LedgerError::NotFound(id))
    }

    pub fn count(&self) -> usize {
        self.records.len()
    }

    /// Ids created by `participant`, in creation order. Empty if none.
    pub fn ids_by(&self, participant: &Identity) -> &[SubmissionId] {
        self.by_participant
            .get(participant)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn records(&self) -> &[SubmissionRecord] {
        &self.records
    }

    /// Checked one-way winner transition for the record at `id`.
    pub fn finalize(&mut self, id: SubmissionId) -> Result<&SubmissionRecord> {
        let record = self
            .records
            .get_mut(id as usize)
            .ok_or(LedgerError::NotFound(id))?;
        record.finalize()?;
        Ok(record)
    }

    /// Reverts a finalization whose payout could not settle.
    pub(crate) fn reopen(&mut self, id: SubmissionId) {
        if let Some(record) = self.records.get_mut(id as usize) {
            record.reopen();
        }
    }
}
