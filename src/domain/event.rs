use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::identity::Identity;
use crate::domain::submission::SubmissionId;

/// An externally observable fact about the board, emitted after the state
/// transition that produced it has committed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notification {
    Submitted {
        id: SubmissionId,
        participant: Identity,
        link: String,
    },
    Funded {
        depositor: Identity,
        amount: Decimal,
    },
    WinnerSelected {
        id: SubmissionId,
        participant: Identity,
        reward: Decimal,
    },
    Withdrawn {
        guard: Identity,
        amount: Decimal,
    },
}

/// Append-only history of emitted notifications.
///
/// Consumers observe outcomes here; state transitions never depend on it.
#[derive(Debug, Default)]
pub struct NotificationLog {
    entries: Vec<Notification>,
}

impl NotificationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, notification: Notification) {
        self.entries.push(notification);
    }

    pub fn entries(&self) -> &[Notification] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
