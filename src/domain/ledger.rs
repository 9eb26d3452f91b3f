use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::funds::{Amount, Balance, PrizePool};
use crate::domain::identity::{AccessGuard, Identity};
use crate::domain::registry::SubmissionRegistry;
use crate::domain::submission::{SubmissionId, SubmissionRecord};
use crate::error::Result;

/// The whole board state behind one mutation surface: the guard identity,
/// the submission registry and the custodied prize pool.
///
/// Payouts and withdrawals are two-phase. `begin_*` applies the internal
/// transition (winner flag, pool debit) and hands back what the caller needs
/// to run the external transfer; `rollback_*` undoes that transition when the
/// transfer fails. Between the two, the state already reflects the payout, so
/// callers must not interleave other mutations.
#[derive(Debug)]
pub struct Ledger {
    guard: AccessGuard,
    registry: SubmissionRegistry,
    pool: PrizePool,
}

/// Durable image of a ledger: everything needed to rebuild it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub guard: Identity,
    pub records: Vec<SubmissionRecord>,
    pub pool: Balance,
}

/// Proof of a begun payout: the flag is set and the pool debited.
///
/// Holders either settle the external transfer or hand the ticket back via
/// [`Ledger::rollback_payout`].
#[derive(Debug, Clone, PartialEq)]
pub struct PayoutTicket {
    pub id: SubmissionId,
    pub payee: Identity,
    pub reward: Amount,
}

impl Ledger {
    pub fn new(guard: Identity) -> Self {
        Self {
            guard: AccessGuard::new(guard),
            registry: SubmissionRegistry::new(),
            pool: PrizePool::new(),
        }
    }

    pub fn restore(snapshot: LedgerSnapshot) -> Self {
        Self {
            guard: AccessGuard::new(snapshot.guard),
            registry: SubmissionRegistry::from_records(snapshot.records),
            pool: PrizePool::with_balance(snapshot.pool),
        }
    }

    pub fn guard(&self) -> &Identity {
        self.guard.identity()
    }

    pub fn pool_balance(&self) -> Balance {
        self.pool.balance()
    }

    pub fn registry(&self) -> &SubmissionRegistry {
        &self.registry
    }

    /// Records a new submission for `participant` and returns its id.
    pub fn submit(
        &mut self,
        participant: Identity,
        link: String,
        description: String,
        now: DateTime<Utc>,
    ) -> Result<SubmissionId> {
        self.registry.create(participant, link, description, now)
    }

    /// Credits the pool. Anyone may deposit; the pool does not track who.
    pub fn deposit(&mut self, amount: Amount) {
        self.pool.credit(amount);
    }

    /// Phase one of a payout: marks the submission as winner and debits the
    /// reward from the pool, in one step.
    ///
    /// Preconditions are checked in a fixed order: the caller must be the
    /// guard, the submission must exist, it must not already be finalized,
    /// and the pool must cover the reward. A failed debit reverts the winner
    /// flag, so an error here leaves the ledger untouched.
    pub fn begin_payout(
        &mut self,
        caller: &Identity,
        id: SubmissionId,
        reward: Amount,
    ) -> Result<PayoutTicket> {
        self.guard.ensure(caller)?;
        let payee = self.registry.finalize(id)?.participant.clone();
        if let Err(err) = self.pool.debit(reward) {
            self.registry.reopen(id);
            return Err(err);
        }
        Ok(PayoutTicket { id, payee, reward })
    }

    /// Undoes a begun payout after a failed transfer: refunds the pool and
    /// clears the winner flag.
    pub fn rollback_payout(&mut self, ticket: &PayoutTicket) {
        self.pool.credit(ticket.reward);
        self.registry.reopen(ticket.id);
    }

    /// Phase one of a withdrawal: debits the pool. Returns the payee, which
    /// is always the guard itself.
    pub fn begin_withdrawal(&mut self, caller: &Identity, amount: Amount) -> Result<Identity> {
        self.guard.ensure(caller)?;
        self.pool.debit(amount)?;
        Ok(self.guard.identity().clone())
    }

    /// Refunds a begun withdrawal after a failed transfer.
    pub fn rollback_withdrawal(&mut self, amount: Amount) {
        self.pool.credit(amount);
    }
}
