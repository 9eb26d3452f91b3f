use chrono::Utc;
use rust_decimal::Decimal;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::domain::event::{Notification, NotificationLog};
use crate::domain::funds::{Amount, Balance};
use crate::domain::identity::Identity;
use crate::domain::ledger::Ledger;
use crate::domain::operation::{Operation, OperationKind};
use crate::domain::ports::{LedgerStoreBox, SettlementBox};
use crate::domain::submission::{SubmissionId, SubmissionRecord};
use crate::error::{LedgerError, Result};

struct BoardState {
    ledger: Ledger,
    log: NotificationLog,
}

/// The main entry point for the prize board application.
///
/// `PrizeBoard` processes submissions, pool funding and guard-only payouts.
/// It owns the storage and settlement backends and ensures sequential
/// consistency by holding the state lock across each whole operation,
/// including its external transfer and its commit.
pub struct PrizeBoard {
    state: RwLock<BoardState>,
    store: LedgerStoreBox,
    settlement: SettlementBox,
}

impl PrizeBoard {
    /// Opens a board on top of `store`, restoring any committed state.
    ///
    /// A fresh store is stamped with `guard`; an existing one must have been
    /// stamped with the same identity or opening fails.
    pub async fn open(
        guard: Identity,
        store: LedgerStoreBox,
        settlement: SettlementBox,
    ) -> Result<Self> {
        let ledger = match store.load().await? {
            Some(snapshot) => {
                if snapshot.guard != guard {
                    return Err(LedgerError::InvalidInput(format!(
                        "ledger was initialized with guard {}, not {}",
                        snapshot.guard, guard
                    )));
                }
                info!(records = snapshot.records.len(), "restored ledger");
                Ledger::restore(snapshot)
            }
            None => {
                let ledger = Ledger::new(guard);
                store.commit(ledger.guard(), Balance::ZERO, &[]).await?;
                ledger
            }
        };

        Ok(Self {
            state: RwLock::new(BoardState {
                ledger,
                log: NotificationLog::new(),
            }),
            store,
            settlement,
        })
    }

    /// Records a new submission and returns its id.
    pub async fn submit(
        &self,
        participant: &Identity,
        link: &str,
        description: &str,
    ) -> Result<SubmissionId> {
        let mut state = self.state.write().await;
        let id = state.ledger.submit(
            participant.clone(),
            link.to_string(),
            description.to_string(),
            Utc::now(),
        )?;
        let record = state.ledger.registry().get(id)?.clone();
        self.store
            .commit(
                state.ledger.guard(),
                state.ledger.pool_balance(),
                std::slice::from_ref(&record),
            )
            .await?;
        state.log.record(Notification::Submitted {
            id,
            participant: participant.clone(),
            link: record.link,
        });
        debug!(%participant, id, "submission recorded");
        Ok(id)
    }

    /// Credits `amount` to the prize pool. Open to any caller.
    pub async fn fund_pool(&self, depositor: &Identity, amount: Amount) -> Result<()> {
        let mut state = self.state.write().await;
        state.ledger.deposit(amount);
        self.store
            .commit(state.ledger.guard(), state.ledger.pool_balance(), &[])
            .await?;
        state.log.record(Notification::Funded {
            depositor: depositor.clone(),
            amount: amount.value(),
        });
        debug!(%depositor, amount = %amount.value(), "pool funded");
        Ok(())
    }

    /// Funds arriving without an explicit deposit call land in the pool the
    /// same way a deposit does.
    pub async fn receive(&self, sender: &Identity, amount: Amount) -> Result<()> {
        self.fund_pool(sender, amount).await
    }

    /// Marks submission `id` as winner and pays `reward` to its participant.
    ///
    /// Guard-only. The winner flag and the pool debit are applied first; if
    /// the outbound transfer then fails, both are rolled back and the error
    /// reports the failed destination. No other operation can observe the
    /// in-between state.
    pub async fn select_winner(
        &self,
        caller: &Identity,
        id: SubmissionId,
        reward: Amount,
    ) -> Result<()> {
        let mut state = self.state.write().await;
        let ticket = state.ledger.begin_payout(caller, id, reward)?;

        if let Err(err) = self.settlement.transfer(&ticket.payee, ticket.reward).await {
            state.ledger.rollback_payout(&ticket);
            return Err(LedgerError::TransferFailure {
                to: ticket.payee,
                reason: err.to_string(),
            });
        }

        let record = state.ledger.registry().get(ticket.id)?.clone();
        self.store
            .commit(
                state.ledger.guard(),
                state.ledger.pool_balance(),
                std::slice::from_ref(&record),
            )
            .await?;
        state.log.record(Notification::WinnerSelected {
            id: ticket.id,
            participant: ticket.payee,
            reward: ticket.reward.value(),
        });
        info!(id, reward = %reward.value(), "winner paid");
        Ok(())
    }

    /// Moves `amount` out of custody to the guard. Guard-only.
    pub async fn withdraw(&self, caller: &Identity, amount: Amount) -> Result<()> {
        let mut state = self.state.write().await;
        let payee = state.ledger.begin_withdrawal(caller, amount)?;

        if let Err(err) = self.settlement.transfer(&payee, amount).await {
            state.ledger.rollback_withdrawal(amount);
            return Err(LedgerError::TransferFailure {
                to: payee,
                reason: err.to_string(),
            });
        }

        self.store
            .commit(state.ledger.guard(), state.ledger.pool_balance(), &[])
            .await?;
        state.log.record(Notification::Withdrawn {
            guard: payee,
            amount: amount.value(),
        });
        info!(amount = %amount.value(), "custody withdrawal");
        Ok(())
    }

    /// Dispatches one decoded operation row to the matching board call.
    pub async fn apply(&self, operation: Operation) -> Result<()> {
        match operation.op {
            OperationKind::Submit => {
                let link = operation.link.ok_or_else(|| {
                    LedgerError::InvalidInput("submit requires a link".to_string())
                })?;
                let description = operation.description.unwrap_or_default();
                self.submit(&operation.caller, &link, &description).await?;
                Ok(())
            }
            OperationKind::Fund => {
                let amount = required_amount(operation.amount, "fund")?;
                self.fund_pool(&operation.caller, amount).await
            }
            OperationKind::Award => {
                let id = operation.id.ok_or_else(|| {
                    LedgerError::InvalidInput("award requires a submission id".to_string())
                })?;
                let reward = required_amount(operation.amount, "award")?;
                self.select_winner(&operation.caller, id, reward).await
            }
            OperationKind::Withdraw => {
                let amount = required_amount(operation.amount, "withdraw")?;
                self.withdraw(&operation.caller, amount).await
            }
        }
    }

    pub async fn total_submissions(&self) -> usize {
        self.state.read().await.ledger.registry().count()
    }

    pub async fn submission(&self, id: SubmissionId) -> Result<SubmissionRecord> {
        Ok(self.state.read().await.ledger.registry().get(id)?.clone())
    }

    /// Ids submitted by `participant`, oldest first.
    pub async fn submissions_by(&self, participant: &Identity) -> Vec<SubmissionId> {
        self.state
            .read()
            .await
            .ledger
            .registry()
            .ids_by(participant)
            .to_vec()
    }

    pub async fn pool_balance(&self) -> Balance {
        self.state.read().await.ledger.pool_balance()
    }

    pub async fn guard(&self) -> Identity {
        self.state.read().await.ledger.guard().clone()
    }

    /// Everything emitted since the board was opened, in emission order.
    pub async fn notifications(&self) -> Vec<Notification> {
        self.state.read().await.log.entries().to_vec()
    }

    /// Consumes the board and returns the final state of all submissions.
    pub async fn into_report(self) -> Result<Vec<SubmissionRecord>> {
        let state = self.state.read().await;
        Ok(state.ledger.registry().records().to_vec())
    }
}

fn required_amount(amount: Option<Decimal>, op: &str) -> Result<Amount> {
    let value = amount
        .ok_or_else(|| LedgerError::InvalidInput(format!("{op} requires an amount")))?;
    Amount::new(value)
}
