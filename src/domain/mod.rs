//! Domain layer: the ledger aggregate, its value objects and its ports.

pub mod event;
pub mod funds;
pub mod identity;
pub mod ledger;
pub mod operation;
pub mod ports;
pub mod registry;
pub mod submission;
