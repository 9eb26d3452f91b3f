//! Application layer containing the core business logic orchestration.
//!
//! This module defines the `PrizeBoard` which acts as the primary entry point
//! for applying operations. A single `tokio` lock serializes every mutation,
//! so each operation commits or fails as a whole.

pub mod engine;
