use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{LedgerError, Result};

/// Opaque caller identity.
///
/// The surrounding runtime verifies callers before they reach the ledger;
/// the ledger only compares identities, it never authenticates them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Identity {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Identity {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// The single privileged identity, fixed at initialization.
///
/// There is no rotation or transfer: the guard set when the ledger is
/// created stays the guard for the ledger's lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessGuard {
    identity: Identity,
}

impl AccessGuard {
    pub fn new(identity: Identity) -> Self {
        Self { identity }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Gate for privileged operations. Fails with `Unauthorized` unless
    /// `caller` is the guard identity.
    pub fn ensure(&self, caller: &Identity) -> Result<()> {
        if caller == &self.identity {
            Ok(())
        } else {
            Err(LedgerError::Unauthorized(caller.clone()))
        }
    }
}
