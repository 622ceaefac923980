use thiserror::Error;

use crate::domain::{Principal, RecordId};

/// Errors returned by every ledger operation.
///
/// All variants except [`LedgerError::Storage`] are recoverable by the caller and
/// guarantee that no ledger state was changed by the failed call.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: RecordId },

    #[error("{caller} is not authorized to modify {kind} {id}")]
    Unauthorized {
        kind: &'static str,
        id: RecordId,
        caller: Principal,
    },

    #[error("Invalid state for {kind} {id}: cannot move from {from} to {to}")]
    InvalidState {
        kind: &'static str,
        id: RecordId,
        from: String,
        to: String,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Insufficient balance for {owner}: balance {balance}, required {required}")]
    InsufficientBalance {
        owner: Principal,
        balance: i64,
        required: i64,
    },

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

impl LedgerError {
    /// Stable integer code for the error class.
    ///
    /// | Error               | Code |
    /// |---------------------|------|
    /// | InvalidArgument     | 400  |
    /// | InsufficientBalance | 402  |
    /// | Unauthorized        | 403  |
    /// | NotFound            | 404  |
    /// | InvalidState        | 409  |
    /// | Storage             | 500  |
    pub fn code(&self) -> u16 {
        match self {
            LedgerError::InvalidArgument(_) => 400,
            LedgerError::InsufficientBalance { .. } => 402,
            LedgerError::Unauthorized { .. } => 403,
            LedgerError::NotFound { .. } => 404,
            LedgerError::InvalidState { .. } => 409,
            LedgerError::Storage(_) => 500,
        }
    }

    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        LedgerError::InvalidArgument(message.into())
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, LedgerError::Unauthorized { .. })
    }
}
