use serde::{Deserialize, Serialize};

use super::{Principal, Record, RecordId};
use crate::error::LedgerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    Pending,
    Approved,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Pending => "pending",
            DocumentStatus::Approved => "approved",
        }
    }

    /// Allowed moves: pending -> approved. Approved is terminal.
    pub fn can_transition_to(&self, next: DocumentStatus) -> bool {
        matches!(
            (self, next),
            (DocumentStatus::Pending, DocumentStatus::Approved)
        )
    }
}

impl std::fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A customs document submitted by a shipper and cleared by its recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub shipper: Principal,
    pub recipient: Principal,
    pub contents: String,
    pub origin: String,
    pub destination: String,
    pub status: DocumentStatus,
}

impl Document {
    pub fn new(
        shipper: Principal,
        recipient: Principal,
        contents: impl Into<String>,
        origin: impl Into<String>,
        destination: impl Into<String>,
    ) -> Self {
        Self {
            shipper,
            recipient,
            contents: contents.into(),
            origin: origin.into(),
            destination: destination.into(),
            status: DocumentStatus::Pending,
        }
    }

    /// The only party allowed to approve: the recipient.
    pub fn approver(&self) -> &Principal {
        &self.recipient
    }

    pub fn is_approved(&self) -> bool {
        self.status == DocumentStatus::Approved
    }

    /// Move the document to `approved`. Re-approval is rejected.
    pub fn approve(&mut self, id: RecordId) -> Result<(), LedgerError> {
        let next = DocumentStatus::Approved;
        if !self.status.can_transition_to(next) {
            return Err(LedgerError::InvalidState {
                kind: Self::KIND,
                id,
                from: self.status.to_string(),
                to: next.to_string(),
            });
        }
        self.status = next;
        Ok(())
    }
}

impl Record for Document {
    const STORE: &'static str = "documents";
    const KIND: &'static str = "document";
}
