use serde::{Deserialize, Serialize};

use super::{Principal, Record, RecordId};
use crate::error::LedgerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClaimStatus {
    Filed,
    Approved,
    Rejected,
}

impl ClaimStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimStatus::Filed => "filed",
            ClaimStatus::Approved => "approved",
            ClaimStatus::Rejected => "rejected",
        }
    }

    /// Allowed moves: filed -> approved, filed -> rejected.
    pub fn can_transition_to(&self, next: ClaimStatus) -> bool {
        matches!(
            (self, next),
            (ClaimStatus::Filed, ClaimStatus::Approved) | (ClaimStatus::Filed, ClaimStatus::Rejected)
        )
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, ClaimStatus::Filed)
    }
}

impl std::fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An insurance claim against a shipment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    pub claimant: Principal,
    /// Not checked against the shipment store.
    pub shipment_id: RecordId,
    pub amount: i64,
    pub description: String,
    pub status: ClaimStatus,
}

impl Claim {
    pub fn new(
        claimant: Principal,
        shipment_id: RecordId,
        amount: i64,
        description: impl Into<String>,
    ) -> Self {
        Self {
            claimant,
            shipment_id,
            amount,
            description: description.into(),
            status: ClaimStatus::Filed,
        }
    }

    /// The party allowed to resolve the claim. This is the claimant itself;
    /// there is no adjuster role.
    pub fn resolver(&self) -> &Principal {
        &self.claimant
    }

    pub fn resolve(&mut self, id: RecordId, approved: bool) -> Result<(), LedgerError> {
        let next = if approved {
            ClaimStatus::Approved
        } else {
            ClaimStatus::Rejected
        };
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

impl Record for Claim {
    const STORE: &'static str = "claims";
    const KIND: &'static str = "claim";
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filed() -> Claim {
        Claim::new(Principal::new("claimant"), 1, 1000, "Damaged goods")
    }

    #[test]
    fn test_resolve_sets_matching_status() {
        let mut approved = filed();
        approved.resolve(1, true).unwrap();
        assert_eq!(approved.status, ClaimStatus::Approved);

        let mut rejected = filed();
        rejected.resolve(2, false).unwrap();
        assert_eq!(rejected.status, ClaimStatus::Rejected);
    }

    #[test]
    fn test_resolved_claims_are_terminal() {
        for first in [true, false] {
            let mut claim = filed();
            claim.resolve(1, first).unwrap();
            assert!(claim.status.is_terminal());

            for second in [true, false] {
                let before = claim.status;
                assert!(matches!(
                    claim.resolve(1, second),
                    Err(LedgerError::InvalidState { .. })
                ));
                assert_eq!(claim.status, before);
            }
        }
    }
}
