use tracing::{debug, info, warn};

use crate::domain::{Claim, Principal, RecordId, SequenceStats};
use crate::error::LedgerError;
use crate::storage::{Database, RecordStore};

/// Insurance claims filed against shipments.
pub struct InsuranceClaimService {
    claims: RecordStore<Claim>,
}

impl InsuranceClaimService {
    pub fn new(db: &Database) -> Self {
        Self {
            claims: RecordStore::new(db),
        }
    }

    /// File a claim. `shipment_id` is recorded as given; it is not looked up.
    pub async fn file_claim(
        &self,
        caller: &Principal,
        shipment_id: RecordId,
        amount: i64,
        description: impl Into<String>,
    ) -> Result<RecordId, LedgerError> {
        if amount <= 0 {
            return Err(LedgerError::invalid_argument("claim amount must be positive"));
        }
        if shipment_id <= 0 {
            return Err(LedgerError::invalid_argument(format!(
                "invalid shipment id {}",
                shipment_id
            )));
        }

        let claim = Claim::new(caller.clone(), shipment_id, amount, description);
        let id = self.claims.create(&claim).await?;

        info!(
            claim_id = id,
            claimant = %caller,
            shipment_id,
            amount,
            "Filed claim"
        );
        Ok(id)
    }

    /// Approve or reject a filed claim. Only the claimant may resolve it.
    pub async fn resolve_claim(
        &self,
        caller: &Principal,
        id: RecordId,
        approved: bool,
    ) -> Result<(), LedgerError> {
        let claim = self
            .claims
            .update(id, caller, Claim::resolver, |claim| claim.resolve(id, approved))
            .await
            .inspect_err(|err| {
                if err.is_unauthorized() {
                    warn!(claim_id = id, caller = %caller, "Rejected claim resolution");
                }
            })?;

        info!(claim_id = id, status = %claim.status, "Resolved claim");
        Ok(())
    }

    pub async fn get_claim(&self, id: RecordId) -> Result<Claim, LedgerError> {
        debug!(claim_id = id, "Reading claim");
        self.claims.get(id).await
    }

    pub async fn list_claims(&self) -> Result<Vec<(RecordId, Claim)>, LedgerError> {
        Ok(self.claims.list().await?)
    }

    pub async fn sequence_stats(&self) -> Result<SequenceStats, LedgerError> {
        Ok(self.claims.sequence_stats().await?)
    }
}
