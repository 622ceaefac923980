use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::{Clock, Principal, RecordId, SequenceStats, Shipment};
use crate::error::LedgerError;
use crate::storage::{Database, RecordStore};

/// Shipment tracking. Owners post free-form status and location updates.
pub struct ShipmentTrackingService {
    shipments: RecordStore<Shipment>,
    clock: Arc<dyn Clock>,
}

impl ShipmentTrackingService {
    pub fn new(db: &Database, clock: Arc<dyn Clock>) -> Self {
        Self {
            shipments: RecordStore::new(db),
            clock,
        }
    }

    pub async fn create_shipment(
        &self,
        caller: &Principal,
        tracking_number: impl Into<String>,
    ) -> Result<RecordId, LedgerError> {
        let tracking_number = tracking_number.into();
        if tracking_number.trim().is_empty() {
            return Err(LedgerError::invalid_argument(
                "tracking number must not be empty",
            ));
        }

        let shipment = Shipment::new(caller.clone(), tracking_number, self.clock.now());
        let id = self.shipments.create(&shipment).await?;

        info!(
            shipment_id = id,
            owner = %caller,
            tracking_number = %shipment.tracking_number,
            "Created shipment"
        );
        Ok(id)
    }

    /// Overwrite status and location. Only the owner may update a shipment.
    pub async fn update_shipment(
        &self,
        caller: &Principal,
        id: RecordId,
        new_status: impl Into<String>,
        new_location: impl Into<String>,
    ) -> Result<(), LedgerError> {
        let new_status = new_status.into();
        let new_location = new_location.into();
        if new_status.trim().is_empty() {
            return Err(LedgerError::invalid_argument("status must not be empty"));
        }

        let now = self.clock.now();
        let shipment = self
            .shipments
            .update(id, caller, Shipment::controller, |shipment| {
                shipment.record_update(new_status, new_location, now);
                Ok(())
            })
            .await
            .inspect_err(|err| {
                if err.is_unauthorized() {
                    warn!(shipment_id = id, caller = %caller, "Rejected shipment update");
                }
            })?;

        info!(
            shipment_id = id,
            status = %shipment.status,
            location = %shipment.location,
            last_updated = shipment.last_updated,
            "Updated shipment"
        );
        Ok(())
    }

    pub async fn get_shipment(&self, id: RecordId) -> Result<Shipment, LedgerError> {
        debug!(shipment_id = id, "Reading shipment");
        self.shipments.get(id).await
    }

    pub async fn list_shipments(&self) -> Result<Vec<(RecordId, Shipment)>, LedgerError> {
        Ok(self.shipments.list().await?)
    }

    pub async fn sequence_stats(&self) -> Result<SequenceStats, LedgerError> {
        Ok(self.shipments.sequence_stats().await?)
    }
}
