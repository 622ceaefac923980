use serde::{Deserialize, Serialize};

use super::{Principal, Record};

pub const INITIAL_SHIPMENT_STATUS: &str = "created";
pub const UNKNOWN_LOCATION: &str = "unknown";

/// A tracked shipment. Status and location are free-form and overwritten on each update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shipment {
    pub owner: Principal,
    pub tracking_number: String,
    pub status: String,
    pub location: String,
    pub last_updated: i64,
}

impl Shipment {
    pub fn new(owner: Principal, tracking_number: impl Into<String>, now: i64) -> Self {
        Self {
            owner,
            tracking_number: tracking_number.into(),
            status: INITIAL_SHIPMENT_STATUS.to_string(),
            location: UNKNOWN_LOCATION.to_string(),
            last_updated: now,
        }
    }

    pub fn controller(&self) -> &Principal {
        &self.owner
    }

    /// Overwrite status and location. `last_updated` never moves backwards,
    /// even if the clock does.
    pub fn record_update(
        &mut self,
        status: impl Into<String>,
        location: impl Into<String>,
        now: i64,
    ) {
        self.status = status.into();
        self.location = location.into();
        self.last_updated = self.last_updated.max(now);
    }
}

impl Record for Shipment {
    const STORE: &'static str = "shipments";
    const KIND: &'static str = "shipment";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_shipment_defaults() {
        let shipment = Shipment::new(Principal::new("owner"), "TRACK123456", 42);
        assert_eq!(shipment.status, "created");
        assert_eq!(shipment.location, "unknown");
        assert_eq!(shipment.last_updated, 42);
    }

    #[test]
    fn test_last_updated_is_monotonic() {
        let mut shipment = Shipment::new(Principal::new("owner"), "TRACK123456", 100);

        shipment.record_update("in-transit", "Paris", 150);
        assert_eq!(shipment.last_updated, 150);

        // Clock went backwards
        shipment.record_update("delivered", "London", 120);
        assert_eq!(shipment.last_updated, 150);
        assert_eq!(shipment.status, "delivered");
        assert_eq!(shipment.location, "London");
    }
}
