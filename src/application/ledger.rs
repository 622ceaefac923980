use std::sync::Arc;

use tracing::info;

use crate::domain::{Clock, IntegrityReport, SystemClock, build_integrity_report};
use crate::error::LedgerError;
use crate::storage::Database;

use super::{
    DocumentClearanceService, InsuranceClaimService, ShipmentTrackingService,
    TokenizedOwnershipService,
};

/// The four supply-chain ledgers over one database.
/// This is the primary interface for any client (CLI, API, etc.).
pub struct SupplyChainLedger {
    pub documents: DocumentClearanceService,
    pub claims: InsuranceClaimService,
    pub shipments: ShipmentTrackingService,
    pub ownership: TokenizedOwnershipService,
}

impl SupplyChainLedger {
    pub fn new(db: Database, clock: Arc<dyn Clock>) -> Self {
        Self {
            documents: DocumentClearanceService::new(&db),
            claims: InsuranceClaimService::new(&db),
            shipments: ShipmentTrackingService::new(&db, clock),
            ownership: TokenizedOwnershipService::new(&db),
        }
    }

    /// Initialize a new database at the given path.
    pub async fn init(database_path: &str) -> Result<Self, LedgerError> {
        Self::init_with_clock(database_path, Arc::new(SystemClock)).await
    }

    /// Initialize a new database, taking shipment timestamps from `clock`.
    pub async fn init_with_clock(
        database_path: &str,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, LedgerError> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let db = Database::init(&db_url).await?;
        info!(database = database_path, "Initialized ledger database");
        Ok(Self::new(db, clock))
    }

    /// Connect to an existing database.
    pub async fn connect(database_path: &str) -> Result<Self, LedgerError> {
        let db_url = format!("sqlite:{}", database_path);
        let db = Database::connect(&db_url).await?;
        Ok(Self::new(db, Arc::new(SystemClock)))
    }

    /// Check id sequences of every store and supply conservation of every asset.
    pub async fn check_integrity(&self) -> Result<IntegrityReport, LedgerError> {
        let stores = vec![
            self.documents.sequence_stats().await?,
            self.claims.sequence_stats().await?,
            self.shipments.sequence_stats().await?,
            self.ownership.sequence_stats().await?,
        ];
        let assets = self.ownership.supply_stats().await?;

        Ok(build_integrity_report(stores, assets))
    }
}
