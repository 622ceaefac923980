// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use std::sync::Arc;

use anyhow::Result;
use clearway::SupplyChainLedger;
use clearway::domain::{ManualClock, Principal};
use tempfile::TempDir;

pub const SHIPPER: &str = "ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM";
pub const RECIPIENT: &str = "ST2CY5V39NHDPWSXMW9QDT3HC3GD6Q6XX4CFRK9AG";
pub const OUTSIDER: &str = "ST3AM1A56AK2C1XAFJ4115ZSV26EB49BVQ10MGCS0";

/// Starting tick of the test clock
pub const START_TICK: i64 = 123_456;

/// Test fixture: a ledger on a temporary database with a hand-driven clock
pub struct TestLedger {
    pub ledger: SupplyChainLedger,
    pub clock: Arc<ManualClock>,
    _temp: TempDir,
}

impl std::ops::Deref for TestLedger {
    type Target = SupplyChainLedger;

    fn deref(&self) -> &Self::Target {
        &self.ledger
    }
}

/// Helper to create a test ledger with a temporary database
pub async fn test_ledger() -> Result<TestLedger> {
    let temp = TempDir::new()?;
    let db_path = temp.path().join("test.db");
    let clock = Arc::new(ManualClock::new(START_TICK));
    let ledger = SupplyChainLedger::init_with_clock(db_path.to_str().unwrap(), clock.clone()).await?;
    Ok(TestLedger {
        ledger,
        clock,
        _temp: temp,
    })
}

pub fn shipper() -> Principal {
    Principal::new(SHIPPER)
}

pub fn recipient() -> Principal {
    Principal::new(RECIPIENT)
}

pub fn outsider() -> Principal {
    Principal::new(OUTSIDER)
}
