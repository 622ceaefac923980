use serde::Serialize;

use super::RecordId;

/// Id allocation statistics for one record store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SequenceStats {
    pub store: &'static str,
    pub record_count: i64,
    pub min_id: Option<RecordId>,
    pub max_id: Option<RecordId>,
    /// Last value handed out by the store's counter (0 if never used).
    pub counter: i64,
}

impl SequenceStats {
    /// Ids are exactly `1..=record_count` and the counter points at the last one.
    pub fn is_contiguous(&self) -> bool {
        match (self.min_id, self.max_id) {
            (Some(min), Some(max)) => {
                min == 1 && max == self.record_count && self.counter == max
            }
            _ => self.record_count == 0 && self.counter == 0,
        }
    }
}

/// Supply accounting for one asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SupplyStats {
    pub asset_id: RecordId,
    pub name: String,
    pub total_supply: i64,
    /// `None` when summing the balances overflowed.
    pub balance_sum: Option<i64>,
    pub holder_count: i64,
    pub negative_balances: i64,
}

impl SupplyStats {
    pub fn is_conserved(&self) -> bool {
        self.balance_sum == Some(self.total_supply) && self.negative_balances == 0
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct IntegrityReport {
    pub stores: Vec<SequenceStats>,
    pub assets: Vec<SupplyStats>,
    pub issues: Vec<String>,
}

impl IntegrityReport {
    pub fn is_healthy(&self) -> bool {
        self.issues.is_empty()
    }
}

pub fn build_integrity_report(
    stores: Vec<SequenceStats>,
    assets: Vec<SupplyStats>,
) -> IntegrityReport {
    let mut issues = Vec::new();

    for store in &stores {
        if !store.is_contiguous() {
            issues.push(format!(
                "Store '{}' has non-contiguous ids: {} records, ids {}..{}, counter at {}",
                store.store,
                store.record_count,
                store.min_id.map_or("-".to_string(), |id| id.to_string()),
                store.max_id.map_or("-".to_string(), |id| id.to_string()),
                store.counter
            ));
        }
    }

    for asset in &assets {
        if asset.negative_balances > 0 {
            issues.push(format!(
                "Asset {} ('{}') has {} negative balance(s)",
                asset.asset_id, asset.name, asset.negative_balances
            ));
        }
        match asset.balance_sum {
            Some(sum) if sum != asset.total_supply => issues.push(format!(
                "Asset {} ('{}') balances sum to {} but total supply is {}",
                asset.asset_id, asset.name, sum, asset.total_supply
            )),
            None => issues.push(format!(
                "Asset {} ('{}') balance sum overflows",
                asset.asset_id, asset.name
            )),
            _ => {}
        }
    }

    IntegrityReport {
        stores,
        assets,
        issues,
    }
}
