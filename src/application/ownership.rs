use anyhow::Context;
use tracing::{debug, info};

use crate::domain::{
    Asset, Principal, Record, RecordId, SequenceStats, SupplyStats, plan_transfer, total_held,
    validate_transfer,
};
use crate::error::LedgerError;
use crate::storage::{BalanceBook, Database, RecordStore};

/// Tokenized assets with fungible, conserved balances.
///
/// Balances are keyed by `(asset_id, owner)`. The sum of all balances of an asset
/// always equals its total supply: creation mints the whole supply to the creator
/// and transfers move amounts between two owners inside one transaction.
pub struct TokenizedOwnershipService {
    assets: RecordStore<Asset>,
    balances: BalanceBook,
}

impl TokenizedOwnershipService {
    pub fn new(db: &Database) -> Self {
        Self {
            assets: RecordStore::new(db),
            balances: BalanceBook::new(db),
        }
    }

    /// Create an asset and credit its whole supply to the caller.
    pub async fn create_asset(
        &self,
        caller: &Principal,
        name: impl Into<String>,
        asset_type: impl Into<String>,
        total_supply: i64,
    ) -> Result<RecordId, LedgerError> {
        if total_supply < 0 {
            return Err(LedgerError::invalid_argument(
                "total supply must not be negative",
            ));
        }

        let asset = Asset::new(name, asset_type, total_supply);

        let mut tx = self.assets.begin().await?;
        let id = self.assets.insert_in(&mut tx, &asset).await?;
        self.balances
            .set_in(&mut tx, id, caller, total_supply)
            .await?;
        tx.commit().await.context("Failed to commit new asset")?;

        info!(
            asset_id = id,
            creator = %caller,
            name = %asset.name,
            total_supply,
            "Created asset"
        );
        Ok(id)
    }

    /// Move `amount` of `asset_id` from the caller to `recipient`.
    pub async fn transfer_ownership(
        &self,
        asset_id: RecordId,
        caller: &Principal,
        recipient: &Principal,
        amount: i64,
    ) -> Result<(), LedgerError> {
        validate_transfer(caller, recipient, amount)?;

        let mut tx = self.assets.begin().await?;

        if self.assets.load_in(&mut tx, asset_id).await?.is_none() {
            return Err(LedgerError::NotFound {
                kind: Asset::KIND,
                id: asset_id,
            });
        }

        let sender_balance = self.balances.balance_in(&mut tx, asset_id, caller).await?;
        let recipient_balance = self
            .balances
            .balance_in(&mut tx, asset_id, recipient)
            .await?;

        let plan = plan_transfer(caller, recipient, sender_balance, recipient_balance, amount)?;

        self.balances
            .set_in(&mut tx, asset_id, caller, plan.sender_balance)
            .await?;
        self.balances
            .set_in(&mut tx, asset_id, recipient, plan.recipient_balance)
            .await?;
        tx.commit().await.context("Failed to commit transfer")?;

        info!(
            asset_id,
            from = %caller,
            to = %recipient,
            amount,
            "Transferred ownership"
        );
        Ok(())
    }

    pub async fn get_asset(&self, id: RecordId) -> Result<Asset, LedgerError> {
        debug!(asset_id = id, "Reading asset");
        self.assets.get(id).await
    }

    /// Balance of `owner` in `asset_id`; zero for owners that never held it.
    pub async fn get_balance(
        &self,
        asset_id: RecordId,
        owner: &Principal,
    ) -> Result<i64, LedgerError> {
        self.require_asset(asset_id).await?;
        Ok(self.balances.balance(asset_id, owner).await?)
    }

    /// Owners with a positive balance, largest first.
    pub async fn holders(&self, asset_id: RecordId) -> Result<Vec<(Principal, i64)>, LedgerError> {
        self.require_asset(asset_id).await?;
        Ok(self.balances.holders(asset_id).await?)
    }

    pub async fn list_assets(&self) -> Result<Vec<(RecordId, Asset)>, LedgerError> {
        Ok(self.assets.list().await?)
    }

    /// Handle bound to a single asset.
    pub fn asset(&self, asset_id: RecordId) -> AssetLedger<'_> {
        AssetLedger {
            service: self,
            asset_id,
        }
    }

    pub async fn sequence_stats(&self) -> Result<SequenceStats, LedgerError> {
        Ok(self.assets.sequence_stats().await?)
    }

    /// Supply accounting for every asset.
    pub async fn supply_stats(&self) -> Result<Vec<SupplyStats>, LedgerError> {
        let assets = self.assets.list().await?;
        let mut holdings = self.balances.holdings_by_asset().await?;

        Ok(assets
            .into_iter()
            .map(|(asset_id, asset)| {
                let amounts = holdings.remove(&asset_id).unwrap_or_default();
                SupplyStats {
                    asset_id,
                    name: asset.name,
                    total_supply: asset.total_supply,
                    balance_sum: total_held(&amounts),
                    holder_count: amounts.iter().filter(|amount| **amount > 0).count() as i64,
                    negative_balances: amounts.iter().filter(|amount| **amount < 0).count() as i64,
                }
            })
            .collect())
    }

    async fn require_asset(&self, asset_id: RecordId) -> Result<(), LedgerError> {
        match self.assets.find(asset_id).await? {
            Some(_) => Ok(()),
            None => Err(LedgerError::NotFound {
                kind: Asset::KIND,
                id: asset_id,
            }),
        }
    }
}

/// Operations on one asset, so balances can be looked up by owner alone.
pub struct AssetLedger<'a> {
    service: &'a TokenizedOwnershipService,
    asset_id: RecordId,
}

impl AssetLedger<'_> {
    pub fn id(&self) -> RecordId {
        self.asset_id
    }

    pub async fn get(&self) -> Result<Asset, LedgerError> {
        self.service.get_asset(self.asset_id).await
    }

    pub async fn get_balance(&self, owner: &Principal) -> Result<i64, LedgerError> {
        self.service.get_balance(self.asset_id, owner).await
    }

    pub async fn transfer_ownership(
        &self,
        caller: &Principal,
        recipient: &Principal,
        amount: i64,
    ) -> Result<(), LedgerError> {
        self.service
            .transfer_ownership(self.asset_id, caller, recipient, amount)
            .await
    }

    pub async fn holders(&self) -> Result<Vec<(Principal, i64)>, LedgerError> {
        self.service.holders(self.asset_id).await
    }
}
