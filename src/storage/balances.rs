use std::collections::BTreeMap;

use anyhow::{Context, Result};
use sqlx::{Row, SqliteConnection, SqlitePool};

use crate::domain::{Principal, RecordId};

use super::Database;

/// The `(asset_id, owner) -> amount` table behind tokenized ownership.
/// Owners without a row hold zero.
pub struct BalanceBook {
    pool: SqlitePool,
}

impl BalanceBook {
    pub fn new(db: &Database) -> Self {
        Self {
            pool: db.pool().clone(),
        }
    }

    /// Current balance of `owner` for `asset_id`.
    pub async fn balance(&self, asset_id: RecordId, owner: &Principal) -> Result<i64> {
        let amount: Option<i64> =
            sqlx::query_scalar("SELECT amount FROM balances WHERE asset_id = ? AND owner = ?")
                .bind(asset_id)
                .bind(owner.as_str())
                .fetch_optional(&self.pool)
                .await
                .context("Failed to fetch balance")?;

        Ok(amount.unwrap_or(0))
    }

    /// All owners holding `asset_id`, largest balance first.
    pub async fn holders(&self, asset_id: RecordId) -> Result<Vec<(Principal, i64)>> {
        let rows = sqlx::query(
            r#"
            SELECT owner, amount
            FROM balances
            WHERE asset_id = ? AND amount > 0
            ORDER BY amount DESC, owner
            "#,
        )
        .bind(asset_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list holders")?;

        Ok(rows
            .iter()
            .map(|row| {
                let owner: String = row.get("owner");
                let amount: i64 = row.get("amount");
                (Principal::new(owner), amount)
            })
            .collect())
    }

    /// Balance rows grouped by asset, for integrity checking.
    pub async fn holdings_by_asset(&self) -> Result<BTreeMap<RecordId, Vec<i64>>> {
        let rows = sqlx::query("SELECT asset_id, amount FROM balances ORDER BY asset_id")
            .fetch_all(&self.pool)
            .await
            .context("Failed to scan balances")?;

        let mut holdings: BTreeMap<RecordId, Vec<i64>> = BTreeMap::new();
        for row in rows {
            let asset_id: RecordId = row.get("asset_id");
            let amount: i64 = row.get("amount");
            holdings.entry(asset_id).or_default().push(amount);
        }
        Ok(holdings)
    }

    // ========================
    // Transaction-scoped operations
    // ========================

    pub async fn balance_in(
        &self,
        conn: &mut SqliteConnection,
        asset_id: RecordId,
        owner: &Principal,
    ) -> Result<i64> {
        let amount: Option<i64> =
            sqlx::query_scalar("SELECT amount FROM balances WHERE asset_id = ? AND owner = ?")
                .bind(asset_id)
                .bind(owner.as_str())
                .fetch_optional(&mut *conn)
                .await
                .context("Failed to fetch balance")?;

        Ok(amount.unwrap_or(0))
    }

    /// Overwrite the balance of `owner`. Rows are kept at zero, never deleted.
    pub async fn set_in(
        &self,
        conn: &mut SqliteConnection,
        asset_id: RecordId,
        owner: &Principal,
        amount: i64,
    ) -> Result<()> {
        if amount < 0 {
            anyhow::bail!("Refusing to store negative balance {} for {}", amount, owner);
        }

        sqlx::query(
            r#"
            INSERT INTO balances (asset_id, owner, amount) VALUES (?, ?, ?)
            ON CONFLICT(asset_id, owner) DO UPDATE SET amount = excluded.amount
            "#,
        )
        .bind(asset_id)
        .bind(owner.as_str())
        .bind(amount)
        .execute(&mut *conn)
        .await
        .context("Failed to save balance")?;

        Ok(())
    }
}
