use std::marker::PhantomData;

use anyhow::{Context, Result};
use sqlx::{Row, Sqlite, SqliteConnection, SqlitePool, Transaction};

use crate::domain::{Principal, Record, RecordId, SequenceStats};
use crate::error::LedgerError;

use super::Database;

/// Sequential-id ledger of one record type.
///
/// Each store owns its own counter (named after [`Record::STORE`]), so ids are
/// independent across stores. Writes go through a transaction: the id allocation
/// and the insert, or the load, authorization check and save, commit together.
pub struct RecordStore<T> {
    pool: SqlitePool,
    _record: PhantomData<fn() -> T>,
}

impl<T: Record> RecordStore<T> {
    pub fn new(db: &Database) -> Self {
        Self {
            pool: db.pool().clone(),
            _record: PhantomData,
        }
    }

    pub async fn begin(&self) -> Result<Transaction<'static, Sqlite>> {
        self.pool
            .begin()
            .await
            .context("Failed to begin transaction")
    }

    /// Insert a new record and return its id.
    pub async fn create(&self, record: &T) -> Result<RecordId> {
        let mut tx = self.begin().await?;
        let id = self.insert_in(&mut tx, record).await?;
        tx.commit()
            .await
            .with_context(|| format!("Failed to commit new {}", T::KIND))?;
        Ok(id)
    }

    /// Fetch a record, failing with `NotFound` if it does not exist.
    pub async fn get(&self, id: RecordId) -> Result<T, LedgerError> {
        self.find(id)
            .await?
            .ok_or(LedgerError::NotFound { kind: T::KIND, id })
    }

    pub async fn find(&self, id: RecordId) -> Result<Option<T>> {
        let row = sqlx::query("SELECT body FROM records WHERE store = ? AND id = ?")
            .bind(T::STORE)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("Failed to fetch {}", T::KIND))?;

        row.map(|row| Self::decode(&row.get::<String, _>("body")))
            .transpose()
    }

    /// Load a record, check that `caller` is the party `authorized_party` picks
    /// out of it, apply `mutate` and persist. Any failure leaves the record as it was.
    pub async fn update<F>(
        &self,
        id: RecordId,
        caller: &Principal,
        authorized_party: fn(&T) -> &Principal,
        mutate: F,
    ) -> Result<T, LedgerError>
    where
        F: FnOnce(&mut T) -> Result<(), LedgerError>,
    {
        let mut tx = self.begin().await?;

        let mut record = self
            .load_in(&mut tx, id)
            .await?
            .ok_or(LedgerError::NotFound { kind: T::KIND, id })?;

        if authorized_party(&record) != caller {
            return Err(LedgerError::Unauthorized {
                kind: T::KIND,
                id,
                caller: caller.clone(),
            });
        }

        mutate(&mut record)?;

        self.save_in(&mut tx, id, &record).await?;
        tx.commit()
            .await
            .with_context(|| format!("Failed to commit {} update", T::KIND))?;

        Ok(record)
    }

    /// List all records, ordered by id.
    pub async fn list(&self) -> Result<Vec<(RecordId, T)>> {
        let rows = sqlx::query("SELECT id, body FROM records WHERE store = ? ORDER BY id")
            .bind(T::STORE)
            .fetch_all(&self.pool)
            .await
            .with_context(|| format!("Failed to list {}", T::STORE))?;

        rows.iter()
            .map(|row| -> Result<(RecordId, T)> {
                let id: RecordId = row.get("id");
                Ok((id, Self::decode(&row.get::<String, _>("body"))?))
            })
            .collect()
    }

    /// Id allocation statistics, for integrity checking.
    pub async fn sequence_stats(&self) -> Result<SequenceStats> {
        let row = sqlx::query(
            r#"
            SELECT COUNT(*) as count, MIN(id) as min_id, MAX(id) as max_id
            FROM records
            WHERE store = ?
            "#,
        )
        .bind(T::STORE)
        .fetch_one(&self.pool)
        .await
        .with_context(|| format!("Failed to count {}", T::STORE))?;

        let counter: Option<i64> =
            sqlx::query_scalar("SELECT value FROM sequence_counter WHERE name = ?")
                .bind(T::STORE)
                .fetch_optional(&self.pool)
                .await
                .context("Failed to read sequence counter")?;

        Ok(SequenceStats {
            store: T::STORE,
            record_count: row.get("count"),
            min_id: row.get("min_id"),
            max_id: row.get("max_id"),
            counter: counter.unwrap_or(0),
        })
    }

    // ========================
    // Transaction-scoped operations
    // ========================

    /// Allocate the next id and insert `record` on an open connection.
    pub async fn insert_in(&self, conn: &mut SqliteConnection, record: &T) -> Result<RecordId> {
        let id = self.next_id(conn).await?;
        let body = serde_json::to_string(record)
            .with_context(|| format!("Failed to encode {}", T::KIND))?;

        sqlx::query("INSERT INTO records (store, id, body) VALUES (?, ?, ?)")
            .bind(T::STORE)
            .bind(id)
            .bind(&body)
            .execute(&mut *conn)
            .await
            .with_context(|| format!("Failed to save {}", T::KIND))?;

        Ok(id)
    }

    pub async fn load_in(&self, conn: &mut SqliteConnection, id: RecordId) -> Result<Option<T>> {
        let body: Option<String> =
            sqlx::query_scalar("SELECT body FROM records WHERE store = ? AND id = ?")
                .bind(T::STORE)
                .bind(id)
                .fetch_optional(&mut *conn)
                .await
                .with_context(|| format!("Failed to load {}", T::KIND))?;

        body.as_deref().map(Self::decode).transpose()
    }

    async fn save_in(&self, conn: &mut SqliteConnection, id: RecordId, record: &T) -> Result<()> {
        let body = serde_json::to_string(record)
            .with_context(|| format!("Failed to encode {}", T::KIND))?;

        let result = sqlx::query("UPDATE records SET body = ? WHERE store = ? AND id = ?")
            .bind(&body)
            .bind(T::STORE)
            .bind(id)
            .execute(&mut *conn)
            .await
            .with_context(|| format!("Failed to update {}", T::KIND))?;

        if result.rows_affected() != 1 {
            anyhow::bail!("{} {} vanished during update", T::KIND, id);
        }
        Ok(())
    }

    /// Get the next id and increment the counter.
    async fn next_id(&self, conn: &mut SqliteConnection) -> Result<RecordId> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO sequence_counter (name, value) VALUES (?, 1)
            ON CONFLICT(name) DO UPDATE SET value = value + 1
            RETURNING value
            "#,
        )
        .bind(T::STORE)
        .fetch_one(&mut *conn)
        .await
        .context("Failed to get next record id")?;

        Ok(id)
    }

    fn decode(body: &str) -> Result<T> {
        serde_json::from_str(body).with_context(|| format!("Invalid {} record", T::KIND))
    }
}
