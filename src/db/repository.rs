//! Key-value access to the reservations table.
//!
//! No transactions, filtering or pagination. Store errors are passed to the
//! caller as they are.

use sqlx::{Row, SqlitePool};

use crate::errors::AppError;
use crate::models::ReservationDocument;

/// Document store adapter for reservations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Every stored reservation, in no particular order.
    pub async fn scan_all(&self) -> Result<Vec<ReservationDocument>, AppError> {
        let rows = sqlx::query("SELECT document FROM reservations")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(document_from_row).collect()
    }

    /// Get a reservation by id.
    pub async fn get_by_key(&self, id: &str) -> Result<Option<ReservationDocument>, AppError> {
        let row = sqlx::query("SELECT document FROM reservations WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(document_from_row).transpose()
    }

    /// Write the full record, replacing whatever is stored under its id.
    pub async fn put(&self, document: &ReservationDocument) -> Result<(), AppError> {
        let json = serde_json::to_string(document)?;

        sqlx::query(
            "INSERT INTO reservations (id, document) VALUES (?, ?) \
             ON CONFLICT(id) DO UPDATE SET document = excluded.document",
        )
        .bind(document.id())
        .bind(&json)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Remove the record stored under `id`. Removing a missing key is a no-op.
    pub async fn delete_by_key(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM reservations WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        tracing::debug!(id, removed = result.rows_affected(), "Deleted reservation key");
        Ok(())
    }
}

fn document_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<ReservationDocument, AppError> {
    let json: String = row.try_get("document")?;
    Ok(serde_json::from_str(&json)?)
}
