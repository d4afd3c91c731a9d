//! Business-level reservation operations layered on the document store.
//!
//! The service does not validate payloads; required-field checks live in the
//! request handlers.

use std::sync::Arc;

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde_json::Value;

use crate::db::Repository;
use crate::errors::AppError;
use crate::models::{DeleteConfirmation, ReservationDocument, ReservationPatch};

/// Reservation CRUD on top of the [`Repository`].
#[derive(Clone)]
pub struct ReservationService {
    repo: Arc<Repository>,
}

impl ReservationService {
    pub fn new(repo: Arc<Repository>) -> Self {
        Self { repo }
    }

    /// All reservations.
    pub async fn list_all(&self) -> Result<Vec<ReservationDocument>, AppError> {
        self.repo.scan_all().await
    }

    /// A reservation by id, `None` when absent.
    pub async fn get_by_id(&self, id: &str) -> Result<Option<ReservationDocument>, AppError> {
        self.repo.get_by_key(id).await
    }

    /// Store a new reservation under a freshly generated id.
    ///
    /// Client fields are stored as sent, whatever their JSON type.
    pub async fn create(&self, data: ReservationPatch) -> Result<ReservationDocument, AppError> {
        let now = now_timestamp();
        let mut document = data.into_client_fields();
        document.insert(
            "id".to_string(),
            Value::String(uuid::Uuid::new_v4().to_string()),
        );
        document.insert("createdAt".to_string(), Value::String(now.clone()));
        document.insert("updatedAt".to_string(), Value::String(now));

        let reservation = ReservationDocument::new(document);
        self.repo.put(&reservation).await?;

        tracing::info!(id = %reservation.id(), "Created reservation");
        Ok(reservation)
    }

    /// Shallow-merge `data` over the stored reservation and rewrite it.
    ///
    /// Fields present in `data` replace stored ones, everything else is kept.
    /// `id` and `createdAt` never change.
    pub async fn update(
        &self,
        id: &str,
        data: ReservationPatch,
    ) -> Result<ReservationDocument, AppError> {
        let existing = self
            .repo
            .get_by_key(id)
            .await?
            .ok_or_else(|| AppError::reservation_not_found(id))?;

        let updated_at = timestamp_after(existing.updated_at().unwrap_or_default());
        let mut document = existing.into_fields();
        document.extend(data.into_client_fields());
        document.insert("updatedAt".to_string(), Value::String(updated_at));

        let merged = ReservationDocument::new(document);
        self.repo.put(&merged).await?;

        tracing::info!(id = %merged.id(), "Updated reservation");
        Ok(merged)
    }

    /// Delete by id without checking that the record exists.
    pub async fn delete(&self, id: &str) -> Result<DeleteConfirmation, AppError> {
        self.repo.delete_by_key(id).await?;

        tracing::info!(id, "Deleted reservation");
        Ok(DeleteConfirmation {
            id: id.to_string(),
            deleted: true,
        })
    }
}

/// Current UTC time as ISO-8601 with milliseconds, `2024-01-10T09:00:00.000Z`.
pub fn now_timestamp() -> String {
    format_timestamp(Utc::now())
}

/// A timestamp strictly later than `previous`.
///
/// Falls back to the current time when `previous` does not parse.
pub fn timestamp_after(previous: &str) -> String {
    let now = Utc::now();
    match DateTime::parse_from_rfc3339(previous) {
        Ok(prev) => {
            let prev = prev.with_timezone(&Utc);
            if now > prev {
                format_timestamp(now)
            } else {
                format_timestamp(prev + Duration::milliseconds(1))
            }
        }
        Err(_) => format_timestamp(now),
    }
}

fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}
