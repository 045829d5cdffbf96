//! Activity log upsert for calendar occurrences.

use chrono::Utc;
use tracing::debug;

use crate::error::{DomainError, StorageError};
use crate::models::activity_log::{
    ActivityLogEntry, ActivityLogLookup, ActivityLogRange, ActivityLogUpdate, NewActivityLog,
    UpsertActivityLogRequest,
};
use crate::services::access;
use crate::session::Session;
use crate::storage::Storage;

/// Validates and normalizes an upsert request for `client_id`.
///
/// `completion_details` becomes a JSON object, `performed_at` defaults to
/// now and `source_item_table` is derived from the item type when absent.
pub fn normalize(
    client_id: i64,
    req: UpsertActivityLogRequest,
) -> Result<NewActivityLog, DomainError> {
    let completion_details = shared::validation::normalize_json_object(req.completion_details)
        .map_err(|e| DomainError::at_field("completion_details", e))?;

    let source_item_table = req
        .source_item_table
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| req.item_type.source_table().to_string());

    Ok(NewActivityLog {
        client_id,
        original_item_id: req.original_item_id,
        item_type: req.item_type,
        title: req.title,
        scheduled_date: req.scheduled_date,
        status: req.status,
        client_notes: req.client_notes,
        completion_details,
        performed_at: req.performed_at.unwrap_or_else(Utc::now),
        source_item_table: Some(source_item_table),
    })
}

/// Records the client's status for one occurrence.
///
/// An existing entry for the same `(client, original_item_id, item_type)`
/// is updated in place (status, notes and details only); otherwise a new
/// entry is inserted. The occurrence id is not checked against any source.
pub async fn upsert(
    storage: &dyn Storage,
    session: &Session,
    req: UpsertActivityLogRequest,
) -> Result<ActivityLogEntry, DomainError> {
    let client_id = session.require_client()?;
    let entry = normalize(client_id, req)?;
    let update = ActivityLogUpdate {
        status: entry.status,
        client_notes: entry.client_notes.clone(),
        completion_details: entry.completion_details.clone(),
    };

    if let Some(existing) = storage
        .find_activity_log(client_id, &entry.original_item_id, entry.item_type)
        .await?
    {
        return update_existing(storage, existing.id, &update).await;
    }

    let original_item_id = entry.original_item_id.clone();
    let item_type = entry.item_type;
    match storage.insert_activity_log(entry).await {
        Ok(created) => Ok(created),
        // A concurrent submission inserted first; fall back to updating it.
        Err(StorageError::Conflict(_)) => {
            debug!(client_id, %original_item_id, "Activity log insert raced, updating");
            let existing = storage
                .find_activity_log(client_id, &original_item_id, item_type)
                .await?
                .ok_or(DomainError::NotFound("Activity log entry"))?;
            update_existing(storage, existing.id, &update).await
        }
        Err(other) => Err(other.into()),
    }
}

async fn update_existing(
    storage: &dyn Storage,
    id: i64,
    update: &ActivityLogUpdate,
) -> Result<ActivityLogEntry, DomainError> {
    storage
        .update_activity_log(id, update)
        .await?
        .ok_or(DomainError::NotFound("Activity log entry"))
}

/// The calling client's entry for one occurrence, if any.
pub async fn find(
    storage: &dyn Storage,
    session: &Session,
    lookup: &ActivityLogLookup,
) -> Result<Option<ActivityLogEntry>, DomainError> {
    let client_id = session.require_client()?;
    Ok(storage
        .find_activity_log(client_id, &lookup.original_item_id, lookup.item_type)
        .await?)
}

/// Entries of a client, visible to the client or their trainer.
pub async fn list(
    storage: &dyn Storage,
    session: &Session,
    client_id: i64,
    range: &ActivityLogRange,
) -> Result<Vec<ActivityLogEntry>, DomainError> {
    let client = access::readable_client(storage, session, client_id).await?;
    if let (Some(start), Some(end)) = (range.start, range.end) {
        if start > end {
            return Err(DomainError::invalid("end", "End date must not be before start date"));
        }
    }
    Ok(storage
        .list_activity_logs(client.id, range.start, range.end)
        .await?)
}
