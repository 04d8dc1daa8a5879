use crate::gateway::Gateway;
use kokoro_db::journal_entry::{Mutation, Query};
use kokoro_entity::journal_entry::ProcessingStatus;
use sea_orm::DatabaseConnection;
use std::error::Error;
use tracing::instrument;

/// Run one processing attempt for a claimed entry. This is the background
/// half of the state machine: the entry is already in `processing` (the
/// claim happened before dispatch) and there is no caller left to receive an
/// error, so every failure resolves into the `failed` state and the terminal
/// status is the error report.
#[instrument(skip(conn, gateway))]
pub async fn process_entry(conn: &DatabaseConnection, gateway: &dyn Gateway, entry_id: i64, user_id: i64) {
    let entry = match Query::find(conn, user_id, entry_id).await {
        Ok(Some(entry)) => entry,
        Ok(None) => {
            tracing::error!(entry_id, "journal entry disappeared before processing");
            return;
        }
        Err(error) => {
            tracing::error!(error = &error as &dyn Error, entry_id, "failed to load journal entry for processing");
            return;
        }
    };

    if entry.processing_status != ProcessingStatus::Processing {
        // An edit reset the entry after the claim; its analysis would be
        // stale the moment it lands.
        tracing::warn!(entry_id, status = ?entry.processing_status, "skipping job for entry that is no longer claimed");
        return;
    }

    match gateway.analyze(&entry.content, &entry.mood).await {
        Ok(analysis) => {
            let (tags, insights) = analysis.into_parts();
            match Mutation::complete_processing(conn, user_id, entry_id, tags, insights).await {
                Ok(true) => tracing::info!(entry_id, "journal entry processed"),
                Ok(false) => {
                    tracing::warn!(entry_id, "analysis result discarded, entry state changed mid-flight");
                }
                Err(error) => {
                    tracing::error!(error = &error as &dyn Error, entry_id, "failed to record analysis result");
                }
            }
        }
        Err(error) => {
            tracing::warn!(error = &error as &dyn Error, entry_id, "journal analysis failed");
            match Mutation::fail_processing(conn, user_id, entry_id).await {
                Ok(true) => {}
                Ok(false) => tracing::warn!(entry_id, "entry state changed mid-flight, failure not recorded"),
                Err(error) => {
                    tracing::error!(error = &error as &dyn Error, entry_id, "failed to mark journal entry as failed");
                }
            }
        }
    }
}
