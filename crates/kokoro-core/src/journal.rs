pub mod error;
pub mod process;

use crate::dispatch::{Dispatcher, Job};
use crate::gateway::{AFFIRMATION_COUNT, Gateway};
use crate::journal::error::ServiceError;
use kokoro_db::{journal_entry, user_settings};
use kokoro_entity::journal_entry::{Model as JournalEntryModel, ProcessingStatus};
use kokoro_entity::user_settings::Model as UserSettingsModel;
use kokoro_model::journal::{
    CreateAffirmationResponse, DeleteEntryResponse, GetEntriesResponse, JournalEntry, ProcessEntryInsights,
    ProcessEntryResponse,
};
use sea_orm::DatabaseConnection;
use std::error::Error;
use std::sync::Arc;
use tracing::instrument;

#[derive(Debug, Clone)]
pub struct NewEntry {
    pub content: String,
    pub mood: String,
    pub auto_process: bool,
}

/// Orchestrates the entry store, the LLM gateway and the background
/// dispatcher. Every collaborator is injected; the service holds no global
/// state beyond its own handles.
#[derive(Clone)]
pub struct JournalService {
    conn: DatabaseConnection,
    gateway: Arc<dyn Gateway>,
    dispatcher: Dispatcher,
}

impl JournalService {
    #[must_use]
    pub fn new(conn: DatabaseConnection, gateway: Arc<dyn Gateway>, dispatcher: Dispatcher) -> Self {
        Self {
            conn,
            gateway,
            dispatcher,
        }
    }

    /// Create an entry. With `auto_process` the status is claimed and the
    /// analysis job scheduled before returning, so the caller may already see
    /// `processing`. That means "accepted for processing", not "processed".
    #[instrument(skip(self, new_entry))]
    pub async fn create(&self, user_id: i64, new_entry: NewEntry) -> Result<JournalEntry, ServiceError> {
        if new_entry.content.trim().is_empty() || new_entry.mood.trim().is_empty() {
            return Err(ServiceError::InvalidInput("Content and mood are required"));
        }

        let mut entry = journal_entry::Mutation::create(&self.conn, user_id, new_entry.content, new_entry.mood).await?;
        tracing::debug!(entry_id = entry.id, "journal entry created");

        if new_entry.auto_process && journal_entry::Mutation::claim_for_processing(&self.conn, user_id, entry.id).await?
        {
            entry.processing_status = ProcessingStatus::Processing;
            self.schedule_processing(user_id, entry.id);
        }

        Ok(entry.into())
    }

    #[instrument(skip(self))]
    pub async fn list(&self, user_id: i64, limit: u64, offset: u64) -> Result<GetEntriesResponse, ServiceError> {
        let (entries, total) = journal_entry::Query::list(&self.conn, user_id, limit, offset).await?;

        Ok(GetEntriesResponse {
            entries: entries.into_iter().map(Into::into).collect(),
            total,
            has_more: offset + limit < total,
        })
    }

    #[instrument(skip(self))]
    pub async fn get(&self, user_id: i64, entry_id: i64) -> Result<JournalEntry, ServiceError> {
        let entry = journal_entry::Query::find(&self.conn, user_id, entry_id)
            .await?
            .ok_or(ServiceError::NotFound)?;
        Ok(entry.into())
    }

    #[instrument(skip(self, content, mood))]
    pub async fn update(
        &self,
        user_id: i64,
        entry_id: i64,
        content: Option<String>,
        mood: Option<String>,
    ) -> Result<JournalEntry, ServiceError> {
        if content.as_deref().is_some_and(|content| content.trim().is_empty())
            || mood.as_deref().is_some_and(|mood| mood.trim().is_empty())
        {
            return Err(ServiceError::InvalidInput("Content and mood must not be empty"));
        }

        let entry = journal_entry::Mutation::update_content(&self.conn, user_id, entry_id, content, mood)
            .await?
            .ok_or(ServiceError::NotFound)?;
        tracing::debug!(entry_id, "journal entry updated, derived fields reset");
        Ok(entry.into())
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, user_id: i64, entry_id: i64) -> Result<DeleteEntryResponse, ServiceError> {
        if !journal_entry::Mutation::soft_delete(&self.conn, user_id, entry_id).await? {
            return Err(ServiceError::NotFound);
        }
        Ok(DeleteEntryResponse {
            message: "Entry deleted successfully".to_owned(),
            entry_id: entry_id.to_string(),
        })
    }

    /// Explicit processing trigger. Idempotent while an attempt is in flight:
    /// the claim is a compare-and-swap, so a concurrent trigger cannot queue
    /// a second job, it only reports the current status.
    #[instrument(skip(self))]
    pub async fn process(&self, user_id: i64, entry_id: i64) -> Result<ProcessEntryResponse, ServiceError> {
        let entry = journal_entry::Query::find(&self.conn, user_id, entry_id)
            .await?
            .ok_or(ServiceError::NotFound)?;

        let (status, message) = match entry.processing_status {
            ProcessingStatus::Completed => (ProcessingStatus::Completed, "Entry has already been processed"),
            ProcessingStatus::Processing => (ProcessingStatus::Processing, "Entry is currently being processed"),
            ProcessingStatus::Pending | ProcessingStatus::Failed => {
                if journal_entry::Mutation::claim_for_processing(&self.conn, user_id, entry_id).await? {
                    self.schedule_processing(user_id, entry_id);
                    tracing::info!(entry_id, "entry queued for processing");
                    (ProcessingStatus::Processing, "Entry queued for AI processing")
                } else {
                    // Lost the race against a concurrent trigger.
                    (ProcessingStatus::Processing, "Entry is currently being processed")
                }
            }
        };

        Ok(ProcessEntryResponse {
            insights: ProcessEntryInsights {
                status,
                message: message.to_owned(),
                tags: if entry.processed { entry.tags.0 } else { Vec::new() },
                emotional_state: entry.insights.emotional_state.filter(|_| entry.processed),
                themes: if entry.processed { entry.insights.themes } else { Vec::new() },
                suggested_actions: if entry.processed {
                    entry.insights.suggested_actions
                } else {
                    Vec::new()
                },
            },
        })
    }

    /// Generate affirmations from a processed entry. Requires the analysis to
    /// have landed; the textual context is built from the entry plus its
    /// insights and, when present, the user's onboarding preferences.
    #[instrument(skip(self, style, tone))]
    pub async fn create_affirmation(
        &self,
        user_id: i64,
        entry_id: i64,
        style: &str,
        tone: &str,
    ) -> Result<CreateAffirmationResponse, ServiceError> {
        let entry = journal_entry::Query::find(&self.conn, user_id, entry_id)
            .await?
            .ok_or(ServiceError::NotFound)?;

        if !entry.processed || entry.insights.is_empty() {
            return Err(ServiceError::InvalidState(
                "Entry must be processed before creating affirmations",
            ));
        }

        let settings = user_settings::Query::find(&self.conn, user_id).await?;
        let context = build_affirmation_context(&entry, settings.as_ref());

        let affirmations = self
            .gateway
            .generate_affirmations(&context, AFFIRMATION_COUNT, style, tone)
            .await
            .map_err(ServiceError::Gateway)?;

        Ok(CreateAffirmationResponse {
            affirmations,
            style: style.to_owned(),
            tone: tone.to_owned(),
        })
    }

    fn schedule_processing(&self, user_id: i64, entry_id: i64) {
        if let Err(error) = self.dispatcher.schedule(Job::ProcessEntry { entry_id, user_id }) {
            // The entry stays claimed; the recovery sweep picks it up once it
            // goes stale.
            tracing::error!(error = &error as &dyn Error, entry_id, "failed to schedule analysis job");
        }
    }
}

fn build_affirmation_context(entry: &JournalEntryModel, settings: Option<&UserSettingsModel>) -> String {
    let mut parts = vec![format!("Journal entry: {}", entry.content)];

    if let Some(state) = &entry.insights.emotional_state {
        parts.push(format!("Emotional state: {state}"));
    }
    if !entry.insights.themes.is_empty() {
        parts.push(format!("Themes: {}", entry.insights.themes.join(", ")));
    }
    if !entry.insights.suggested_actions.is_empty() {
        parts.push(format!(
            "Suggested focus areas: {}",
            entry.insights.suggested_actions.join(", ")
        ));
    }
    if let Some(settings) = settings {
        if !settings.preferences.focus_areas.is_empty() {
            parts.push(format!(
                "Personal focus areas: {}",
                settings.preferences.focus_areas.join(", ")
            ));
        }
    }

    parts.join(" | ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use kokoro_entity::journal_entry::{Insights, Tags};
    use kokoro_entity::user_settings::Preferences;

    fn processed_entry() -> JournalEntryModel {
        let now = Utc::now().fixed_offset();
        JournalEntryModel {
            id: 1,
            user_id: 1,
            content: "Today I felt great".to_owned(),
            mood: "😊".to_owned(),
            tags: Tags(vec!["gratitude".to_owned()]),
            insights: Insights {
                emotional_state: Some("content".to_owned()),
                themes: vec!["growth".to_owned(), "work".to_owned()],
                suggested_actions: vec!["affirmation".to_owned()],
            },
            processed: true,
            processing_status: ProcessingStatus::Completed,
            is_deleted: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_affirmation_context_includes_insights() {
        let context = build_affirmation_context(&processed_entry(), None);
        assert_eq!(
            context,
            "Journal entry: Today I felt great | Emotional state: content | Themes: growth, work | Suggested focus areas: affirmation"
        );
    }

    #[test]
    fn test_affirmation_context_includes_preferences() {
        let settings = UserSettingsModel {
            user_id: 1,
            onboarding_completed: true,
            preferences: Preferences {
                focus_areas: vec!["career".to_owned()],
                ..Preferences::default()
            },
        };
        let context = build_affirmation_context(&processed_entry(), Some(&settings));
        assert!(context.ends_with("Personal focus areas: career"));
    }
}
