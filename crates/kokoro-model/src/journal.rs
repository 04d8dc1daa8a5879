use chrono::{DateTime, FixedOffset};
use kokoro_entity::journal_entry::{Insights, Model as JournalEntryModel, ProcessingStatus};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Max characters of entry content shown in list previews.
const PREVIEW_CONTENT_CHARS: usize = 200;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateJournalEntryRequest {
    pub content: String,
    pub mood: String,
    pub timestamp: Option<DateTime<FixedOffset>>,
    pub auto_process: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateJournalEntryRequest {
    pub content: Option<String>,
    pub mood: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAffirmationRequest {
    pub style: String,
    pub tone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    pub id: String,
    pub user_id: String,
    pub content: String,
    pub mood: String,
    pub timestamp: DateTime<FixedOffset>,
    pub tags: Vec<String>,
    pub insights: Vec<String>,
    pub suggestions_available: bool,
    pub processed: bool,
    #[schema(value_type = String)]
    pub processing_status: ProcessingStatus,
}

impl From<JournalEntryModel> for JournalEntry {
    fn from(model: JournalEntryModel) -> Self {
        let suggestions_available = model.processed && !model.insights.is_empty();
        Self {
            id: model.id.to_string(),
            user_id: model.user_id.to_string(),
            content: model.content,
            mood: model.mood,
            timestamp: model.created_at,
            tags: model.tags.0,
            insights: flatten_insights(&model.insights),
            suggestions_available,
            processed: model.processed,
            processing_status: model.processing_status,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntryPreview {
    pub id: String,
    pub content: String,
    pub mood: String,
    pub timestamp: DateTime<FixedOffset>,
    pub tags: Vec<String>,
    pub insights: Vec<String>,
    pub has_affirmation: bool,
    pub has_script: bool,
}

impl From<JournalEntryModel> for JournalEntryPreview {
    fn from(model: JournalEntryModel) -> Self {
        Self {
            id: model.id.to_string(),
            content: preview_content(&model.content),
            mood: model.mood,
            timestamp: model.created_at,
            tags: model.tags.0,
            insights: flatten_insights(&model.insights),
            has_affirmation: false,
            has_script: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetEntriesResponse {
    pub entries: Vec<JournalEntryPreview>,
    pub total: u64,
    pub has_more: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProcessEntryInsights {
    #[schema(value_type = String)]
    pub status: ProcessingStatus,
    pub message: String,
    pub tags: Vec<String>,
    pub emotional_state: Option<String>,
    pub themes: Vec<String>,
    pub suggested_actions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProcessEntryResponse {
    pub insights: ProcessEntryInsights,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteEntryResponse {
    pub message: String,
    pub entry_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAffirmationResponse {
    pub affirmations: Vec<String>,
    pub style: String,
    pub tone: String,
}

/// Project the structured insights record into display lines.
/// Read-only: the stored record is never rewritten by this projection.
#[must_use]
pub fn flatten_insights(insights: &Insights) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(state) = &insights.emotional_state {
        lines.push(format!("Emotional state: {state}"));
    }
    for theme in &insights.themes {
        lines.push(format!("Theme: {theme}"));
    }
    lines
}

fn preview_content(content: &str) -> String {
    if content.chars().count() <= PREVIEW_CONTENT_CHARS {
        content.to_owned()
    } else {
        content.chars().take(PREVIEW_CONTENT_CHARS).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use kokoro_entity::journal_entry::Tags;

    fn entry_model() -> JournalEntryModel {
        let now = Utc::now().fixed_offset();
        JournalEntryModel {
            id: 7,
            user_id: 3,
            content: "Today I felt great".to_owned(),
            mood: "😊".to_owned(),
            tags: Tags(vec!["gratitude".to_owned()]),
            insights: Insights {
                emotional_state: Some("content".to_owned()),
                themes: vec!["growth".to_owned()],
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
    fn test_flatten_insights_order() {
        let model = entry_model();
        assert_eq!(
            flatten_insights(&model.insights),
            vec!["Emotional state: content".to_owned(), "Theme: growth".to_owned()]
        );
        assert!(flatten_insights(&Insights::default()).is_empty());
    }

    #[test]
    fn test_entry_projection() {
        let view = JournalEntry::from(entry_model());
        assert_eq!(view.id, "7");
        assert_eq!(view.user_id, "3");
        assert!(view.suggestions_available);
        assert_eq!(view.tags, vec!["gratitude".to_owned()]);

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["processingStatus"], "completed");
        assert_eq!(json["suggestionsAvailable"], true);
    }

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        let mut model = entry_model();
        model.content = "ä".repeat(250);
        let preview = JournalEntryPreview::from(model);
        assert_eq!(preview.content.chars().count(), 200);
    }
}
