use sea_orm::entity::prelude::*;
use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};

/// Lifecycle of the AI analysis attached to an entry.
///
/// `pending → processing → completed | failed`; a failed attempt may be
/// retried (`failed → processing`), a completed one only via an explicit
/// re-trigger.
#[derive(Debug, Copy, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "lowercase")]
pub enum ProcessingStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "processing")]
    Processing,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "failed")]
    Failed,
}

impl ProcessingStatus {
    /// Statuses from which a new processing attempt may be claimed.
    #[must_use]
    pub fn claimable(&self) -> bool {
        match self {
            Self::Pending | Self::Failed => true,
            Self::Processing | Self::Completed => false,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct Tags(pub Vec<String>);

/// Structured record produced by the analysis pipeline. Validated once at the
/// gateway boundary; every read site gets typed fields instead of a dict.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct Insights {
    pub emotional_state: Option<String>,
    #[serde(default)]
    pub themes: Vec<String>,
    #[serde(default)]
    pub suggested_actions: Vec<String>,
}

impl Insights {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.emotional_state.is_none() && self.themes.is_empty() && self.suggested_actions.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "journal_entry")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub mood: String,
    pub tags: Tags,
    pub insights: Insights,
    pub processed: bool,
    pub processing_status: ProcessingStatus,
    pub is_deleted: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claimable() {
        assert!(ProcessingStatus::Pending.claimable());
        assert!(ProcessingStatus::Failed.claimable());
        assert!(!ProcessingStatus::Processing.claimable());
        assert!(!ProcessingStatus::Completed.claimable());
    }

    #[test]
    fn test_insights_missing_fields_deserialize_empty() {
        let insights: Insights = serde_json::from_str(r#"{"emotional_state":"calm"}"#).unwrap();
        assert_eq!(insights.emotional_state.as_deref(), Some("calm"));
        assert!(insights.themes.is_empty());
        assert!(insights.suggested_actions.is_empty());
        assert!(!insights.is_empty());
        assert!(Insights::default().is_empty());
    }
}
