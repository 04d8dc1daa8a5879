use crate::journal_entry::Query;
use chrono::{DateTime, FixedOffset, Utc};
use kokoro_entity::journal_entry::{
    self, Entity as JournalEntry, Insights, Model as JournalEntryModel, ProcessingStatus, Tags,
};
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter};
use std::error::Error;

pub struct Mutation;

impl Mutation {
    pub async fn create<C: ConnectionTrait>(
        conn: &C,
        user_id: i64,
        content: String,
        mood: String,
    ) -> Result<JournalEntryModel, DbErr> {
        let now = Utc::now().fixed_offset();
        let entry = journal_entry::ActiveModel {
            id: NotSet,
            user_id: Set(user_id),
            content: Set(content),
            mood: Set(mood),
            tags: Set(Tags::default()),
            insights: Set(Insights::default()),
            processed: Set(false),
            processing_status: Set(ProcessingStatus::Pending),
            is_deleted: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
        };

        entry
            .insert(conn)
            .await
            .inspect_err(|error| tracing::error!(error = error as &dyn Error, "failed to create journal entry"))
    }

    /// Apply a content/mood edit. Edited text invalidates the derived AI
    /// fields, so tags and insights are cleared and the status drops back to
    /// `pending`. Returns the updated entry, or `None` when no visible entry
    /// matches the owner.
    pub async fn update_content<C: ConnectionTrait>(
        conn: &C,
        user_id: i64,
        entry_id: i64,
        content: Option<String>,
        mood: Option<String>,
    ) -> Result<Option<JournalEntryModel>, DbErr> {
        let update = journal_entry::ActiveModel {
            id: NotSet,
            user_id: NotSet,
            content: content.map_or(NotSet, Set),
            mood: mood.map_or(NotSet, Set),
            tags: Set(Tags::default()),
            insights: Set(Insights::default()),
            processed: Set(false),
            processing_status: Set(ProcessingStatus::Pending),
            is_deleted: NotSet,
            created_at: NotSet,
            updated_at: Set(Utc::now().fixed_offset()),
        };

        let res = JournalEntry::update_many()
            .set(update)
            .filter(journal_entry::Column::Id.eq(entry_id))
            .filter(journal_entry::Column::UserId.eq(user_id))
            .filter(journal_entry::Column::IsDeleted.eq(false))
            .exec(conn)
            .await
            .inspect_err(|error| tracing::error!(error = error as &dyn Error, "failed to update journal entry"))?;

        if res.rows_affected == 0 {
            return Ok(None);
        }
        Query::find(conn, user_id, entry_id).await
    }

    pub async fn soft_delete<C: ConnectionTrait>(conn: &C, user_id: i64, entry_id: i64) -> Result<bool, DbErr> {
        let update = journal_entry::ActiveModel {
            is_deleted: Set(true),
            updated_at: Set(Utc::now().fixed_offset()),
            ..Default::default()
        };

        let res = JournalEntry::update_many()
            .set(update)
            .filter(journal_entry::Column::Id.eq(entry_id))
            .filter(journal_entry::Column::UserId.eq(user_id))
            .filter(journal_entry::Column::IsDeleted.eq(false))
            .exec(conn)
            .await
            .inspect_err(|error| tracing::error!(error = error as &dyn Error, "failed to delete journal entry"))?;

        Ok(res.rows_affected == 1)
    }

    /// Claim an entry for a processing attempt: `pending | failed →
    /// processing`. The status filter makes the claim a compare-and-swap, so
    /// of two concurrent triggers exactly one wins and the loser sees `false`.
    pub async fn claim_for_processing<C: ConnectionTrait>(
        conn: &C,
        user_id: i64,
        entry_id: i64,
    ) -> Result<bool, DbErr> {
        let update = journal_entry::ActiveModel {
            processing_status: Set(ProcessingStatus::Processing),
            updated_at: Set(Utc::now().fixed_offset()),
            ..Default::default()
        };

        let res = JournalEntry::update_many()
            .set(update)
            .filter(journal_entry::Column::Id.eq(entry_id))
            .filter(journal_entry::Column::UserId.eq(user_id))
            .filter(journal_entry::Column::IsDeleted.eq(false))
            .filter(
                journal_entry::Column::ProcessingStatus
                    .is_in([ProcessingStatus::Pending, ProcessingStatus::Failed]),
            )
            .exec(conn)
            .await
            .inspect_err(|error| {
                tracing::error!(error = error as &dyn Error, "failed to claim journal entry for processing");
            })?;

        Ok(res.rows_affected == 1)
    }

    /// Land a successful analysis: `processing → completed`. Guarded on the
    /// in-flight status so a concurrent edit that already reset the entry to
    /// `pending` is not overwritten with stale results.
    pub async fn complete_processing<C: ConnectionTrait>(
        conn: &C,
        user_id: i64,
        entry_id: i64,
        tags: Tags,
        insights: Insights,
    ) -> Result<bool, DbErr> {
        let update = journal_entry::ActiveModel {
            tags: Set(tags),
            insights: Set(insights),
            processed: Set(true),
            processing_status: Set(ProcessingStatus::Completed),
            updated_at: Set(Utc::now().fixed_offset()),
            ..Default::default()
        };

        let res = JournalEntry::update_many()
            .set(update)
            .filter(journal_entry::Column::Id.eq(entry_id))
            .filter(journal_entry::Column::UserId.eq(user_id))
            .filter(journal_entry::Column::ProcessingStatus.eq(ProcessingStatus::Processing))
            .exec(conn)
            .await
            .inspect_err(|error| {
                tracing::error!(error = error as &dyn Error, "failed to record journal analysis result");
            })?;

        Ok(res.rows_affected == 1)
    }

    /// Resolve a failed attempt: `processing → failed`. The derived fields
    /// keep whatever they held before the attempt.
    pub async fn fail_processing<C: ConnectionTrait>(conn: &C, user_id: i64, entry_id: i64) -> Result<bool, DbErr> {
        let update = journal_entry::ActiveModel {
            processing_status: Set(ProcessingStatus::Failed),
            updated_at: Set(Utc::now().fixed_offset()),
            ..Default::default()
        };

        let res = JournalEntry::update_many()
            .set(update)
            .filter(journal_entry::Column::Id.eq(entry_id))
            .filter(journal_entry::Column::UserId.eq(user_id))
            .filter(journal_entry::Column::ProcessingStatus.eq(ProcessingStatus::Processing))
            .exec(conn)
            .await
            .inspect_err(|error| {
                tracing::error!(error = error as &dyn Error, "failed to mark journal entry as failed");
            })?;

        Ok(res.rows_affected == 1)
    }

    /// Refresh the `updated_at` stamp of an entry stuck in `processing`.
    /// Guarded on the stale timestamp, so concurrent recovery sweeps cannot
    /// both requeue the same entry.
    pub async fn touch_processing<C: ConnectionTrait>(
        conn: &C,
        entry_id: i64,
        stale_before: DateTime<FixedOffset>,
    ) -> Result<bool, DbErr> {
        let update = journal_entry::ActiveModel {
            updated_at: Set(Utc::now().fixed_offset()),
            ..Default::default()
        };

        let res = JournalEntry::update_many()
            .set(update)
            .filter(journal_entry::Column::Id.eq(entry_id))
            .filter(journal_entry::Column::ProcessingStatus.eq(ProcessingStatus::Processing))
            .filter(journal_entry::Column::UpdatedAt.lt(stale_before))
            .exec(conn)
            .await
            .inspect_err(|error| {
                tracing::error!(error = error as &dyn Error, "failed to requeue stale journal entry");
            })?;

        Ok(res.rows_affected == 1)
    }
}
