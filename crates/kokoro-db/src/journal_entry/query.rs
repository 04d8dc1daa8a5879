use kokoro_entity::journal_entry::{self, Entity as JournalEntry, Model as JournalEntryModel, ProcessingStatus};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};
use std::error::Error;

pub struct Query;

impl Query {
    /// Find a single entry scoped to its owner. Soft-deleted entries and
    /// entries of other users are indistinguishable from missing ones.
    pub async fn find<C: ConnectionTrait>(
        conn: &C,
        user_id: i64,
        entry_id: i64,
    ) -> Result<Option<JournalEntryModel>, DbErr> {
        JournalEntry::find_by_id(entry_id)
            .filter(journal_entry::Column::UserId.eq(user_id))
            .filter(journal_entry::Column::IsDeleted.eq(false))
            .one(conn)
            .await
            .inspect_err(|error| tracing::error!(error = error as &dyn Error, "failed to load journal entry"))
    }

    /// Newest-first page of a user's entries plus the total count.
    pub async fn list<C: ConnectionTrait>(
        conn: &C,
        user_id: i64,
        limit: u64,
        offset: u64,
    ) -> Result<(Vec<JournalEntryModel>, u64), DbErr> {
        let filtered = JournalEntry::find()
            .filter(journal_entry::Column::UserId.eq(user_id))
            .filter(journal_entry::Column::IsDeleted.eq(false));

        let total = filtered
            .clone()
            .count(conn)
            .await
            .inspect_err(|error| tracing::error!(error = error as &dyn Error, "failed to count journal entries"))?;

        let entries = filtered
            .order_by_desc(journal_entry::Column::CreatedAt)
            .order_by_desc(journal_entry::Column::Id)
            .limit(limit)
            .offset(offset)
            .all(conn)
            .await
            .inspect_err(|error| tracing::error!(error = error as &dyn Error, "failed to load journal entries"))?;

        Ok((entries, total))
    }

    /// Entries that claim to be in flight but have not been touched since
    /// `stale_before`. Candidates for the recovery sweep.
    pub async fn find_stale_processing<C: ConnectionTrait>(
        conn: &C,
        stale_before: chrono::DateTime<chrono::FixedOffset>,
    ) -> Result<Vec<JournalEntryModel>, DbErr> {
        JournalEntry::find()
            .filter(journal_entry::Column::ProcessingStatus.eq(ProcessingStatus::Processing))
            .filter(journal_entry::Column::UpdatedAt.lt(stale_before))
            .filter(journal_entry::Column::IsDeleted.eq(false))
            .all(conn)
            .await
            .inspect_err(|error| tracing::error!(error = error as &dyn Error, "failed to load stale journal entries"))
    }
}
