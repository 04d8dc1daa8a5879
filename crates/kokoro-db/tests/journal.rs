mod common;

use crate::common::{connect, create_test_user};
use chrono::{Duration, Utc};
use kokoro_db::journal_entry::{Mutation, Query};
use kokoro_entity::journal_entry::{self, Insights, ProcessingStatus, Tags};
use sea_orm::ActiveValue::Set;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use test_log::test;

#[test(tokio::test)]
async fn test_create_entry_defaults() {
    let db = connect().await;
    let user = create_test_user(&db).await;

    let entry = Mutation::create(&db, user.id, "Today I felt great".to_owned(), "😊".to_owned())
        .await
        .unwrap();

    assert_eq!(entry.processing_status, ProcessingStatus::Pending);
    assert!(!entry.processed);
    assert!(!entry.is_deleted);
    assert_eq!(entry.tags, Tags::default());
    assert!(entry.insights.is_empty());
}

#[test(tokio::test)]
async fn test_claim_is_exclusive() {
    let db = connect().await;
    let user = create_test_user(&db).await;
    let entry = Mutation::create(&db, user.id, "content".to_owned(), "🙂".to_owned())
        .await
        .unwrap();

    assert!(Mutation::claim_for_processing(&db, user.id, entry.id).await.unwrap());
    // The second trigger loses the compare-and-swap.
    assert!(!Mutation::claim_for_processing(&db, user.id, entry.id).await.unwrap());

    let entry = Query::find(&db, user.id, entry.id).await.unwrap().unwrap();
    assert_eq!(entry.processing_status, ProcessingStatus::Processing);
}

#[test(tokio::test)]
async fn test_complete_records_results() {
    let db = connect().await;
    let user = create_test_user(&db).await;
    let entry = Mutation::create(&db, user.id, "content".to_owned(), "🙂".to_owned())
        .await
        .unwrap();

    assert!(Mutation::claim_for_processing(&db, user.id, entry.id).await.unwrap());

    let tags = Tags(vec!["gratitude".to_owned()]);
    let insights = Insights {
        emotional_state: Some("content".to_owned()),
        themes: vec!["growth".to_owned()],
        suggested_actions: vec!["affirmation".to_owned()],
    };
    assert!(
        Mutation::complete_processing(&db, user.id, entry.id, tags.clone(), insights.clone())
            .await
            .unwrap()
    );

    let entry = Query::find(&db, user.id, entry.id).await.unwrap().unwrap();
    assert_eq!(entry.processing_status, ProcessingStatus::Completed);
    assert!(entry.processed);
    assert_eq!(entry.tags, tags);
    assert_eq!(entry.insights, insights);
}

#[test(tokio::test)]
async fn test_complete_requires_in_flight_status() {
    let db = connect().await;
    let user = create_test_user(&db).await;
    let entry = Mutation::create(&db, user.id, "content".to_owned(), "🙂".to_owned())
        .await
        .unwrap();

    // No claim happened, so the guarded update must not apply.
    assert!(
        !Mutation::complete_processing(&db, user.id, entry.id, Tags::default(), Insights::default())
            .await
            .unwrap()
    );

    let entry = Query::find(&db, user.id, entry.id).await.unwrap().unwrap();
    assert_eq!(entry.processing_status, ProcessingStatus::Pending);
    assert!(!entry.processed);
}

#[test(tokio::test)]
async fn test_failed_attempt_is_retriable() {
    let db = connect().await;
    let user = create_test_user(&db).await;
    let entry = Mutation::create(&db, user.id, "content".to_owned(), "🙂".to_owned())
        .await
        .unwrap();

    assert!(Mutation::claim_for_processing(&db, user.id, entry.id).await.unwrap());
    assert!(Mutation::fail_processing(&db, user.id, entry.id).await.unwrap());

    let failed = Query::find(&db, user.id, entry.id).await.unwrap().unwrap();
    assert_eq!(failed.processing_status, ProcessingStatus::Failed);
    assert!(!failed.processed);
    assert_eq!(failed.tags, Tags::default());

    // failed → processing is a legal retry transition.
    assert!(Mutation::claim_for_processing(&db, user.id, entry.id).await.unwrap());
}

#[test(tokio::test)]
async fn test_update_resets_derived_fields() {
    let db = connect().await;
    let user = create_test_user(&db).await;
    let entry = Mutation::create(&db, user.id, "old content".to_owned(), "🙂".to_owned())
        .await
        .unwrap();

    Mutation::claim_for_processing(&db, user.id, entry.id).await.unwrap();
    Mutation::complete_processing(
        &db,
        user.id,
        entry.id,
        Tags(vec!["gratitude".to_owned()]),
        Insights {
            emotional_state: Some("content".to_owned()),
            ..Insights::default()
        },
    )
    .await
    .unwrap();

    let updated = Mutation::update_content(&db, user.id, entry.id, Some("new content".to_owned()), None)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.content, "new content");
    assert_eq!(updated.mood, "🙂");
    assert_eq!(updated.processing_status, ProcessingStatus::Pending);
    assert!(!updated.processed);
    assert_eq!(updated.tags, Tags::default());
    assert!(updated.insights.is_empty());
}

#[test(tokio::test)]
async fn test_cross_user_access_reports_not_found() {
    let db = connect().await;
    let owner = create_test_user(&db).await;
    let other = create_test_user(&db).await;
    let entry = Mutation::create(&db, owner.id, "private".to_owned(), "🙂".to_owned())
        .await
        .unwrap();

    assert!(Query::find(&db, other.id, entry.id).await.unwrap().is_none());
    assert!(
        Mutation::update_content(&db, other.id, entry.id, Some("stolen".to_owned()), None)
            .await
            .unwrap()
            .is_none()
    );
    assert!(!Mutation::soft_delete(&db, other.id, entry.id).await.unwrap());
    assert!(!Mutation::claim_for_processing(&db, other.id, entry.id).await.unwrap());

    // The owner still sees the untouched entry.
    let entry = Query::find(&db, owner.id, entry.id).await.unwrap().unwrap();
    assert_eq!(entry.content, "private");
}

#[test(tokio::test)]
async fn test_soft_delete_hides_entry() {
    let db = connect().await;
    let user = create_test_user(&db).await;
    let entry = Mutation::create(&db, user.id, "content".to_owned(), "🙂".to_owned())
        .await
        .unwrap();

    assert!(Mutation::soft_delete(&db, user.id, entry.id).await.unwrap());
    assert!(Query::find(&db, user.id, entry.id).await.unwrap().is_none());
    // Idempotent from the caller's view: the second delete reports not found.
    assert!(!Mutation::soft_delete(&db, user.id, entry.id).await.unwrap());

    let (entries, total) = Query::list(&db, user.id, 20, 0).await.unwrap();
    assert!(entries.is_empty());
    assert_eq!(total, 0);
}

#[test(tokio::test)]
async fn test_list_is_paginated_newest_first() {
    let db = connect().await;
    let user = create_test_user(&db).await;
    for i in 0..3 {
        Mutation::create(&db, user.id, format!("entry {i}"), "🙂".to_owned())
            .await
            .unwrap();
    }

    let (page, total) = Query::list(&db, user.id, 2, 0).await.unwrap();
    assert_eq!(total, 3);
    assert_eq!(page.len(), 2);
    assert_eq!(page[0].content, "entry 2");
    assert_eq!(page[1].content, "entry 1");

    let (rest, total) = Query::list(&db, user.id, 2, 2).await.unwrap();
    assert_eq!(total, 3);
    assert_eq!(rest.len(), 1);
    assert_eq!(rest[0].content, "entry 0");
}

#[test(tokio::test)]
async fn test_stale_processing_requeue_guard() {
    let db = connect().await;
    let user = create_test_user(&db).await;
    let entry = Mutation::create(&db, user.id, "content".to_owned(), "🙂".to_owned())
        .await
        .unwrap();
    Mutation::claim_for_processing(&db, user.id, entry.id).await.unwrap();

    let cutoff = Utc::now().fixed_offset() - Duration::minutes(10);
    assert!(Query::find_stale_processing(&db, cutoff).await.unwrap().is_empty());
    assert!(!Mutation::touch_processing(&db, entry.id, cutoff).await.unwrap());

    // Backdate the attempt so it looks abandoned.
    let stale_stamp = Utc::now().fixed_offset() - Duration::minutes(30);
    journal_entry::Entity::update_many()
        .set(journal_entry::ActiveModel {
            updated_at: Set(stale_stamp),
            ..Default::default()
        })
        .filter(journal_entry::Column::Id.eq(entry.id))
        .exec(&db)
        .await
        .unwrap();

    let stale = Query::find_stale_processing(&db, cutoff).await.unwrap();
    assert_eq!(stale.len(), 1);
    // Exactly one sweep wins the requeue; the touch refreshes the stamp, so a
    // concurrent sweep with the same cutoff loses.
    assert!(Mutation::touch_processing(&db, entry.id, cutoff).await.unwrap());
    assert!(!Mutation::touch_processing(&db, entry.id, cutoff).await.unwrap());
}
