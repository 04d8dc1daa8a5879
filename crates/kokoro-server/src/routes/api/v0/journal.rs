pub(crate) mod error;

use crate::routes::api::v0::journal::error::JournalError;
use crate::user::ExtractUserId;
use axum::extract::{Path, Query};
use axum::response::{IntoResponse, Json};
use axum::routing::{Router, get, post};
use axum::Extension;
use http::StatusCode;
use kokoro_core::journal::{JournalService, NewEntry};
use kokoro_model::error::ErrorResponse;
use kokoro_model::journal::{
    CreateAffirmationRequest, CreateAffirmationResponse, CreateJournalEntryRequest, DeleteEntryResponse,
    GetEntriesResponse, JournalEntry, ProcessEntryResponse, UpdateJournalEntryRequest,
};
use serde::Deserialize;
use utoipa::IntoParams;

const DEFAULT_PAGE_SIZE: u64 = 20;
const MAX_PAGE_SIZE: u64 = 100;

pub(crate) fn create_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/entries", get(get_journal_entries).post(create_journal_entry))
        .route(
            "/entries/{entry_id}",
            get(get_journal_entry)
                .patch(update_journal_entry)
                .delete(delete_journal_entry),
        )
        .route("/entries/{entry_id}/process", post(process_journal_entry))
        .route("/entries/{entry_id}/create-affirmation", post(create_affirmation_from_entry))
        // Announced in the API but not implemented yet.
        .route("/entries/{entry_id}/suggestions", get(not_implemented))
        .route("/entries/{entry_id}/create-script", post(not_implemented))
        .route("/entries/{entry_id}/start-coach-session", post(not_implemented))
        .route("/stats", get(not_implemented))
        .route("/search", get(not_implemented))
        .route("/export", get(not_implemented))
        .route("/patterns", get(not_implemented))
        .route("/batch-tags", post(not_implemented))
        .with_state(())
}

#[derive(Debug, Deserialize, IntoParams)]
pub(crate) struct EntriesQuery {
    /// Time-based filter; accepted for API compatibility, currently unused.
    #[allow(dead_code)]
    filter: Option<String>,
    limit: Option<u64>,
    offset: Option<u64>,
    /// Content search; accepted for API compatibility, currently unused.
    #[allow(dead_code)]
    search: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/v0/journal/entries",
    request_body = CreateJournalEntryRequest,
    responses(
        (status = CREATED, description = "Entry created", body = JournalEntry),
        (status = BAD_REQUEST, description = "Missing content or mood", body = ErrorResponse),
    ),
    tag = "v0/journal",
    security(
        ("token" = [])
    )
)]
pub(crate) async fn create_journal_entry(
    ExtractUserId(user): ExtractUserId,
    Extension(service): Extension<JournalService>,
    Json(body): Json<CreateJournalEntryRequest>,
) -> Result<impl IntoResponse, JournalError> {
    let entry = service
        .create(
            user,
            NewEntry {
                content: body.content,
                mood: body.mood,
                auto_process: body.auto_process.unwrap_or(true),
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(entry)))
}

#[utoipa::path(
    get,
    path = "/api/v0/journal/entries",
    params(EntriesQuery),
    responses(
        (status = OK, description = "Page of journal entries", body = GetEntriesResponse),
    ),
    tag = "v0/journal",
    security(
        ("token" = [])
    )
)]
pub(crate) async fn get_journal_entries(
    ExtractUserId(user): ExtractUserId,
    Query(query): Query<EntriesQuery>,
    Extension(service): Extension<JournalService>,
) -> Result<impl IntoResponse, JournalError> {
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    let offset = query.offset.unwrap_or(0);

    let page = service.list(user, limit, offset).await?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/api/v0/journal/entries/{entry_id}",
    responses(
        (status = OK, description = "Journal entry details", body = JournalEntry),
        (status = NOT_FOUND, description = "Entry not found", body = ErrorResponse),
    ),
    tag = "v0/journal",
    security(
        ("token" = [])
    )
)]
pub(crate) async fn get_journal_entry(
    ExtractUserId(user): ExtractUserId,
    Path(entry_id): Path<i64>,
    Extension(service): Extension<JournalService>,
) -> Result<impl IntoResponse, JournalError> {
    let entry = service.get(user, entry_id).await?;
    Ok(Json(entry))
}

#[utoipa::path(
    patch,
    path = "/api/v0/journal/entries/{entry_id}",
    request_body = UpdateJournalEntryRequest,
    responses(
        (status = OK, description = "Updated entry with derived fields reset", body = JournalEntry),
        (status = NOT_FOUND, description = "Entry not found", body = ErrorResponse),
    ),
    tag = "v0/journal",
    security(
        ("token" = [])
    )
)]
pub(crate) async fn update_journal_entry(
    ExtractUserId(user): ExtractUserId,
    Path(entry_id): Path<i64>,
    Extension(service): Extension<JournalService>,
    Json(body): Json<UpdateJournalEntryRequest>,
) -> Result<impl IntoResponse, JournalError> {
    let entry = service.update(user, entry_id, body.content, body.mood).await?;
    Ok(Json(entry))
}

#[utoipa::path(
    delete,
    path = "/api/v0/journal/entries/{entry_id}",
    responses(
        (status = OK, description = "Entry deleted", body = DeleteEntryResponse),
        (status = NOT_FOUND, description = "Entry not found", body = ErrorResponse),
    ),
    tag = "v0/journal",
    security(
        ("token" = [])
    )
)]
pub(crate) async fn delete_journal_entry(
    ExtractUserId(user): ExtractUserId,
    Path(entry_id): Path<i64>,
    Extension(service): Extension<JournalService>,
) -> Result<impl IntoResponse, JournalError> {
    let response = service.delete(user, entry_id).await?;
    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/api/v0/journal/entries/{entry_id}/process",
    responses(
        (status = OK, description = "Processing status and any available insights", body = ProcessEntryResponse),
        (status = NOT_FOUND, description = "Entry not found", body = ErrorResponse),
    ),
    tag = "v0/journal",
    security(
        ("token" = [])
    )
)]
pub(crate) async fn process_journal_entry(
    ExtractUserId(user): ExtractUserId,
    Path(entry_id): Path<i64>,
    Extension(service): Extension<JournalService>,
) -> Result<impl IntoResponse, JournalError> {
    let response = service.process(user, entry_id).await?;
    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/api/v0/journal/entries/{entry_id}/create-affirmation",
    request_body = CreateAffirmationRequest,
    responses(
        (status = CREATED, description = "Generated affirmations", body = CreateAffirmationResponse),
        (status = BAD_REQUEST, description = "Entry has not been processed yet", body = ErrorResponse),
        (status = NOT_FOUND, description = "Entry not found", body = ErrorResponse),
    ),
    tag = "v0/journal",
    security(
        ("token" = [])
    )
)]
pub(crate) async fn create_affirmation_from_entry(
    ExtractUserId(user): ExtractUserId,
    Path(entry_id): Path<i64>,
    Extension(service): Extension<JournalService>,
    Json(body): Json<CreateAffirmationRequest>,
) -> Result<impl IntoResponse, JournalError> {
    let response = service
        .create_affirmation(user, entry_id, &body.style, &body.tone)
        .await?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub(crate) async fn not_implemented(ExtractUserId(_user): ExtractUserId) -> impl IntoResponse {
    (
        StatusCode::NOT_IMPLEMENTED,
        Json(ErrorResponse::new("Not implemented")),
    )
}
