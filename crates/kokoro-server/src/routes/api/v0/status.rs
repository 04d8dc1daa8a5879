use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Extension, Json, Router};
use http::StatusCode;
use kokoro_core::status::get_db_status;
use kokoro_db::sea_orm::DatabaseConnection;
use kokoro_model::status::ComponentStatus;
use serde_json::json;
use tracing::instrument;

pub(crate) fn create_router<S>() -> Router<S> {
    Router::new().route("/", get(get_status)).with_state(())
}

struct Status {
    database: ComponentStatus,
}

impl IntoResponse for Status {
    fn into_response(self) -> Response {
        let status_code = if self.database.is_ok() {
            StatusCode::OK
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        let body = kokoro_model::status::Status {
            database: self.database.into_message(),
        };
        (status_code, Json(body)).into_response()
    }
}

#[utoipa::path(
    get,
    path = "/api/v0/status",
    responses(
        (status = OK, description = "Server is ok", body = kokoro_model::status::Status, example = json!({ "database": "ok" })),
    ),
    tag = "util"
)]
#[instrument(skip_all)]
pub(crate) async fn get_status(Extension(conn): Extension<DatabaseConnection>) -> impl IntoResponse {
    Status {
        database: get_db_status(&conn, None).await,
    }
}
