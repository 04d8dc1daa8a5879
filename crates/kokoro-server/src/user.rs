use axum::extract::FromRequestParts;
use axum::{Extension, RequestPartsExt};
use axum_extra::TypedHeader;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;
use http::StatusCode;
use http::request::Parts;
use kokoro_db::sea_orm::DatabaseConnection;
use kokoro_db::user;
use std::error::Error;

type Rejection = (StatusCode, &'static str);

/// Resolves the bearer token to the owning user's id. Every failure ends the
/// request with 401/500 before any journal code runs.
#[derive(Clone, Copy)]
pub(crate) struct ExtractUserId(pub i64);

impl<S> FromRequestParts<S> for ExtractUserId
where
    S: Send + Sync,
{
    type Rejection = Rejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| (StatusCode::UNAUTHORIZED, "No authentication token provided"))?;

        let Extension::<DatabaseConnection>(conn) =
            parts
                .extract::<Extension<DatabaseConnection>>()
                .await
                .map_err(|error| {
                    tracing::error!(
                        error = &error as &dyn Error,
                        "database connection not found in app data"
                    );
                    (StatusCode::INTERNAL_SERVER_ERROR, "Database connection not found")
                })?;

        let user = user::Query::find_by_token(&conn, bearer.token())
            .await
            .map_err(|error| {
                tracing::error!(error = &error as &dyn Error, "error resolving access token");
                (StatusCode::INTERNAL_SERVER_ERROR, "Error resolving access token")
            })?
            .ok_or((StatusCode::UNAUTHORIZED, "Authentication failed."))?;

        sentry::configure_scope(|scope| {
            scope.set_user(Some(sentry::User {
                id: Some(user.id.to_string()),
                ..Default::default()
            }));
        });

        Ok(Self(user.id))
    }
}
