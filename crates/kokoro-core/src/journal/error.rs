use crate::gateway::error::GatewayError;
use sea_orm::DbErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    InvalidInput(&'static str),

    #[error("journal entry not found")]
    NotFound,

    #[error("{0}")]
    InvalidState(&'static str),

    #[error("text generation failed")]
    Gateway(#[source] GatewayError),

    #[error("database error")]
    Db(#[from] DbErr),
}
