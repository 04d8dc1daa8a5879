use sea_orm::{ConnectionTrait, DatabaseBackend, DbConn, DbErr};

/// Apply the schema with plain `CREATE TABLE IF NOT EXISTS` statements.
/// Idempotent, so it runs unconditionally at startup and in tests.
pub async fn setup_schema(db: &DbConn) -> Result<(), DbErr> {
    let schema = match db.get_database_backend() {
        DatabaseBackend::Postgres => include_str!("schema/postgres.sql"),
        DatabaseBackend::Sqlite => include_str!("schema/sqlite.sql"),
        DatabaseBackend::MySql => {
            return Err(DbErr::Custom("mysql is not a supported backend".to_owned()));
        }
    };

    db.execute_unprepared(schema).await?;
    Ok(())
}
