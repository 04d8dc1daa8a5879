use chrono::Utc;
use kokoro_db::schema::setup_schema;
use kokoro_entity::user;
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::{ActiveModelTrait, Database, DbConn};

pub async fn connect() -> DbConn {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    setup_schema(&db).await.unwrap();
    db
}

pub async fn create_test_user(db: &DbConn) -> user::Model {
    user::ActiveModel {
        id: NotSet,
        created_at: Set(Utc::now().fixed_offset()),
    }
    .insert(db)
    .await
    .unwrap()
}
