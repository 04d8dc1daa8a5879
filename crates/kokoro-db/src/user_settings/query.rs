use kokoro_entity::user_settings::{Entity as UserSettings, Model as UserSettingsModel};
use sea_orm::{ConnectionTrait, DbErr, EntityTrait};
use std::error::Error;

pub struct Query;

impl Query {
    pub async fn find<C: ConnectionTrait>(conn: &C, user_id: i64) -> Result<Option<UserSettingsModel>, DbErr> {
        UserSettings::find_by_id(user_id)
            .one(conn)
            .await
            .inspect_err(|error| tracing::error!(error = error as &dyn Error, "failed to load user settings"))
    }
}
