pub mod journal_entry;
pub mod schema;
pub mod user;
pub mod user_settings;

pub use sea_orm;
