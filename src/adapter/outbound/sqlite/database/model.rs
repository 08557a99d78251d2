//! Database model types for Diesel ORM.

use diesel::prelude::*;

use super::schema::subscribers;

/// Database row for a subscriber.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = subscribers)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SubscriberRow {
    pub user_id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub subscribed_at: String,
    pub active: i32,
}
