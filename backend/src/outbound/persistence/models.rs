//! Internal Diesel row structs.
//!
//! These types never leave the persistence layer.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::{order_history, users};

/// Row read from `users`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: String,
    pub role: String,
    pub status: String,
    pub fcm_token: Option<String>,
}

/// Row read from `order_history`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = order_history)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct OrderHistoryRow {
    pub id: String,
    pub completed_at: Option<DateTime<Utc>>,
    pub archived_at: Option<DateTime<Utc>>,
}
