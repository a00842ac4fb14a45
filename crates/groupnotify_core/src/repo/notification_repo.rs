//! Notification store contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide create/exists/find/delete over notification rows.
//! - Build every WHERE clause from a structured filter with bound
//!   parameters only.
//!
//! # Invariants
//! - `create` never produces a second row for the same
//!   `(user_id, component_action)`; the unique index absorbs the retry.
//! - Filtering operations reject an all-unset filter instead of matching
//!   the whole table.

use crate::db::DbError;
use crate::model::notification::{Notification, NotificationFilter};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const NOTIFICATION_SELECT_SQL: &str = "SELECT
    user_id,
    item_id,
    component_name,
    component_action,
    secondary_item_id,
    date_notified,
    is_new
FROM notifications";

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic store error for notification persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// A filter with no fields set was passed to a scoped operation.
    UnscopedFilter,
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::UnscopedFilter => {
                write!(f, "notification filter must set at least one field")
            }
            Self::InvalidData(message) => {
                write!(f, "invalid persisted notification data: {message}")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::UnscopedFilter => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Store interface for notification rows.
///
/// The services are generic over this trait; hosts that keep notifications
/// in their own table plug in here.
pub trait NotificationStore {
    /// Persists one notification.
    ///
    /// Returns `Ok(true)` when a row was written and `Ok(false)` when an
    /// identical `(user_id, component_action)` row already existed.
    fn create(&self, notification: &Notification) -> RepoResult<bool>;

    /// Returns whether any row matches the filter.
    fn exists(&self, filter: &NotificationFilter) -> RepoResult<bool>;

    /// Returns all rows matching the filter, newest first.
    fn find(&self, filter: &NotificationFilter) -> RepoResult<Vec<Notification>>;

    /// Deletes all rows matching the filter and returns the removed count.
    ///
    /// Deleting a non-existent notification is not an error; the count is
    /// simply zero.
    fn delete(&self, filter: &NotificationFilter) -> RepoResult<usize>;
}

/// SQLite-backed notification store.
pub struct SqliteNotificationStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNotificationStore<'conn> {
    /// Constructs a store from a migrated/ready connection.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl NotificationStore for SqliteNotificationStore<'_> {
    fn create(&self, notification: &Notification) -> RepoResult<bool> {
        // OR IGNORE rides on ux_notifications_user_action, making repeated
        // fan-out for the same (recipient, event) a no-op.
        let changed = self.conn.execute(
            "INSERT OR IGNORE INTO notifications (
                user_id,
                item_id,
                component_name,
                component_action,
                secondary_item_id,
                date_notified,
                is_new
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                notification.user_id,
                notification.item_id,
                notification.component_name.as_str(),
                notification.component_action.as_str(),
                notification.secondary_item_id,
                notification.date_notified,
                bool_to_int(notification.is_new),
            ],
        )?;

        Ok(changed == 1)
    }

    fn exists(&self, filter: &NotificationFilter) -> RepoResult<bool> {
        let (where_sql, binds) = build_where(filter)?;
        let sql = format!("SELECT EXISTS (SELECT 1 FROM notifications WHERE {where_sql});");

        let mut stmt = self.conn.prepare(&sql)?;
        let found = stmt.query_row(params_from_iter(binds), |row| row.get::<_, i64>(0))?;
        Ok(found == 1)
    }

    fn find(&self, filter: &NotificationFilter) -> RepoResult<Vec<Notification>> {
        let (where_sql, binds) = build_where(filter)?;
        let sql = format!(
            "{NOTIFICATION_SELECT_SQL} WHERE {where_sql} ORDER BY date_notified DESC, id DESC;"
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(binds))?;
        let mut notifications = Vec::new();

        while let Some(row) = rows.next()? {
            notifications.push(parse_notification_row(row)?);
        }

        Ok(notifications)
    }

    fn delete(&self, filter: &NotificationFilter) -> RepoResult<usize> {
        let (where_sql, binds) = build_where(filter)?;
        let sql = format!("DELETE FROM notifications WHERE {where_sql};");

        let removed = self.conn.execute(&sql, params_from_iter(binds))?;
        Ok(removed)
    }
}

fn build_where(filter: &NotificationFilter) -> RepoResult<(String, Vec<Value>)> {
    if filter.is_empty() {
        return Err(RepoError::UnscopedFilter);
    }

    let mut clauses: Vec<&'static str> = Vec::new();
    let mut binds: Vec<Value> = Vec::new();

    if let Some(user_id) = filter.user_id {
        clauses.push("user_id = ?");
        binds.push(Value::Integer(user_id));
    }

    if let Some(item_id) = filter.item_id {
        clauses.push("item_id = ?");
        binds.push(Value::Integer(item_id));
    }

    if let Some(component_name) = filter.component_name.as_deref() {
        clauses.push("component_name = ?");
        binds.push(Value::Text(component_name.to_string()));
    }

    if let Some(component_action) = filter.component_action.as_deref() {
        clauses.push("component_action = ?");
        binds.push(Value::Text(component_action.to_string()));
    }

    if let Some(secondary_item_id) = filter.secondary_item_id {
        clauses.push("secondary_item_id = ?");
        binds.push(Value::Integer(secondary_item_id));
    }

    Ok((clauses.join(" AND "), binds))
}

fn parse_notification_row(row: &Row<'_>) -> RepoResult<Notification> {
    let is_new = match row.get::<_, i64>("is_new")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid is_new value `{other}` in notifications.is_new"
            )));
        }
    };

    Ok(Notification {
        user_id: row.get("user_id")?,
        item_id: row.get("item_id")?,
        component_name: row.get("component_name")?,
        component_action: row.get("component_action")?,
        secondary_item_id: row.get("secondary_item_id")?,
        date_notified: row.get("date_notified")?,
        is_new,
    })
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
