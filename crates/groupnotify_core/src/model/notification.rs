//! Notification records and the structured deletion/lookup filter.
//!
//! # Responsibility
//! - Define the per-(user, event) unread marker written by fan-out.
//! - Own the component taxonomy constants and the action-key builder.
//!
//! # Invariants
//! - `component_action` is unique per originating event.
//! - At most one notification exists per `(user_id, component_action)`;
//!   the store enforces this, callers rely on it.

use crate::model::event::{EventId, GroupId, UserId};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Taxonomy tag identifying notifications owned by this feature.
pub const COMPONENT_NAME: &str = "local-group-notifier";

/// Prefix of the per-event action key.
const COMPONENT_ACTION_PREFIX: &str = "group-local-notification-";

/// Builds the action key that makes a notification unique per event.
///
/// Without a per-event key the host would aggregate repeated actions on the
/// same item into one collapsed notification.
pub fn component_action_for(event_id: EventId) -> String {
    format!("{COMPONENT_ACTION_PREFIX}{event_id}")
}

/// Current wall-clock time in epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or(0)
}

/// A per-(user, event) unread marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Recipient user id.
    pub user_id: UserId,
    /// Grouping key for aggregate display; the group id for this feature.
    pub item_id: GroupId,
    /// Owning feature tag, always [`COMPONENT_NAME`] for rows written here.
    pub component_name: String,
    /// Per-event action key, see [`component_action_for`].
    pub component_action: String,
    /// Originating event id. Zero means unset.
    pub secondary_item_id: EventId,
    /// Creation time in epoch milliseconds.
    pub date_notified: i64,
    /// Unread flag; always true on creation by this crate.
    pub is_new: bool,
}

impl Notification {
    /// Builds the canonical unread marker for `event_id` addressed to `user_id`.
    pub fn for_event(user_id: UserId, group_id: GroupId, event_id: EventId) -> Self {
        Self {
            user_id,
            item_id: group_id,
            component_name: COMPONENT_NAME.to_string(),
            component_action: component_action_for(event_id),
            secondary_item_id: event_id,
            date_notified: now_epoch_ms(),
            is_new: true,
        }
    }
}

/// Structured lookup/deletion filter for the notification store.
///
/// Every field is optional; unset fields do not constrain the match. The
/// store turns set fields into bound SQL parameters, never into
/// string-spliced values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationFilter {
    pub user_id: Option<UserId>,
    pub item_id: Option<GroupId>,
    pub component_name: Option<String>,
    pub component_action: Option<String>,
    pub secondary_item_id: Option<EventId>,
}

impl NotificationFilter {
    /// Matches exactly the marker fan-out writes for `event` to `user_id`.
    pub fn for_event(user_id: UserId, group_id: GroupId, event_id: EventId) -> Self {
        Self {
            user_id: Some(user_id),
            item_id: Some(group_id),
            component_name: Some(COMPONENT_NAME.to_string()),
            component_action: Some(component_action_for(event_id)),
            secondary_item_id: Some(event_id),
        }
    }

    /// Matches any notification this feature owns for `user_id` in `group_id`.
    ///
    /// Used as the cheap existence probe before the forum reverse lookup.
    pub fn for_group(user_id: UserId, group_id: GroupId) -> Self {
        Self {
            user_id: Some(user_id),
            item_id: Some(group_id),
            component_name: Some(COMPONENT_NAME.to_string()),
            component_action: None,
            secondary_item_id: None,
        }
    }

    /// Returns whether no field is set.
    pub fn is_empty(&self) -> bool {
        self.user_id.is_none()
            && self.item_id.is_none()
            && self.component_name.is_none()
            && self.component_action.is_none()
            && self.secondary_item_id.is_none()
    }
}
