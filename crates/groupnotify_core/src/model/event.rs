//! Group event records as delivered by the host activity feed.
//!
//! # Responsibility
//! - Mirror the host's activity shape closely enough for fan-out and
//!   reconciliation decisions.
//!
//! # Invariants
//! - Events are never created, mutated or deleted by this crate.
//! - For group activities the event's top-level item is always the group.

use serde::{Deserialize, Serialize};

/// Host user id. Integer keyed, matching the host's member table.
pub type UserId = i64;

/// Host group id.
pub type GroupId = i64;

/// Host activity/event id.
pub type EventId = i64;

/// Host content id for forum topics and replies.
pub type ContentId = i64;

/// Component tag the host attaches to group-originated activities.
pub const GROUPS_COMPONENT: &str = "groups";

/// An activity that happened inside a group, as loaded from the host feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupEvent {
    /// Stable activity id.
    pub id: EventId,
    /// Group the activity belongs to (the activity's top-level item).
    pub group_id: GroupId,
    /// User who performed the action.
    pub actor_user_id: UserId,
    /// Producing subsystem tag, e.g. `"groups"`.
    pub component: String,
    /// Host-rendered action text, may contain markup.
    pub action: String,
}

/// Raw parameters describing a just-recorded activity, handed to fan-out
/// before the activity row itself has been loaded.
///
/// Replaces the host's associative argument map with named, typed fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityParams {
    /// Producing subsystem tag; fan-out only acts on [`GROUPS_COMPONENT`].
    pub component: String,
    /// Top-level item id; the group id for group activities.
    pub item_id: GroupId,
    /// User who performed the action.
    pub actor_user_id: UserId,
    /// Host action key, e.g. `"activity_update"`. Opaque to this crate.
    pub kind: Option<String>,
}

impl GroupEvent {
    /// Returns whether this event was produced by the groups subsystem.
    pub fn is_group_event(&self) -> bool {
        self.component == GROUPS_COMPONENT
    }
}

#[cfg(test)]
mod tests {
    use super::{ActivityParams, GroupEvent, GROUPS_COMPONENT};

    fn sample_event() -> GroupEvent {
        GroupEvent {
            id: 100,
            group_id: 7,
            actor_user_id: 3,
            component: GROUPS_COMPONENT.to_string(),
            action: "U1 posted an update".to_string(),
        }
    }

    #[test]
    fn group_component_is_recognized() {
        assert!(sample_event().is_group_event());

        let mut foreign = sample_event();
        foreign.component = "blogs".to_string();
        assert!(!foreign.is_group_event());
    }

    #[test]
    fn event_serde_roundtrip() {
        let event = sample_event();
        let json = serde_json::to_string(&event).unwrap();
        let back: GroupEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn params_serde_roundtrip() {
        let params = ActivityParams {
            component: GROUPS_COMPONENT.to_string(),
            item_id: 7,
            actor_user_id: 3,
            kind: Some("activity_update".to_string()),
        };
        let json = serde_json::to_string(&params).unwrap();
        let back: ActivityParams = serde_json::from_str(&json).unwrap();
        assert_eq!(back, params);
    }
}
