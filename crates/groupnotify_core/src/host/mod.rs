//! Host platform collaborator contracts.
//!
//! # Responsibility
//! - Define the seams through which this crate reaches group membership,
//!   the activity feed, the forum integration and per-request state.
//! - Keep the services free of ambient globals: every host capability is
//!   an injected handle, every request detail travels in [`RequestContext`].
//!
//! # Invariants
//! - Host objects are read-only to this crate; only notification rows are
//!   ever written.
//! - `member_ids` excludes banned members and includes admins/moderators.

use crate::model::event::{ActivityParams, ContentId, EventId, GroupEvent, GroupId, UserId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type HostResult<T> = Result<T, HostError>;

/// Failure reported by a host adapter call.
///
/// The services absorb these into no-op outcomes per the error policy; the
/// operation name keeps the log lines attributable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostError {
    pub operation: &'static str,
    pub message: String,
}

impl HostError {
    pub fn new(operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            operation,
            message: message.into(),
        }
    }
}

impl Display for HostError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "host call `{}` failed: {}", self.operation, self.message)
    }
}

impl Error for HostError {}

/// Group membership and group presentation lookups.
pub trait GroupDirectory {
    /// Returns all member ids of the group, admins and moderators included,
    /// banned members excluded.
    fn member_ids(&self, group_id: GroupId) -> HostResult<BTreeSet<UserId>>;

    /// Returns the group's display name, if the group exists.
    fn group_name(&self, group_id: GroupId) -> HostResult<Option<String>>;

    /// Returns the canonical link to the group's page.
    fn group_link(&self, group_id: GroupId) -> String;
}

/// Read access to the host activity feed.
pub trait ActivityFeed {
    /// Resolves the id of the activity described by raw creation parameters.
    ///
    /// Returns `Ok(None)` when the host cannot locate a matching activity.
    fn resolve_event_id(&self, params: &ActivityParams) -> HostResult<Option<EventId>>;

    /// Loads a single event by id.
    fn load_event(&self, event_id: EventId) -> HostResult<Option<GroupEvent>>;

    /// Loads a batch of events by id.
    ///
    /// Reconciliation passes `include_hidden`/`include_spam` as true so no
    /// linked event is missed.
    fn load_events(
        &self,
        event_ids: &[EventId],
        include_hidden: bool,
        include_spam: bool,
    ) -> HostResult<Vec<GroupEvent>>;

    /// Returns the permalink of a single event's detail page.
    fn event_permalink(&self, event: &GroupEvent) -> String;
}

/// Publication status of a forum topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TopicStatus {
    Public,
    Closed,
}

/// A forum topic as resolved from its route slug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForumTopic {
    /// Host content id; shares the id space with replies.
    pub id: ContentId,
    pub slug: String,
    pub status: TopicStatus,
}

/// Forum integration surface.
///
/// All of this is optional at the host level; [`ForumProvider::is_available`]
/// gates the forum reconciliation path.
pub trait ForumProvider {
    /// Returns whether a forum integration is installed and active.
    fn is_available(&self) -> bool;

    /// Finds a topic by slug among the allowed statuses.
    fn topic_by_slug(&self, slug: &str, statuses: &[TopicStatus])
        -> HostResult<Option<ForumTopic>>;

    /// Returns the content ids of every reply under a topic, oldest first,
    /// regardless of post status.
    fn reply_ids(&self, topic_id: ContentId) -> HostResult<Vec<ContentId>>;

    /// Maps a topic/reply content id back to its originating event id via
    /// the host's stored linkage.
    fn event_id_for_content(&self, content_id: ContentId) -> HostResult<Option<EventId>>;
}

/// Where the current request is, as computed by the host router.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteInfo {
    /// Viewing one specific group item (as opposed to a listing).
    pub is_single_group_item: bool,
    /// Inside the groups area of the site.
    pub is_groups_area: bool,
    /// Current action segment, e.g. `"forum"`.
    pub action: String,
    /// Trailing route segments after the action, e.g. `["topic", <slug>]`.
    pub action_variables: Vec<String>,
    /// Group the route is scoped to, when inside a single group.
    pub current_group_id: GroupId,
}

impl RouteInfo {
    /// Returns the segment right after the action, e.g. `"topic"`.
    pub fn sub_action(&self) -> Option<&str> {
        self.action_variables.first().map(String::as_str)
    }

    /// Returns the nth trailing segment.
    pub fn action_variable(&self, index: usize) -> Option<&str> {
        self.action_variables.get(index).map(String::as_str)
    }

    /// Returns whether this is the single-topic view inside a group's forum
    /// tab, the only route the forum reconciliation path acts on.
    pub fn is_group_forum_topic_view(&self) -> bool {
        self.is_single_group_item
            && self.is_groups_area
            && self.action == "forum"
            && self.sub_action() == Some("topic")
    }
}

/// Host feature toggles relevant to this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubsystemFlags {
    pub groups_active: bool,
    pub notifications_active: bool,
}

impl SubsystemFlags {
    /// Both required subsystems enabled; the common production state.
    pub fn all_active() -> Self {
        Self {
            groups_active: true,
            notifications_active: true,
        }
    }
}

impl Default for SubsystemFlags {
    fn default() -> Self {
        Self::all_active()
    }
}

/// Per-request state assembled by the host and passed into every operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestContext {
    /// Authenticated user, if any.
    pub viewer: Option<UserId>,
    /// Current route, when the host is serving a page view.
    pub route: Option<RouteInfo>,
    pub subsystems: SubsystemFlags,
}

impl RequestContext {
    /// Context for a logged-in user outside any specific route.
    pub fn for_viewer(viewer: UserId) -> Self {
        Self {
            viewer: Some(viewer),
            route: None,
            subsystems: SubsystemFlags::all_active(),
        }
    }

    pub fn with_route(mut self, route: RouteInfo) -> Self {
        self.route = Some(route);
        self
    }

    pub fn is_logged_in(&self) -> bool {
        self.viewer.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::{RequestContext, RouteInfo, SubsystemFlags};

    fn topic_route() -> RouteInfo {
        RouteInfo {
            is_single_group_item: true,
            is_groups_area: true,
            action: "forum".to_string(),
            action_variables: vec!["topic".to_string(), "weekly-ride".to_string()],
            current_group_id: 7,
        }
    }

    #[test]
    fn topic_route_matches_all_four_parts() {
        assert!(topic_route().is_group_forum_topic_view());

        let mut outside_groups = topic_route();
        outside_groups.is_groups_area = false;
        assert!(!outside_groups.is_group_forum_topic_view());

        let mut listing = topic_route();
        listing.is_single_group_item = false;
        assert!(!listing.is_group_forum_topic_view());

        let mut members_tab = topic_route();
        members_tab.action = "members".to_string();
        assert!(!members_tab.is_group_forum_topic_view());

        let mut no_topic = topic_route();
        no_topic.action_variables.clear();
        assert!(!no_topic.is_group_forum_topic_view());
    }

    #[test]
    fn slug_is_second_action_variable() {
        assert_eq!(topic_route().action_variable(1), Some("weekly-ride"));
        assert_eq!(topic_route().sub_action(), Some("topic"));
    }

    #[test]
    fn default_context_is_anonymous_with_active_subsystems() {
        let ctx = RequestContext::default();
        assert!(!ctx.is_logged_in());
        assert_eq!(ctx.subsystems, SubsystemFlags::all_active());
    }
}
