//! Notification fan-out core for group-based social platforms.
//!
//! When a member acts inside a group, every other member receives a
//! per-user unread notification; viewing the originating content clears
//! the viewer's marker again. This crate owns the fan-out, deduplication
//! and reconciliation logic; group membership, the activity feed, forum
//! content and routing stay on the host side behind the `host` traits.

pub mod db;
pub mod hooks;
pub mod host;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use hooks::{FanoutReceipt, NotifierHooks};
pub use host::{
    ActivityFeed, ForumProvider, ForumTopic, GroupDirectory, HostError, HostResult,
    RequestContext, RouteInfo, SubsystemFlags, TopicStatus,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::event::{
    ActivityParams, ContentId, EventId, GroupEvent, GroupId, UserId, GROUPS_COMPONENT,
};
pub use model::notification::{
    component_action_for, Notification, NotificationFilter, COMPONENT_NAME,
};
pub use repo::notification_repo::{
    NotificationStore, RepoError, RepoResult, SqliteNotificationStore,
};
pub use service::fanout_service::{
    AddNotificationRequest, FanoutOutcome, FanoutService, FanoutSkip,
};
pub use service::format_service::{
    format_notification, strip_markup, FormatShape, FormattedNotification,
};
pub use service::reconcile_service::{ReconcileOutcome, ReconcileService, ReconcileSkip};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
