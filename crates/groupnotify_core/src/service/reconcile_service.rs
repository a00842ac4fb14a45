//! Notification reconciliation on content views.
//!
//! # Responsibility
//! - Clear the viewer's unread marker when they open the originating event.
//! - Clear the viewer's markers for a whole forum topic, including every
//!   reply, via the host's content-to-event linkage.
//!
//! # Invariants
//! - Only the viewer's own notifications are ever deleted.
//! - The forum path never starts its reverse lookup before the cheap
//!   per-group existence probe has confirmed there is anything to clear.
//! - Deletes are idempotent; a missing row is not an error.

use crate::host::{ActivityFeed, ForumProvider, RequestContext, TopicStatus};
use crate::model::event::{EventId, GroupEvent};
use crate::model::notification::NotificationFilter;
use crate::repo::notification_repo::NotificationStore;
use log::{debug, info, warn};
use std::sync::Arc;

/// Why a reconciliation pass deleted nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileSkip {
    NotLoggedIn,
    /// The host's access check denied the viewer.
    AccessDenied,
    /// No forum integration is installed.
    ForumUnavailable,
    /// Current route is not the single-topic view of a group forum.
    RouteMismatch,
    /// The viewer has no notification for this group at all.
    NoGroupNotifications,
    /// The routed slug matched no closed/public topic.
    TopicNotFound,
    /// A host adapter call failed.
    HostUnavailable,
    /// The notification store rejected the probe or delete.
    StoreFailed,
}

/// Result of a reconciliation pass. Failures degrade to skips; an undeleted
/// marker self-heals on the next view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    Skipped(ReconcileSkip),
    /// Number of notification rows removed; zero is a valid clear.
    Cleared(usize),
}

/// Reconciliation engine over an injected store and host adapters.
pub struct ReconcileService<S: NotificationStore> {
    store: S,
    feed: Arc<dyn ActivityFeed>,
    forum: Arc<dyn ForumProvider>,
}

impl<S: NotificationStore> ReconcileService<S> {
    pub fn new(store: S, feed: Arc<dyn ActivityFeed>, forum: Arc<dyn ForumProvider>) -> Self {
        Self { store, feed, forum }
    }

    /// Clears the viewer's marker for one event when its detail page is
    /// opened.
    ///
    /// # Contract
    /// - Requires a logged-in viewer and a passed host access check.
    /// - Other users' markers for the same event are untouched.
    pub fn on_event_viewed(
        &self,
        ctx: &RequestContext,
        event: &GroupEvent,
        viewer_has_access: bool,
    ) -> ReconcileOutcome {
        let Some(viewer) = ctx.viewer else {
            return ReconcileOutcome::Skipped(ReconcileSkip::NotLoggedIn);
        };

        if !viewer_has_access {
            return ReconcileOutcome::Skipped(ReconcileSkip::AccessDenied);
        }

        let filter = NotificationFilter::for_event(viewer, event.group_id, event.id);
        match self.store.delete(&filter) {
            Ok(removed) => {
                info!(
                    "event=reconcile_single module=service status=ok user_id={viewer} event_id={} removed={removed}",
                    event.id
                );
                ReconcileOutcome::Cleared(removed)
            }
            Err(err) => {
                warn!(
                    "event=reconcile_single module=service status=error error_code=store_delete_failed user_id={viewer} event_id={} error={err}",
                    event.id
                );
                ReconcileOutcome::Skipped(ReconcileSkip::StoreFailed)
            }
        }
    }

    /// Clears the viewer's markers for a forum topic and all of its replies.
    ///
    /// The reverse lookup walks every reply in the thread, so the per-group
    /// existence probe up front is mandatory: with no matching notification
    /// the pass exits before any forum or feed call.
    pub fn on_forum_topic_viewed(&self, ctx: &RequestContext) -> ReconcileOutcome {
        let Some(viewer) = ctx.viewer else {
            return ReconcileOutcome::Skipped(ReconcileSkip::NotLoggedIn);
        };

        if !self.forum.is_available() {
            return ReconcileOutcome::Skipped(ReconcileSkip::ForumUnavailable);
        }

        let Some(route) = ctx.route.as_ref() else {
            return ReconcileOutcome::Skipped(ReconcileSkip::RouteMismatch);
        };
        if !route.is_group_forum_topic_view() {
            return ReconcileOutcome::Skipped(ReconcileSkip::RouteMismatch);
        }

        let group_id = route.current_group_id;
        match self
            .store
            .exists(&NotificationFilter::for_group(viewer, group_id))
        {
            Ok(true) => {}
            Ok(false) => {
                debug!(
                    "event=reconcile_forum module=service status=skip reason=no_group_notifications user_id={viewer} group_id={group_id}"
                );
                return ReconcileOutcome::Skipped(ReconcileSkip::NoGroupNotifications);
            }
            Err(err) => {
                warn!(
                    "event=reconcile_forum module=service status=error error_code=store_probe_failed user_id={viewer} error={err}"
                );
                return ReconcileOutcome::Skipped(ReconcileSkip::StoreFailed);
            }
        }

        let Some(slug) = route.action_variable(1) else {
            return ReconcileOutcome::Skipped(ReconcileSkip::RouteMismatch);
        };

        let topic = match self
            .forum
            .topic_by_slug(slug, &[TopicStatus::Closed, TopicStatus::Public])
        {
            Ok(Some(topic)) => topic,
            Ok(None) => return ReconcileOutcome::Skipped(ReconcileSkip::TopicNotFound),
            Err(err) => {
                warn!(
                    "event=reconcile_forum module=service status=error error_code=topic_lookup_failed slug={slug} error={err}"
                );
                return ReconcileOutcome::Skipped(ReconcileSkip::HostUnavailable);
            }
        };

        let mut content_ids = match self.forum.reply_ids(topic.id) {
            Ok(ids) => ids,
            Err(err) => {
                warn!(
                    "event=reconcile_forum module=service status=error error_code=reply_lookup_failed topic_id={} error={err}",
                    topic.id
                );
                return ReconcileOutcome::Skipped(ReconcileSkip::HostUnavailable);
            }
        };
        // The topic itself is content too and may carry its own event link.
        content_ids.push(topic.id);

        let mut event_ids: Vec<EventId> = Vec::new();
        for content_id in content_ids {
            match self.forum.event_id_for_content(content_id) {
                Ok(Some(event_id)) => event_ids.push(event_id),
                Ok(None) => {}
                Err(err) => {
                    warn!(
                        "event=reconcile_forum module=service status=error error_code=linkage_lookup_failed content_id={content_id} error={err}"
                    );
                    return ReconcileOutcome::Skipped(ReconcileSkip::HostUnavailable);
                }
            }
        }

        if event_ids.is_empty() {
            return ReconcileOutcome::Cleared(0);
        }

        // Hidden/spam events stay in: their notifications must clear too.
        let events = match self.feed.load_events(&event_ids, true, true) {
            Ok(events) => events,
            Err(err) => {
                warn!(
                    "event=reconcile_forum module=service status=error error_code=event_load_failed error={err}"
                );
                return ReconcileOutcome::Skipped(ReconcileSkip::HostUnavailable);
            }
        };

        let mut removed = 0usize;
        for event in &events {
            let filter = NotificationFilter::for_event(viewer, event.group_id, event.id);
            match self.store.delete(&filter) {
                Ok(count) => removed += count,
                // A failed delete self-heals the next time this topic is
                // viewed, so keep going.
                Err(err) => {
                    warn!(
                        "event=reconcile_forum module=service status=error error_code=store_delete_failed event_id={} error={err}",
                        event.id
                    );
                }
            }
        }

        info!(
            "event=reconcile_forum module=service status=ok user_id={viewer} group_id={group_id} topic_id={} events={} removed={removed}",
            topic.id,
            events.len()
        );

        ReconcileOutcome::Cleared(removed)
    }
}
