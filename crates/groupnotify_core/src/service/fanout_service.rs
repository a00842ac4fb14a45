//! Group activity fan-out.
//!
//! # Responsibility
//! - Turn one new group activity into one unread notification per group
//!   member, actor excluded.
//! - Provide the low-level `add_notification` write used by fan-out.
//!
//! # Invariants
//! - The actor never receives a notification for their own action.
//! - Fan-out is idempotent per (recipient, event); the store's unique
//!   `(user_id, component_action)` key absorbs repeats.
//! - The completion hook fires exactly once per delivered fan-out, with the
//!   full recipient set.

use crate::hooks::{FanoutReceipt, NotifierHooks};
use crate::host::{ActivityFeed, GroupDirectory, RequestContext};
use crate::model::event::{ActivityParams, EventId, GroupEvent, GroupId, UserId, GROUPS_COMPONENT};
use crate::model::notification::{
    component_action_for, now_epoch_ms, Notification, COMPONENT_NAME,
};
use crate::repo::notification_repo::NotificationStore;
use log::{debug, info, warn};
use std::sync::Arc;

/// Why a fan-out wrote nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FanoutSkip {
    /// Groups or notifications subsystem is disabled on the host.
    SubsystemInactive,
    /// The activity was not produced by the groups subsystem.
    ForeignComponent,
    /// The host could not resolve the activity from its raw parameters.
    EventUnresolved,
    /// A registered veto predicate rejected the event.
    Vetoed,
    /// A host adapter call failed.
    HostUnavailable,
}

/// Result of a fan-out attempt. Never an error; failures degrade to skips.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FanoutOutcome {
    Skipped(FanoutSkip),
    Delivered {
        event_id: EventId,
        group_id: GroupId,
        /// Recipients a notification row was actually written for.
        notified: Vec<UserId>,
    },
}

/// Input for one notification write.
///
/// `date_notified` defaults to the current server time when unset;
/// `secondary_item_id` of zero means unset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddNotificationRequest {
    pub item_id: GroupId,
    pub user_id: UserId,
    pub component_name: String,
    pub component_action: String,
    pub secondary_item_id: EventId,
    pub date_notified: Option<i64>,
}

/// Fan-out engine over an injected store, host adapters and hooks.
pub struct FanoutService<S: NotificationStore> {
    store: S,
    groups: Arc<dyn GroupDirectory>,
    feed: Arc<dyn ActivityFeed>,
    hooks: NotifierHooks,
}

impl<S: NotificationStore> FanoutService<S> {
    pub fn new(
        store: S,
        groups: Arc<dyn GroupDirectory>,
        feed: Arc<dyn ActivityFeed>,
        hooks: NotifierHooks,
    ) -> Self {
        Self {
            store,
            groups,
            feed,
            hooks,
        }
    }

    /// Notifies every group member about a just-recorded activity.
    ///
    /// # Contract
    /// - No-op unless both required subsystems are active.
    /// - Acts only on activities tagged with the groups component.
    /// - Never notifies the actor.
    /// - Emits the completion hook with the full member set once delivery
    ///   has been attempted for everyone.
    pub fn notify_members(
        &self,
        ctx: &RequestContext,
        params: &ActivityParams,
    ) -> FanoutOutcome {
        if !ctx.subsystems.groups_active || !ctx.subsystems.notifications_active {
            return FanoutOutcome::Skipped(FanoutSkip::SubsystemInactive);
        }

        if params.component != GROUPS_COMPONENT {
            return FanoutOutcome::Skipped(FanoutSkip::ForeignComponent);
        }

        let event = match self.resolve_event(params) {
            Ok(Some(event)) => event,
            Ok(None) => return FanoutOutcome::Skipped(FanoutSkip::EventUnresolved),
            Err(skip) => return FanoutOutcome::Skipped(skip),
        };

        if self.hooks.should_skip(&event) {
            debug!(
                "event=fanout module=service status=skip reason=vetoed event_id={}",
                event.id
            );
            return FanoutOutcome::Skipped(FanoutSkip::Vetoed);
        }

        // Group-activity convention: the activity's top-level item is the group.
        let group_id = event.group_id;

        let members = match self.groups.member_ids(group_id) {
            Ok(members) => members,
            Err(err) => {
                warn!(
                    "event=fanout module=service status=error error_code=member_lookup_failed group_id={group_id} error={err}"
                );
                return FanoutOutcome::Skipped(FanoutSkip::HostUnavailable);
            }
        };

        let mut notified = Vec::new();
        for &member_id in &members {
            if member_id == event.actor_user_id {
                continue;
            }

            let written = self.add_notification(&AddNotificationRequest {
                item_id: group_id,
                user_id: member_id,
                component_name: COMPONENT_NAME.to_string(),
                component_action: component_action_for(event.id),
                secondary_item_id: event.id,
                date_notified: None,
            });

            if written {
                notified.push(member_id);
            }
        }

        self.hooks.emit_fanout_complete(&FanoutReceipt {
            recipients: members.iter().copied().collect(),
            group_id,
            actor_user_id: event.actor_user_id,
            event_id: event.id,
        });

        info!(
            "event=fanout module=service status=ok group_id={} event_id={} members={} notified={}",
            group_id,
            event.id,
            members.len(),
            notified.len()
        );

        FanoutOutcome::Delivered {
            event_id: event.id,
            group_id,
            notified,
        }
    }

    /// Persists one notification row.
    ///
    /// Pre-persist listeners run unconditionally, before the write. Returns
    /// false when the row already existed or the store failed; both are
    /// absorbed here, never raised.
    pub fn add_notification(&self, request: &AddNotificationRequest) -> bool {
        let notification = Notification {
            user_id: request.user_id,
            item_id: request.item_id,
            component_name: request.component_name.clone(),
            component_action: request.component_action.clone(),
            secondary_item_id: request.secondary_item_id,
            date_notified: request.date_notified.unwrap_or_else(now_epoch_ms),
            is_new: true,
        };

        self.hooks.emit_before_persist(&notification);

        match self.store.create(&notification) {
            Ok(created) => {
                if !created {
                    debug!(
                        "event=notification_add module=service status=skip reason=duplicate user_id={} action={}",
                        notification.user_id, notification.component_action
                    );
                }
                created
            }
            Err(err) => {
                warn!(
                    "event=notification_add module=service status=error error_code=store_write_failed user_id={} error={err}",
                    notification.user_id
                );
                false
            }
        }
    }

    fn resolve_event(&self, params: &ActivityParams) -> Result<Option<GroupEvent>, FanoutSkip> {
        let event_id = match self.feed.resolve_event_id(params) {
            Ok(Some(event_id)) => event_id,
            Ok(None) => return Ok(None),
            Err(err) => {
                warn!(
                    "event=fanout module=service status=error error_code=event_resolve_failed error={err}"
                );
                return Err(FanoutSkip::HostUnavailable);
            }
        };

        match self.feed.load_event(event_id) {
            Ok(event) => Ok(event),
            Err(err) => {
                warn!(
                    "event=fanout module=service status=error error_code=event_load_failed event_id={event_id} error={err}"
                );
                Err(FanoutSkip::HostUnavailable)
            }
        }
    }
}
