//! Typed callback registry for fan-out extensibility.
//!
//! # Responsibility
//! - Carry the veto predicate and the observable-event listeners that
//!   external features attach to fan-out.
//! - Resolve all callbacks at service construction time; nothing is
//!   registered ambiently after that.
//!
//! # Invariants
//! - Listeners observe, they cannot alter the payload.
//! - Pre-persist listeners run even when persistence later fails.

use crate::model::event::{EventId, GroupEvent, GroupId, UserId};
use crate::model::notification::Notification;
use serde::{Deserialize, Serialize};

type VetoPredicate = dyn Fn(&GroupEvent) -> bool;
type PersistListener = dyn Fn(&Notification);
type CompletionListener = dyn Fn(&FanoutReceipt);

/// Payload of the fan-out completion signal.
///
/// This is the sole integration seam for follow-on features such as digest
/// emails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FanoutReceipt {
    /// Every resolved group member, actor included.
    pub recipients: Vec<UserId>,
    pub group_id: GroupId,
    pub actor_user_id: UserId,
    pub event_id: EventId,
}

/// Callback registry consulted by the fan-out service.
#[derive(Default)]
pub struct NotifierHooks {
    veto_predicates: Vec<Box<VetoPredicate>>,
    before_persist: Vec<Box<PersistListener>>,
    fanout_complete: Vec<Box<CompletionListener>>,
}

impl NotifierHooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a predicate that may veto notification for an event.
    pub fn on_should_skip(&mut self, predicate: impl Fn(&GroupEvent) -> bool + 'static) {
        self.veto_predicates.push(Box::new(predicate));
    }

    /// Registers a listener invoked with each candidate notification before
    /// it is persisted.
    pub fn on_before_persist(&mut self, listener: impl Fn(&Notification) + 'static) {
        self.before_persist.push(Box::new(listener));
    }

    /// Registers a listener invoked once per completed fan-out.
    pub fn on_fanout_complete(&mut self, listener: impl Fn(&FanoutReceipt) + 'static) {
        self.fanout_complete.push(Box::new(listener));
    }

    /// Returns true when any registered predicate vetoes the event.
    pub fn should_skip(&self, event: &GroupEvent) -> bool {
        self.veto_predicates
            .iter()
            .any(|predicate| predicate(event))
    }

    pub(crate) fn emit_before_persist(&self, notification: &Notification) {
        for listener in &self.before_persist {
            listener(notification);
        }
    }

    pub(crate) fn emit_fanout_complete(&self, receipt: &FanoutReceipt) {
        for listener in &self.fanout_complete {
            listener(receipt);
        }
    }
}
