//! Domain model for group activity notifications.
//!
//! # Responsibility
//! - Define the canonical records exchanged between the fan-out and
//!   reconciliation services and the notification store.
//! - Own the component taxonomy used to namespace and key notifications.
//!
//! # Invariants
//! - A notification is uniquely identified by `(user_id, component_action)`.
//! - Group events are host-owned and read-only to this crate.

pub mod event;
pub mod notification;
