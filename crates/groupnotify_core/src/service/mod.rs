//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate host adapters, hooks and the notification store into the
//!   fan-out, reconciliation and formatting operations.
//! - Keep host wiring decoupled from storage details.

pub mod fanout_service;
pub mod format_service;
pub mod reconcile_service;
