//! Persistence contracts for the notification store.
//!
//! # Responsibility
//! - Define the store interface the fan-out and reconciliation services
//!   depend on.
//! - Keep SQL details inside the persistence boundary.

pub mod notification_repo;
