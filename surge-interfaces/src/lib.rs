//! Core interfaces for the Surge load test orchestrator
//!
//! This crate defines the contracts between the persistence layer, the
//! process supervisor and the HTTP surface. Implementations live in
//! `surge-storage`, `surge-execution` and `surge-server`; keeping the traits
//! here breaks circular dependencies and lets handlers be tested against
//! in-memory stubs.

pub mod database;
pub mod lifecycle;
pub mod types;

pub use database::{DatabaseError, RunRepository};
pub use lifecycle::{LifecycleError, RunLifecycle, StartRunRequest, StopOutcome};
pub use types::{RunStatus, UnifiedRun};
