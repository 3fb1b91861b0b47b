//! Unified Surge server
//!
//! Wires the record store, the process supervisor and the REST surface into
//! one binary. The lifecycle controller in this crate is the only component
//! that writes run status.

pub mod lifecycle;
pub mod services;
pub mod startup;

pub use lifecycle::{RunFinalizer, RunLifecycleService};
pub use services::{init_logging, ServiceContainer};
pub use startup::Server;
