//! Storage layer for the Surge load test orchestrator
//!
//! SeaORM-backed persistence of run records on SQLite. The repository here
//! implements the [`surge_interfaces::RunRepository`] contract; everything
//! else in the workspace talks to that trait, never to SeaORM directly.

pub mod seaorm;
pub mod testing;

pub use seaorm::config::StorageConfig;
pub use seaorm::connection::{ConnectionError, DatabaseConnection};
pub use seaorm::migrations::Migrator;
pub use seaorm::repositories::SeaOrmRunRepository;
