//! Repository implementations over the SeaORM entities

pub mod run_repository;

pub use run_repository::SeaOrmRunRepository;
