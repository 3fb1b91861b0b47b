//! SeaORM entity definitions

pub mod runs;

pub use runs::{
    ActiveModel as RunActiveModel, Column as RunColumn, Entity as Runs, Model as Run, RunStatus,
};
