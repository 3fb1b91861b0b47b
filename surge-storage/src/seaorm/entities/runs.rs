use sea_orm::entity::prelude::*;
use sea_orm::sea_query::StringLen;
use serde::{Deserialize, Serialize};

/// Run status enum, stored as a short string column
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum RunStatus {
    #[sea_orm(string_value = "running")]
    Running,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "failed")]
    Failed,
    #[sea_orm(string_value = "stopped")]
    Stopped,
}

/// Load test run entity
///
/// One record per invocation of the external workload. The surrogate `id`
/// never leaves this crate; callers identify runs by `uuid`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "runs")]
pub struct Model {
    /// Primary key
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Public identifier for the run
    #[sea_orm(unique)]
    pub uuid: Uuid,

    /// When the run was created
    pub start_time: ChronoDateTimeUtc,

    /// Requested run length in seconds
    pub duration_secs: i32,

    /// Requested concurrency level
    pub clients: i32,

    /// Target endpoint for the workload
    pub url: String,

    /// Lifecycle status
    pub status: RunStatus,

    /// OS pid of the live subprocess (null unless running)
    pub pid: Option<i32>,

    /// Path of the captured output artifact, assigned before spawn
    pub log_file: String,

    /// Bounded output snapshot, written at finalization
    #[sea_orm(column_type = "Text")]
    pub output: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<RunStatus> for surge_interfaces::RunStatus {
    fn from(status: RunStatus) -> Self {
        match status {
            RunStatus::Running => surge_interfaces::RunStatus::Running,
            RunStatus::Completed => surge_interfaces::RunStatus::Completed,
            RunStatus::Failed => surge_interfaces::RunStatus::Failed,
            RunStatus::Stopped => surge_interfaces::RunStatus::Stopped,
        }
    }
}

impl From<surge_interfaces::RunStatus> for RunStatus {
    fn from(status: surge_interfaces::RunStatus) -> Self {
        match status {
            surge_interfaces::RunStatus::Running => RunStatus::Running,
            surge_interfaces::RunStatus::Completed => RunStatus::Completed,
            surge_interfaces::RunStatus::Failed => RunStatus::Failed,
            surge_interfaces::RunStatus::Stopped => RunStatus::Stopped,
        }
    }
}

impl From<Model> for surge_interfaces::UnifiedRun {
    fn from(model: Model) -> Self {
        surge_interfaces::UnifiedRun {
            id: model.uuid,
            start_time: model.start_time,
            duration_secs: model.duration_secs.max(0) as u32,
            clients: model.clients.max(0) as u32,
            url: model.url,
            status: model.status.into(),
            pid: model.pid,
            log_file: model.log_file,
            output: model.output,
        }
    }
}
