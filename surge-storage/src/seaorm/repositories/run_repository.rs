use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbErr, EntityTrait, Order, QueryFilter, QueryOrder, QuerySelect,
    Set,
};
use uuid::Uuid;

use surge_interfaces::{DatabaseError, RunRepository, RunStatus, UnifiedRun};

use crate::seaorm::connection::DatabaseConnection;
use crate::seaorm::entities::{runs, RunActiveModel, Runs};

/// SeaORM-backed implementation of [`RunRepository`]
#[derive(Clone)]
pub struct SeaOrmRunRepository {
    db: DatabaseConnection,
}

impl SeaOrmRunRepository {
    /// Create a new run repository
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn db_error(err: DbErr) -> DatabaseError {
    DatabaseError::Internal {
        message: err.to_string(),
    }
}

#[async_trait]
impl RunRepository for SeaOrmRunRepository {
    async fn health_check(&self) -> Result<(), DatabaseError> {
        self.db
            .get_connection()
            .ping()
            .await
            .map_err(|e| DatabaseError::Connection {
                message: e.to_string(),
            })
    }

    async fn create(&self, run: UnifiedRun) -> Result<UnifiedRun, DatabaseError> {
        let active_model = RunActiveModel {
            uuid: Set(run.id),
            start_time: Set(run.start_time),
            duration_secs: Set(run.duration_secs as i32),
            clients: Set(run.clients as i32),
            url: Set(run.url),
            status: Set(run.status.into()),
            pid: Set(run.pid),
            log_file: Set(run.log_file),
            output: Set(run.output),
            ..Default::default()
        };

        let model = active_model
            .insert(self.db.get_connection())
            .await
            .map_err(db_error)?;
        Ok(model.into())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UnifiedRun>, DatabaseError> {
        let run = Runs::find()
            .filter(runs::Column::Uuid.eq(id))
            .one(self.db.get_connection())
            .await
            .map_err(db_error)?;
        Ok(run.map(Into::into))
    }

    async fn find_recent(&self, limit: u64) -> Result<Vec<UnifiedRun>, DatabaseError> {
        let runs = Runs::find()
            .order_by(runs::Column::StartTime, Order::Desc)
            .limit(limit)
            .all(self.db.get_connection())
            .await
            .map_err(db_error)?;
        Ok(runs.into_iter().map(Into::into).collect())
    }

    async fn record_pid(&self, id: Uuid, pid: i32) -> Result<(), DatabaseError> {
        // Only a still-running record may carry a pid; a run that already
        // reached a terminal state keeps pid = null.
        Runs::update_many()
            .col_expr(runs::Column::Pid, Expr::value(Some(pid)))
            .filter(runs::Column::Uuid.eq(id))
            .filter(runs::Column::Status.eq(runs::RunStatus::Running))
            .exec(self.db.get_connection())
            .await
            .map_err(db_error)?;
        Ok(())
    }

    async fn finalize(
        &self,
        id: Uuid,
        status: RunStatus,
        output: Option<String>,
    ) -> Result<bool, DatabaseError> {
        if !status.is_terminal() {
            return Err(DatabaseError::Validation {
                message: format!("cannot finalize run {} to non-terminal status {}", id, status),
            });
        }

        let mut update = Runs::update_many()
            .col_expr(runs::Column::Status, Expr::value(runs::RunStatus::from(status)))
            .col_expr(runs::Column::Pid, Expr::value(Option::<i32>::None));

        if let Some(output) = output {
            update = update.col_expr(runs::Column::Output, Expr::value(output));
        }

        // The status guard makes the terminal transition atomic: whichever
        // finalization path lands first wins, the other affects zero rows.
        let result = update
            .filter(runs::Column::Uuid.eq(id))
            .filter(runs::Column::Status.eq(runs::RunStatus::Running))
            .exec(self.db.get_connection())
            .await
            .map_err(db_error)?;

        Ok(result.rows_affected > 0)
    }
}
