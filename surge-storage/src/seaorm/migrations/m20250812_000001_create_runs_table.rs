use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Runs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Runs::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Runs::Uuid).uuid().not_null().unique_key())
                    .col(
                        ColumnDef::new(Runs::StartTime)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Runs::DurationSecs).integer().not_null())
                    .col(ColumnDef::new(Runs::Clients).integer().not_null())
                    .col(ColumnDef::new(Runs::Url).string().not_null())
                    .col(
                        ColumnDef::new(Runs::Status)
                            .string_len(20)
                            .not_null()
                            .default("running"),
                    )
                    .col(ColumnDef::new(Runs::Pid).integer())
                    .col(ColumnDef::new(Runs::LogFile).string().not_null())
                    .col(ColumnDef::new(Runs::Output).text().not_null().default(""))
                    .to_owned(),
            )
            .await?;

        // Listing is always start-time descending
        manager
            .create_index(
                Index::create()
                    .name("idx_runs_start_time")
                    .table(Runs::Table)
                    .col(Runs::StartTime)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_runs_status")
                    .table(Runs::Table)
                    .col(Runs::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Runs::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Runs {
    Table,
    Id,
    Uuid,
    StartTime,
    DurationSecs,
    Clients,
    Url,
    Status,
    Pid,
    LogFile,
    Output,
}
