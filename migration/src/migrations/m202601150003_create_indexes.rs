use sea_orm_migration::prelude::*;

use super::m202601150001_create_users::Users;
use super::m202601150002_create_metrics::Metrics;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m202601150003_create_indexes"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_metrics_timestamp")
                    .table(Metrics::Table)
                    .col(Metrics::Timestamp)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_metrics_name")
                    .table(Metrics::Table)
                    .col(Metrics::Name)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_users_email")
                    .table(Users::Table)
                    .col(Users::Email)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().if_exists().name("idx_users_email").table(Users::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().if_exists().name("idx_metrics_name").table(Metrics::Table).to_owned())
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .if_exists()
                    .name("idx_metrics_timestamp")
                    .table(Metrics::Table)
                    .to_owned(),
            )
            .await
    }
}
