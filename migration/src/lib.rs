//! Schema migrations and sample data for the `users` and `metrics` tables.
//!
//! Every statement is idempotent (`IF NOT EXISTS` / `ON CONFLICT DO NOTHING`), so
//! the full list is simply applied in order on each run.

use sea_orm::{DatabaseConnection, DbErr};
use sea_orm_migration::prelude::*;

pub mod migrations;
mod migrator;
pub mod seed;

pub use migrator::Migrator;
pub use sea_orm_migration::MigratorTrait;

/// Applies every migration in declaration order.
pub async fn migrate(db: &DatabaseConnection) -> Result<(), DbErr> {
    let manager = SchemaManager::new(db);
    let migrations = Migrator::migrations();
    let total = migrations.len();

    tracing::info!("Running database migrations...");
    for (i, migration) in migrations.iter().enumerate() {
        tracing::info!(migration = migration.name(), "Running migration {}/{}", i + 1, total);
        migration.up(&manager).await?;
    }
    tracing::info!("All migrations completed successfully");

    Ok(())
}
