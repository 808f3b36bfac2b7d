use colored::*;
use migration::Migrator;
use sea_orm::{DatabaseConnection, DbErr};
use sea_orm_migration::prelude::*;
use std::io::{self, Write};
use std::time::Instant;

const STATUS_COLUMN: usize = 80;

pub async fn run_all_migrations(db: &DatabaseConnection) -> Result<(), DbErr> {
    println!("Running migrations...");
    let schema_manager = SchemaManager::new(db);

    for migration in <Migrator as MigratorTrait>::migrations() {
        report(migration.as_ref(), "Applying", migration.up(&schema_manager)).await?;
    }
    Ok(())
}

/// Reverts every migration in reverse order, dropping both tables.
pub async fn revert_all_migrations(db: &DatabaseConnection) -> Result<(), DbErr> {
    println!("Reverting migrations...");
    let schema_manager = SchemaManager::new(db);

    for migration in <Migrator as MigratorTrait>::migrations().iter().rev() {
        report(migration.as_ref(), "Reverting", migration.down(&schema_manager)).await?;
    }
    Ok(())
}

async fn report<F>(migration: &dyn MigrationTrait, verb: &str, step: F) -> Result<(), DbErr>
where
    F: std::future::Future<Output = Result<(), DbErr>>,
{
    let name_str = format!("{} {}", verb, migration.name().bold());
    let dots = ".".repeat(STATUS_COLUMN.saturating_sub(name_str.len()));
    print!("{}{} ", name_str, dots);
    io::stdout().flush().ok();

    let start = Instant::now();
    match step.await {
        Ok(()) => {
            let time_str = format!("({:.2?})", start.elapsed()).dimmed();
            println!("{} {}", "done".green(), time_str);
            Ok(())
        }
        Err(e) => {
            println!("{}", "failed".red());
            Err(e)
        }
    }
}
