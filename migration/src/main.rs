use colored::*;
use migration::seed;
use sea_orm::Database;
use std::env;
use util::config::AppConfig;

mod runner;

#[tokio::main]
async fn main() {
    let url = AppConfig::global().database_url();
    let args: Vec<String> = env::args().collect();

    let db = match Database::connect(&url).await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("{} {}", "DB connection failed:".red(), e);
            std::process::exit(1);
        }
    };

    let result = match args.get(1).map(|s| s.as_str()) {
        Some("fresh") => match runner::revert_all_migrations(&db).await {
            Ok(()) => runner::run_all_migrations(&db).await,
            Err(e) => Err(e),
        },
        _ => runner::run_all_migrations(&db).await,
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Migration failed:".red(), e);
        std::process::exit(1);
    }

    match seed::insert_sample_data(&db).await {
        Ok(0) => println!("Sample data already present"),
        Ok(n) => println!("Inserted {} sample users", n.to_string().bold()),
        Err(e) => eprintln!("{} {}", "Failed to insert sample data:".yellow(), e),
    }

    db.close().await.ok();
}
