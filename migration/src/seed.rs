use chrono::Utc;
use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr};
use sea_orm_migration::prelude::*;

use crate::migrations::m202601150001_create_users::Users;

/// Users inserted into an empty `users` table.
pub const SAMPLE_USERS: [(&str, &str); 3] = [
    ("John Doe", "john.doe@example.com"),
    ("Jane Smith", "jane.smith@example.com"),
    ("Bob Johnson", "bob.johnson@example.com"),
];

/// Inserts [`SAMPLE_USERS`] when the `users` table is empty.
///
/// Returns the number of rows written. Existing emails are skipped.
pub async fn insert_sample_data(db: &DatabaseConnection) -> Result<u64, DbErr> {
    let backend = db.get_database_backend();

    let count = Query::select()
        .expr(Expr::cust("COUNT(*)"))
        .from(Users::Table)
        .to_owned();
    let existing: i64 = match db.query_one(backend.build(&count)).await? {
        Some(row) => row.try_get_by_index(0)?,
        None => 0,
    };

    if existing > 0 {
        tracing::debug!(existing, "users table not empty, skipping sample data");
        return Ok(0);
    }

    tracing::info!("Inserting sample users...");
    let mut inserted = 0;
    for (name, email) in SAMPLE_USERS {
        let now = Utc::now();
        let insert = Query::insert()
            .into_table(Users::Table)
            .columns([Users::Name, Users::Email, Users::CreatedAt, Users::UpdatedAt])
            .values([name.into(), email.into(), now.into(), now.into()])
            .map_err(|e| DbErr::Custom(e.to_string()))?
            .on_conflict(OnConflict::column(Users::Email).do_nothing().to_owned())
            .to_owned();

        inserted += db.execute(backend.build(&insert)).await?.rows_affected();
    }
    tracing::info!(inserted, "Sample users inserted successfully");

    Ok(inserted)
}
