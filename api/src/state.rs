use std::sync::Arc;
use std::time::Instant;

use sea_orm::DatabaseConnection;
use services::{MetricGenerator, UserService};

/// Shared handles every route needs. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    db: DatabaseConnection,
    users: UserService,
    generator: Arc<MetricGenerator>,
    started_at: Instant,
}

impl AppState {
    pub fn new(db: DatabaseConnection) -> Self {
        let generator = Arc::new(MetricGenerator::new(db.clone()));
        Self::with_generator(db, generator)
    }

    pub fn with_generator(db: DatabaseConnection, generator: Arc<MetricGenerator>) -> Self {
        Self {
            users: UserService::new(db.clone()),
            db,
            generator,
            started_at: Instant::now(),
        }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub fn users(&self) -> &UserService {
        &self.users
    }

    pub fn generator(&self) -> &Arc<MetricGenerator> {
        &self.generator
    }

    /// Seconds since the state was built, i.e. since process startup.
    pub fn uptime_secs(&self) -> f64 {
        self.started_at.elapsed().as_secs_f64()
    }
}
