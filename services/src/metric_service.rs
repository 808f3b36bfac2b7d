use chrono::{DateTime, TimeDelta, Utc};
use db::models::metric::{ActiveModel, Column, Entity};
use db::models::MetricName;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use serde::Serialize;
use serde_json::Value;
use strum::IntoEnumIterator;

use crate::error::ServiceError;

pub use db::models::metric::Model as Metric;

/// A generated value waiting to be persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSample {
    pub name: MetricName,
    pub value: f64,
    pub metadata: Value,
}

/// Aggregates over one series, computed from newest-first values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statistics {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub average: f64,
    pub latest: f64,
}

impl Statistics {
    /// `None` for an empty slice. `values[0]` is taken as the latest sample.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let latest = *values.first()?;
        let (min, max, sum) = values.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY, 0.0),
            |(min, max, sum), v| (min.min(*v), max.max(*v), sum + v),
        );
        let average = round2(sum / values.len() as f64).clamp(min, max);

        Some(Self {
            count: values.len(),
            min,
            max,
            average,
            latest,
        })
    }
}

/// One entry of the all-series summary.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSummary {
    pub name: MetricName,
    pub statistics: Option<Statistics>,
    pub last_updated: Option<DateTime<Utc>>,
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Start of the trailing window ending now, never earlier than the Unix epoch.
pub fn window_start(hours: i64) -> DateTime<Utc> {
    TimeDelta::try_hours(hours)
        .and_then(|delta| Utc::now().checked_sub_signed(delta))
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
        .max(DateTime::<Utc>::UNIX_EPOCH)
}

#[derive(Clone)]
pub struct MetricService {
    db: DatabaseConnection,
}

impl MetricService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn insert(&self, sample: &MetricSample) -> Result<Metric, ServiceError> {
        let active = ActiveModel {
            name: Set(sample.name.to_string()),
            value: Set(sample.value),
            timestamp: Set(Utc::now()),
            metadata: Set(sample.metadata.clone()),
            ..Default::default()
        };
        Ok(active.insert(&self.db).await?)
    }

    /// Most recent `limit` samples across all series, newest first.
    pub async fn recent(&self, limit: u64) -> Result<Vec<Metric>, ServiceError> {
        Ok(Entity::find()
            .order_by_desc(Column::Timestamp)
            .order_by_desc(Column::Id)
            .limit(limit)
            .all(&self.db)
            .await?)
    }

    /// Samples of `name` inside the trailing `hours` window, newest first.
    pub async fn by_name(&self, name: &str, hours: i64) -> Result<Vec<Metric>, ServiceError> {
        Ok(Entity::find()
            .filter(Column::Name.eq(name))
            .filter(Column::Timestamp.gte(window_start(hours)))
            .order_by_desc(Column::Timestamp)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await?)
    }

    /// Statistics for every fixed series over the trailing `hours` window.
    pub async fn summary(&self, hours: i64) -> Result<Vec<SeriesSummary>, ServiceError> {
        let mut summary = Vec::new();
        for name in MetricName::iter() {
            let rows = self.by_name(name.as_ref(), hours).await?;
            let values: Vec<f64> = rows.iter().map(|m| m.value).collect();
            summary.push(SeriesSummary {
                name,
                statistics: Statistics::from_values(&values),
                last_updated: rows.first().map(|m| m.timestamp),
            });
        }
        Ok(summary)
    }
}
