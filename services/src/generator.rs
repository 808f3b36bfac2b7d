//! Synthetic metric generation.
//!
//! [`MetricGenerator`] owns the running/stopped state of the periodic job. Each
//! tick spawns its cycle as an independent task, so a cycle that outlives the
//! period overlaps with the next one.

use std::ops::RangeInclusive;
use std::sync::Mutex;
use std::time::Duration;

use chrono::{SecondsFormat, Utc};
use db::models::MetricName;
use rand::Rng;
use sea_orm::DatabaseConnection;
use serde_json::{json, Map, Value};
use strum::IntoEnumIterator;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error::ServiceError;
use crate::metric_service::{round2, Metric, MetricSample, MetricService};

pub const GENERATION_INTERVAL: Duration = Duration::from_secs(30);
pub const METADATA_SOURCE: &str = "data-generator";
pub const METADATA_VERSION: &str = "1.0.0";

/// Closed range every generated value of `name` falls into.
pub fn value_range(name: MetricName) -> RangeInclusive<f64> {
    match name {
        MetricName::CpuUsage | MetricName::MemoryUsage | MetricName::DiskUsage => 0.0..=100.0,
        MetricName::NetworkLatency => 10.0..=210.0,
        MetricName::RequestCount => 100.0..=1099.0,
        MetricName::ErrorRate => 0.0..=5.0,
        MetricName::ActiveUsers => 50.0..=549.0,
    }
}

pub fn sample_value<R: Rng + ?Sized>(name: MetricName, rng: &mut R) -> f64 {
    match name {
        MetricName::CpuUsage | MetricName::MemoryUsage | MetricName::DiskUsage => {
            round2(rng.random_range(0.0..100.0))
        }
        MetricName::NetworkLatency => round2(rng.random_range(10.0..210.0)),
        MetricName::RequestCount => rng.random_range(100..1100) as f64,
        MetricName::ErrorRate => round2(rng.random_range(0.0..5.0)),
        MetricName::ActiveUsers => rng.random_range(50..550) as f64,
    }
}

pub fn sample_metadata<R: Rng + ?Sized>(name: MetricName, rng: &mut R) -> Value {
    let mut metadata = Map::new();
    metadata.insert(
        "timestamp".into(),
        json!(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
    );
    metadata.insert("source".into(), json!(METADATA_SOURCE));
    metadata.insert("version".into(), json!(METADATA_VERSION));

    match name {
        MetricName::CpuUsage => {
            metadata.insert("cores".into(), json!(rng.random_range(2..10)));
            metadata.insert(
                "temperature".into(),
                json!(round2(rng.random_range(40.0..70.0))),
            );
        }
        MetricName::MemoryUsage => {
            metadata.insert("total_memory".into(), json!("8GB"));
            metadata.insert(
                "available_memory".into(),
                json!(format!("{}GB", round2(rng.random_range(2.0..6.0)))),
            );
        }
        MetricName::NetworkLatency => {
            metadata.insert(
                "endpoint".into(),
                json!(format!("api-{}.example.com", rng.random_range(1..4))),
            );
            let protocol = if rng.random_bool(0.5) { "https" } else { "http" };
            metadata.insert("protocol".into(), json!(protocol));
        }
        _ => {}
    }

    Value::Object(metadata)
}

/// One sample per fixed series, in [`MetricName`] order.
pub fn sample_cycle<R: Rng + ?Sized>(rng: &mut R) -> Vec<MetricSample> {
    MetricName::iter()
        .map(|name| MetricSample {
            name,
            value: sample_value(name, rng),
            metadata: sample_metadata(name, rng),
        })
        .collect()
}

/// Generates and inserts one cycle. Rows are committed one at a time; the first
/// failure abandons the rest of the cycle.
async fn run_cycle(metrics: &MetricService) -> Result<Vec<Metric>, ServiceError> {
    let samples = sample_cycle(&mut rand::rng());

    let mut saved = Vec::with_capacity(samples.len());
    for sample in &samples {
        saved.push(metrics.insert(sample).await?);
    }

    tracing::info!(count = saved.len(), "Generated and saved metrics");
    Ok(saved)
}

struct Running {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

pub struct MetricGenerator {
    metrics: MetricService,
    interval: Duration,
    running: Mutex<Option<Running>>,
}

impl MetricGenerator {
    pub fn new(db: DatabaseConnection) -> Self {
        Self::with_interval(db, GENERATION_INTERVAL)
    }

    pub fn with_interval(db: DatabaseConnection, interval: Duration) -> Self {
        Self {
            metrics: MetricService::new(db),
            interval,
            running: Mutex::new(None),
        }
    }

    pub fn metrics(&self) -> &MetricService {
        &self.metrics
    }

    /// True while the schedule is started and its loop task is still alive.
    pub fn is_running(&self) -> bool {
        self.lock_running()
            .as_ref()
            .is_some_and(|running| !running.handle.is_finished())
    }

    /// Runs a cycle right away, then one per interval until [`stop`](Self::stop).
    ///
    /// Returns `false` (and warns) when the job is already running.
    pub fn start(&self) -> bool {
        let mut running = self.lock_running();
        if running.is_some() {
            tracing::warn!("Data generator is already running");
            return false;
        }

        tracing::info!(
            interval_secs = self.interval.as_secs(),
            "Starting data generator"
        );

        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let metrics = self.metrics.clone();
        let period = self.interval;

        let handle = tokio::spawn(async move {
            // The first tick completes immediately.
            let mut ticker = tokio::time::interval(period);
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        let metrics = metrics.clone();
                        tokio::spawn(async move {
                            if let Err(e) = run_cycle(&metrics).await {
                                tracing::error!(error = %e, "Error generating data");
                            }
                        });
                    }
                }
            }
            tracing::debug!("Data generator loop exited");
        });

        *running = Some(Running { cancel, handle });
        true
    }

    /// Cancels the schedule. Cycles already in flight finish on their own.
    ///
    /// Returns `false` when the job was not running.
    pub fn stop(&self) -> bool {
        let Some(running) = self.lock_running().take() else {
            return false;
        };

        tracing::info!("Stopping data generator");
        running.cancel.cancel();
        drop(running.handle);
        true
    }

    /// Runs one cycle on the caller's task, independent of the schedule.
    pub async fn generate(&self) -> Result<Vec<Metric>, ServiceError> {
        run_cycle(&self.metrics).await
    }

    pub async fn recent(&self, limit: u64) -> Result<Vec<Metric>, ServiceError> {
        self.metrics.recent(limit).await
    }

    pub async fn by_name(&self, name: &str, hours: i64) -> Result<Vec<Metric>, ServiceError> {
        self.metrics.by_name(name, hours).await
    }

    fn lock_running(&self) -> std::sync::MutexGuard<'_, Option<Running>> {
        // The guarded state stays consistent even if a holder panicked.
        self.running
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Drop for MetricGenerator {
    fn drop(&mut self) {
        self.stop();
    }
}
