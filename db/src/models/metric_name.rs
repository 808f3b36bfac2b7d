use serde::Serialize;
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// The fixed set of series the generator produces, in generation order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString, Display, AsRefStr, Serialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MetricName {
    CpuUsage,
    MemoryUsage,
    DiskUsage,
    NetworkLatency,
    RequestCount,
    ErrorRate,
    ActiveUsers,
}
