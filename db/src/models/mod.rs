pub mod metric;
pub mod metric_name;
pub mod user;

pub use metric::Entity as Metric;
pub use metric_name::MetricName;
pub use user::Entity as User;
