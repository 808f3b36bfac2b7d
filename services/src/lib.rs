pub mod error;
pub mod generator;
pub mod metric_service;
pub mod user_service;

pub use error::ServiceError;
pub use generator::MetricGenerator;
pub use metric_service::MetricService;
pub use user_service::UserService;
