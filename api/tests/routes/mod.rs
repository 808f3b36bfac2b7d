mod health_test;
mod metrics_test;
mod users_test;
