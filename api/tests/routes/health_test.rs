#[cfg(test)]
mod tests {
    use crate::helpers::app::get;
    use crate::helpers::{get_json_body, make_test_app};
    use axum::http::StatusCode;
    use tower::ServiceExt;

    #[tokio::test]
    async fn health_check_reports_database_and_memory() {
        let (app, _) = make_test_app().await;

        let response = app.oneshot(get("/api/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = get_json_body(response).await;
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["database"]["status"], "connected");
        assert!(json["database"]["responseTime"].as_str().unwrap().ends_with("ms"));
        assert!(json["uptime"].as_f64().unwrap() >= 0.0);
        assert!(json["memory"]["rss"].is_u64());
        assert!(json["timestamp"].is_string());
        assert!(json["version"].is_string());
    }

    #[tokio::test]
    async fn health_check_fails_without_database() {
        let (app, state) = make_test_app().await;
        state.db().clone().close().await.unwrap();

        let response = app.oneshot(get("/api/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let json = get_json_body(response).await;
        assert_eq!(json["status"], "unhealthy");
        assert_eq!(json["error"], "Database connection failed");
    }

    #[tokio::test]
    async fn detailed_health_lists_checks() {
        let (app, _) = make_test_app().await;

        let response = app.oneshot(get("/api/health/detailed")).await.unwrap();
        let status = response.status();
        let json = get_json_body(response).await;

        let checks = json["checks"].as_array().unwrap();
        assert_eq!(checks.len(), 2);
        assert_eq!(checks[0]["name"], "database");
        assert_eq!(checks[0]["status"], "pass");
        assert_eq!(checks[1]["name"], "memory");
        assert!(checks[1]["usage"].as_str().unwrap().ends_with('%'));

        // The memory check depends on the host, so only the pairing is fixed.
        if checks[1]["status"] == "pass" {
            assert_eq!(status, StatusCode::OK);
            assert_eq!(json["status"], "healthy");
        } else {
            assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
            assert_eq!(json["status"], "degraded");
        }

        assert_eq!(json["system"]["pid"], std::process::id());
        assert_eq!(json["system"]["platform"], std::env::consts::OS);
    }

    #[tokio::test]
    async fn detailed_health_degrades_without_database() {
        let (app, state) = make_test_app().await;
        state.db().clone().close().await.unwrap();

        let response = app.oneshot(get("/api/health/detailed")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let json = get_json_body(response).await;
        assert_eq!(json["status"], "degraded");
        assert_eq!(json["checks"][0]["status"], "fail");
        assert!(json["checks"][0]["error"].is_string());
    }
}
