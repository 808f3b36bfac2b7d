#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use crate::helpers::app::{get, post_json};
    use crate::helpers::{get_json_body, make_test_app};
    use axum::http::StatusCode;
    use db::models::MetricName;
    use serde_json::{Value, json};
    use services::generator::value_range;
    use services::metric_service::MetricSample;
    use tower::ServiceExt;

    #[tokio::test]
    async fn generate_inserts_one_sample_per_series() {
        let (app, _) = make_test_app().await;

        let response = app
            .clone()
            .oneshot(post_json("/api/metrics/generate", json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = get_json_body(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "Data generation triggered successfully");
        assert!(json["timestamp"].is_string());

        let response = app.oneshot(get("/api/metrics")).await.unwrap();
        let json = get_json_body(response).await;
        assert_eq!(json["count"], 7);

        let rows = json["data"].as_array().unwrap();
        let names: HashSet<&str> = rows.iter().map(|r| r["name"].as_str().unwrap()).collect();
        assert_eq!(names.len(), 7);

        for row in rows {
            let name: MetricName = row["name"].as_str().unwrap().parse().unwrap();
            let value = row["value"].as_f64().unwrap();
            assert!(value_range(name).contains(&value), "{name}: {value}");
            assert_eq!(row["metadata"]["source"], "data-generator");
        }
    }

    #[tokio::test]
    async fn list_respects_limit() {
        let (app, state) = make_test_app().await;
        state.generator().generate().await.unwrap();
        state.generator().generate().await.unwrap();

        let response = app.clone().oneshot(get("/api/metrics?limit=3")).await.unwrap();
        let json = get_json_body(response).await;
        assert_eq!(json["count"], 3);

        // Garbage falls back to the default.
        let response = app.oneshot(get("/api/metrics?limit=abc")).await.unwrap();
        let json = get_json_body(response).await;
        assert_eq!(json["count"], 14);
    }

    #[tokio::test]
    async fn repeated_query_keys_keep_first_value() {
        let (app, state) = make_test_app().await;
        state.generator().generate().await.unwrap();

        let response = app
            .clone()
            .oneshot(get("/api/metrics?limit=1&limit=2"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = get_json_body(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["count"], 1);

        let response = app
            .oneshot(get("/api/metrics/summary/all?hours=6&hours=x"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(get_json_body(response).await["period"], "6 hours");
    }

    #[tokio::test]
    async fn undecodable_metric_name_is_a_json_error() {
        let (app, _) = make_test_app().await;

        let response = app.oneshot(get("/api/metrics/%FF%FE")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = get_json_body(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Invalid metric name");
    }

    #[tokio::test]
    async fn unknown_or_empty_series_is_not_found() {
        let (app, _) = make_test_app().await;

        let response = app.oneshot(get("/api/metrics/cpu_usage?hours=2")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let json = get_json_body(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "No metrics found for 'cpu_usage' in the last 2 hours");
    }

    #[tokio::test]
    async fn series_statistics_bound_the_average() {
        let (app, state) = make_test_app().await;
        let metrics = state.generator().metrics();
        for value in [10.0, 55.5, 30.25] {
            metrics
                .insert(&MetricSample {
                    name: MetricName::CpuUsage,
                    value,
                    metadata: json!({}),
                })
                .await
                .unwrap();
        }

        let response = app.oneshot(get("/api/metrics/cpu_usage")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = get_json_body(response).await;
        assert_eq!(json["metric"], "cpu_usage");
        assert_eq!(json["period"], "24 hours");

        let stats = &json["statistics"];
        assert_eq!(stats["count"], 3);
        assert_eq!(stats["min"], 10.0);
        assert_eq!(stats["max"], 55.5);
        let average = stats["average"].as_f64().unwrap();
        assert!((10.0..=55.5).contains(&average));

        // Newest row first, and `latest` is its value.
        let data = json["data"].as_array().unwrap();
        assert_eq!(data.len(), 3);
        assert_eq!(stats["latest"], data[0]["value"]);
        assert_eq!(data[0]["value"], 30.25);
    }

    #[tokio::test]
    async fn summary_reports_every_series() {
        let (app, state) = make_test_app().await;
        state
            .generator()
            .metrics()
            .insert(&MetricSample {
                name: MetricName::ErrorRate,
                value: 1.25,
                metadata: json!({}),
            })
            .await
            .unwrap();

        let response = app.oneshot(get("/api/metrics/summary/all?hours=6")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = get_json_body(response).await;
        assert_eq!(json["period"], "6 hours");
        assert!(json["generatedAt"].is_string());

        let summary = json["summary"].as_object().unwrap();
        assert_eq!(summary.len(), 7);

        let error_rate = &summary["error_rate"];
        assert_eq!(error_rate["count"], 1);
        assert_eq!(error_rate["latest"], 1.25);
        assert!(error_rate["lastUpdated"].is_string());

        let empty: Vec<&Value> = summary.values().filter(|v| v["count"] == 0).collect();
        assert_eq!(empty.len(), 6);
        assert!(empty.iter().all(|v| v["message"] == "No data available"));
    }

    #[tokio::test]
    async fn generate_fails_when_database_is_gone() {
        let (app, state) = make_test_app().await;
        state.db().clone().close().await.unwrap();

        let response = app
            .oneshot(post_json("/api/metrics/generate", json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = get_json_body(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Failed to trigger data generation");
    }
}
