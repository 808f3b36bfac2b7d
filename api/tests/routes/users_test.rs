#[cfg(test)]
mod tests {
    use crate::helpers::app::{delete, get, json_request, post_json, put_json};
    use crate::helpers::{get_json_body, make_test_app};
    use api::state::AppState;
    use axum::http::StatusCode;
    use serde_json::{Value, json};
    use services::user_service::{PageRequest, UserInput};
    use tower::ServiceExt;

    async fn seed_user(state: &AppState, name: &str, email: &str) -> i64 {
        let input = UserInput::parse(Some(name), Some(email)).unwrap();
        state.users().create(input).await.unwrap().id
    }

    async fn user_count(state: &AppState) -> u64 {
        state
            .users()
            .list(PageRequest::new(None, None))
            .await
            .unwrap()
            .pagination
            .total
    }

    // --- POST /api/users ---

    #[tokio::test]
    async fn create_normalizes_name_and_email() {
        let (app, _) = make_test_app().await;

        let response = app
            .oneshot(post_json(
                "/api/users",
                json!({ "name": "  Ada Lovelace ", "email": "Ada@Example.COM" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let json = get_json_body(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "User created successfully");
        assert_eq!(json["data"]["name"], "Ada Lovelace");
        assert_eq!(json["data"]["email"], "ada@example.com");
        assert!(json["data"]["id"].is_i64());
        assert!(json["data"]["created_at"].is_string());
    }

    #[tokio::test]
    async fn create_duplicate_email_conflicts_and_keeps_existing_row() {
        let (app, state) = make_test_app().await;
        let id = seed_user(&state, "Ada", "ada@example.com").await;

        let response = app
            .oneshot(post_json(
                "/api/users",
                json!({ "name": "Impostor", "email": "ADA@example.com" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(get_json_body(response).await["error"], "Email already exists");

        assert_eq!(user_count(&state).await, 1);
        assert_eq!(state.users().find(id).await.unwrap().name, "Ada");
    }

    #[tokio::test]
    async fn create_rejects_bad_payloads_without_writing() {
        let (app, state) = make_test_app().await;

        let cases: Vec<(Value, &str)> = vec![
            (json!({ "email": "a@b.co" }), "Name and email are required"),
            (json!({ "name": "   ", "email": "a@b.co" }), "Name and email are required"),
            (json!({ "name": "Ada", "email": "not-an-email" }), "Invalid email format"),
            (json!({ "name": "Ada", "email": "a@b" }), "Invalid email format"),
        ];

        for (body, error) in cases {
            let response = app
                .clone()
                .oneshot(post_json("/api/users", body.clone()))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{body}");
            let json = get_json_body(response).await;
            assert_eq!(json["success"], false);
            assert_eq!(json["error"], error);
        }

        let response = app
            .oneshot(json_request("POST", "/api/users", "{not json".into()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        assert_eq!(user_count(&state).await, 0);
    }

    // --- GET /api/users ---

    #[tokio::test]
    async fn list_paginates_newest_first() {
        let (app, state) = make_test_app().await;
        for i in 0..5 {
            seed_user(&state, &format!("User {i}"), &format!("user{i}@example.com")).await;
        }

        let response = app
            .clone()
            .oneshot(get("/api/users?page=1&limit=2"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = get_json_body(response).await;
        let users = json["data"].as_array().unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0]["email"], "user4@example.com");
        assert_eq!(
            json["pagination"],
            json!({
                "page": 1,
                "limit": 2,
                "total": 5,
                "totalPages": 3,
                "hasNext": true,
                "hasPrev": false,
            })
        );

        let response = app.oneshot(get("/api/users?page=3&limit=2")).await.unwrap();
        let json = get_json_body(response).await;
        assert_eq!(json["data"].as_array().unwrap().len(), 1);
        assert_eq!(json["pagination"]["hasNext"], false);
        assert_eq!(json["pagination"]["hasPrev"], true);
    }

    #[tokio::test]
    async fn list_caps_page_size() {
        let (app, _) = make_test_app().await;

        let response = app.oneshot(get("/api/users?limit=500")).await.unwrap();
        let json = get_json_body(response).await;
        assert_eq!(json["pagination"]["limit"], 50);
        assert_eq!(json["pagination"]["totalPages"], 0);
    }

    #[tokio::test]
    async fn list_past_the_last_page_is_empty() {
        let (app, state) = make_test_app().await;
        seed_user(&state, "Ada", "ada@example.com").await;

        let response = app
            .oneshot(get("/api/users?page=9223372036854775807&limit=50"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = get_json_body(response).await;
        assert_eq!(json["success"], true);
        assert!(json["data"].as_array().unwrap().is_empty());
        assert_eq!(json["pagination"]["total"], 1);
        assert_eq!(json["pagination"]["hasNext"], false);
        assert_eq!(json["pagination"]["hasPrev"], true);
    }

    #[tokio::test]
    async fn list_tolerates_repeated_and_garbage_params() {
        let (app, _) = make_test_app().await;

        let response = app
            .oneshot(get("/api/users?page=abc&limit=2&limit=40&limit"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = get_json_body(response).await;
        assert_eq!(json["pagination"]["page"], 1);
        assert_eq!(json["pagination"]["limit"], 2);
    }

    #[tokio::test]
    async fn create_rejects_padded_email() {
        let (app, state) = make_test_app().await;

        let response = app
            .oneshot(post_json(
                "/api/users",
                json!({ "name": "Ada", "email": "  a@b.co " }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(get_json_body(response).await["error"], "Invalid email format");
        assert_eq!(user_count(&state).await, 0);
    }

    // --- GET /api/users/{id} ---

    #[tokio::test]
    async fn get_user_by_id() {
        let (app, state) = make_test_app().await;
        let id = seed_user(&state, "Ada", "ada@example.com").await;

        let response = app
            .clone()
            .oneshot(get(&format!("/api/users/{id}")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(get_json_body(response).await["data"]["email"], "ada@example.com");

        let response = app.clone().oneshot(get("/api/users/9999")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(get_json_body(response).await["error"], "User not found");

        let response = app.clone().oneshot(get("/api/users/abc")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(get_json_body(response).await["error"], "Invalid user ID");

        // Percent-decodes to invalid UTF-8.
        let response = app.oneshot(get("/api/users/%FF")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = get_json_body(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Invalid user ID");
    }

    // --- PUT /api/users/{id} ---

    #[tokio::test]
    async fn update_rewrites_user() {
        let (app, state) = make_test_app().await;
        let id = seed_user(&state, "Ada", "ada@example.com").await;

        let response = app
            .oneshot(put_json(
                &format!("/api/users/{id}"),
                json!({ "name": " Ada King ", "email": "ADA.KING@example.com" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = get_json_body(response).await;
        assert_eq!(json["message"], "User updated successfully");
        assert_eq!(json["data"]["name"], "Ada King");
        assert_eq!(json["data"]["email"], "ada.king@example.com");
    }

    #[tokio::test]
    async fn update_error_cases() {
        let (app, state) = make_test_app().await;
        let ada = seed_user(&state, "Ada", "ada@example.com").await;
        seed_user(&state, "Bob", "bob@example.com").await;

        let valid = json!({ "name": "Ghost", "email": "ghost@example.com" });

        let response = app
            .clone()
            .oneshot(put_json("/api/users/9999", valid.clone()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app
            .clone()
            .oneshot(put_json("/api/users/x1", valid))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app
            .clone()
            .oneshot(put_json(
                &format!("/api/users/{ada}"),
                json!({ "name": "Ada", "email": "bob@example.com" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = app
            .oneshot(put_json(
                &format!("/api/users/{ada}"),
                json!({ "name": "Ada", "email": "broken@" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let stored = state.users().find(ada).await.unwrap();
        assert_eq!(stored.email, "ada@example.com");
    }

    // --- DELETE /api/users/{id} ---

    #[tokio::test]
    async fn delete_returns_removed_user() {
        let (app, state) = make_test_app().await;
        let id = seed_user(&state, "Ada", "ada@example.com").await;

        let response = app
            .clone()
            .oneshot(delete(&format!("/api/users/{id}")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = get_json_body(response).await;
        assert_eq!(json["message"], "User deleted successfully");
        assert_eq!(
            json["data"],
            json!({ "id": id, "name": "Ada", "email": "ada@example.com" })
        );

        let response = app
            .oneshot(delete(&format!("/api/users/{id}")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(user_count(&state).await, 0);
    }
}
