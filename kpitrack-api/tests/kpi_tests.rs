//! KPI endpoint tests
//!
//! Guard and payload checks run against a router with a lazily connected pool,
//! since they answer before any query. The create/read/update flows need a
//! real database and are skipped without `DATABASE_URL`.

mod common;

use axum::http::{Method, StatusCode};
use common::{founder_token, lazy_app, outsider_token, send, staff_token, TestContext};
use serde_json::json;

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let app = lazy_app();

    let (status, body) = send(&app, Method::GET, "/companies/1/metrics", None, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["status"], "failure");
    assert_eq!(body["message"], "unauthorized");
}

#[tokio::test]
async fn test_invalid_token_is_unauthorized() {
    let app = lazy_app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/companies/1",
        Some("not-a-token"),
        Some(json!({"sales": 1})),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "unauthorized");
}

#[tokio::test]
async fn test_guard_denies_every_kpi_operation() {
    let app = lazy_app();
    let callers = [outsider_token(), founder_token(2)];

    for token in &callers {
        let requests = [
            (Method::GET, "/companies/1/metrics", None),
            (Method::POST, "/companies/1", Some(json!({"sales": 100}))),
            (Method::PUT, "/companies/1/metrics", Some(json!({"sales": 150}))),
        ];

        for (method, uri, body) in requests {
            let (status, response) = send(
                &app,
                method.clone(),
                uri,
                Some(token.as_str()),
                body,
            )
            .await;

            assert_eq!(status, StatusCode::UNAUTHORIZED, "{} {}", method, uri);
            assert_eq!(response["status"], "failure");
            assert_eq!(response["message"], "user not authorized to this view");
        }
    }
}

#[tokio::test]
async fn test_empty_create_payload() {
    let app = lazy_app();
    let token = founder_token(1);

    let (status, body) = send(
        &app,
        Method::POST,
        "/companies/1",
        Some(token.as_str()),
        Some(json!({})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "failure");
    assert_eq!(body["message"], "empty metrics");
}

#[tokio::test]
async fn test_blank_value_rejected() {
    let app = lazy_app();
    let token = founder_token(1);

    for payload in [json!({"sales": ""}), json!({"sales": 100, "traffic": ""})] {
        let (status, body) = send(
            &app,
            Method::POST,
            "/companies/1",
            Some(token.as_str()),
            Some(payload),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "one of the metrics is empty");
    }
}

#[tokio::test]
async fn test_unknown_metric_rejected() {
    let app = lazy_app();
    let token = founder_token(1);

    let (status, body) = send(
        &app,
        Method::POST,
        "/companies/1",
        Some(token.as_str()),
        Some(json!({"sales": 100, "customers": 5})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "unknown metric: customers");
}

#[tokio::test]
async fn test_non_object_payload_rejected() {
    let app = lazy_app();
    let token = founder_token(1);

    let (status, body) = send(
        &app,
        Method::POST,
        "/companies/1",
        Some(token.as_str()),
        Some(json!([100])),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "invalid metrics payload");
}

#[tokio::test]
async fn test_non_numeric_company_id_not_found() {
    let app = lazy_app();
    let token = staff_token();

    let requests = [
        (Method::GET, "/companies/abc/metrics", None),
        (Method::PUT, "/companies/abc/metrics", Some(json!({"sales": 150}))),
        (Method::POST, "/companies/abc", Some(json!({"sales": 100}))),
        (Method::GET, "/companies/abc", None),
    ];

    for (method, uri, body) in requests {
        let (status, response) = send(&app, method.clone(), uri, Some(token.as_str()), body).await;

        assert_eq!(status, StatusCode::NOT_FOUND, "{} {}", method, uri);
        assert_eq!(response["status"], "failure");
        assert_eq!(response["message"], "company not found");
    }
}

#[tokio::test]
async fn test_demo_scenario() {
    let Some(ctx) = TestContext::new().await else {
        return;
    };

    let (status, body) = send(
        &ctx.app,
        Method::POST,
        &ctx.company_uri(),
        Some(ctx.founder_token.as_str()),
        Some(json!({"sales": 100})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "metrics added");
    assert_eq!(body["metrics_added"]["sales"], 100);

    let (status, body) = send(
        &ctx.app,
        Method::GET,
        &ctx.metrics_uri(),
        Some(ctx.founder_token.as_str()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sales"]["weeks"], 1);
    assert_eq!(body["sales"]["data"], json!([100]));
    assert!(body["sales"]["last_updated"].is_string());
    assert_ne!(body["sales"]["last_updated"], "NOT AVAILABLE");
    assert_eq!(body["traffic"]["weeks"], 0);
    assert_eq!(body["traffic"]["last_updated"], "NOT AVAILABLE");

    let (status, body) = send(
        &ctx.app,
        Method::PUT,
        &ctx.metrics_uri(),
        Some(ctx.founder_token.as_str()),
        Some(json!({"sales": 150})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "resource updated");

    let (status, body) = send(
        &ctx.app,
        Method::GET,
        &ctx.metrics_uri(),
        Some(ctx.staff_token.as_str()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sales"]["weeks"], 1);
    assert_eq!(body["sales"]["data"], json!([150]));

    ctx.cleanup().await;
}

#[tokio::test]
async fn test_read_lists_every_metric_in_order() {
    let Some(ctx) = TestContext::new().await else {
        return;
    };

    let (status, body) = send(
        &ctx.app,
        Method::GET,
        &ctx.metrics_uri(),
        Some(ctx.staff_token.as_str()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let keys: Vec<&str> = body
        .as_object()
        .expect("report should be an object")
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(keys.len(), 16);
    assert_eq!(keys[0], "sales");
    assert_eq!(keys[15], "other_2");

    ctx.cleanup().await;
}

#[tokio::test]
async fn test_create_then_read_returns_submitted_values() {
    let Some(ctx) = TestContext::new().await else {
        return;
    };

    let submitted = json!({"traffic": "2k", "mrr": 4200, "conversion_rate": 0.12});
    let (status, _) = send(
        &ctx.app,
        Method::POST,
        &ctx.company_uri(),
        Some(ctx.staff_token.as_str()),
        Some(submitted.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = send(
        &ctx.app,
        Method::GET,
        &ctx.metrics_uri(),
        Some(ctx.founder_token.as_str()),
        None,
    )
    .await;
    for (key, value) in submitted.as_object().unwrap() {
        let data = body[key]["data"].as_array().expect("data should be a list");
        assert_eq!(data.last(), Some(value), "{}", key);
    }

    ctx.cleanup().await;
}

#[tokio::test]
async fn test_update_without_data() {
    let Some(ctx) = TestContext::new().await else {
        return;
    };

    let (status, body) = send(
        &ctx.app,
        Method::PUT,
        &ctx.metrics_uri(),
        Some(ctx.founder_token.as_str()),
        Some(json!({"pilots": 3})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "there is no data to update");

    ctx.cleanup().await;
}

#[tokio::test]
async fn test_update_is_all_or_nothing() {
    let Some(ctx) = TestContext::new().await else {
        return;
    };

    let (status, _) = send(
        &ctx.app,
        Method::POST,
        &ctx.company_uri(),
        Some(ctx.founder_token.as_str()),
        Some(json!({"sales": 100})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &ctx.app,
        Method::PUT,
        &ctx.metrics_uri(),
        Some(ctx.founder_token.as_str()),
        Some(json!({"sales": 150, "pilots": 3})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "there is no data to update");

    let (_, body) = send(
        &ctx.app,
        Method::GET,
        &ctx.metrics_uri(),
        Some(ctx.founder_token.as_str()),
        None,
    )
    .await;
    assert_eq!(body["sales"]["data"], json!([100]));

    ctx.cleanup().await;
}

#[tokio::test]
async fn test_unknown_company_not_found() {
    let Some(ctx) = TestContext::new().await else {
        return;
    };

    let missing = "/companies/999999999";
    let (status, body) = send(
        &ctx.app,
        Method::POST,
        missing,
        Some(ctx.staff_token.as_str()),
        Some(json!({"sales": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "company not found");

    let (status, _) = send(
        &ctx.app,
        Method::GET,
        &format!("{}/metrics", missing),
        Some(ctx.staff_token.as_str()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    ctx.cleanup().await;
}
