//! End-to-end comparison tests against in-process stub APIs

use std::time::Duration;

use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use hadith_compare::client::RequestParams;
use hadith_compare::compare::DiffKind;
use hadith_compare::config::HarnessConfig;
use hadith_compare::harness::Comparator;
use hadith_compare::HarnessError;

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

async fn serve_detail(body: Value) -> String {
    serve(Router::new().route(
        "/v1/collections/bukhari",
        get(move || async move { Json(body) }),
    ))
    .await
}

fn config(baseline_url: String, candidate_url: String) -> HarnessConfig {
    HarnessConfig {
        database_url: String::new(),
        baseline_url,
        candidate_url,
        auth_token: String::new(),
        page_limit: 100,
        include_random: false,
        request_timeout: Duration::from_secs(5),
    }
}

#[tokio::test]
async fn added_key_is_reported_as_one_addition() {
    let baseline_url = serve_detail(json!({"id": 1, "name": "Bukhari"})).await;
    let candidate_url = serve_detail(json!({"id": 1, "name": "Bukhari", "extra": true})).await;

    let mut comparator = Comparator::new(&config(baseline_url, candidate_url));
    let outcome = comparator
        .compare("/v1/collections/bukhari", &RequestParams::default())
        .await
        .unwrap();

    assert!(!outcome.matched());
    assert_eq!(outcome.entries.len(), 1);
    assert_eq!(outcome.entries[0].kind, DiffKind::Added);
    assert_eq!(outcome.entries[0].path, "extra");
    assert_eq!(outcome.entries[0].candidate, "true");
}

#[tokio::test]
async fn identical_payloads_match() {
    let body = json!({"id": 1, "name": "Bukhari", "totalHadith": 7563});
    let baseline_url = serve_detail(body.clone()).await;
    let candidate_url = serve_detail(body).await;

    let mut comparator = Comparator::new(&config(baseline_url, candidate_url));
    let outcome = comparator
        .compare("/v1/collections/bukhari", &RequestParams::default())
        .await
        .unwrap();

    assert!(outcome.matched());
}

#[tokio::test]
async fn error_status_on_detail_fetch_is_surfaced_not_parsed() {
    let baseline_url = serve_detail(json!({"id": 1})).await;
    let candidate_url = serve(Router::new().route(
        "/v1/collections/bukhari",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response() }),
    ))
    .await;

    let mut comparator = Comparator::new(&config(baseline_url, candidate_url));
    let err = comparator
        .compare("/v1/collections/bukhari", &RequestParams::default())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        HarnessError::UnexpectedStatus { status, .. } if status == StatusCode::INTERNAL_SERVER_ERROR
    ));
}

#[tokio::test]
async fn bearer_token_is_attached_to_both_sides() {
    let guarded = || {
        Router::new().route(
            "/v1/collections/bukhari",
            get(|headers: HeaderMap| async move {
                match headers.get("authorization").and_then(|v| v.to_str().ok()) {
                    Some("Bearer secret-token") => Json(json!({"id": 1})).into_response(),
                    _ => StatusCode::UNAUTHORIZED.into_response(),
                }
            }),
        )
    };
    let baseline_url = serve(guarded()).await;
    let candidate_url = serve(guarded()).await;

    let mut config = config(baseline_url, candidate_url);
    config.auth_token = "secret-token".to_string();

    let mut comparator = Comparator::new(&config);
    let outcome = comparator
        .compare("/v1/collections/bukhari", &RequestParams::default())
        .await
        .unwrap();

    assert!(outcome.matched());
}

#[tokio::test]
async fn advisory_outcome_never_counts_as_a_regression() {
    let baseline_url = serve(Router::new().route(
        "/v1/hadiths/random",
        get(|| async { Json(json!({"urn": 100})) }),
    ))
    .await;
    let candidate_url = serve(Router::new().route(
        "/v1/hadiths/random",
        get(|| async { Json(json!({"urn": 200})) }),
    ))
    .await;

    let mut comparator = Comparator::new(&config(baseline_url, candidate_url));
    let outcome = comparator
        .compare_advisory("/v1/hadiths/random", &RequestParams::default())
        .await
        .unwrap();

    assert!(!outcome.matched());

    let summary = comparator.summary();
    assert_eq!(summary.compared, 1);
    assert_eq!(summary.mismatched, 0);
}
