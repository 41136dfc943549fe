//! 핸들러를 직접 호출하는 API 수준 테스트

mod support;

use axum::{
    body,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use schemashare::{db, error::AppError, models::*, routes, routes::AppState};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use support::{app_state, count_rows, test_db};

fn req<T: DeserializeOwned>(value: Value) -> Json<T> {
    Json(serde_json::from_value(value).expect("request body"))
}

async fn new_design(state: &AppState, body: Value) -> (Design, Option<DesignVersion>) {
    let (status, Json(created)) = routes::create_design(State(state.clone()), req(body))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::CREATED);

    let design: Design = serde_json::from_value(created["design"].clone()).unwrap();
    let version: Option<DesignVersion> =
        serde_json::from_value(created["version"].clone()).unwrap();
    (design, version)
}

async fn acquire(state: &AppState, id: &str, session: &str) -> Result<Json<Value>, AppError> {
    routes::acquire_design_lock(
        State(state.clone()),
        Path(id.to_string()),
        req(json!({ "session_id": session })),
    )
    .await
}

async fn error_json(err: AppError) -> (StatusCode, Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn edit_session_end_to_end() {
    let t = test_db().await;
    let state = app_state(&t.pool, None);

    let (design, initial) = new_design(&state, json!({ "name": "Shop ERD" })).await;
    assert!(initial.is_none());
    let id = design.id.clone();

    let Json(granted) = acquire(&state, &id, "s1").await.unwrap();
    assert_eq!(granted["success"], true);

    match acquire(&state, &id, "s2").await {
        Err(AppError::Locked { locked_by, .. }) => assert_eq!(locked_by, "s1"),
        other => panic!("expected lock conflict, got {:?}", other.map(|j| j.0)),
    }

    let Json(released) = routes::release_design_lock(
        State(state.clone()),
        Path(id.clone()),
        req(json!({ "session_id": "s1" })),
    )
    .await
    .unwrap();
    assert_eq!(released["released"], true);

    acquire(&state, &id, "s2").await.unwrap();

    for (expected, rev) in [(1, "first"), (2, "second")] {
        let (status, Json(version)) = routes::create_design_version(
            State(state.clone()),
            Path(id.clone()),
            req(json!({ "data": { "rev": rev } })),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(version.version_number, expected);
    }

    let Json(listed) = routes::list_design_versions(
        State(state.clone()),
        Path(id.clone()),
        Query(ListVersionsQuery {
            page: None,
            per_page: None,
        }),
    )
    .await
    .unwrap();
    let numbers: Vec<i64> = listed["versions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["version_number"].as_i64().unwrap())
        .collect();
    assert_eq!(numbers, vec![2, 1]);
    assert_eq!(listed["total"], 2);
}

#[tokio::test]
async fn lock_conflict_response_names_the_holder() {
    let t = test_db().await;
    let state = app_state(&t.pool, None);
    let (design, _) = new_design(&state, json!({})).await;

    acquire(&state, &design.id, "s1").await.unwrap();
    let err = acquire(&state, &design.id, "s2").await.unwrap_err();

    let (status, body) = error_json(err).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "design_locked");
    assert_eq!(body["error"]["locked_by"], "s1");
    assert!(body["error"]["locked_at"].is_string());

    let Json(status) =
        routes::get_design_lock(State(state.clone()), Path(design.id.clone()))
            .await
            .unwrap();
    assert_eq!(status["locked"], true);
    assert_eq!(status["lock"]["session_id"], "s1");
}

#[tokio::test]
async fn invalid_session_is_rejected_before_storage() {
    let t = test_db().await;
    let state = app_state(&t.pool, None);
    let (design, _) = new_design(&state, json!({})).await;

    for body in [json!({}), json!({ "session_id": "" }), json!({ "sessionId": "   " })] {
        let err = routes::acquire_design_lock(
            State(state.clone()),
            Path(design.id.clone()),
            req(body),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    // 없는 설계라도 입력 검증이 먼저입니다.
    let err = acquire(&state, "no-such-design", "").await.unwrap_err();
    let (status, body) = error_json(err).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "validation_error");

    assert_eq!(count_rows(&t.pool, "design_locks", &design.id).await, 0);
}

#[tokio::test]
async fn unknown_design_is_not_found() {
    let t = test_db().await;
    let state = app_state(&t.pool, None);

    let err = acquire(&state, "missing", "s1").await.unwrap_err();
    let (status, body) = error_json(err).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], "design not found");

    let err = routes::get_design_version(State(state.clone()), Path(("missing".to_string(), 0)))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn heartbeat_without_lock_is_not_found() {
    let t = test_db().await;
    let state = app_state(&t.pool, None);
    let (design, _) = new_design(&state, json!({})).await;

    let err = routes::heartbeat_design_lock(
        State(state.clone()),
        Path(design.id.clone()),
        req(json!({ "session_id": "s1" })),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound("lock")));

    acquire(&state, &design.id, "s1").await.unwrap();
    routes::heartbeat_design_lock(
        State(state.clone()),
        Path(design.id.clone()),
        req(json!({ "sessionId": "s1" })),
    )
    .await
    .unwrap();
}

#[tokio::test]
async fn autosave_from_foreign_session_is_refused() {
    let t = test_db().await;
    let state = app_state(&t.pool, None);
    let (design, _) = new_design(&state, json!({})).await;

    acquire(&state, &design.id, "owner").await.unwrap();

    let err = routes::autosave_design(
        State(state.clone()),
        Path(design.id.clone()),
        req(json!({ "data": { "rev": "intruder" }, "session_id": "intruder" })),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Locked { ref locked_by, .. } if locked_by == "owner"));
    assert!(db::get_snapshot(&t.pool, &design.id).await.unwrap().is_none());

    let Json(saved) = routes::autosave_design(
        State(state.clone()),
        Path(design.id.clone()),
        req(json!({ "data": { "rev": "owner" }, "session_id": "owner" })),
    )
    .await
    .unwrap();
    assert_eq!(saved.data.0, json!({ "rev": "owner" }));
}

#[tokio::test]
async fn current_document_falls_back_to_version_then_template() {
    let t = test_db().await;
    let state = app_state(&t.pool, None);

    let (blank, _) = new_design(&state, json!({ "name": "Blank" })).await;
    let Json(current) =
        routes::get_current_document(State(state.clone()), Path(blank.id.clone()))
            .await
            .unwrap();
    assert_eq!(current.source, CurrentSource::Template);
    assert_eq!(current.data["title"], "Untitled Diagram");

    let seed = json!({ "database": "mysql", "tables": [{ "name": "users" }] });
    let (seeded, initial) = new_design(&state, json!({ "name": "Seeded", "data": seed })).await;
    let initial = initial.expect("initial version");
    assert_eq!(initial.version_number, 1);
    assert_eq!(initial.version_name.as_deref(), Some("Initial version"));

    let Json(current) =
        routes::get_current_document(State(state.clone()), Path(seeded.id.clone()))
            .await
            .unwrap();
    assert_eq!(current.source, CurrentSource::Version);
    assert_eq!(current.data, seed);

    routes::autosave_design(
        State(state.clone()),
        Path(seeded.id.clone()),
        req(json!({ "data": { "tables": [] } })),
    )
    .await
    .unwrap();
    let Json(current) =
        routes::get_current_document(State(state.clone()), Path(seeded.id.clone()))
            .await
            .unwrap();
    assert_eq!(current.source, CurrentSource::Snapshot);
    assert_eq!(current.data, json!({ "tables": [] }));
}

#[tokio::test]
async fn shared_link_reads_design_and_current_document() {
    let t = test_db().await;
    let state = app_state(&t.pool, None);
    let (design, _) = new_design(&state, json!({ "name": "Shared", "data": { "tables": [] } })).await;

    let Json(shared) =
        routes::get_shared_design(State(state.clone()), Path(design.share_token.clone()))
            .await
            .unwrap();
    assert_eq!(shared["design"]["id"], design.id.as_str());
    assert_eq!(shared["current"]["source"], "version");

    let err = routes::get_shared_design(State(state.clone()), Path("not-a-token".to_string()))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound("design")));
}

#[tokio::test]
async fn snapshot_pin_requires_a_snapshot() {
    let t = test_db().await;
    let state = app_state(&t.pool, None);
    let (design, _) = new_design(&state, json!({})).await;

    let err = routes::create_snapshot_version(
        State(state.clone()),
        Path(design.id.clone()),
        Json(CreateSnapshotVersionRequest::default()),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound("snapshot")));

    db::save_snapshot(&t.pool, &design.id, &json!({ "tables": ["a"] }), None)
        .await
        .unwrap();
    let (status, Json(version)) = routes::create_snapshot_version(
        State(state.clone()),
        Path(design.id.clone()),
        req(json!({ "versionName": "Pinned" })),
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(version.version_number, 1);
    assert_eq!(version.version_name.as_deref(), Some("Pinned"));
}

#[tokio::test]
async fn delete_design_then_everything_is_gone() {
    let t = test_db().await;
    let state = app_state(&t.pool, None);
    let (design, _) = new_design(&state, json!({ "data": {} })).await;
    acquire(&state, &design.id, "s1").await.unwrap();

    let status = routes::delete_design(State(state.clone()), Path(design.id.clone()))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::NO_CONTENT);

    let err = routes::get_design_lock(State(state.clone()), Path(design.id.clone()))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound("design")));
    assert_eq!(count_rows(&t.pool, "design_versions", &design.id).await, 0);

    let err = routes::delete_design(State(state.clone()), Path(design.id.clone()))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound("design")));
}

#[tokio::test]
async fn only_transient_errors_are_retryable() {
    assert!(AppError::Transient("raced".into()).is_retryable());
    assert!(!AppError::NotFound("design").is_retryable());
    assert!(!AppError::Validation("bad".into()).is_retryable());
    assert!(!AppError::Internal("boom".into()).is_retryable());

    let (status, body) = error_json(AppError::Transient("raced".into())).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"]["code"], "transient_error");
}

#[tokio::test]
async fn health_check_reaches_database() {
    let t = test_db().await;
    let state = app_state(&t.pool, None);

    let Json(health) = routes::health_check(State(state)).await.unwrap();
    assert_eq!(health["status"], "ok");
}
