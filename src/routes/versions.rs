use crate::{
    db,
    error::AppError,
    models::*,
    routes::AppState,
    services,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

/// `POST /designs/{id}/versions` — 주어진 데이터로 새 버전을 기록합니다.
pub async fn create_design_version(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<CreateVersionRequest>,
) -> Result<(StatusCode, Json<DesignVersion>), AppError> {
    db::get_design(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound("design"))?;

    let version = db::create_version(
        &state.pool,
        &id,
        &req.data,
        req.version_name.as_deref(),
        req.comment.as_deref(),
        req.created_by.as_deref(),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(version)))
}

/// `GET /designs/{id}/versions?page=1&per_page=20`
///
/// 최신 버전이 먼저 옵니다. 응답: `{ "versions": [...], "total", "page", "per_page" }`
pub async fn list_design_versions(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ListVersionsQuery>,
) -> Result<Json<Value>, AppError> {
    db::get_design(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound("design"))?;

    let (limit, offset) = services::page_to_limit_offset(
        query.page,
        query.per_page,
        state.default_page_size,
        state.max_page_size,
    )?;
    let page = db::list_versions(&state.pool, &id, limit, offset).await?;

    Ok(Json(json!({
        "versions": page.versions,
        "total": page.total,
        "page": query.page.unwrap_or(1),
        "per_page": limit,
    })))
}

pub async fn get_design_version(
    State(state): State<AppState>,
    Path((id, number)): Path<(String, i64)>,
) -> Result<Json<DesignVersion>, AppError> {
    if number < 1 {
        return Err(AppError::Validation(
            "version number must be >= 1".to_string(),
        ));
    }

    db::get_design(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound("design"))?;

    let version = db::get_version(&state.pool, &id, number)
        .await?
        .ok_or(AppError::NotFound("version"))?;
    Ok(Json(version))
}

/// `GET /designs/{id}/latest` — 번호가 가장 큰 버전
pub async fn get_latest_design_version(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DesignVersion>, AppError> {
    db::get_design(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound("design"))?;

    let version = db::get_latest_version(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound("version"))?;
    Ok(Json(version))
}
