//! # 라우트 핸들러 모듈
//!
//! HTTP 요청을 처리하는 핸들러 함수들을 모아둔 모듈입니다.
//! Axum에서 핸들러는 HTTP 요청을 받아 응답을 반환하는 async 함수입니다.
//!
//! 각 하위 모듈:
//! - `designs`: 설계 CRUD, 목록, 공유 토큰 조회
//! - `health`: 서버 상태 확인 (헬스체크)
//! - `locks`: 편집 잠금 획득/해제/하트비트/상태
//! - `snapshots`: 자동 저장, 현재 문서 조회, 수동 스냅샷
//! - `versions`: 버전 생성/목록/조회
//!
//! 설계 범위의 모든 핸들러는 먼저 설계가 존재하는지 확인한 뒤
//! `db`의 잠금/버전 함수에 위임합니다. `db` 쪽은 존재 여부를 다시 확인하지 않습니다.

pub mod designs;
pub mod health;
pub mod locks;
pub mod snapshots;
pub mod versions;

pub use designs::*;
pub use health::*;
pub use locks::*;
pub use snapshots::*;
pub use versions::*;

use crate::config::Config;
use axum::{
    routing::{get, post},
    Router,
};
use sqlx::SqlitePool;

/// 애플리케이션 공유 상태
///
/// 모든 요청 핸들러가 `State(state): State<AppState>`로 접근합니다.
/// 요청 사이에 공유되는 가변 상태는 없습니다. 풀과 읽기 전용 설정뿐입니다.
#[derive(Clone)]
pub struct AppState {
    /// SQLite 연결 풀 (내부적으로 Arc로 공유)
    pub pool: SqlitePool,
    /// 편집 잠금 만료(초). `None`이면 만료 없음
    pub lock_ttl_seconds: Option<u32>,
    pub default_page_size: i64,
    pub max_page_size: i64,
}

impl AppState {
    pub fn new(pool: SqlitePool, config: &Config) -> Self {
        Self {
            pool,
            lock_ttl_seconds: config.lock_ttl_seconds,
            default_page_size: config.default_page_size,
            max_page_size: config.max_page_size,
        }
    }
}

/// API 라우터를 구성합니다. 미들웨어(CORS, 로깅 등)는 main에서 덧붙입니다.
pub fn api_router(state: AppState) -> Router {
    Router::new()
        // 설계(Design) API
        .route("/designs", get(list_designs).post(create_design))
        .route(
            "/designs/{id}",
            get(get_design).patch(update_design).delete(delete_design),
        )
        .route("/shared/{token}", get(get_shared_design))
        // 현재 작업 상태(스냅샷) API
        .route("/designs/{id}/autosave", post(autosave_design))
        .route("/designs/{id}/current", get(get_current_document))
        .route("/designs/{id}/snapshot", post(create_snapshot_version))
        // 버전 이력 API
        .route(
            "/designs/{id}/versions",
            get(list_design_versions).post(create_design_version),
        )
        .route("/designs/{id}/versions/{number}", get(get_design_version))
        .route("/designs/{id}/latest", get(get_latest_design_version))
        // 편집 잠금 API
        .route(
            "/designs/{id}/lock",
            get(get_design_lock)
                .post(acquire_design_lock)
                .delete(release_design_lock),
        )
        .route("/designs/{id}/heartbeat", post(heartbeat_design_lock))
        // 헬스체크 API
        .route("/health", get(health_check))
        .with_state(state)
}
