//! # 에러 타입
//!
//! 잠금, 스냅샷, 버전, 설계 레지스트리의 모든 실패는 `AppError` 하나로 모입니다.
//! 핸들러가 `Err(AppError)`를 반환하면 `IntoResponse`가
//! `{ "error": { "code", "message" } }` 형태의 응답으로 바꿉니다.
//!
//! ## 에러 분류
//! | variant | HTTP | 의미 |
//! |---------|------|------|
//! | `NotFound` | 404 | 설계/버전/스냅샷/잠금이 없음 |
//! | `Validation` | 400 | 저장소 호출 전에 거부된 입력 |
//! | `Locked` | 409 | 다른 세션이 잠금을 보유 중 |
//! | `Transient` | 503 | 재시도 한도를 넘긴 일시적 충돌 |
//! | `Internal`, `Database` | 500 | 그 외 서버 오류 (재시도하지 않음) |

use axum::{
    http::StatusCode,                   // HTTP 상태 코드 (200, 404, 500 등)
    response::{IntoResponse, Response}, // Axum의 응답 변환 트레이트
    Json,                               // JSON 응답 래퍼
};
use serde_json::json; // json! 매크로: JSON 객체를 간편하게 생성
use thiserror::Error; // thiserror: 커스텀 에러 타입을 쉽게 만들어주는 매크로 크레이트

/// 저장소 계층과 핸들러가 공유하는 에러
///
/// `Locked`만 추가 필드를 가지며, 나머지는 메시지 하나로 충분합니다.
#[derive(Debug, Error)]
pub enum AppError {
    /// 설계, 버전, 스냅샷 또는 잠금이 없음 (HTTP 404)
    /// 필드는 리소스 종류 이름입니다 (예: "design", "version").
    #[error("{0} not found")]
    NotFound(&'static str),

    /// 잘못된 입력 (HTTP 400)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// 다른 세션이 편집 잠금을 보유 중 (HTTP 409)
    /// 호출자가 기다릴지 판단할 수 있도록 보유자와 시각을 함께 돌려줍니다.
    #[error("Design is locked by session {locked_by} since {locked_at}")]
    Locked { locked_by: String, locked_at: String },

    /// 제한된 횟수만큼 재시도한 뒤에도 해결되지 않은 충돌 (HTTP 503)
    /// 클라이언트가 다시 시도해도 되는 에러입니다.
    #[error("Transient storage error: {0}")]
    Transient(String),

    /// 서버 내부 오류 (HTTP 500)
    #[error("Internal error: {0}")]
    Internal(String),

    /// 데이터베이스 오류 (HTTP 500)
    /// #[from]: sqlx::Error를 AppError로 자동 변환하는 From 트레이트를 구현합니다.
    /// sqlx 함수의 에러에 `?`를 쓰면 자동으로 AppError::Database가 됩니다.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl AppError {
    /// 같은 요청을 다시 보내면 성공할 수 있는 에러인지 여부
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::Transient(_))
    }
}

impl IntoResponse for AppError {
    /// 상태 코드와 에러 본문을 만듭니다.
    ///
    /// 내부 에러(Database, Internal)는 실제 에러 내용을 로그에만 기록하고,
    /// 클라이언트에는 일반적인 메시지만 반환합니다.
    fn into_response(self) -> Response {
        let message = self.to_string();
        let (status, body) = match self {
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, error_body("not_found", message)),
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, error_body("validation_error", msg))
            }
            // 잠금 충돌에는 보유자 정보가 추가로 붙습니다.
            AppError::Locked {
                locked_by,
                locked_at,
            } => (
                StatusCode::CONFLICT,
                json!({
                    "error": {
                        "code": "design_locked",
                        "message": message,
                        "locked_by": locked_by,
                        "locked_at": locked_at
                    }
                }),
            ),
            AppError::Transient(msg) => {
                tracing::warn!("Transient error: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    error_body(
                        "transient_error",
                        "The request raced a concurrent write, please retry".to_string(),
                    ),
                )
            }
            AppError::Internal(msg) => {
                // 내부 에러는 로그에 기록 (서버 관리자용)
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    error_body("internal_error", "An internal error occurred".to_string()),
                )
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    error_body("database_error", "A database error occurred".to_string()),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

/// 결과: `{ "error": { "code": "not_found", "message": "design not found" } }`
fn error_body(code: &str, message: String) -> serde_json::Value {
    json!({
        "error": {
            "code": code,
            "message": message
        }
    })
}
