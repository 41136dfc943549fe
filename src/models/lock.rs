//! # 편집 잠금 모델
//!
//! 설계 하나에는 최대 한 개의 잠금만 존재합니다 (`design_locks.design_id` UNIQUE).
//! `session_id`는 클라이언트가 정한 불투명 문자열이며 인증 정보가 아닙니다.

use serde::{Deserialize, Serialize};

/// `design_locks` 테이블 한 행
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct DesignLock {
    pub id: String,
    pub design_id: String,
    /// 잠금을 보유한 세션
    pub session_id: String,
    /// 획득 또는 마지막 하트비트 시각 (UTC)
    pub locked_at: String,
}

/// 잠금 획득/해제/하트비트 요청 본문
///
/// 기존 클라이언트가 보내는 `sessionId` 표기도 받아들입니다.
#[derive(Debug, Deserialize)]
pub struct LockRequest {
    #[serde(alias = "sessionId")]
    pub session_id: Option<String>,
}
