use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Design {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub is_public: bool,
    pub share_token: String,
    pub created_by: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// 목록 화면용 요약. 현재 스냅샷에서 뽑은 정보가 함께 붙습니다.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct DesignSummary {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub is_public: bool,
    pub share_token: String,
    pub created_at: String,
    pub updated_at: String,
    /// 마지막 자동 저장 시각 (스냅샷이 없으면 None)
    pub last_modified: Option<String>,
    /// 스냅샷 본문의 `database` 값
    pub database: Option<String>,
    /// 스냅샷 본문의 `tables` 배열 길이
    pub table_count: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct CreateDesignRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_public: Option<bool>,
    pub created_by: Option<String>,
    /// 있으면 "Initial version" 이름으로 첫 버전을 기록합니다.
    pub data: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateDesignRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListDesignsQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub search: Option<String>,
}
