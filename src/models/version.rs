use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::types::Json;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct DesignVersion {
    pub id: String,
    pub design_id: String,
    pub version_number: i64,
    pub version_name: Option<String>,
    pub data: Json<Value>,
    pub created_by: Option<String>,
    pub comment: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct VersionPage {
    pub versions: Vec<DesignVersion>,
    pub total: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreateVersionRequest {
    pub data: Value,
    #[serde(alias = "versionName")]
    pub version_name: Option<String>,
    pub comment: Option<String>,
    pub created_by: Option<String>,
}

/// 현재 스냅샷을 버전으로 고정할 때의 요청 본문
#[derive(Debug, Default, Deserialize)]
pub struct CreateSnapshotVersionRequest {
    #[serde(alias = "versionName")]
    pub version_name: Option<String>,
    pub comment: Option<String>,
    pub created_by: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListVersionsQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}
