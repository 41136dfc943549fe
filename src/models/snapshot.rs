use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::types::Json;

/// 설계의 현재 작업 상태. 설계당 하나뿐이며 자동 저장마다 덮어씁니다.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct DesignSnapshot {
    pub id: String,
    pub design_id: String,
    pub data: Json<Value>,
    pub updated_by: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Deserialize)]
pub struct AutoSaveRequest {
    pub data: Value,
    #[serde(alias = "sessionId")]
    pub session_id: Option<String>,
    pub updated_by: Option<String>,
}

/// 현재 문서가 어디서 왔는지 표시합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CurrentSource {
    Snapshot,
    Version,
    Template,
}

#[derive(Debug, Clone, Serialize)]
pub struct CurrentDocument {
    pub design_id: String,
    pub source: CurrentSource,
    pub data: Value,
    pub updated_at: Option<String>,
}
