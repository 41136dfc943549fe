//! 스냅샷도 버전도 없는 설계를 열 때 돌려줄 빈 문서 템플릿

use serde_json::{json, Value};

/// 새 설계의 기본 문서.
///
/// 클라이언트 편집기가 기대하는 최상위 키를 모두 빈 값으로 채웁니다.
pub fn default_design_document() -> Value {
    json!({
        "title": "Untitled Diagram",
        "database": "Generic",
        "tables": [],
        "relationships": [],
        "notes": [],
        "subjectAreas": [],
        "types": [],
        "enums": []
    })
}
