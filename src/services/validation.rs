//! # 입력 검증
//!
//! 저장소를 호출하기 전에 식별자와 이름을 검사합니다.
//! 실패하면 `AppError::Validation`(HTTP 400)을 반환합니다.

use crate::error::AppError;

/// 세션 ID와 이름의 최대 길이 (바이트)
pub const MAX_IDENTIFIER_LEN: usize = 255;

/// 세션 ID를 검사하고 앞뒤 공백을 제거한 값을 돌려줍니다.
///
/// 세션 ID는 클라이언트가 임의로 정한 문자열이므로 신뢰하지 않습니다.
pub fn validate_session_id(session_id: &str) -> Result<&str, AppError> {
    let trimmed = session_id.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation("session_id is required".to_string()));
    }
    if trimmed.len() > MAX_IDENTIFIER_LEN {
        return Err(AppError::Validation(format!(
            "session_id must be at most {} bytes",
            MAX_IDENTIFIER_LEN
        )));
    }
    Ok(trimmed)
}

/// 요청 본문에서 꺼낸 `Option<String>` 세션 ID를 검사합니다.
pub fn require_session_id(session_id: Option<&str>) -> Result<&str, AppError> {
    validate_session_id(session_id.unwrap_or(""))
}

pub fn validate_design_name(name: &str) -> Result<&str, AppError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation("name must not be empty".to_string()));
    }
    if trimmed.chars().count() > MAX_IDENTIFIER_LEN {
        return Err(AppError::Validation(format!(
            "name must be at most {} characters",
            MAX_IDENTIFIER_LEN
        )));
    }
    Ok(trimmed)
}

/// page/per_page 쿼리를 (limit, offset)으로 바꿉니다.
///
/// 저장소 계층은 limit 상한을 두지 않으므로 여기서 `max_per_page`로 자릅니다.
pub fn page_to_limit_offset(
    page: Option<i64>,
    per_page: Option<i64>,
    default_per_page: i64,
    max_per_page: i64,
) -> Result<(i64, i64), AppError> {
    let page = page.unwrap_or(1);
    let per_page = per_page.unwrap_or(default_per_page);
    if page < 1 {
        return Err(AppError::Validation("page must be >= 1".to_string()));
    }
    if per_page < 1 {
        return Err(AppError::Validation("per_page must be >= 1".to_string()));
    }
    let limit = per_page.min(max_per_page);
    let offset = (page - 1).saturating_mul(limit);
    Ok((limit, offset))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_id_is_trimmed_and_bounded() {
        assert_eq!(validate_session_id("  s1 ").unwrap(), "s1");
        assert!(validate_session_id("").is_err());
        assert!(validate_session_id("   ").is_err());
        assert!(validate_session_id(&"x".repeat(MAX_IDENTIFIER_LEN)).is_ok());
        assert!(validate_session_id(&"x".repeat(MAX_IDENTIFIER_LEN + 1)).is_err());
        assert!(require_session_id(None).is_err());
    }

    #[test]
    fn design_name_must_not_be_blank() {
        assert_eq!(validate_design_name(" ERD ").unwrap(), "ERD");
        assert!(matches!(
            validate_design_name("\t"),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn pagination_is_clamped() {
        assert_eq!(page_to_limit_offset(None, None, 20, 100).unwrap(), (20, 0));
        assert_eq!(page_to_limit_offset(Some(3), Some(10), 20, 100).unwrap(), (10, 20));
        assert_eq!(page_to_limit_offset(Some(2), Some(500), 20, 100).unwrap(), (100, 100));
        assert!(page_to_limit_offset(Some(0), None, 20, 100).is_err());
        assert!(page_to_limit_offset(None, Some(0), 20, 100).is_err());
    }
}
