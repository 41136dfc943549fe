//! # 서비스 모듈
//!
//! DB에 의존하지 않는 순수 로직을 모아둔 모듈입니다.
//! - `share_token`: 공유 토큰 생성과 형식 검사
//! - `template`: 빈 설계 문서 템플릿
//! - `validation`: 요청 값 검증과 페이지 계산

pub mod share_token;
pub mod template;
pub mod validation;

pub use share_token::*;
pub use template::*;
pub use validation::*;
