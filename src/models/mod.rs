//! # 데이터 모델 모듈
//!
//! 애플리케이션에서 사용하는 데이터 구조체(struct)들을 정의합니다.
//! 각 하위 모듈은 특정 도메인의 데이터 타입을 담당합니다:
//! - `design`: 설계(Design) 메타데이터와 요청 구조체
//! - `lock`: 편집 잠금
//! - `snapshot`: 현재 작업 상태(스냅샷)
//! - `version`: 번호가 매겨진 불변 버전 이력
//!
//! `pub use X::*;`로 재공개하여 `crate::models::Design`처럼 짧게 접근합니다.

pub mod design;
pub mod lock;
pub mod snapshot;
pub mod version;

pub use design::*;
pub use lock::*;
pub use snapshot::*;
pub use version::*;
