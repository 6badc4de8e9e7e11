//! # 비즈니스 로직 모듈
//!
//! 라우트 핸들러와 DB 계층 사이에서 실제 계산을 담당합니다.
//! - `lookup`: 식품 하나 조회 + 양(g) 환산
//! - `aggregate`: 여러 재료 조회 + 영양소별 합산
//! - `ingest`: NDJSON 파일 일괄 적재 (적재 도구 전용)

pub mod aggregate;
pub mod ingest;
pub mod lookup;

pub use aggregate::aggregate;
pub use lookup::lookup;
