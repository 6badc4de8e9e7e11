//! # 데이터 모델 모듈
//!
//! 애플리케이션에서 사용하는 데이터 구조체(struct)들을 정의합니다.
//! - `nutrition`: 영양 성분 레코드, 조회/합산 결과, 요청 본문
//!
//! `pub use nutrition::*;`로 재공개하여 `crate::models::Nutrient`처럼 짧게 접근합니다.

pub mod nutrition;

pub use nutrition::*;
