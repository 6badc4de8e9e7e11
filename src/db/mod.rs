//! # 데이터베이스 접근 계층 (Data Access Layer)
//!
//! 문서 저장소(PostgreSQL `food_json` 테이블)와 직접 상호작용하는 함수들을 모아둔 모듈입니다.
//!
//! 각 하위 모듈:
//! - `nutrients`: 영양 성분 조회 쿼리 (API 서버, 읽기 전용)
//! - `loader`: 테이블 재생성과 일괄 INSERT (적재 도구 전용)
//!
//! ## `NutrientSource` 트레이트
//! 조회 서비스와 라우트 핸들러는 `PgPool`을 직접 받지 않고 이 트레이트를 통해
//! 저장소를 읽습니다. 운영에서는 `PgPool`이, 테스트에서는 메모리 구현이 들어갑니다.

pub mod loader;
pub mod nutrients;

pub use loader::*;
pub use nutrients::*;

use crate::error::AppError;
use crate::models::{FoodName, NutrientRow};
use async_trait::async_trait;
use sqlx::PgPool;

/// 영양 성분 레코드를 읽어오는 저장소 추상화
///
/// `Send + Sync`: `Arc<dyn NutrientSource>`로 여러 요청 핸들러가 공유하기 위해 필요합니다.
#[async_trait]
pub trait NutrientSource: Send + Sync {
    /// 식품 이름에 `food`가 (대소문자 무시) 포함된 영양소 행들
    async fn find_nutrients(&self, food: &str) -> Result<Vec<NutrientRow>, AppError>;

    /// 이름에 `query`가 포함된 식품 이름 목록 (중복 없음, 정렬됨)
    async fn search_foods(&self, query: &str, limit: i64) -> Result<Vec<FoodName>, AppError>;
}

/// 연결 풀 구현: 쿼리마다 풀에서 연결을 빌려 쓰고, 끝나면(에러 포함) 자동 반납됩니다.
#[async_trait]
impl NutrientSource for PgPool {
    async fn find_nutrients(&self, food: &str) -> Result<Vec<NutrientRow>, AppError> {
        find_nutrient_rows(self, food).await
    }

    async fn search_foods(&self, query: &str, limit: i64) -> Result<Vec<FoodName>, AppError> {
        search_food_names(self, query, limit).await
    }
}
