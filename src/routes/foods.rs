//! # 식품 이름 검색 라우트 핸들러
//!
//! ## 엔드포인트
//! | 메서드 | 경로 | 설명 |
//! |--------|------|------|
//! | GET | /api/foods/search?q=pea&limit=10 | 이름에 q가 포함된 식품 이름 목록 |
//!
//! 영양 성분 조회는 부분 문자열 매칭이라 "pea"로 찾으면 "Peanut", "Chickpea"가
//! 섞여 나옵니다. 이 엔드포인트로 정확한 이름을 먼저 고를 수 있습니다.

use crate::{error::AppError, routes::AppState};
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

/// 기본/최대 결과 개수
const DEFAULT_LIMIT: i64 = 10;
const MAX_LIMIT: i64 = 50;

#[derive(Debug, Deserialize)]
pub struct FoodSearchQuery {
    pub q: Option<String>,
    pub limit: Option<i64>,
}

/// `GET /foods/search?q=...` → `{ "results": [{ "name": "..." }] }`
///
/// `limit`은 1..=50 범위로 잘라냅니다 (기본 10).
pub async fn search_foods(
    State(state): State<AppState>,
    query: Result<Query<FoodSearchQuery>, QueryRejection>,
) -> Result<Json<Value>, AppError> {
    let Query(query) = query.map_err(|e| {
        AppError::BadRequest(format!("Invalid query parameters: {}", e.body_text()))
    })?;

    let q = query
        .q
        .filter(|q| !q.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("Search query cannot be empty".to_string()))?;
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);

    let results = state.source.search_foods(&q, limit).await?;
    Ok(Json(json!({ "results": results })))
}
