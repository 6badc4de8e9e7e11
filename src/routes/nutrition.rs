//! # 영양 성분 API 라우트 핸들러
//!
//! ## 엔드포인트
//! | 메서드 | 경로 | 설명 |
//! |--------|------|------|
//! | GET | /api/nutrition?food=rice | 100g 기준 영양 성분 |
//! | GET | /api/nutrition/single?food=rice&quantity_g=150 | 양(g)에 맞춰 환산 |
//! | POST | /api/nutrition/multiple | 여러 재료 합산 |
//!
//! ## 사용 예시
//! ```text
//! POST /api/nutrition/multiple
//! [{"name": "rice", "quantity_g": 150}, {"name": "black beans"}]
//! ```
//!
//! 쿼리/본문 파싱 실패도 `AppError::BadRequest`로 바꿔서,
//! 모든 에러 응답이 `{ "error": ... }` 형태를 갖도록 합니다.

use crate::{
    error::AppError,
    models::{AggregateResult, IngredientRequest, NutrientSummary, NutritionResult},
    routes::AppState,
    services::{self, lookup::DEFAULT_QUANTITY_G},
};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

/// `GET /nutrition`의 쿼리 파라미터
#[derive(Debug, Deserialize)]
pub struct NutritionQuery {
    pub food: Option<String>,
    /// 쉼표로 구분된 재료 목록. 받기는 하지만 아직 처리하지 않습니다 (501).
    pub ingredient_list: Option<String>,
}

/// `GET /nutrition/single`의 쿼리 파라미터
#[derive(Debug, Deserialize)]
pub struct SingleQuery {
    pub food: Option<String>,
    pub quantity_g: Option<f64>,
}

/// 빈 문자열/공백뿐인 값은 "없음"으로 취급합니다.
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn not_found(food: &str) -> AppError {
    AppError::NotFound(format!("Food '{food}' not found"))
}

fn bad_query(rejection: QueryRejection) -> AppError {
    AppError::BadRequest(format!("Invalid query parameters: {}", rejection.body_text()))
}

/// `GET /nutrition?food=...`: 100g 기준 영양 성분을 조회합니다.
///
/// 응답: `{ "food": "rice", "nutrients": [{ "name", "amount", "unit" }] }`
///
/// - `food`, `ingredient_list` 둘 다 없음 → 400
/// - `ingredient_list`만 있음 → 501 (동작이 정해지지 않은 파라미터)
/// - 매칭 없음 → 404
pub async fn get_nutrition(
    State(state): State<AppState>,
    query: Result<Query<NutritionQuery>, QueryRejection>,
) -> Result<Json<Value>, AppError> {
    let Query(query) = query.map_err(bad_query)?;
    tracing::info!(?query, "nutrition request");

    let food = non_blank(query.food);
    let ingredient_list = non_blank(query.ingredient_list);

    let Some(food) = food else {
        if ingredient_list.is_some() {
            return Err(AppError::NotImplemented(
                "'ingredient_list' is not supported yet; use POST /api/nutrition/multiple"
                    .to_string(),
            ));
        }
        return Err(AppError::BadRequest(
            "Either 'food' or 'ingredient_list' parameter is required".to_string(),
        ));
    };

    let result = services::lookup(state.source.as_ref(), &food, DEFAULT_QUANTITY_G)
        .await?
        .ok_or_else(|| not_found(&food))?;

    let nutrients: Vec<NutrientSummary> =
        result.nutrients.into_iter().map(NutrientSummary::from).collect();

    Ok(Json(json!({
        "food": food,
        "nutrients": nutrients,
    })))
}

/// `GET /nutrition/single?food=...&quantity_g=...`: 양에 맞춰 환산한 영양 성분
///
/// `quantity_g`가 없으면 100g. 값의 범위는 검증하지 않습니다.
pub async fn get_single_nutrition(
    State(state): State<AppState>,
    query: Result<Query<SingleQuery>, QueryRejection>,
) -> Result<Json<NutritionResult>, AppError> {
    let Query(query) = query.map_err(bad_query)?;

    let food = non_blank(query.food)
        .ok_or_else(|| AppError::BadRequest("'food' parameter is required".to_string()))?;
    let quantity_g = query.quantity_g.unwrap_or(DEFAULT_QUANTITY_G);

    let result = services::lookup(state.source.as_ref(), &food, quantity_g)
        .await?
        .ok_or_else(|| not_found(&food))?;

    Ok(Json(result))
}

/// 요청 본문을 재료 목록으로 검증/변환합니다.
///
/// 본문은 JSON 배열이어야 하고, 원소는 모두 객체여야 합니다.
/// 원소 안의 `name`은 문자열, `quantity_g`는 숫자여야 합니다 (둘 다 생략 가능).
pub fn parse_ingredients(body: Value) -> Result<Vec<IngredientRequest>, AppError> {
    let Value::Array(elements) = body else {
        return Err(AppError::BadRequest(
            "Request body must be a JSON array of ingredients".to_string(),
        ));
    };

    elements
        .into_iter()
        .enumerate()
        .map(|(i, element)| {
            if !element.is_object() {
                return Err(AppError::BadRequest(format!(
                    "Ingredient at index {i} must be an object"
                )));
            }
            serde_json::from_value(element).map_err(|e| {
                AppError::BadRequest(format!("Ingredient at index {i} is invalid: {e}"))
            })
        })
        .collect()
}

/// `POST /nutrition/multiple`: 여러 재료의 영양 성분을 조회하고 합산합니다.
///
/// 응답: `{ "ingredients": [...], "total_nutrients": [...], "not_found": [...] }`
///
/// - 본문이 JSON 배열이 아님 → 400
/// - 어떤 재료도 매칭되지 않음 (빈 배열 포함) → 404
pub async fn post_multiple_nutrition(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<AggregateResult>, AppError> {
    let Json(body) = payload
        .map_err(|e| AppError::BadRequest(format!("Invalid JSON body: {}", e.body_text())))?;
    let items = parse_ingredients(body)?;

    let result = services::aggregate(state.source.as_ref(), &items).await?;
    if !result.has_matches() {
        return Err(AppError::NotFound(
            "No nutrition data found for any ingredient".to_string(),
        ));
    }

    Ok(Json(result))
}
