//! 라우터 통합 테스트 공용 도구
//!
//! - `MemorySource`: 메모리에 둔 레코드로 동작하는 `NutrientSource`
//! - `FailingSource`: 항상 DB 에러를 내는 저장소
//! - `send()`: 서버를 띄우지 않고 Router에 요청 하나를 보냄

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use nutrilabel::{
    db::{NutrientSource, NUTRIENT_SOURCE_TYPE},
    error::AppError,
    models::{FoodName, NutrientRow},
    routes::{self, AppState},
};
use serde_json::Value;
use std::collections::BTreeSet;
use tower::ServiceExt;

/// (식품 이름, 영양소, 100g당 함량, 단위) 목록을 들고 있는 저장소
///
/// 이름 매칭은 운영 쿼리(ILIKE '%...%')와 같이 대소문자 무시 부분 문자열입니다.
/// `find_nutrients`는 source_type/허용 목록을 보지 않고 이름만으로 돌려주므로,
/// 그 필터가 조회 서비스에서 적용되는지 라우트 단위로 확인할 수 있습니다.
pub struct MemorySource {
    rows: Vec<NutrientRow>,
}

impl MemorySource {
    /// 모든 행을 `source_type = "Nutrient"`로 만듭니다.
    pub fn new(records: &[(&str, &str, &str, &str)]) -> Self {
        let rows = records
            .iter()
            .map(|(food, nutrient, content, unit)| NutrientRow {
                food_name: Some(food.to_string()),
                source_type: Some("Nutrient".to_string()),
                nutrient: Some(nutrient.to_string()),
                content: Some(content.to_string()),
                unit: Some(unit.to_string()),
            })
            .collect();
        Self { rows }
    }

    /// (식품 이름, source_type, 영양소, 함량, 단위) 목록으로 만듭니다.
    pub fn with_source_types(records: &[(&str, &str, &str, &str, &str)]) -> Self {
        let rows = records
            .iter()
            .map(|(food, source_type, nutrient, content, unit)| NutrientRow {
                food_name: Some(food.to_string()),
                source_type: Some(source_type.to_string()),
                nutrient: Some(nutrient.to_string()),
                content: Some(content.to_string()),
                unit: Some(unit.to_string()),
            })
            .collect();
        Self { rows }
    }

    fn matches(&self, text: &str) -> impl Iterator<Item = &NutrientRow> {
        let needle = text.to_lowercase();
        self.rows.iter().filter(move |r| {
            r.food_name
                .as_deref()
                .is_some_and(|n| n.to_lowercase().contains(&needle))
        })
    }
}

#[async_trait]
impl NutrientSource for MemorySource {
    async fn find_nutrients(&self, food: &str) -> Result<Vec<NutrientRow>, AppError> {
        Ok(self.matches(food).cloned().collect())
    }

    async fn search_foods(&self, query: &str, limit: i64) -> Result<Vec<FoodName>, AppError> {
        // 운영 쿼리처럼 영양소 레코드의 이름만 후보로 삼습니다
        let names: BTreeSet<String> = self
            .matches(query)
            .filter(|r| r.source_type.as_deref() == Some(NUTRIENT_SOURCE_TYPE))
            .filter_map(|r| r.food_name.clone())
            .collect();
        Ok(names
            .into_iter()
            .take(limit as usize)
            .map(|name| FoodName { name })
            .collect())
    }
}

pub struct FailingSource;

#[async_trait]
impl NutrientSource for FailingSource {
    async fn find_nutrients(&self, _food: &str) -> Result<Vec<NutrientRow>, AppError> {
        Err(AppError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn search_foods(&self, _query: &str, _limit: i64) -> Result<Vec<FoodName>, AppError> {
        Err(AppError::Database(sqlx::Error::PoolTimedOut))
    }
}

/// 테스트용 기본 데이터셋
pub fn pantry() -> MemorySource {
    MemorySource::new(&[
        ("White rice", "Protein", "2.69", "g"),
        ("White rice", "Energy", "130", "kcal"),
        ("White rice", "Total lipid (fat)", "0.28", "g"),
        ("Black beans", "Protein", "8.86", "g"),
        ("Black beans", "Energy", "132", "kcal"),
        ("Black beans", "Fiber, total dietary", "8.7", "g"),
        ("Peanut", "Protein", "25.8", "g"),
        ("Chickpea", "Protein", "19.3", "g"),
    ])
}

pub fn app(source: impl NutrientSource + 'static) -> Router {
    routes::router(AppState::new(source))
}

/// Router에 요청을 보내고 (상태 코드, JSON 본문)을 돌려줍니다.
///
/// 본문이 JSON이 아니면 `Value::Null`.
pub async fn send(app: Router, method: Method, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if body.is_some() {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
    }
    let request = builder
        .body(Body::from(body.unwrap_or_default().to_owned()))
        .expect("request");

    let response = app.oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

pub async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None).await
}

pub async fn post_json(app: Router, uri: &str, body: &str) -> (StatusCode, Value) {
    send(app, Method::POST, uri, Some(body)).await
}
