//! # 영양 성분 모델 정의
//!
//! 문서 저장소(`food_json` 테이블)에서 읽어온 행과,
//! 이를 가공해서 API로 돌려주는 응답 구조체들을 정의합니다.
//!
//! ## 구조체 역할
//! - `NutrientRow`: DB에서 꺼낸 그대로의 값 (모두 텍스트, NULL 가능)
//! - `Nutrient`: 요청한 양(g)에 맞춰 환산된 영양소 하나
//! - `NutritionResult`: 식품 하나의 조회 결과
//! - `AggregateTotal` / `AggregateResult`: 여러 재료의 합산 결과
//! - `IngredientRequest`: `POST /nutrition/multiple` 배열의 원소 하나

use serde::{Deserialize, Serialize};

/// `food_json` 레코드에서 조회에 필요한 네 필드만 뽑아낸 행
///
/// JSONB의 `->>` 연산자는 항상 텍스트(또는 NULL)를 돌려주므로
/// 숫자 필드인 `content`도 여기서는 `Option<String>`입니다.
/// 숫자 변환은 조회 서비스(`services::lookup`)의 경계에서 한 번만 합니다.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct NutrientRow {
    /// `orig_food_common_name`: 사람이 읽는 식품 이름
    pub food_name: Option<String>,
    /// `source_type`: 레코드 종류 ("Nutrient"인 행만 조회 대상)
    pub source_type: Option<String>,
    /// `orig_source_name`: 영양소 식별자 (예: "Protein")
    pub nutrient: Option<String>,
    /// `standard_content`: 100g당 함량 (문자열 상태의 숫자)
    pub content: Option<String>,
    /// `orig_unit`: 함량 단위
    pub unit: Option<String>,
}

/// 요청한 양에 맞게 환산된 영양소 하나
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Nutrient {
    pub name: String,
    /// `per_100g * quantity_g / 100`, 소수점 둘째 자리 반올림
    pub amount: f64,
    pub unit: String,
    pub per_100g: f64,
}

/// `GET /nutrition/single` 응답이자, 합산 결과의 재료별 항목
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionResult {
    /// 요청한 식품 이름 (매칭된 레코드의 이름이 아님)
    pub ingredient: String,
    pub quantity_g: f64,
    pub nutrients: Vec<Nutrient>,
}

/// 영양소 이름별 합계
///
/// 단위 변환은 하지 않습니다. 같은 이름의 영양소가 재료마다 다른 단위로
/// 저장되어 있어도 처음 만난 단위를 그대로 씁니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateTotal {
    pub name: String,
    pub amount: f64,
    pub unit: String,
}

/// `POST /nutrition/multiple` 응답 본문
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateResult {
    pub ingredients: Vec<NutritionResult>,
    pub total_nutrients: Vec<AggregateTotal>,
    pub not_found: Vec<String>,
}

impl AggregateResult {
    /// 재료 중 하나라도 조회에 성공했는지 여부
    ///
    /// false이면 "전체 매칭 없음"으로, 개별 재료의 not_found와는 구분됩니다.
    pub fn has_matches(&self) -> bool {
        !self.ingredients.is_empty()
    }
}

/// 합산 요청 배열의 원소 하나: `{ "name": "rice", "quantity_g": 150 }`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IngredientRequest {
    /// 비어 있거나 누락된 이름은 조용히 건너뜁니다
    #[serde(default)]
    pub name: Option<String>,
    /// 누락 시 100g
    #[serde(default)]
    pub quantity_g: Option<f64>,
}

/// `GET /nutrition` 응답의 영양소 항목 (100g 기준, 환산 없음)
///
/// `amount`는 저장된 `standard_content` 값 그대로입니다 (반올림하지 않음).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NutrientSummary {
    pub name: String,
    pub amount: f64,
    pub unit: String,
}

impl From<Nutrient> for NutrientSummary {
    fn from(n: Nutrient) -> Self {
        Self {
            name: n.name,
            // 환산·반올림된 amount가 아니라 원래 값인 per_100g을 씁니다
            amount: n.per_100g,
            unit: n.unit,
        }
    }
}

/// `GET /foods/search` 결과 항목
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct FoodName {
    pub name: String,
}
