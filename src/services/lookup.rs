//! # 영양 성분 조회 서비스
//!
//! 식품 이름(+ 선택적으로 양)을 받아 저장소에서 영양소 행을 찾고,
//! 100g 기준 함량을 요청한 양으로 환산해 돌려줍니다.
//!
//! ## 흐름
//! ```text
//! lookup("rice", 200.0)
//!   → source.find_nutrients("rice")      (쿼리 1회, 캐시 없음)
//!   → 행마다 standard_content 텍스트 → f64 변환
//!   → amount = round2(per_100g * 200 / 100)
//! ```
//!
//! 숫자 변환은 이 함수에서만 합니다. 해석할 수 없는 값이 하나라도 있으면
//! `AppError::MalformedRecord`로 전체 조회가 실패합니다.
//!
//! 저장소가 돌려준 행 중 영양소 레코드가 아니거나 허용 목록 밖에 있는 행은
//! 변환 전에 `db::is_reported()`로 한 번 더 걸러냅니다.

// NutrientSource: 조회 대상 저장소 트레이트 (운영은 PgPool, 테스트는 메모리 구현)
// is_reported: SQL WHERE 조건과 같은 행 필터
use crate::db::{is_reported, NutrientSource};
use crate::error::AppError;
use crate::models::{Nutrient, NutrientRow, NutritionResult};

/// 양이 주어지지 않았을 때 쓰는 기본값 (g)
pub const DEFAULT_QUANTITY_G: f64 = 100.0;

/// 소수점 둘째 자리까지 반올림 (0.5는 0에서 먼 쪽으로)
///
/// f64::round()는 "half away from zero" 방식입니다.
/// 예: 2.345678 → 2.35, -0.125 → -0.13
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// 100g당 함량을 `quantity_g` 그램 기준으로 환산합니다.
pub fn scale(per_100g: f64, quantity_g: f64) -> f64 {
    round2(per_100g * quantity_g / 100.0)
}

/// DB 행 하나를 환산된 `Nutrient`로 바꿉니다.
///
/// - 영양소 이름이 NULL → MalformedRecord
/// - 함량이 NULL, 숫자가 아님, NaN/무한대 → MalformedRecord
/// - 단위가 NULL → 빈 문자열
///
/// `row`는 값으로(move) 받습니다. 문자열 필드를 복사하지 않고 그대로 결과에 옮깁니다.
fn to_nutrient(row: NutrientRow, quantity_g: f64) -> Result<Nutrient, AppError> {
    // as_deref(): Option<String> → Option<&str> (소유권을 옮기지 않고 빌려봄)
    let food = row.food_name.as_deref().unwrap_or("<unnamed>");

    // ok_or_else(): None이면 클로저가 만든 에러로 바꾸고, ?로 즉시 반환합니다
    let name = row.nutrient.ok_or_else(|| {
        AppError::MalformedRecord(format!("record for '{food}' has no nutrient name"))
    })?;

    let raw = row.content.ok_or_else(|| {
        AppError::MalformedRecord(format!("'{name}' of '{food}' has no standard_content"))
    })?;

    // "2.69" → 2.69. 앞뒤 공백은 허용하고, "NaN"/"inf"처럼
    // 파싱은 되지만 유한하지 않은 값은 거부합니다
    let per_100g = raw
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| {
            AppError::MalformedRecord(format!(
                "'{name}' of '{food}' has non-numeric standard_content '{raw}'"
            ))
        })?;

    Ok(Nutrient {
        name,
        amount: scale(per_100g, quantity_g),
        // unwrap_or_default(): None이면 String::default() = ""
        unit: row.unit.unwrap_or_default(),
        per_100g,
    })
}

/// 식품 하나의 영양 성분을 조회합니다.
///
/// # 반환값
/// - `Ok(Some(result))`: 매칭된 행이 1개 이상
/// - `Ok(None)`: 매칭된 행이 없음 ("찾을 수 없음"은 에러가 아닙니다)
/// - `Err(..)`: DB 오류 또는 레코드 형식 오류
///
/// `quantity_g`는 검증하지 않고 그대로 환산에 사용합니다 (0이나 음수 포함).
///
/// `&dyn NutrientSource`: 구체 타입을 모르는 트레이트 객체의 참조입니다.
/// 핸들러는 `AppState`의 `Arc<dyn NutrientSource>`를 그대로 빌려 넘깁니다.
pub async fn lookup(
    source: &dyn NutrientSource,
    food: &str,
    quantity_g: f64,
) -> Result<Option<NutritionResult>, AppError> {
    let mut rows = source.find_nutrients(food).await?;
    // 영양소 레코드가 아니거나 허용 목록 밖의 행은 버립니다
    rows.retain(is_reported);
    if rows.is_empty() {
        tracing::debug!(food, "no nutrient rows matched");
        return Ok(None);
    }

    // collect::<Result<Vec<_>, _>>(): 하나라도 Err이면 첫 Err을 그대로 반환합니다
    let nutrients = rows
        .into_iter()
        .map(|row| to_nutrient(row, quantity_g))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Some(NutritionResult {
        ingredient: food.to_string(),
        quantity_g,
        nutrients,
    }))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::FoodName;
    use async_trait::async_trait;

    /// 고정된 행 목록에서 이름 부분 문자열로 찾는 테스트용 저장소
    ///
    /// 이름만 보고 돌려주므로 source_type/허용 목록 필터는 `lookup()` 쪽이 맡습니다.
    pub(crate) struct FixedRows(pub Vec<NutrientRow>);

    /// `source_type = "Nutrient"`인 영양소 행
    pub(crate) fn row(food: &str, nutrient: &str, content: &str, unit: &str) -> NutrientRow {
        NutrientRow {
            food_name: Some(food.to_string()),
            source_type: Some("Nutrient".to_string()),
            nutrient: Some(nutrient.to_string()),
            content: Some(content.to_string()),
            unit: Some(unit.to_string()),
        }
    }

    #[async_trait]
    impl NutrientSource for FixedRows {
        async fn find_nutrients(&self, food: &str) -> Result<Vec<NutrientRow>, AppError> {
            let needle = food.to_lowercase();
            Ok(self
                .0
                .iter()
                .filter(|r| {
                    r.food_name
                        .as_deref()
                        .is_some_and(|n| n.to_lowercase().contains(&needle))
                })
                .cloned()
                .collect())
        }

        async fn search_foods(&self, _query: &str, _limit: i64) -> Result<Vec<FoodName>, AppError> {
            Ok(Vec::new())
        }
    }

    fn rice() -> FixedRows {
        FixedRows(vec![
            row("White rice", "Protein", "2.69", "g"),
            row("White rice", "Energy", "130", "kcal"),
        ])
    }

    #[test]
    fn round2_rounds_half_away_from_zero() {
        assert_eq!(round2(2.345678), 2.35);
        assert_eq!(round2(-0.125), -0.13);
    }

    #[tokio::test]
    async fn default_quantity_keeps_per_100g_amounts() {
        let result = lookup(&rice(), "rice", DEFAULT_QUANTITY_G)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(result.ingredient, "rice");
        assert_eq!(result.quantity_g, 100.0);
        for n in &result.nutrients {
            assert_eq!(n.amount, n.per_100g);
        }
    }

    #[tokio::test]
    async fn doubling_quantity_doubles_amounts() {
        let result = lookup(&rice(), "RICE", 200.0).await.unwrap().unwrap();

        let protein = &result.nutrients[0];
        assert_eq!(protein.name, "Protein");
        assert_eq!(protein.per_100g, 2.69);
        assert_eq!(protein.amount, 5.38);
        assert_eq!(result.nutrients[1].amount, 260.0);
    }

    #[tokio::test]
    async fn unmatched_food_is_none() {
        assert!(lookup(&rice(), "kale", 100.0).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn substring_match_is_not_disambiguated() {
        let source = FixedRows(vec![
            row("Peanut", "Protein", "25.8", "g"),
            row("Chickpea", "Protein", "19.3", "g"),
        ]);
        let result = lookup(&source, "pea", 100.0).await.unwrap().unwrap();
        assert_eq!(result.nutrients.len(), 2);
    }

    #[tokio::test]
    async fn non_nutrient_and_unlisted_rows_are_dropped() {
        let mut component = row("Carrot", "Protein", "0.93", "g");
        component.source_type = Some("Component".to_string());
        let source = FixedRows(vec![
            row("Carrot", "Energy", "41", "kcal"),
            component,
            row("Carrot", "Caffeine", "0", "mg"),
        ]);

        let result = lookup(&source, "carrot", 100.0).await.unwrap().unwrap();
        let names: Vec<&str> = result.nutrients.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, ["Energy"]);
    }

    #[tokio::test]
    async fn only_filtered_rows_counts_as_not_found() {
        let mut component = row("Carrot", "Protein", "0.93", "g");
        component.source_type = Some("Component".to_string());
        let source = FixedRows(vec![component, row("Carrot", "Caffeine", "0", "mg")]);

        assert!(lookup(&source, "carrot", 100.0).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn non_numeric_content_is_malformed() {
        let source = FixedRows(vec![row("Tofu", "Protein", "n/a", "g")]);
        let err = lookup(&source, "tofu", 100.0).await.unwrap_err();
        assert!(matches!(err, AppError::MalformedRecord(_)));
    }

    #[tokio::test]
    async fn missing_unit_becomes_empty_string() {
        let mut r = row("Tofu", "Protein", " 8 ", "");
        r.unit = None;
        let result = lookup(&FixedRows(vec![r]), "tofu", 50.0)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(result.nutrients[0].unit, "");
        assert_eq!(result.nutrients[0].amount, 4.0);
    }
}
