//! # 영양 성분 조회 쿼리 모듈
//!
//! `food_json` 테이블(JSONB 문서 한 개 = 행 한 개)에서
//! 식품 이름으로 영양소 레코드를 찾는 읽기 전용 쿼리들입니다.
//!
//! ## JSONB 연산자
//! - `data->>'key'`: JSON 객체의 필드를 **텍스트**로 꺼냅니다 (없으면 NULL)
//! - `ILIKE`: 대소문자를 구분하지 않는 LIKE
//!
//! 식품 이름 매칭은 부분 문자열 검색입니다. 따라서 "pea"는 "peanut",
//! "chickpea"에도 매칭되며, 여러 식품이 걸려도 구분하지 않고 모두 돌려줍니다.

use crate::error::AppError;
use crate::models::{FoodName, NutrientRow};
use sqlx::PgPool;

/// 조회 대상 영양소 식별자 (`orig_source_name`) 허용 목록
///
/// 에너지, 단백질, 총 지방, 탄수화물, 식이섬유, 당류, 칼슘, 철, 나트륨,
/// 비타민 C, 콜레스테롤, 포화지방, 트랜스지방.
/// 데이터셋마다 표기가 달라 USDA식 이름과 짧은 대문자 식별자를 함께 둡니다.
pub const NUTRIENT_ALLOW_LIST: &[&str] = &[
    "Energy",
    "Protein",
    "Total lipid (fat)",
    "Carbohydrate, by difference",
    "Fiber, total dietary",
    "Sugars, total",
    "Calcium, Ca",
    "Iron, Fe",
    "Sodium, Na",
    "Vitamin C, total ascorbic acid",
    "Cholesterol",
    "Fatty acids, total saturated",
    "Fatty acids, total trans",
    "FAT",
    "PROTEIN",
    "CARBOHYDRATES",
];

/// 조회 대상 레코드의 `source_type` 값
pub const NUTRIENT_SOURCE_TYPE: &str = "Nutrient";

/// 행이 영양 성분표에 들어갈 레코드인지 판별합니다.
///
/// `find_nutrient_rows`의 WHERE 조건과 같은 규칙입니다.
/// - `source_type`이 정확히 `"Nutrient"`
/// - 영양소 식별자가 `NUTRIENT_ALLOW_LIST`에 있음 (대소문자 구분)
///
/// 둘 중 하나라도 NULL이면 SQL과 마찬가지로 제외합니다.
pub fn is_reported(row: &NutrientRow) -> bool {
    row.source_type.as_deref() == Some(NUTRIENT_SOURCE_TYPE)
        && row
            .nutrient
            .as_deref()
            .is_some_and(|name| NUTRIENT_ALLOW_LIST.contains(&name))
}

/// 사용자 입력을 "포함" 검색용 LIKE 패턴으로 바꿉니다.
///
/// `%`, `_`, `\`는 LIKE에서 특수문자이므로 이스케이프해서 글자 그대로 매칭되게 합니다.
/// PostgreSQL의 기본 LIKE 이스케이프 문자는 `\`입니다.
///
/// 예: `"50%_fat"` → `"%50\%\_fat%"`
pub fn contains_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// 식품 이름에 `food`가 포함된 영양소 행들을 조회합니다.
///
/// `source_type = 'Nutrient'`이고 영양소가 허용 목록에 있는 행만 돌려줍니다.
/// 같은 규칙을 Rust 쪽에서는 `is_reported()`가 표현합니다.
/// 매칭되는 행이 없으면 빈 Vec을 반환합니다 (에러 아님).
///
/// ## SQL 쿼리 설명
/// ```sql
/// WHERE data->>'orig_food_common_name' ILIKE $1   -- 대소문자 무시 부분 문자열
///   AND data->>'source_type' = $2                   -- 영양소 레코드만 ('Nutrient')
///   AND data->>'orig_source_name' = ANY($3)         -- 허용 목록 (text[] 바인딩)
/// ```
pub async fn find_nutrient_rows(pool: &PgPool, food: &str) -> Result<Vec<NutrientRow>, AppError> {
    let rows = sqlx::query_as::<_, NutrientRow>(
        r#"
        SELECT data->>'orig_food_common_name' AS food_name,
               data->>'source_type'           AS source_type,
               data->>'orig_source_name'      AS nutrient,
               data->>'standard_content'      AS content,
               data->>'orig_unit'             AS unit
        FROM food_json
        WHERE data->>'orig_food_common_name' ILIKE $1
          AND data->>'source_type' = $2
          AND data->>'orig_source_name' = ANY($3)
        "#,
    )
    .bind(contains_pattern(food))
    .bind(NUTRIENT_SOURCE_TYPE)
    // &[&str] → PostgreSQL text[] 로 바인딩됩니다
    .bind(NUTRIENT_ALLOW_LIST)
    .fetch_all(pool)
    .await?;

    tracing::debug!(food, rows = rows.len(), "nutrient rows fetched");
    Ok(rows)
}

/// 이름에 `query`가 포함된 식품 이름들을 중복 없이, 가나다(알파벳)순으로 조회합니다.
///
/// 부분 문자열 매칭 때문에 여러 식품이 섞여 나오는 경우,
/// 클라이언트가 정확한 이름을 고를 수 있게 도와줍니다.
pub async fn search_food_names(
    pool: &PgPool,
    query: &str,
    limit: i64,
) -> Result<Vec<FoodName>, AppError> {
    let names = sqlx::query_as::<_, FoodName>(
        r#"
        SELECT DISTINCT data->>'orig_food_common_name' AS name
        FROM food_json
        WHERE data->>'orig_food_common_name' ILIKE $1
          AND data->>'source_type' = $2
        ORDER BY name
        LIMIT $3
        "#,
    )
    .bind(contains_pattern(query))
    .bind(NUTRIENT_SOURCE_TYPE)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(names)
}
