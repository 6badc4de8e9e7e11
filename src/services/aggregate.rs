//! # 여러 재료 합산 서비스
//!
//! 재료 목록(`[{name, quantity_g}]`)을 받아 재료마다 조회 서비스를 호출하고,
//! 영양소 이름별로 함량을 더합니다.
//!
//! ## 처리 규칙
//! - 이름이 없거나 공백뿐인 재료 → 조용히 건너뜀 (not_found에도 넣지 않음)
//! - 조회 결과가 없는 재료 → `not_found`에 이름 추가, 나머지는 계속 처리
//! - 조회에 성공한 재료 → `ingredients`에 추가하고 합계에 반영
//! - 합계의 단위는 그 영양소를 처음 만난 재료의 단위 (단위 변환 없음)
//! - DB/레코드 오류는 즉시 전체 실패

use crate::db::NutrientSource;
use crate::error::AppError;
use crate::models::{AggregateResult, AggregateTotal, IngredientRequest, NutritionResult};
use crate::services::lookup::{lookup, round2, DEFAULT_QUANTITY_G};
use std::collections::HashMap;

/// 영양소 이름 → 합계를 누적하는 구조체
///
/// 응답에서 영양소가 처음 등장한 순서를 유지하기 위해
/// Vec에 값을 두고, HashMap에는 Vec의 인덱스만 저장합니다.
#[derive(Debug, Default)]
struct Totals {
    entries: Vec<AggregateTotal>,
    index: HashMap<String, usize>,
}

impl Totals {
    fn add(&mut self, result: &NutritionResult) {
        for nutrient in &result.nutrients {
            match self.index.get(&nutrient.name) {
                Some(&i) => self.entries[i].amount += nutrient.amount,
                None => {
                    self.index.insert(nutrient.name.clone(), self.entries.len());
                    self.entries.push(AggregateTotal {
                        name: nutrient.name.clone(),
                        amount: nutrient.amount,
                        unit: nutrient.unit.clone(),
                    });
                }
            }
        }
    }

    fn finish(self) -> Vec<AggregateTotal> {
        self.entries
            .into_iter()
            .map(|t| AggregateTotal {
                amount: round2(t.amount),
                ..t
            })
            .collect()
    }
}

/// 여러 재료의 영양 성분을 조회하고 합산합니다.
///
/// 재료는 입력 순서대로 하나씩 조회합니다 (재료마다 쿼리 1회).
/// 모든 재료가 조회에 실패해도 에러가 아니며, 그 판단은
/// `AggregateResult::has_matches()`로 호출하는 쪽에서 합니다.
pub async fn aggregate(
    source: &dyn NutrientSource,
    items: &[IngredientRequest],
) -> Result<AggregateResult, AppError> {
    let mut result = AggregateResult::default();
    let mut totals = Totals::default();

    for item in items {
        // let-else: 이름이 없거나 공백뿐이면 건너뜁니다
        let Some(name) = item.name.as_deref().filter(|n| !n.trim().is_empty()) else {
            continue;
        };
        let quantity_g = item.quantity_g.unwrap_or(DEFAULT_QUANTITY_G);

        match lookup(source, name, quantity_g).await? {
            Some(found) => {
                totals.add(&found);
                result.ingredients.push(found);
            }
            None => result.not_found.push(name.to_string()),
        }
    }

    result.total_nutrients = totals.finish();

    tracing::info!(
        matched = result.ingredients.len(),
        not_found = result.not_found.len(),
        "aggregated ingredients"
    );
    Ok(result)
}
