//! Daily nutrition summary
//!
//! Sums a day's logged meals against the user's targets and reports what
//! remains and how complete each macro is. Missing targets degrade to zero
//! completion rather than erroring.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::models::{NutritionEntry, NutritionTargets};

/// Per-macro totals
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MacroTotals {
    pub calories: Decimal,
    pub protein: Decimal,
    pub carbs: Decimal,
    pub fat: Decimal,
}

/// Per-macro completion fractions (0..1, uncapped past the target)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MacroCompletion {
    pub calories: Decimal,
    pub protein: Decimal,
    pub carbs: Decimal,
    pub fat: Decimal,
}

/// A day's nutrition against targets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionSummary {
    pub consumed: MacroTotals,
    pub targets: NutritionTargets,
    pub remaining: MacroTotals,
    pub percent_complete: MacroCompletion,
}

/// Sum the day's entries and compute remaining and completion per macro.
pub fn daily_summary(entries: &[NutritionEntry], targets: &NutritionTargets) -> NutritionSummary {
    let mut consumed = MacroTotals::default();
    for entry in entries {
        consumed.calories += entry.calories;
        consumed.protein += entry.protein;
        consumed.carbs += entry.carbs;
        consumed.fat += entry.fat;
    }

    let remaining = MacroTotals {
        calories: targets.calories - consumed.calories,
        protein: targets.protein - consumed.protein,
        carbs: targets.carbs - consumed.carbs,
        fat: targets.fat - consumed.fat,
    };

    let percent_complete = MacroCompletion {
        calories: completion(consumed.calories, targets.calories),
        protein: completion(consumed.protein, targets.protein),
        carbs: completion(consumed.carbs, targets.carbs),
        fat: completion(consumed.fat, targets.fat),
    };

    NutritionSummary {
        consumed,
        targets: targets.clone(),
        remaining,
        percent_complete,
    }
}

fn completion(consumed: Decimal, target: Decimal) -> Decimal {
    if target.is_zero() {
        return Decimal::ZERO;
    }
    (consumed / target).round_dp_with_strategy(4, RoundingStrategy::MidpointAwayFromZero)
}
