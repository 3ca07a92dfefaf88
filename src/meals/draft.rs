//! The working list of foods for the meal being entered.
//!
//! The draft is an explicit value owned by the caller, not ambient session
//! state: it starts empty, accumulates line items, and is consumed by
//! [`MealDraft::finalize`] when the meal is saved, so nothing can be added
//! to a finalized meal and there is no global to reset between meals.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dosing::rounding::round2;

/// One food line of a meal: an amount of a catalog food and its carbs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealLineItem {
    pub name: String,
    pub unit: String,
    pub amount: f64,
    /// Carbohydrate contributed by this line, `amount * carb_per_unit`
    /// rounded to two decimals.
    pub carb_grams: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("amount must be greater than zero")]
    InvalidAmount,
    #[error("food name must not be empty")]
    EmptyName,
    #[error("carbs per unit must not be negative")]
    NegativeCarbs,
}

/// Accumulates the line items of the meal currently being entered.
#[derive(Debug, Clone, Default)]
pub struct MealDraft {
    items: Vec<MealLineItem>,
}

impl MealDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one food line. The amount is in the food's own unit; the line's
    /// carbs are `amount * carb_per_unit` rounded to two decimals.
    pub fn add_item(
        &mut self,
        name: &str,
        unit: &str,
        amount: f64,
        carb_per_unit: f64,
    ) -> Result<&MealLineItem, DraftError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DraftError::EmptyName);
        }
        if !(amount > 0.0) {
            return Err(DraftError::InvalidAmount);
        }
        if carb_per_unit < 0.0 {
            return Err(DraftError::NegativeCarbs);
        }

        self.items.push(MealLineItem {
            name: name.to_string(),
            unit: unit.trim().to_string(),
            amount,
            carb_grams: round2(amount * carb_per_unit),
        });
        Ok(self.items.last().expect("just pushed"))
    }

    pub fn items(&self) -> &[MealLineItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total carbohydrate of the draft so far, rounded to two decimals.
    pub fn total_carb_grams(&self) -> f64 {
        round2(self.items.iter().map(|item| item.carb_grams).sum())
    }

    /// Throw away all accumulated lines and start over.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Close the draft for the save. Consumes the draft, so no further items
    /// can be added. An empty draft finalizes to a zero-carb meal; the
    /// glucose parameters are still worth recording.
    pub fn finalize(self) -> FinalizedMeal {
        let total_carb_grams = self.total_carb_grams();
        FinalizedMeal {
            items: self.items,
            total_carb_grams,
        }
    }
}

/// The closed draft: the line items and their total, ready to persist.
#[derive(Debug, Clone, PartialEq)]
pub struct FinalizedMeal {
    pub items: Vec<MealLineItem>,
    pub total_carb_grams: f64,
}
