//! Food catalog rows.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

/// One catalog entry: a food and how many grams of carbohydrate one unit of
/// it contains.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct FoodItem {
    pub id: Uuid,
    pub name: String,
    pub unit: String,
    pub carb_per_unit: f64,
    pub note: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Payload for adding a catalog entry.
#[derive(Debug, Clone, Deserialize)]
pub struct NewFood {
    pub name: String,
    pub unit: String,
    pub carb_per_unit: f64,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FoodValidationError {
    #[error("food name must not be empty")]
    EmptyName,
    #[error("unit must not be empty")]
    EmptyUnit,
    #[error("carbs per unit must be greater than zero")]
    NonPositiveCarbs,
}

impl NewFood {
    /// Trim the text fields and check the entry is usable for dosing math.
    pub fn validate(&mut self) -> Result<(), FoodValidationError> {
        self.name = self.name.trim().to_string();
        self.unit = self.unit.trim().to_string();
        if self.name.is_empty() {
            return Err(FoodValidationError::EmptyName);
        }
        if self.unit.is_empty() {
            return Err(FoodValidationError::EmptyUnit);
        }
        if !(self.carb_per_unit > 0.0) {
            return Err(FoodValidationError::NonPositiveCarbs);
        }
        Ok(())
    }
}
