use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::meals::record::{iso_date, MealItem, MealRecord, MealSlot};

#[derive(Debug, Deserialize)]
pub struct MealItemInput {
    pub name: String,
    pub unit: String,
    pub amount: f64,
    pub carb_per_unit: f64,
}

#[derive(Debug, Deserialize)]
pub struct SaveMealRequest {
    #[serde(with = "iso_date")]
    pub date: Date,
    pub slot: MealSlot,
    #[serde(default)]
    pub items: Vec<MealItemInput>,
    pub current_glucose: i32,
    pub target_glucose: i32,
    pub carb_ratio: f64,
    pub sensitivity: f64,
    #[serde(default)]
    pub carb_rise: f64,
}

#[derive(Debug, Serialize)]
pub struct SavedMealResponse {
    pub id: Uuid,
    #[serde(with = "iso_date")]
    pub date: Date,
    pub slot: MealSlot,
    pub total_carb_grams: f64,
    pub carb_dose: f64,
    pub correction_dose: f64,
    pub total_dose: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<MealRecord> for SavedMealResponse {
    fn from(record: MealRecord) -> Self {
        Self {
            id: record.id,
            date: record.meal_date,
            slot: record.slot,
            total_carb_grams: record.total_carb_grams,
            carb_dose: record.carb_dose,
            correction_dose: record.correction_dose,
            total_dose: record.total_dose,
            created_at: record.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecordListItem {
    pub id: Uuid,
    #[serde(with = "iso_date")]
    pub date: Date,
    pub slot: MealSlot,
    pub total_carb_grams: f64,
    pub total_dose: f64,
    pub post_meal_glucose: Option<i32>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<MealRecord> for RecordListItem {
    fn from(record: MealRecord) -> Self {
        Self {
            id: record.id,
            date: record.meal_date,
            slot: record.slot,
            total_carb_grams: record.total_carb_grams,
            total_dose: record.total_dose,
            post_meal_glucose: record.post_meal_glucose,
            created_at: record.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecordDetails {
    #[serde(flatten)]
    pub record: MealRecord,
    pub items: Vec<MealItem>,
}

#[derive(Debug, Deserialize)]
pub struct PostGlucoseRequest {
    pub post_meal_glucose: i32,
}

#[derive(Debug, Serialize)]
pub struct PostGlucoseResponse {
    #[serde(with = "iso_date")]
    pub date: Date,
    pub slot: MealSlot,
    pub post_meal_glucose: i32,
    pub recommended_ratio: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}
fn default_limit() -> i64 { 20 }
