//! Persisted meal record types and their wire formats.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::format_description::FormatItem;
use time::macros::format_description;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use super::draft::MealLineItem;

const ISO_DATE: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Parse a calendar date in the `YYYY-MM-DD` form used on the wire.
pub fn parse_iso_date(raw: &str) -> Result<Date, time::error::Parse> {
    Date::parse(raw, ISO_DATE)
}

/// Format a calendar date in the same `YYYY-MM-DD` form.
pub fn format_iso_date(date: Date) -> String {
    date.format(ISO_DATE).expect("ISO date format")
}

/// Serde adapter keeping dates in the `YYYY-MM-DD` form on the wire.
pub mod iso_date {
    use serde::{Deserialize, Deserializer, Serializer};
    use time::Date;

    use super::ISO_DATE;

    pub fn serialize<S: Serializer>(date: &Date, serializer: S) -> Result<S::Ok, S::Error> {
        let formatted = date.format(ISO_DATE).map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&formatted)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Date, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Date::parse(&raw, ISO_DATE).map_err(serde::de::Error::custom)
    }
}

/// Which meal of the day a record belongs to.
///
/// Together with the date this is the lookup key for post-meal updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "kebab-case")]
#[sqlx(type_name = "meal_slot", rename_all = "kebab-case")]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Dinner,
    LateSnack,
}

impl MealSlot {
    pub fn as_str(self) -> &'static str {
        match self {
            MealSlot::Breakfast => "breakfast",
            MealSlot::Lunch => "lunch",
            MealSlot::Dinner => "dinner",
            MealSlot::LateSnack => "late-snack",
        }
    }
}

impl std::fmt::Display for MealSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MealSlot {
    type Err = ParseMealSlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "breakfast" => Ok(MealSlot::Breakfast),
            "lunch" => Ok(MealSlot::Lunch),
            "dinner" => Ok(MealSlot::Dinner),
            "late-snack" => Ok(MealSlot::LateSnack),
            other => Err(ParseMealSlotError(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown meal slot: {0}")]
pub struct ParseMealSlotError(String);

/// One stored meal record.
///
/// Created with everything except the post-meal fields; those are filled in
/// at most once by the post-glucose update and overwritten, never duplicated,
/// if the update runs again.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MealRecord {
    pub id: Uuid,
    #[serde(rename = "date", with = "iso_date")]
    pub meal_date: Date,
    pub slot: MealSlot,
    pub total_carb_grams: f64,
    pub pre_meal_glucose: i32,
    pub target_glucose: i32,
    pub carb_ratio: f64,
    pub sensitivity: f64,
    /// Expected glucose rise per gram of carbohydrate; recorded for later
    /// review, not used in any computation.
    pub carb_rise: f64,
    pub carb_dose: f64,
    pub correction_dose: f64,
    pub total_dose: f64,
    pub post_meal_glucose: Option<i32>,
    pub recommended_ratio: Option<f64>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// A stored line item of a meal record.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MealItem {
    pub id: Uuid,
    pub record_id: Uuid,
    pub position: i32,
    pub name: String,
    pub unit: String,
    pub amount: f64,
    pub carb_grams: f64,
}

/// Everything needed to append a new meal record and its line items.
#[derive(Debug, Clone)]
pub struct NewMealRecord {
    pub meal_date: Date,
    pub slot: MealSlot,
    pub items: Vec<MealLineItem>,
    pub total_carb_grams: f64,
    pub pre_meal_glucose: i32,
    pub target_glucose: i32,
    pub carb_ratio: f64,
    pub sensitivity: f64,
    pub carb_rise: f64,
    pub carb_dose: f64,
    pub correction_dose: f64,
    pub total_dose: f64,
}
