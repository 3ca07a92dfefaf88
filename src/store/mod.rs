//! The record store: everything the service persists, behind one seam.
//!
//! `PgStore` is the production backend; `MemoryStore` backs the tests. Both
//! honor the same contract: appends are atomic per call, `(date, slot)`
//! lookups resolve to the newest record for that key, and the post-glucose
//! update writes in a single step so concurrent updates for one key cannot
//! interleave half-written state.

use async_trait::async_trait;
use time::Date;
use uuid::Uuid;

use crate::foods::catalog::{FoodItem, NewFood};
use crate::meals::record::{MealItem, MealRecord, MealSlot, NewMealRecord};

pub mod memory;
pub mod postgres;

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// All catalog entries.
    async fn list_foods(&self) -> anyhow::Result<Vec<FoodItem>>;

    /// Add a catalog entry and return it with its assigned id.
    async fn add_food(&self, food: NewFood) -> anyhow::Result<FoodItem>;

    /// Remove a catalog entry; `false` when the id is unknown.
    async fn delete_food(&self, id: Uuid) -> anyhow::Result<bool>;

    /// Append a meal record together with its line items, atomically.
    async fn append_meal_record(&self, record: NewMealRecord) -> anyhow::Result<MealRecord>;

    /// The newest record for `(date, slot)`, if any.
    async fn find_meal_record(
        &self,
        date: Date,
        slot: MealSlot,
    ) -> anyhow::Result<Option<MealRecord>>;

    /// Recent records, newest first.
    async fn list_meal_records(&self, limit: i64, offset: i64) -> anyhow::Result<Vec<MealRecord>>;

    /// Line items of one record, in entry order.
    async fn list_meal_items(&self, record_id: Uuid) -> anyhow::Result<Vec<MealItem>>;

    /// Write the post-meal reading and the back-solved ratio (absent when
    /// the recommendation is undefined) onto the newest record for the key.
    /// Overwrites on repeat; `false` when no record matches.
    async fn update_post_glucose(
        &self,
        date: Date,
        slot: MealSlot,
        post_meal_glucose: i32,
        recommended_ratio: Option<f64>,
    ) -> anyhow::Result<bool>;
}
