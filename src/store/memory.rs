//! In-memory record store used by tests and local experiments.
//!
//! Same observable contract as the Postgres store: latest-wins lookups per
//! `(date, slot)` key and overwrite-on-repeat post-glucose updates. One lock
//! guards everything, which is plenty for a single-user service double.

use std::sync::Mutex;

use async_trait::async_trait;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::foods::catalog::{FoodItem, NewFood};
use crate::meals::record::{MealItem, MealRecord, MealSlot, NewMealRecord};

use super::RecordStore;

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    foods: Vec<FoodItem>,
    records: Vec<MealRecord>,
    items: Vec<MealItem>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn list_foods(&self) -> anyhow::Result<Vec<FoodItem>> {
        let inner = self.inner.lock().unwrap();
        let mut foods = inner.foods.clone();
        foods.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(foods)
    }

    async fn add_food(&self, food: NewFood) -> anyhow::Result<FoodItem> {
        let stored = FoodItem {
            id: Uuid::new_v4(),
            name: food.name,
            unit: food.unit,
            carb_per_unit: food.carb_per_unit,
            note: food.note,
            created_at: OffsetDateTime::now_utc(),
        };
        self.inner.lock().unwrap().foods.push(stored.clone());
        Ok(stored)
    }

    async fn delete_food(&self, id: Uuid) -> anyhow::Result<bool> {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.foods.len();
        inner.foods.retain(|food| food.id != id);
        Ok(inner.foods.len() < before)
    }

    async fn append_meal_record(&self, record: NewMealRecord) -> anyhow::Result<MealRecord> {
        let stored = MealRecord {
            id: Uuid::new_v4(),
            meal_date: record.meal_date,
            slot: record.slot,
            total_carb_grams: record.total_carb_grams,
            pre_meal_glucose: record.pre_meal_glucose,
            target_glucose: record.target_glucose,
            carb_ratio: record.carb_ratio,
            sensitivity: record.sensitivity,
            carb_rise: record.carb_rise,
            carb_dose: record.carb_dose,
            correction_dose: record.correction_dose,
            total_dose: record.total_dose,
            post_meal_glucose: None,
            recommended_ratio: None,
            created_at: OffsetDateTime::now_utc(),
        };

        let mut inner = self.inner.lock().unwrap();
        for (position, item) in record.items.iter().enumerate() {
            inner.items.push(MealItem {
                id: Uuid::new_v4(),
                record_id: stored.id,
                position: position as i32,
                name: item.name.clone(),
                unit: item.unit.clone(),
                amount: item.amount,
                carb_grams: item.carb_grams,
            });
        }
        inner.records.push(stored.clone());
        Ok(stored)
    }

    async fn find_meal_record(
        &self,
        date: Date,
        slot: MealSlot,
    ) -> anyhow::Result<Option<MealRecord>> {
        let inner = self.inner.lock().unwrap();
        // Insertion order stands in for created_at; newest wins.
        Ok(inner
            .records
            .iter()
            .rev()
            .find(|record| record.meal_date == date && record.slot == slot)
            .cloned())
    }

    async fn list_meal_records(&self, limit: i64, offset: i64) -> anyhow::Result<Vec<MealRecord>> {
        let inner = self.inner.lock().unwrap();
        let mut records: Vec<MealRecord> = inner.records.iter().rev().cloned().collect();
        records.sort_by(|a, b| b.meal_date.cmp(&a.meal_date));
        Ok(records
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn list_meal_items(&self, record_id: Uuid) -> anyhow::Result<Vec<MealItem>> {
        let inner = self.inner.lock().unwrap();
        let mut items: Vec<MealItem> = inner
            .items
            .iter()
            .filter(|item| item.record_id == record_id)
            .cloned()
            .collect();
        items.sort_by_key(|item| item.position);
        Ok(items)
    }

    async fn update_post_glucose(
        &self,
        date: Date,
        slot: MealSlot,
        post_meal_glucose: i32,
        recommended_ratio: Option<f64>,
    ) -> anyhow::Result<bool> {
        let mut inner = self.inner.lock().unwrap();
        let Some(record) = inner
            .records
            .iter_mut()
            .rev()
            .find(|record| record.meal_date == date && record.slot == slot)
        else {
            return Ok(false);
        };
        record.post_meal_glucose = Some(post_meal_glucose);
        record.recommended_ratio = recommended_ratio;
        Ok(true)
    }
}
