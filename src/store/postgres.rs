//! Postgres-backed record store.

use anyhow::Context;
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use time::Date;
use uuid::Uuid;

use crate::foods::catalog::{FoodItem, NewFood};
use crate::meals::record::{MealItem, MealRecord, MealSlot, NewMealRecord};

use super::RecordStore;

const RECORD_COLUMNS: &str = "id, meal_date, slot, total_carb_grams, pre_meal_glucose, \
     target_glucose, carb_ratio, sensitivity, carb_rise, carb_dose, correction_dose, \
     total_dose, post_meal_glucose, recommended_ratio, created_at";

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .context("connect to database")?;
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn run_migrations(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("run migrations")?;
        Ok(())
    }
}

#[async_trait]
impl RecordStore for PgStore {
    async fn list_foods(&self) -> anyhow::Result<Vec<FoodItem>> {
        let foods = sqlx::query_as::<_, FoodItem>(
            r#"
            SELECT id, name, unit, carb_per_unit, note, created_at
            FROM foods
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("list foods")?;
        Ok(foods)
    }

    async fn add_food(&self, food: NewFood) -> anyhow::Result<FoodItem> {
        let stored = sqlx::query_as::<_, FoodItem>(
            r#"
            INSERT INTO foods (name, unit, carb_per_unit, note)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, unit, carb_per_unit, note, created_at
            "#,
        )
        .bind(&food.name)
        .bind(&food.unit)
        .bind(food.carb_per_unit)
        .bind(&food.note)
        .fetch_one(&self.pool)
        .await
        .context("insert food")?;
        Ok(stored)
    }

    async fn delete_food(&self, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM foods WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("delete food")?;
        Ok(result.rows_affected() > 0)
    }

    async fn append_meal_record(&self, record: NewMealRecord) -> anyhow::Result<MealRecord> {
        let mut tx = self.pool.begin().await.context("begin tx")?;

        let stored = sqlx::query_as::<_, MealRecord>(&format!(
            r#"
            INSERT INTO meal_records
                (meal_date, slot, total_carb_grams, pre_meal_glucose, target_glucose,
                 carb_ratio, sensitivity, carb_rise, carb_dose, correction_dose, total_dose)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {RECORD_COLUMNS}
            "#
        ))
        .bind(record.meal_date)
        .bind(record.slot)
        .bind(record.total_carb_grams)
        .bind(record.pre_meal_glucose)
        .bind(record.target_glucose)
        .bind(record.carb_ratio)
        .bind(record.sensitivity)
        .bind(record.carb_rise)
        .bind(record.carb_dose)
        .bind(record.correction_dose)
        .bind(record.total_dose)
        .fetch_one(&mut *tx)
        .await
        .context("insert meal record")?;

        for (position, item) in record.items.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO meal_items (record_id, position, name, unit, amount, carb_grams)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(stored.id)
            .bind(position as i32)
            .bind(&item.name)
            .bind(&item.unit)
            .bind(item.amount)
            .bind(item.carb_grams)
            .execute(&mut *tx)
            .await
            .context("insert meal item")?;
        }

        tx.commit().await.context("commit tx")?;
        Ok(stored)
    }

    async fn find_meal_record(
        &self,
        date: Date,
        slot: MealSlot,
    ) -> anyhow::Result<Option<MealRecord>> {
        let record = sqlx::query_as::<_, MealRecord>(&format!(
            r#"
            SELECT {RECORD_COLUMNS}
            FROM meal_records
            WHERE meal_date = $1 AND slot = $2
            ORDER BY created_at DESC
            LIMIT 1
            "#
        ))
        .bind(date)
        .bind(slot)
        .fetch_optional(&self.pool)
        .await
        .context("find meal record")?;
        Ok(record)
    }

    async fn list_meal_records(&self, limit: i64, offset: i64) -> anyhow::Result<Vec<MealRecord>> {
        let records = sqlx::query_as::<_, MealRecord>(&format!(
            r#"
            SELECT {RECORD_COLUMNS}
            FROM meal_records
            ORDER BY meal_date DESC, created_at DESC
            LIMIT $1 OFFSET $2
            "#
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .context("list meal records")?;
        Ok(records)
    }

    async fn list_meal_items(&self, record_id: Uuid) -> anyhow::Result<Vec<MealItem>> {
        let items = sqlx::query_as::<_, MealItem>(
            r#"
            SELECT id, record_id, position, name, unit, amount, carb_grams
            FROM meal_items
            WHERE record_id = $1
            ORDER BY position ASC
            "#,
        )
        .bind(record_id)
        .fetch_all(&self.pool)
        .await
        .context("list meal items")?;
        Ok(items)
    }

    async fn update_post_glucose(
        &self,
        date: Date,
        slot: MealSlot,
        post_meal_glucose: i32,
        recommended_ratio: Option<f64>,
    ) -> anyhow::Result<bool> {
        // Target row is resolved and written in one statement, so two
        // updates for the same key serialize at the database.
        let result = sqlx::query(
            r#"
            UPDATE meal_records
            SET post_meal_glucose = $3, recommended_ratio = $4
            WHERE id = (
                SELECT id FROM meal_records
                WHERE meal_date = $1 AND slot = $2
                ORDER BY created_at DESC
                LIMIT 1
            )
            "#,
        )
        .bind(date)
        .bind(slot)
        .bind(post_meal_glucose)
        .bind(recommended_ratio)
        .execute(&self.pool)
        .await
        .context("update post-meal glucose")?;
        Ok(result.rows_affected() > 0)
    }
}
