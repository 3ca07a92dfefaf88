//! Meal flows: validate, dose, persist, and the post-meal follow-up.

use thiserror::Error;
use time::Date;
use tracing::info;

use crate::dosing::{compute_dose, recommend_ratio, DoseInputs, RatioInputs};
use crate::meals::draft::{DraftError, MealDraft};
use crate::meals::dto::SaveMealRequest;
use crate::meals::record::{MealRecord, MealSlot, NewMealRecord};
use crate::store::RecordStore;

#[derive(Debug, Error)]
pub enum SaveMealError {
    #[error("carb ratio and sensitivity must be positive")]
    InvalidRatio,
    #[error("glucose readings must not be negative")]
    NegativeGlucose,
    #[error(transparent)]
    Draft(#[from] DraftError),
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

#[derive(Debug, Error)]
pub enum PostMealError {
    #[error("no meal record for {date} {slot}")]
    RecordNotFound { date: Date, slot: MealSlot },
    #[error("glucose readings must not be negative")]
    NegativeGlucose,
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

/// What the post-meal update produced: the record it landed on and the
/// recommendation backed out of it, if one was defined.
#[derive(Debug)]
pub struct PostMealOutcome {
    pub record: MealRecord,
    pub post_meal_glucose: i32,
    pub recommended_ratio: Option<f64>,
}

/// Validate the request, total the meal, compute the dose and append the
/// record. Appending never overwrites; a repeated save for the same day and
/// slot simply becomes the newest record for that key.
pub async fn save_meal(
    store: &dyn RecordStore,
    req: SaveMealRequest,
) -> Result<MealRecord, SaveMealError> {
    if req.carb_ratio <= 0.0 || req.sensitivity <= 0.0 {
        return Err(SaveMealError::InvalidRatio);
    }
    if req.current_glucose < 0 || req.target_glucose < 0 {
        return Err(SaveMealError::NegativeGlucose);
    }

    let mut draft = MealDraft::new();
    for item in &req.items {
        draft.add_item(&item.name, &item.unit, item.amount, item.carb_per_unit)?;
    }
    let meal = draft.finalize();

    let dose = compute_dose(&DoseInputs {
        total_carb_grams: meal.total_carb_grams,
        current_glucose: req.current_glucose,
        target_glucose: req.target_glucose,
        carb_ratio: req.carb_ratio,
        sensitivity: req.sensitivity,
    });

    let record = store
        .append_meal_record(NewMealRecord {
            meal_date: req.date,
            slot: req.slot,
            items: meal.items,
            total_carb_grams: meal.total_carb_grams,
            pre_meal_glucose: req.current_glucose,
            target_glucose: req.target_glucose,
            carb_ratio: req.carb_ratio,
            sensitivity: req.sensitivity,
            carb_rise: req.carb_rise,
            carb_dose: dose.carb_dose,
            correction_dose: dose.correction_dose,
            total_dose: dose.total_dose,
        })
        .await?;

    info!(
        date = %record.meal_date,
        slot = %record.slot,
        total_carb_grams = record.total_carb_grams,
        total_dose = record.total_dose,
        "meal record saved"
    );
    Ok(record)
}

/// Store the post-meal reading on the newest record for the key and back out
/// a recommended ratio from it. Repeating the call overwrites the previous
/// reading and recommendation; an undefined recommendation is stored as NULL
/// and reported as `None`, not as an error.
pub async fn record_post_meal(
    store: &dyn RecordStore,
    date: Date,
    slot: MealSlot,
    post_meal_glucose: i32,
) -> Result<PostMealOutcome, PostMealError> {
    if post_meal_glucose < 0 {
        return Err(PostMealError::NegativeGlucose);
    }

    let Some(record) = store.find_meal_record(date, slot).await? else {
        return Err(PostMealError::RecordNotFound { date, slot });
    };

    let recommended = recommend_ratio(
        &RatioInputs {
            total_carb_grams: record.total_carb_grams,
            pre_meal_glucose: record.pre_meal_glucose,
            sensitivity: record.sensitivity,
            total_dose: record.total_dose,
        },
        post_meal_glucose,
    );

    let updated = store
        .update_post_glucose(date, slot, post_meal_glucose, recommended)
        .await?;
    if !updated {
        return Err(PostMealError::RecordNotFound { date, slot });
    }

    info!(
        date = %date,
        slot = %slot,
        post_meal_glucose,
        recommended_ratio = ?recommended,
        "post-meal reading recorded"
    );
    Ok(PostMealOutcome {
        record,
        post_meal_glucose,
        recommended_ratio: recommended,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meals::dto::MealItemInput;
    use crate::store::memory::MemoryStore;
    use time::macros::date;

    fn request(items: Vec<MealItemInput>) -> SaveMealRequest {
        SaveMealRequest {
            date: date!(2025 - 12 - 08),
            slot: MealSlot::Lunch,
            items,
            current_glucose: 180,
            target_glucose: 100,
            carb_ratio: 10.0,
            sensitivity: 50.0,
            carb_rise: 0.0,
        }
    }

    fn rice(amount: f64) -> MealItemInput {
        MealItemInput {
            name: "white rice".into(),
            unit: "bowl".into(),
            amount,
            carb_per_unit: 60.0,
        }
    }

    #[tokio::test]
    async fn rejects_non_positive_ratios() {
        let store = MemoryStore::new();
        let mut req = request(vec![rice(1.0)]);
        req.carb_ratio = 0.0;
        assert!(matches!(
            save_meal(&store, req).await,
            Err(SaveMealError::InvalidRatio)
        ));

        let mut req = request(vec![rice(1.0)]);
        req.sensitivity = -1.0;
        assert!(matches!(
            save_meal(&store, req).await,
            Err(SaveMealError::InvalidRatio)
        ));
    }

    #[tokio::test]
    async fn rejects_negative_glucose() {
        let store = MemoryStore::new();
        let mut req = request(vec![rice(1.0)]);
        req.current_glucose = -1;
        assert!(matches!(
            save_meal(&store, req).await,
            Err(SaveMealError::NegativeGlucose)
        ));
    }

    #[tokio::test]
    async fn rejects_bad_line_items() {
        let store = MemoryStore::new();
        let req = request(vec![MealItemInput {
            name: "rice".into(),
            unit: "bowl".into(),
            amount: 0.0,
            carb_per_unit: 60.0,
        }]);
        assert!(matches!(
            save_meal(&store, req).await,
            Err(SaveMealError::Draft(DraftError::InvalidAmount))
        ));
    }

    #[tokio::test]
    async fn saves_and_doses_the_standard_meal() {
        let store = MemoryStore::new();
        let record = save_meal(&store, request(vec![rice(1.0)])).await.unwrap();

        assert_eq!(record.total_carb_grams, 60.0);
        assert_eq!(record.carb_dose, 6.0);
        assert_eq!(record.correction_dose, 1.5);
        assert_eq!(record.total_dose, 7.5);
        assert_eq!(record.post_meal_glucose, None);

        let items = store.list_meal_items(record.id).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].carb_grams, 60.0);
    }

    #[tokio::test]
    async fn empty_meal_still_doses_the_correction() {
        let store = MemoryStore::new();
        let record = save_meal(&store, request(Vec::new())).await.unwrap();
        assert_eq!(record.total_carb_grams, 0.0);
        assert_eq!(record.carb_dose, 0.0);
        assert_eq!(record.total_dose, 1.5);
    }

    #[tokio::test]
    async fn post_meal_on_missing_record_is_not_found() {
        let store = MemoryStore::new();
        let err = record_post_meal(&store, date!(2025 - 12 - 08), MealSlot::Dinner, 140)
            .await
            .unwrap_err();
        assert!(matches!(err, PostMealError::RecordNotFound { .. }));
    }

    #[tokio::test]
    async fn post_meal_backs_out_the_ratio() {
        let store = MemoryStore::new();
        save_meal(&store, request(vec![rice(1.0)])).await.unwrap();

        let outcome = record_post_meal(&store, date!(2025 - 12 - 08), MealSlot::Lunch, 140)
            .await
            .unwrap();
        assert_eq!(outcome.recommended_ratio, Some(8.96));

        let stored = store
            .find_meal_record(date!(2025 - 12 - 08), MealSlot::Lunch)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.post_meal_glucose, Some(140));
        assert_eq!(stored.recommended_ratio, Some(8.96));
    }

    #[tokio::test]
    async fn undefined_recommendation_is_stored_as_none() {
        let store = MemoryStore::new();
        // Empty meal doses 1.5 U of correction. An 80 mg/dL drop at ISF 50
        // would have taken 1.6 U, so no carb share remains to back out.
        save_meal(&store, request(Vec::new())).await.unwrap();

        let outcome = record_post_meal(&store, date!(2025 - 12 - 08), MealSlot::Lunch, 100)
            .await
            .unwrap();
        assert_eq!(outcome.recommended_ratio, None);

        let stored = store
            .find_meal_record(date!(2025 - 12 - 08), MealSlot::Lunch)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.post_meal_glucose, Some(100));
        assert_eq!(stored.recommended_ratio, None);
    }
}
