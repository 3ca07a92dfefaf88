//! Full meal flows through the service layer against the in-memory store.

use mealdose::meals::dto::{MealItemInput, SaveMealRequest};
use mealdose::meals::record::MealSlot;
use mealdose::meals::services::{record_post_meal, save_meal, PostMealError};
use mealdose::store::memory::MemoryStore;
use mealdose::store::RecordStore;
use time::macros::date;
use time::Date;

fn save_request(date: Date, slot: MealSlot, items: Vec<MealItemInput>) -> SaveMealRequest {
    SaveMealRequest {
        date,
        slot,
        items,
        current_glucose: 180,
        target_glucose: 100,
        carb_ratio: 10.0,
        sensitivity: 50.0,
        carb_rise: 5.0,
    }
}

fn item(name: &str, unit: &str, amount: f64, carb_per_unit: f64) -> MealItemInput {
    MealItemInput {
        name: name.into(),
        unit: unit.into(),
        amount,
        carb_per_unit,
    }
}

#[tokio::test]
async fn save_then_follow_up_then_overwrite() {
    let store = MemoryStore::new();
    let day = date!(2025 - 12 - 08);

    let saved = save_meal(
        &store,
        save_request(
            day,
            MealSlot::Dinner,
            vec![
                item("noodles", "bowl", 1.0, 50.0),
                item("apple", "piece", 1.0, 10.0),
            ],
        ),
    )
    .await
    .unwrap();

    assert_eq!(saved.total_carb_grams, 60.0);
    assert_eq!(saved.carb_dose, 6.0);
    assert_eq!(saved.correction_dose, 1.5);
    assert_eq!(saved.total_dose, 7.5);

    let items = store.list_meal_items(saved.id).await.unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].name, "noodles");
    assert_eq!(items[1].name, "apple");

    // First follow-up reading: glucose came down to 140, 0.8 U of the dose
    // went to correction, 60 g over the remaining 6.7 U is 8.96.
    let outcome = record_post_meal(&store, day, MealSlot::Dinner, 140)
        .await
        .unwrap();
    assert_eq!(outcome.post_meal_glucose, 140);
    assert_eq!(outcome.recommended_ratio, Some(8.96));

    // A corrected reading replaces the first; glucose unchanged means the
    // whole 7.5 U covered carbs.
    let outcome = record_post_meal(&store, day, MealSlot::Dinner, 180)
        .await
        .unwrap();
    assert_eq!(outcome.recommended_ratio, Some(8.0));

    let stored = store
        .find_meal_record(day, MealSlot::Dinner)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.post_meal_glucose, Some(180));
    assert_eq!(stored.recommended_ratio, Some(8.0));

    let all = store.list_meal_records(10, 0).await.unwrap();
    assert_eq!(all.len(), 1, "follow-up must not create a second record");
}

#[tokio::test]
async fn repeated_save_becomes_the_record_for_the_key() {
    let store = MemoryStore::new();
    let day = date!(2025 - 12 - 08);

    save_meal(
        &store,
        save_request(day, MealSlot::Lunch, vec![item("rice", "bowl", 1.0, 60.0)]),
    )
    .await
    .unwrap();
    save_meal(
        &store,
        save_request(day, MealSlot::Lunch, vec![item("congee", "bowl", 1.0, 30.0)]),
    )
    .await
    .unwrap();

    let found = store
        .find_meal_record(day, MealSlot::Lunch)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.total_carb_grams, 30.0);
    assert_eq!(found.total_dose, 4.5);

    // The follow-up lands on the newest record: 0.8 U of 4.5 U corrected,
    // 30 g over 3.7 U backs out 8.11.
    let outcome = record_post_meal(&store, day, MealSlot::Lunch, 140)
        .await
        .unwrap();
    assert_eq!(outcome.recommended_ratio, Some(8.11));
}

#[tokio::test]
async fn follow_up_without_a_record_is_not_found() {
    let store = MemoryStore::new();
    let err = record_post_meal(&store, date!(2025 - 12 - 08), MealSlot::Breakfast, 120)
        .await
        .unwrap_err();
    assert!(matches!(err, PostMealError::RecordNotFound { .. }));
}

#[tokio::test]
async fn listing_pages_newest_first() {
    let store = MemoryStore::new();
    for (day, slot) in [
        (date!(2025 - 12 - 06), MealSlot::Lunch),
        (date!(2025 - 12 - 07), MealSlot::Lunch),
        (date!(2025 - 12 - 08), MealSlot::Breakfast),
    ] {
        save_meal(
            &store,
            save_request(day, slot, vec![item("rice", "bowl", 1.0, 60.0)]),
        )
        .await
        .unwrap();
    }

    let page = store.list_meal_records(2, 0).await.unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(page[0].meal_date, date!(2025 - 12 - 08));
    assert_eq!(page[1].meal_date, date!(2025 - 12 - 07));

    let rest = store.list_meal_records(2, 2).await.unwrap();
    assert_eq!(rest.len(), 1);
    assert_eq!(rest[0].meal_date, date!(2025 - 12 - 06));
}
