//! Meal carbohydrate and insulin dose tracking service.
//!
//! Meals are totaled from their line items, dosed against glucose readings
//! with half-unit rounding, and appended to a per-day, per-slot record log.
//! A later post-meal reading backs a recommended carb-to-insulin ratio out
//! of the stored record.

pub mod app;
pub mod config;
pub mod dosing;
pub mod foods;
pub mod meals;
pub mod state;
pub mod store;
