//! The pure dosing core: no I/O, no state, total over its inputs.

pub mod calculator;
pub mod recommend;
pub mod rounding;

pub use calculator::{compute_dose, DoseInputs, DoseResult};
pub use recommend::{recommend_ratio, RatioInputs};
pub use rounding::round_to_half_unit;
