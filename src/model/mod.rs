//! Deterministic monthly building energy model.
//!
//! Closed-form thermal balance over twelve calendar months: heat-load
//! breakdown, psychrometric state points, and HVAC energy for a central
//! (all-building) system and a local (per-zone) system.

pub mod engine;
pub mod hvac;
pub mod loads;
pub mod psychro;
pub mod types;

pub use engine::{AnnualSummary, BuildingModel};
pub use types::{EquipmentSpec, FloorSpec, MonthlyCondition, MonthlyResult};
