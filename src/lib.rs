//! Monthly office-building HVAC energy model with measured-data calibration.

#[cfg(feature = "api")]
pub mod api;
/// Calibration engine: parameter resolution, metrics, grid search, optimizer.
pub mod calib;
pub mod config;
pub mod io;
pub mod model;
