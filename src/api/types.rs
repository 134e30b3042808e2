//! API request and response types.
//!
//! Field names keep the unit-suffixed `kW`/`kWh` capitalization used by the
//! JSON schema, so API payloads and CSV exports stay consistent.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::calib::{
    ActualDataPoint, ComparisonMetrics, ComparisonTarget, Method, ParameterRange,
};
use crate::config::BuildingConfig;
use crate::model::{
    AnnualSummary, EquipmentSpec, FloorSpec, MonthlyCondition, MonthlyResult,
};

/// Building description shared by all POST endpoints.
#[derive(Debug, Deserialize)]
pub struct SimulateRequest {
    pub floor_spec: FloorSpec,
    pub equipment_spec: EquipmentSpec,
    pub monthly_conditions: Vec<MonthlyCondition>,
}

impl SimulateRequest {
    pub fn into_config(self) -> BuildingConfig {
        BuildingConfig {
            floor_spec: self.floor_spec,
            equipment_spec: self.equipment_spec,
            monthly_conditions: self.monthly_conditions,
        }
    }
}

/// Full-year simulation output with annual aggregates.
#[derive(Debug, Serialize)]
pub struct SimulateResponse {
    pub results: Vec<MonthlyResult>,
    pub summary: AnnualSummary,
}

/// Simulation-vs-measured comparison request.
#[derive(Debug, Deserialize)]
pub struct CompareRequest {
    pub floor_spec: FloorSpec,
    pub equipment_spec: EquipmentSpec,
    pub monthly_conditions: Vec<MonthlyCondition>,
    pub actual_data: Vec<ActualDataPoint>,
    pub comparison_target: ComparisonTarget,
}

/// Comparison response: the full simulated series, the measured data echoed
/// back, and the fit metrics.
#[derive(Debug, Serialize)]
pub struct CompareResponse {
    pub simulation_results: Vec<MonthlyResult>,
    pub actual_data: Vec<ActualDataPoint>,
    pub comparison_target: ComparisonTarget,
    pub metrics: ComparisonMetrics,
}

/// Calibration request.
#[derive(Debug, Deserialize)]
pub struct CalibrateRequest {
    pub floor_spec: FloorSpec,
    pub equipment_spec: EquipmentSpec,
    pub monthly_conditions: Vec<MonthlyCondition>,
    pub actual_data: Vec<ActualDataPoint>,
    pub comparison_target: ComparisonTarget,
    pub parameter_ranges: Vec<ParameterRange>,
    pub method: Method,
}

/// The winning candidate of a calibration run.
#[derive(Debug, Serialize)]
pub struct BestResult {
    pub parameters: BTreeMap<String, f64>,
    pub metrics: ComparisonMetrics,
}

/// Calibration response.
#[derive(Debug, Serialize)]
pub struct CalibrateResponse {
    pub best_result: BestResult,
    pub iterations: usize,
    pub method: Method,
}

/// Health probe body.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// One entry in the preset catalog.
#[derive(Debug, Serialize)]
pub struct PresetSummary {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

/// Preset catalog.
#[derive(Debug, Serialize)]
pub struct PresetsResponse {
    pub presets: Vec<PresetSummary>,
}

/// Full preset configuration.
#[derive(Debug, Serialize)]
pub struct PresetResponse {
    pub name: &'static str,
    pub description: &'static str,
    pub floor_spec: FloorSpec,
    pub equipment_spec: EquipmentSpec,
    pub monthly_conditions: Vec<MonthlyCondition>,
}

/// Error response body for 400/404-class errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}
