//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::calib::{self, CalibError};
use crate::config::BuildingConfig;
use crate::model::BuildingModel;

use super::AppState;
use super::types::{
    BestResult, CalibrateRequest, CalibrateResponse, CompareRequest, CompareResponse,
    ErrorResponse, HealthResponse, PresetResponse, PresetSummary, PresetsResponse,
    SimulateRequest, SimulateResponse,
};

type ApiError = (StatusCode, Json<ErrorResponse>);

fn bad_request(message: String) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse { error: message }))
}

/// Rejects configurations that fail validation before any simulation runs.
fn check_config(config: &BuildingConfig) -> Result<(), ApiError> {
    let errors = config.validate();
    if errors.is_empty() {
        return Ok(());
    }
    let joined = errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ");
    Err(bad_request(joined))
}

/// Liveness probe.
///
/// `GET /health` → 200 + `{"status":"healthy"}`
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "healthy" })
}

/// Returns the preset catalog.
///
/// `GET /presets` → 200 + `PresetsResponse` JSON
pub async fn list_presets() -> Json<PresetsResponse> {
    Json(PresetsResponse {
        presets: vec![
            PresetSummary {
                id: "modern",
                name: "Modern office",
                description: "Recent office building with a high-efficiency envelope and plant",
            },
            PresetSummary {
                id: "old",
                name: "Old office",
                description: "Legacy office building with dated envelope and equipment",
            },
        ],
    })
}

/// Returns a full preset configuration by id.
///
/// `GET /presets/{id}` → 200 + `PresetResponse` JSON, or 404 for unknown ids
pub async fn get_preset(Path(id): Path<String>) -> Result<Json<PresetResponse>, ApiError> {
    let (config, name, description) = match id.as_str() {
        "modern" => (
            BuildingConfig::modern_office(),
            "Modern office",
            "Recent office building with a high-efficiency envelope and plant",
        ),
        "old" => (
            BuildingConfig::old_office(),
            "Old office",
            "Legacy office building with dated envelope and equipment",
        ),
        _ => {
            return Err((
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: format!("unknown preset \"{id}\""),
                }),
            ));
        }
    };
    Ok(Json(PresetResponse {
        name,
        description,
        floor_spec: config.floor_spec,
        equipment_spec: config.equipment_spec,
        monthly_conditions: config.monthly_conditions,
    }))
}

/// Runs a full-year simulation.
///
/// `POST /simulate` → 200 + `SimulateResponse`, or 400 for invalid configs
pub async fn simulate(
    Json(request): Json<SimulateRequest>,
) -> Result<Json<SimulateResponse>, ApiError> {
    let config = request.into_config();
    check_config(&config)?;

    let model = BuildingModel::new(
        config.floor_spec,
        config.equipment_spec,
        config.monthly_conditions,
    );
    let results = model.simulate_year();
    let summary = model.summarize(&results);
    Ok(Json(SimulateResponse { results, summary }))
}

/// Compares a simulation run against measured monthly data.
///
/// `POST /compare` → 200 + `CompareResponse`, or 400 for caller errors
pub async fn compare(
    Json(request): Json<CompareRequest>,
) -> Result<Json<CompareResponse>, ApiError> {
    let config = BuildingConfig {
        floor_spec: request.floor_spec,
        equipment_spec: request.equipment_spec,
        monthly_conditions: request.monthly_conditions,
    };
    check_config(&config)?;

    let (simulation_results, metrics) =
        calib::compare(&config, &request.actual_data, request.comparison_target)
            .map_err(|e| bad_request(e.to_string()))?;

    Ok(Json(CompareResponse {
        simulation_results,
        actual_data: request.actual_data,
        comparison_target: request.comparison_target,
        metrics,
    }))
}

/// Calibrates model parameters against measured monthly data.
///
/// `POST /calibrate` → 200 + `CalibrateResponse`, or 400 for caller errors
pub async fn calibrate(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CalibrateRequest>,
) -> Result<Json<CalibrateResponse>, ApiError> {
    let config = BuildingConfig {
        floor_spec: request.floor_spec,
        equipment_spec: request.equipment_spec,
        monthly_conditions: request.monthly_conditions,
    };
    check_config(&config)?;

    let result = calib::calibrate(
        &config,
        &request.actual_data,
        request.comparison_target,
        &request.parameter_ranges,
        request.method,
        &state.options,
        None,
    )
    .map_err(|e: CalibError| bad_request(e.to_string()))?;

    Ok(Json(CalibrateResponse {
        best_result: BestResult {
            parameters: result.best_parameters,
            metrics: result.best_metrics,
        },
        iterations: result.iterations,
        method: result.method,
    }))
}
