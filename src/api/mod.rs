//! REST API for simulation, comparison, and calibration.
//!
//! Endpoints:
//! - `GET /health` — liveness probe
//! - `GET /presets` — preset catalog; `GET /presets/{id}` — full preset config
//! - `POST /simulate` — full-year simulation with annual summary
//! - `POST /compare` — simulation vs measured data with fit metrics
//! - `POST /calibrate` — parameter search against measured data

mod handlers;
mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};

use crate::calib::CalibrationOptions;

/// Immutable application state shared across all request handlers.
///
/// Wrapped in `Arc` — no locks needed since all data is read-only.
pub struct AppState {
    /// Server-side search limits applied to every calibration request.
    pub options: CalibrationOptions,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            options: CalibrationOptions::default(),
        }
    }
}

/// Builds the axum router with all API routes.
///
/// # Arguments
///
/// * `state` - Shared application state
///
/// # Returns
///
/// Configured `Router` ready to serve.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/presets", get(handlers::list_presets))
        .route("/presets/{id}", get(handlers::get_preset))
        .route("/simulate", post(handlers::simulate))
        .route("/compare", post(handlers::compare))
        .route("/calibrate", post(handlers::calibrate))
        .with_state(state)
}

/// Binds to the given address and serves the API.
///
/// # Arguments
///
/// * `state` - Shared application state
/// * `addr` - Socket address to bind to
///
/// # Panics
///
/// Panics if the TCP listener cannot bind to `addr`.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind to {addr}: {e}"));
    eprintln!("API server listening on http://{addr}");
    axum::serve(listener, app)
        .await
        .unwrap_or_else(|e| panic!("server error: {e}"));
}
