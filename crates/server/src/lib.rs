pub mod config;
pub mod error;
pub mod routes;
pub mod startup;
pub mod telemetry;

use recon_import::ReconcileOptions;

/// Shared by every request. Immutable, so concurrent uploads never contend.
#[derive(Debug, Clone)]
pub struct AppState {
    pub options: ReconcileOptions,
}
