//! Sheet upload handler

use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    Json,
};
use tracing::{info, warn};

use crate::{AppError, AppState};
use spendscope_core::{load_dataset, ProcurementReport, SchemaContract};

/// POST /api/upload - Analyze an uploaded procurement sheet
///
/// Expects a multipart form with the sheet in the `file` field.
pub async fn upload_sheet(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<ProcurementReport>, AppError> {
    let max_size = state.config.max_upload_size;
    let mut file_data: Option<Vec<u8>> = None;
    let mut file_name: Option<String> = None;

    // Extract fields from multipart form
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::bad_request(&format!("Failed to read form field: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        file_name = field.file_name().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|_| AppError::bad_request("Failed to read file data"))?;

        // Check file size limit
        if bytes.len() > max_size {
            warn!(size = bytes.len(), "Rejected oversized upload");
            return Err(AppError::bad_request(&format!(
                "File too large. Maximum size is {} MB",
                max_size / 1024 / 1024
            )));
        }

        file_data = Some(bytes.to_vec());
    }

    let data = file_data.ok_or_else(|| AppError::bad_request("No file provided"))?;

    let worker_state = Arc::clone(&state);
    let report = tokio::task::spawn_blocking(move || analyze_upload(&worker_state, &data))
        .await??;

    info!(
        file = file_name.as_deref().unwrap_or("<unnamed>"),
        suppliers = report.top_suppliers.len(),
        findings = report.dynamic_insights.len(),
        "Analyzed upload"
    );

    Ok(Json(report))
}

/// Decode, validate against the upload schema, and build the report
pub fn analyze_upload(state: &AppState, data: &[u8]) -> Result<ProcurementReport, AppError> {
    let dataset = load_dataset(data, &SchemaContract::upload()).map_err(|e| {
        warn!(error = %e, "Rejected upload");
        AppError::from_core(e)
    })?;

    ProcurementReport::build(&dataset, &state.engine).map_err(AppError::from_core)
}
