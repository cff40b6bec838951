//! Rule registry and health handlers

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

/// One registered rule
#[derive(Debug, Serialize)]
pub struct RuleInfo {
    pub key: &'static str,
    pub label: &'static str,
    pub name: &'static str,
}

/// GET /api/rules - List the registry in execution order
pub async fn list_rules(State(state): State<Arc<AppState>>) -> Json<Vec<RuleInfo>> {
    let rules = state
        .engine
        .insight_types()
        .into_iter()
        .zip(state.engine.rule_names())
        .map(|(insight_type, name)| RuleInfo {
            key: insight_type.as_str(),
            label: insight_type.label(),
            name,
        })
        .collect();

    Json(rules)
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// GET /api/health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
