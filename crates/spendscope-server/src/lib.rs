//! Spendscope Web Server
//!
//! Axum-based REST API for the Spendscope procurement insight engine.
//!
//! - `POST /api/upload` analyzes an uploaded procurement sheet
//! - `GET /api/rules` lists the rule registry in execution order
//! - `GET /api/health` reports liveness
//!
//! Security features:
//! - Restrictive CORS policy unless origins are configured
//! - Upload size limits
//! - Sanitized error responses

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};
use tracing::{error, info, warn};

use spendscope_core::{InsightEngine, SchemaError};

mod handlers;
pub mod settings;

pub use settings::ServerSettings;

/// Maximum file upload size (10 MB)
pub const MAX_UPLOAD_SIZE: usize = 10 * 1024 * 1024;

/// Room for multipart boundaries and part headers on top of the file itself
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Allowed CORS origins (empty = same-origin only, `*` = any origin)
    pub allowed_origins: Vec<String>,
    /// Maximum accepted file size in bytes
    pub max_upload_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![],
            max_upload_size: MAX_UPLOAD_SIZE,
        }
    }
}

/// Shared application state
pub struct AppState {
    pub engine: InsightEngine,
    pub config: ServerConfig,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            engine: InsightEngine::new(),
            config,
        }
    }
}

/// Create the application router
pub fn create_router(config: ServerConfig) -> Router {
    create_router_with_state(AppState::new(config))
}

/// Create the application router around prepared state (for custom rule sets)
pub fn create_router_with_state(state: AppState) -> Router {
    let body_limit = state.config.max_upload_size + MULTIPART_OVERHEAD;
    let cors = cors_layer(&state.config.allowed_origins);
    let state = Arc::new(state);

    let api_routes = Router::new()
        .route(
            "/upload",
            post(handlers::upload_sheet).layer(DefaultBodyLimit::max(body_limit)),
        )
        .route("/rules", get(handlers::list_rules))
        .route("/health", get(handlers::health));

    // CSP: the API serves JSON only
    let csp_value = HeaderValue::from_static("default-src 'none'; frame-ancestors 'none'");

    Router::new()
        .nest("/api", api_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(
            ServiceBuilder::new()
                .layer(SetResponseHeaderLayer::overriding(
                    header::X_CONTENT_TYPE_OPTIONS,
                    HeaderValue::from_static("nosniff"),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    header::X_FRAME_OPTIONS,
                    HeaderValue::from_static("DENY"),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    header::X_XSS_PROTECTION,
                    HeaderValue::from_static("1; mode=block"),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    header::CONTENT_SECURITY_POLICY,
                    csp_value,
                )),
        )
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    if allowed_origins.iter().any(|o| o == "*") {
        base.allow_origin(Any)
    } else if allowed_origins.is_empty() {
        // Restrictive default: only allow same-origin
        base
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|o| match o.parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(origin = %o, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        base.allow_origin(origins)
    }
}

/// Start the server
pub async fn serve(host: &str, port: u16, config: ServerConfig) -> anyhow::Result<()> {
    if config.allowed_origins.iter().any(|o| o == "*") {
        warn!("⚠️  CORS allows any origin");
    }

    let state = AppState::new(config);
    info!(
        rules = ?state.engine.rule_names(),
        max_upload_mb = state.config.max_upload_size / 1024 / 1024,
        "Insight engine ready"
    );

    let app = create_router_with_state(state);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
    violations: Option<serde_json::Value>,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            violations: None,
            internal: None,
        }
    }

    pub fn unprocessable(msg: &str) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: msg.to_string(),
            violations: None,
            internal: None,
        }
    }

    pub fn internal(msg: &str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.to_string(),
            violations: None,
            internal: None,
        }
    }

    /// 422 carrying every column violation
    pub fn schema(err: &SchemaError) -> Self {
        let violations = serde_json::to_value(err.violations()).ok();
        Self {
            violations,
            ..Self::unprocessable(&err.to_string())
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Map an engine error onto the HTTP surface
    pub fn from_core(err: spendscope_core::Error) -> Self {
        use spendscope_core::Error;

        match err {
            Error::Schema(schema) => Self::schema(&schema),
            Error::DegenerateInput(msg) => Self::unprocessable(&msg),
            Error::Csv(e) => Self::bad_request(&format!("Could not parse sheet: {}", e)),
            Error::Import(msg) => Self::bad_request(&msg),
            other => Self::from(other),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = match self.violations {
            Some(violations) => serde_json::json!({
                "error": self.message,
                "violations": violations,
            }),
            None => serde_json::json!({
                "error": self.message
            }),
        };

        (self.status, Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Return generic message to client
            message: "An internal error occurred".to_string(),
            violations: None,
            // Keep full error for logging
            internal: Some(err),
        }
    }
}

#[cfg(test)]
mod tests;
