// In crates/web-server/src/lib.rs

use app_config::PortfolioSnapshot;
use app_config::types::ServerSettings;
use axum::{
    Router,
    extract::State,
    http::header,
    response::{Html, IntoResponse, Json},
    routing::{get, post},
};
use chrono::Utc;
use risk::{Evaluation, RiskCalculator, SimpleRiskCalculator};
use std::sync::Arc;
use tokio::net::TcpListener;
use types::{EvaluateRequest, EvaluateResponse, PortfolioResponse};

pub mod error;
pub mod types;

// Re-export our custom error type for convenience.
pub use error::{Error, Result};

/// The shared application state that is available to all API handlers.
///
/// Nothing in here is mutated after startup. Every request carries its own
/// trades, so handlers never share portfolio state.
#[derive(Clone)]
pub struct AppState {
    pub calculator: Arc<SimpleRiskCalculator>,
    /// Capital used when a request doesn't supply one.
    pub default_capital: f64,
    /// The snapshot served to a fresh page.
    pub snapshot: Arc<PortfolioSnapshot>,
}

impl AppState {
    pub fn new(calculator: SimpleRiskCalculator, default_capital: f64, snapshot: PortfolioSnapshot) -> Self {
        Self {
            calculator: Arc::new(calculator),
            default_capital,
            snapshot: Arc::new(snapshot),
        }
    }

    fn capital_for(&self, request: &EvaluateRequest) -> f64 {
        request.total_capital.unwrap_or(self.default_capital)
    }

    fn evaluate(&self, request: &EvaluateRequest) -> Evaluation {
        let now = request.as_of.unwrap_or_else(Utc::now);
        self.calculator.evaluate(&request.trades, self.capital_for(request), now)
    }
}

const INDEX_HTML: &str = include_str!("../static/index.html");

/// Creates the main application router with all routes and middleware.
pub fn create_router(app_state: AppState) -> Router {
    // The page is served from the same origin, but allow other local tools to call the API.
    let cors = tower_http::cors::CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any);

    // Define the API sub-router
    let api_router = Router::new()
        .route("/portfolio", get(get_portfolio_handler))
        .route("/evaluate", post(evaluate_handler))
        .route("/export", post(export_handler));

    // The main router.
    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_check_handler))
        .nest("/api", api_router)
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

/// A simple health check handler.
async fn health_check_handler() -> &'static str {
    "OK"
}

/// Serves the interactive dashboard page.
async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Handler for `GET /api/portfolio`
async fn get_portfolio_handler(State(state): State<AppState>) -> Json<PortfolioResponse> {
    Json(PortfolioResponse {
        total_capital: state.snapshot.total_capital.unwrap_or(state.default_capital),
        trades: state.snapshot.trades.clone(),
    })
}

/// Handler for `POST /api/evaluate`
async fn evaluate_handler(
    State(state): State<AppState>,
    Json(request): Json<EvaluateRequest>,
) -> Json<EvaluateResponse> {
    let evaluation = state.evaluate(&request);
    Json(EvaluateResponse {
        as_of: evaluation.as_of,
        total_capital: state.capital_for(&request),
        display: reporting::format_for_display(&evaluation.trades),
        summary_display: reporting::format_summary(&evaluation.summary),
        rejected: evaluation.rejected.iter().map(ToString::to_string).collect(),
        warnings: evaluation.warnings.iter().map(ToString::to_string).collect(),
        trades: evaluation.trades,
        summary: evaluation.summary,
    })
}

/// Handler for `POST /api/export`
async fn export_handler(
    State(state): State<AppState>,
    Json(request): Json<EvaluateRequest>,
) -> Result<impl IntoResponse> {
    let evaluation = state.evaluate(&request);
    let csv = reporting::export_to_string(&evaluation.trades)?;
    tracing::info!(rows = evaluation.trades.len(), "Serving CSV export");

    let headers = [
        (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", reporting::EXPORT_FILE_NAME),
        ),
    ];
    Ok((headers, csv))
}

/// The main entry point for running the web server.
///
/// This function sets up the TCP listener and serves the application router.
/// It will run forever until the process is terminated.
pub async fn run(settings: ServerSettings, app_state: AppState) -> Result<()> {
    let app = create_router(app_state);

    let address = format!("{}:{}", settings.host, settings.port);
    tracing::info!("Web server listening on {}", address);

    let listener = TcpListener::bind(&address).await.map_err(Error::ServerBindError)?;

    axum::serve(listener, app.into_make_service())
        .await
        .map_err(Error::ServeError)?;

    Ok(())
}
