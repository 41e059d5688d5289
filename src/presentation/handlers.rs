// HTTP request handlers
use crate::application::error::DashboardError;
use crate::domain::dashboard::{ComparisonView, FactSheet};
use crate::domain::motor::MotorSummary;
use crate::domain::session::{SessionContext, ThermalUnit, View};
use crate::infrastructure::http_response::csv_download_response;
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

const EXPORT_FILE_NAME: &str = "export.csv";

#[derive(Debug, Default, Deserialize)]
pub struct ViewQuery {
    /// Comma-separated motor names
    pub motors: Option<String>,
    pub lower: Option<f64>,
    pub upper: Option<f64>,
    pub target: Option<f64>,
    pub unit: Option<String>,
}

impl ViewQuery {
    fn into_context(self, view: &str) -> Result<SessionContext, DashboardError> {
        let view: View = view.parse().map_err(DashboardError::UnknownView)?;
        let mut ctx = SessionContext::new(view);

        if let Some(motors) = &self.motors {
            ctx = ctx.with_motor_list(motors);
        }
        if let Some(unit) = &self.unit {
            ctx.unit = unit.parse::<ThermalUnit>().map_err(DashboardError::UnknownUnit)?;
        }
        ctx.lower = finite("lower", self.lower)?;
        ctx.upper = finite("upper", self.upper)?;
        ctx.target = finite("target", self.target)?;

        Ok(ctx)
    }
}

fn finite(name: &'static str, value: Option<f64>) -> Result<Option<f64>, DashboardError> {
    match value {
        Some(v) if !v.is_finite() => Err(DashboardError::InvalidBound(name)),
        _ => Ok(value),
    }
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// List all motors with their chart colors
pub async fn list_motors(State(state): State<Arc<AppState>>) -> Json<Vec<MotorSummary>> {
    Json(state.comparison_service.list_motors())
}

/// Comparison chart and detail panel for one view
pub async fn compare_view(
    Path(view): Path<String>,
    Query(query): Query<ViewQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<ComparisonView>, DashboardError> {
    let ctx = query.into_context(&view)?;
    tracing::debug!(
        "Comparison for {} with {} selected motors",
        ctx.view,
        ctx.selection.len()
    );

    Ok(Json(state.comparison_service.get_comparison(&ctx)?))
}

/// CSV download of the current view
pub async fn export_view(
    Path(view): Path<String>,
    Query(query): Query<ViewQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, DashboardError> {
    let ctx = query.into_context(&view)?;
    let csv = state.comparison_service.export_csv(&ctx)?;

    Ok(match csv_download_response(csv, EXPORT_FILE_NAME) {
        Ok(response) => response,
        Err(status) => status.into_response(),
    })
}

/// Fact sheet for a single motor
pub async fn motor_fact_sheet(
    Path(name): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<FactSheet>, DashboardError> {
    Ok(Json(state.fact_sheet_service.get_fact_sheet(&name).await?))
}
