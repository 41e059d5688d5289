// HTTP response utilities for CSV downloads and error bodies
use crate::application::error::DashboardError;
use axum::{
    body::Body,
    http::{header, HeaderValue, Response, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::json;

/// Build a CSV attachment response
pub fn csv_download_response(csv: String, filename: &str) -> Result<Response<Body>, StatusCode> {
    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{}\"", filename))
        .map_err(|e| {
            tracing::error!("Invalid download file name {:?}: {}", filename, e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/csv; charset=utf-8")
        .header(header::CONTENT_DISPOSITION, disposition)
        .header(header::CONTENT_LENGTH, csv.len())
        .body(Body::from(csv))
        .map_err(|e| {
            tracing::error!("Response build error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })
}

impl DashboardError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            DashboardError::UnknownView(_)
            | DashboardError::UnknownUnit(_)
            | DashboardError::InvalidBound(_)
            | DashboardError::NoData => StatusCode::BAD_REQUEST,
            DashboardError::UnknownMotor(_)
            | DashboardError::ThermalUnavailable
            | DashboardError::SourceUnavailable(_) => StatusCode::NOT_FOUND,
            DashboardError::MissingSource(_) | DashboardError::Repository(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for DashboardError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {:#}", self);
        } else {
            tracing::debug!("Request rejected: {}", self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_download_headers() {
        let response = csv_download_response("x;M1\n".to_string(), "export.csv").unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"export.csv\""
        );
        assert_eq!(response.headers()[header::CONTENT_LENGTH], "5");
    }

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            DashboardError::ThermalUnavailable.into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(DashboardError::NoData.into_response().status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            DashboardError::InvalidBound("target").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            DashboardError::Repository(anyhow::anyhow!("disk gone")).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
