// Errors raised while loading or querying the dashboard
use crate::application::measurement_repository::MeasurementSource;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("required measurement table '{0}' is missing")]
    MissingSource(MeasurementSource),

    #[error("no {0} data available")]
    SourceUnavailable(MeasurementSource),

    #[error("no thermal data available")]
    ThermalUnavailable,

    #[error("unknown view: {0}")]
    UnknownView(String),

    #[error("unknown unit: {0}")]
    UnknownUnit(String),

    #[error("'{0}' must be a finite number")]
    InvalidBound(&'static str),

    #[error("unknown motor: {0}")]
    UnknownMotor(String),

    #[error("no data for the selected motors")]
    NoData,

    #[error(transparent)]
    Repository(#[from] anyhow::Error),
}
