// Repository trait for the measurement tables
use crate::domain::motor::MotorProfile;
use crate::domain::series::Series;
use async_trait::async_trait;
use std::fmt;

/// The tables the dashboard is built from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeasurementSource {
    /// Input power -> output power per motor (mandatory)
    Power,
    /// Cadence sweep
    Cadence,
    /// Shorter thermal run over time of day
    ThermalShort,
    /// Longer thermal run over time of day
    ThermalLong,
}

impl fmt::Display for MeasurementSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MeasurementSource::Power => "power",
            MeasurementSource::Cadence => "cadence",
            MeasurementSource::ThermalShort => "thermal (short run)",
            MeasurementSource::ThermalLong => "thermal (long run)",
        };
        f.write_str(name)
    }
}

#[async_trait]
pub trait MeasurementRepository: Send + Sync {
    /// Load one measurement table, `None` when it does not exist
    async fn load_series(&self, source: MeasurementSource) -> anyhow::Result<Option<Series>>;

    /// Load the motor metadata table, `None` when it does not exist
    async fn load_profiles(&self) -> anyhow::Result<Option<Vec<MotorProfile>>>;

    /// Load a motor's support-mode table, `None` when the motor has none
    async fn load_support_table(&self, motor: &str) -> anyhow::Result<Option<Series>>;
}
