// Dataset service - One-time load and reconciliation of the measurement tables
use crate::application::error::DashboardError;
use crate::application::measurement_repository::{MeasurementRepository, MeasurementSource};
use crate::domain::merge::merge_prefer_later;
use crate::domain::motor::{MotorProfile, MotorRegistry};
use crate::domain::series::Series;
use crate::domain::session::View;
use crate::domain::units::{reference_power_map, ReferencePowerMap};
use crate::infrastructure::config::AnalysisSettings;

/// Immutable snapshot of everything loaded at startup
#[derive(Debug, Clone)]
pub struct Dataset {
    pub power: Series,
    pub cadence: Option<Series>,
    /// Merged thermal runs. `None` when either run is missing.
    pub thermal: Option<Series>,
    pub profiles: Vec<MotorProfile>,
    pub registry: MotorRegistry,
    pub reference_power: ReferencePowerMap,
}

impl Dataset {
    pub fn build(
        power: Series,
        cadence: Option<Series>,
        thermal_short: Option<Series>,
        thermal_long: Option<Series>,
        profiles: Vec<MotorProfile>,
        settings: &AnalysisSettings,
    ) -> Self {
        let thermal = match (&thermal_short, &thermal_long) {
            (Some(short), Some(long)) => Some(merge_prefer_later(short, long)),
            _ => None,
        };

        let registry = MotorRegistry::from_series(
            std::iter::once(&power)
                .chain(cadence.as_ref())
                .chain(thermal.as_ref()),
        );
        let reference_power = reference_power_map(&power, settings.reference_input_watts);

        Self {
            power,
            cadence,
            thermal,
            profiles,
            registry,
            reference_power,
        }
    }

    /// The series a view is drawn from; the thermal view uses the merged runs
    pub fn view_series(&self, view: View) -> Option<&Series> {
        match view {
            View::Power => Some(&self.power),
            View::Cadence => self.cadence.as_ref(),
            View::Thermal => self.thermal.as_ref(),
        }
    }

    pub fn profile(&self, motor: &str) -> Option<&MotorProfile> {
        self.profiles.iter().find(|p| p.model == motor)
    }
}

/// Load every table through the repository.
///
/// Only the power table is mandatory; any other missing table disables just
/// the feature built on it.
pub async fn load_dataset(
    repository: &dyn MeasurementRepository,
    settings: &AnalysisSettings,
) -> Result<Dataset, DashboardError> {
    let power = repository
        .load_series(MeasurementSource::Power)
        .await?
        .ok_or(DashboardError::MissingSource(MeasurementSource::Power))?;

    let cadence = load_optional(repository, MeasurementSource::Cadence).await?;
    let thermal_short = load_optional(repository, MeasurementSource::ThermalShort).await?;
    let thermal_long = load_optional(repository, MeasurementSource::ThermalLong).await?;

    let profiles = match repository.load_profiles().await? {
        Some(profiles) => profiles,
        None => {
            tracing::warn!("Motor metadata table missing, fact sheets will have no profile");
            Vec::new()
        }
    };

    let dataset = Dataset::build(power, cadence, thermal_short, thermal_long, profiles, settings);

    if dataset.thermal.is_none() {
        tracing::warn!("Thermal view disabled: both thermal runs are required");
    }
    tracing::info!(
        "Loaded dataset: {} motors, {} power rows, {} thermal rows",
        dataset.registry.motors().len(),
        dataset.power.len(),
        dataset.thermal.as_ref().map(Series::len).unwrap_or(0)
    );

    Ok(dataset)
}

async fn load_optional(
    repository: &dyn MeasurementRepository,
    source: MeasurementSource,
) -> Result<Option<Series>, DashboardError> {
    let series = repository.load_series(source).await?;
    if series.is_none() {
        tracing::warn!("Optional table '{}' missing", source);
    }
    Ok(series)
}
