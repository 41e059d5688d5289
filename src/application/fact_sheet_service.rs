// Fact sheet service - Use case for the single-motor page
use crate::application::dataset_service::Dataset;
use crate::application::error::DashboardError;
use crate::application::measurement_repository::MeasurementRepository;
use crate::domain::chart::{ChartData, ChartKind, SeriesData, TileData};
use crate::domain::color::FALLBACK_GRAY;
use crate::domain::dashboard::FactSheet;
use crate::domain::motor::MotorProfile;
use crate::domain::series::Series;
use std::sync::Arc;

#[derive(Clone)]
pub struct FactSheetService {
    repository: Arc<dyn MeasurementRepository>,
    dataset: Arc<Dataset>,
}

impl FactSheetService {
    pub fn new(repository: Arc<dyn MeasurementRepository>, dataset: Arc<Dataset>) -> Self {
        Self {
            repository,
            dataset,
        }
    }

    pub async fn get_fact_sheet(&self, motor: &str) -> Result<FactSheet, DashboardError> {
        let registry = &self.dataset.registry;
        if !registry.contains(motor) {
            return Err(DashboardError::UnknownMotor(motor.to_string()));
        }
        let color = registry.color(motor).unwrap_or(FALLBACK_GRAY).to_string();

        let profile = self.dataset.profile(motor).cloned();
        let tiles = profile.as_ref().map(profile_tiles).unwrap_or_default();

        let power = single_motor_chart(
            "power",
            "Leistung",
            "Eingangsleistung (Watt)",
            "Leistung (Watt)",
            &self.dataset.power,
            motor,
            &color,
        );
        let cadence = self.dataset.cadence.as_ref().and_then(|c| {
            single_motor_chart("cadence", "Kadenz", "Kadenz (RPM)", "Leistung (Watt)", c, motor, &color)
        });

        // a broken support file only hides that panel
        let support_modes = match self.repository.load_support_table(motor).await {
            Ok(Some(table)) if !table.is_empty() => Some(support_chart(&table, motor)),
            Ok(_) => None,
            Err(e) => {
                tracing::error!("Error loading support table for {}: {:#}", motor, e);
                None
            }
        };

        Ok(FactSheet {
            motor: motor.to_string(),
            color,
            article_url: profile.as_ref().and_then(|p| p.article_url()).map(str::to_string),
            video_url: profile.as_ref().and_then(|p| p.video_url()).map(str::to_string),
            profile,
            tiles,
            power,
            cadence,
            support_modes,
        })
    }
}

fn profile_tiles(profile: &MotorProfile) -> Vec<TileData> {
    vec![
        TileData::new("weight", "Gewicht", "kg", profile.weight_kg, 1),
        TileData::new("torque", "Max. Drehmoment", "Nm", profile.max_torque_nm, 0),
        TileData::new("voltage", "Spannung", "V", profile.system_voltage_v, 0),
    ]
}

fn single_motor_chart(
    id: &str,
    title: &str,
    x_label: &str,
    y_label: &str,
    series: &Series,
    motor: &str,
    color: &str,
) -> Option<ChartData> {
    if !series.has_column(motor) {
        return None;
    }

    let data = SeriesData::from_column(series, motor, Some(color.to_string()));
    Some(ChartData::new(id, title, x_label, y_label, series.axis(), ChartKind::Area, vec![data]))
}

/// Every assistance mode of the support table as one line
fn support_chart(table: &Series, motor: &str) -> ChartData {
    let series = table
        .columns()
        .iter()
        .map(|mode| SeriesData::from_column(table, mode, None))
        .collect();

    ChartData::new(
        "support",
        &format!("Leistungsentfaltung: {}", motor),
        "Eingangsleistung (Watt)",
        "Ausgangsleistung (Watt)",
        table.axis(),
        ChartKind::MultiLine,
        series,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::measurement_repository::in_memory::InMemoryRepository;
    use crate::domain::series::numeric_series;
    use crate::infrastructure::config::AnalysisSettings;

    fn service(repository: InMemoryRepository) -> FactSheetService {
        let power = numeric_series("power", "M1", &[(100.0, Some(150.0)), (250.0, Some(300.0))]);
        let mut profile = MotorProfile::new("M1".to_string());
        profile.manufacturer = Some("Bafang".to_string());
        profile.weight_kg = Some(3.9);
        profile.video_link = Some("https://youtube.example/v".to_string());

        let dataset = Dataset::build(power, None, None, None, vec![profile], &AnalysisSettings::default());
        FactSheetService::new(Arc::new(repository), Arc::new(dataset))
    }

    #[tokio::test]
    async fn test_fact_sheet_with_profile() {
        let sheet = service(InMemoryRepository::default()).get_fact_sheet("M1").await.unwrap();

        assert_eq!(sheet.profile.as_ref().unwrap().manufacturer.as_deref(), Some("Bafang"));
        assert_eq!(sheet.tiles[0].value, Some(3.9));
        assert_eq!(sheet.tiles[1].value, None);
        assert_eq!(sheet.video_url.as_deref(), Some("https://youtube.example/v"));
        assert!(sheet.article_url.is_none());

        let power = sheet.power.unwrap();
        assert_eq!(power.kind, ChartKind::Area);
        assert_eq!(power.series[0].points.len(), 2);
        assert!(sheet.cadence.is_none());
        assert!(sheet.support_modes.is_none());
    }

    #[tokio::test]
    async fn test_fact_sheet_with_support_modes() {
        let mut repository = InMemoryRepository::default();
        repository.support.insert(
            "M1".to_string(),
            numeric_series("support_M1", "Turbo", &[(100.0, Some(340.0))]),
        );

        let sheet = service(repository).get_fact_sheet("M1").await.unwrap();

        let support = sheet.support_modes.unwrap();
        assert_eq!(support.title, "Leistungsentfaltung: M1");
        assert_eq!(support.series[0].name, "Turbo");
    }

    #[tokio::test]
    async fn test_unknown_motor() {
        let result = service(InMemoryRepository::default()).get_fact_sheet("Nope").await;
        assert!(matches!(result, Err(DashboardError::UnknownMotor(_))));
    }
}
