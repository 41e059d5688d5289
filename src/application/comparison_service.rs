// Comparison service - Use case for the multi-motor comparison views
use crate::application::dataset_service::Dataset;
use crate::application::error::DashboardError;
use crate::application::measurement_repository::MeasurementSource;
use crate::domain::aggregate::window_stats;
use crate::domain::chart::{ChartData, ChartKind, SeriesData};
use crate::domain::color::{lighten, FALLBACK_GRAY};
use crate::domain::dashboard::{
    BarEntry, ComparisonView, Detail, PointComparison, ThermalBar, ThermalSummary,
};
use crate::domain::motor::MotorSummary;
use crate::domain::series::Series;
use crate::domain::session::{SessionContext, ThermalUnit, View};
use crate::domain::units::to_absolute_watts;
use crate::infrastructure::config::AnalysisSettings;
use crate::infrastructure::csv_export::export_series;
use std::sync::Arc;

/// A view's series after selection, unit conversion and range filtering
struct PreparedView {
    series: Series,
    motors: Vec<String>,
    y_label: String,
    unit: Option<ThermalUnit>,
}

#[derive(Clone)]
pub struct ComparisonService {
    dataset: Arc<Dataset>,
    settings: AnalysisSettings,
}

impl ComparisonService {
    pub fn new(dataset: Arc<Dataset>, settings: AnalysisSettings) -> Self {
        Self { dataset, settings }
    }

    pub fn list_motors(&self) -> Vec<MotorSummary> {
        self.dataset
            .registry
            .motors()
            .iter()
            .map(|m| MotorSummary {
                name: m.clone(),
                color: self.color_of(m),
            })
            .collect()
    }

    pub fn get_comparison(&self, ctx: &SessionContext) -> Result<ComparisonView, DashboardError> {
        let prepared = self.prepare(ctx)?;

        let series_list = prepared
            .motors
            .iter()
            .map(|m| SeriesData::from_column(&prepared.series, m, Some(self.color_of(m))))
            .collect();

        let chart = ChartData::new(
            &ctx.view.to_string(),
            &format!("Vergleich: {}", ctx.view.title()),
            ctx.view.x_label(),
            &prepared.y_label,
            prepared.series.axis(),
            ChartKind::MultiLine,
            series_list,
        );

        let detail = match ctx.view {
            View::Thermal => Some(Detail::Thermal(self.thermal_summary(&prepared))),
            View::Power | View::Cadence => self.point_comparison(&prepared, ctx.target).map(Detail::Point),
        };

        Ok(ComparisonView {
            view: ctx.view,
            title: ctx.view.title().to_string(),
            motors: prepared.motors.clone(),
            x_axis: prepared.series.axis(),
            range: prepared.series.x_range(),
            unit: prepared.unit,
            chart,
            detail,
        })
    }

    /// The current view as CSV: x column plus the selected motors
    pub fn export_csv(&self, ctx: &SessionContext) -> Result<String, DashboardError> {
        let prepared = self.prepare(ctx)?;
        tracing::debug!(
            "Exporting {} rows x {} motors for view {}",
            prepared.series.len(),
            prepared.motors.len(),
            ctx.view
        );
        Ok(export_series(&prepared.series, &prepared.motors)?)
    }

    fn prepare(&self, ctx: &SessionContext) -> Result<PreparedView, DashboardError> {
        let base = self.dataset.view_series(ctx.view).ok_or(match ctx.view {
            View::Power => DashboardError::SourceUnavailable(MeasurementSource::Power),
            View::Cadence => DashboardError::SourceUnavailable(MeasurementSource::Cadence),
            View::Thermal => DashboardError::ThermalUnavailable,
        })?;

        let selection = self.dataset.registry.resolve_selection(&ctx.selection);
        let motors: Vec<String> = selection
            .into_iter()
            .filter(|m| base.has_column(m))
            .collect();
        if motors.is_empty() {
            return Err(DashboardError::NoData);
        }
        let base = base.select(&motors);

        let (series, y_label, unit) = match (ctx.view, ctx.unit) {
            (View::Thermal, ThermalUnit::Absolute) => (
                to_absolute_watts(&base, &self.dataset.reference_power, &motors),
                format!(
                    "Leistung (Watt bei {}W Input)",
                    self.settings.reference_input_watts
                ),
                Some(ThermalUnit::Absolute),
            ),
            (View::Thermal, ThermalUnit::Relative) => (
                base,
                "Leistung (% vom Startwert)".to_string(),
                Some(ThermalUnit::Relative),
            ),
            _ => (base, "Leistung (Watt)".to_string(), None),
        };

        let series = match series.x_range() {
            Some((min, max)) => {
                series.filter_range(ctx.lower.unwrap_or(min), ctx.upper.unwrap_or(max))
            }
            None => series,
        };

        Ok(PreparedView {
            series,
            motors,
            y_label,
            unit,
        })
    }

    /// Bars at the row nearest to `target`, which defaults to the middle of the
    /// filtered range. `None` when the filtered series is empty.
    fn point_comparison(&self, prepared: &PreparedView, target: Option<f64>) -> Option<PointComparison> {
        let (min, max) = prepared.series.x_range()?;
        let target = target.unwrap_or_else(|| ((min.trunc() + max.trunc()) / 2.0).trunc());
        let row = prepared.series.nearest_row(target)?;

        let bars = prepared
            .motors
            .iter()
            .map(|m| BarEntry {
                motor: m.clone(),
                value: row.value(m),
                color: self.color_of(m),
            })
            .collect();

        Some(PointComparison::new(target, row.x, bars))
    }

    fn thermal_summary(&self, prepared: &PreparedView) -> ThermalSummary {
        let stats = window_stats(
            &prepared.series,
            self.settings.thermal_window_seconds(),
            &prepared.motors,
        );

        let entries = stats
            .into_iter()
            .map(|s| {
                let base = self.color_of(&s.motor);
                ThermalBar {
                    minimum_color: lighten(&base, self.settings.lighten_amount),
                    mean_color: base,
                    motor: s.motor,
                    mean: s.mean,
                    minimum: s.minimum,
                }
            })
            .collect();

        ThermalSummary::new(
            self.settings.thermal_window_minutes,
            prepared.y_label.clone(),
            entries,
        )
    }

    fn color_of(&self, motor: &str) -> String {
        self.dataset
            .registry
            .color(motor)
            .unwrap_or(FALLBACK_GRAY)
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::color::palette_color;
    use crate::domain::series::{Row, XAxis};
    use std::collections::HashMap;

    fn table(name: &str, axis: XAxis, rows: &[(f64, &[Option<f64>])], motors: &[&str]) -> Series {
        let columns: Vec<String> = motors.iter().map(|m| m.to_string()).collect();
        let rows = rows
            .iter()
            .map(|(x, cells)| {
                let values: HashMap<String, f64> = columns
                    .iter()
                    .zip(cells.iter())
                    .filter_map(|(m, v)| v.map(|v| (m.clone(), v)))
                    .collect();
                Row::new(*x, values)
            })
            .collect();
        Series::new(name, axis, "x", columns, rows)
    }

    fn service() -> ComparisonService {
        let power = table(
            "power",
            XAxis::Numeric,
            &[
                (0.0, &[Some(0.0), Some(0.0)]),
                (100.0, &[Some(150.0), Some(180.0)]),
                (200.0, &[Some(260.0), Some(240.0)]),
                (250.0, &[Some(300.0), Some(200.0)]),
                (300.0, &[Some(340.0), None]),
            ],
            &["A", "B"],
        );
        let cadence = table(
            "cadence",
            XAxis::Numeric,
            &[(60.0, &[Some(200.0)]), (90.0, &[Some(250.0)])],
            &["A"],
        );
        let short = table(
            "15",
            XAxis::TimeOfDay,
            &[(0.0, &[Some(100.0), Some(100.0)]), (300.0, &[Some(90.0), Some(70.0)])],
            &["A", "B"],
        );
        let long = table(
            "20",
            XAxis::TimeOfDay,
            &[(0.0, &[Some(100.0), None]), (600.0, &[Some(80.0), None]), (1200.0, &[Some(10.0), None])],
            &["A", "B"],
        );

        let settings = AnalysisSettings::default();
        let dataset = Dataset::build(power, Some(cadence), Some(short), Some(long), Vec::new(), &settings);
        ComparisonService::new(Arc::new(dataset), settings)
    }

    fn ctx(view: View) -> SessionContext {
        SessionContext::new(view)
    }

    #[test]
    fn test_list_motors_with_colors() {
        let motors = service().list_motors();
        assert_eq!(motors.len(), 2);
        assert_eq!(motors[0].name, "A");
        assert_eq!(motors[1].color, palette_color(1));
    }

    #[test]
    fn test_power_view_defaults_to_all_motors_and_full_range() {
        let view = service().get_comparison(&ctx(View::Power)).unwrap();

        assert_eq!(view.motors, vec!["A".to_string(), "B".to_string()]);
        assert_eq!(view.range, Some((0.0, 300.0)));
        assert_eq!(view.chart.series.len(), 2);
        assert_eq!(view.chart.y_label, "Leistung (Watt)");
        // B has no reading at 300 W
        assert_eq!(view.chart.series[1].points.len(), 4);
    }

    #[test]
    fn test_power_view_range_and_point_detail() {
        let mut ctx = ctx(View::Power);
        ctx.lower = Some(100.0);
        ctx.upper = Some(250.0);
        ctx.target = Some(130.0);

        let view = service().get_comparison(&ctx).unwrap();

        assert_eq!(view.range, Some((100.0, 250.0)));
        let Some(Detail::Point(point)) = view.detail else {
            panic!("expected a point comparison");
        };
        assert_eq!(point.x, 100.0);
        // ascending by value
        assert_eq!(point.bars[0].motor, "A");
        assert_eq!(point.bars[0].value, Some(150.0));
        assert_eq!(point.bars[1].value, Some(180.0));
    }

    #[test]
    fn test_point_target_defaults_to_midpoint() {
        let view = service().get_comparison(&ctx(View::Power)).unwrap();

        let Some(Detail::Point(point)) = view.detail else {
            panic!("expected a point comparison");
        };
        assert_eq!(point.target, 150.0);
        // tie between 100 and 200 goes to the lower x
        assert_eq!(point.x, 100.0);
    }

    #[test]
    fn test_empty_range_has_no_detail() {
        let mut ctx = ctx(View::Power);
        ctx.lower = Some(1000.0);
        ctx.upper = Some(2000.0);

        let view = service().get_comparison(&ctx).unwrap();

        assert!(view.range.is_none());
        assert!(view.detail.is_none());
    }

    #[test]
    fn test_selection_narrows_chart_and_detail() {
        let mut ctx = ctx(View::Power).with_motor_list("B,Unknown");
        ctx.target = Some(200.0);

        let view = service().get_comparison(&ctx).unwrap();

        assert_eq!(view.motors, vec!["B".to_string()]);
        assert_eq!(view.chart.series.len(), 1);
        assert_eq!(view.chart.series[0].name, "B");
        let Some(Detail::Point(point)) = view.detail else {
            panic!("expected a point comparison");
        };
        assert_eq!(point.bars.len(), 1);
        assert_eq!(point.bars[0].value, Some(240.0));
    }

    #[test]
    fn test_selection_without_data_in_view() {
        let ctx = ctx(View::Cadence).with_motor_list("B");
        assert!(matches!(service().get_comparison(&ctx), Err(DashboardError::NoData)));
    }

    #[test]
    fn test_thermal_relative_summary() {
        let view = service().get_comparison(&ctx(View::Thermal)).unwrap();

        assert_eq!(view.unit, Some(ThermalUnit::Relative));
        let Some(Detail::Thermal(summary)) = view.detail else {
            panic!("expected a thermal summary");
        };

        // window is [0, 900]: A = 100, 90, 80 ; B = 100, 70
        assert_eq!(summary.entries[0].motor, "B");
        assert_eq!(summary.entries[0].mean, Some(85.0));
        assert_eq!(summary.entries[0].minimum, Some(70.0));
        assert_eq!(summary.entries[1].mean, Some(90.0));
        assert_eq!(summary.entries[1].minimum, Some(80.0));
        assert_eq!(summary.entries[1].mean_color, palette_color(0));
        assert_eq!(summary.entries[1].minimum_color, lighten(palette_color(0), 0.5));
    }

    #[test]
    fn test_thermal_absolute_uses_reference_power() {
        let mut ctx = ctx(View::Thermal).with_motor_list("A,B");
        ctx.unit = ThermalUnit::Absolute;

        let view = service().get_comparison(&ctx).unwrap();

        assert_eq!(view.chart.y_label, "Leistung (Watt bei 250W Input)");
        // reference power: A = 300 W, B = 200 W (row at 250 W input)
        let a = &view.chart.series[0];
        assert_eq!(a.points[0].y, 300.0);
        let b = &view.chart.series[1];
        assert_eq!(b.points[1].y, 140.0);
    }

    #[test]
    fn test_thermal_unavailable() {
        let settings = AnalysisSettings::default();
        let power = table("power", XAxis::Numeric, &[(250.0, &[Some(1.0)])], &["A"]);
        let dataset = Dataset::build(power, None, None, None, Vec::new(), &settings);
        let service = ComparisonService::new(Arc::new(dataset), settings);

        assert!(matches!(
            service.get_comparison(&ctx(View::Thermal)),
            Err(DashboardError::ThermalUnavailable)
        ));
        assert!(matches!(
            service.get_comparison(&ctx(View::Cadence)),
            Err(DashboardError::SourceUnavailable(MeasurementSource::Cadence))
        ));
    }

    #[test]
    fn test_export_csv_uses_filtered_view() {
        let mut ctx = ctx(View::Power).with_motor_list("B");
        ctx.lower = Some(200.0);

        let csv = service().export_csv(&ctx).unwrap();

        assert_eq!(csv, "x;B\n200;240\n250;200\n300;\n");
    }
}
