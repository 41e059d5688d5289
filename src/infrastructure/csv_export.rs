// CSV export of a chart table (semicolon separated, comma decimal)
use crate::domain::series::{format_time_of_day, Series, XAxis};
use anyhow::{Context, Result};
use csv::WriterBuilder;

/// Write the x column followed by the given motor columns.
/// Absent readings become empty cells.
pub fn export_series(series: &Series, motors: &[String]) -> Result<String> {
    let mut writer = WriterBuilder::new().delimiter(b';').from_writer(Vec::new());

    let mut header = vec![series.x_column().to_string()];
    header.extend(motors.iter().cloned());
    writer.write_record(&header).context("Failed to write CSV header")?;

    for row in series.rows() {
        let x = match series.axis() {
            XAxis::TimeOfDay => format_time_of_day(row.x).unwrap_or_default(),
            XAxis::Numeric => format_decimal(row.x),
        };

        let mut record = vec![x];
        record.extend(
            motors
                .iter()
                .map(|m| row.value(m).map(format_decimal).unwrap_or_default()),
        );
        writer.write_record(&record).context("Failed to write CSV row")?;
    }

    let bytes = writer.into_inner().context("Failed to flush CSV export")?;
    String::from_utf8(bytes).context("CSV export is not valid UTF-8")
}

fn format_decimal(value: f64) -> String {
    value.to_string().replace('.', ",")
}
