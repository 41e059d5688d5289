// CSV file repository implementation
use crate::application::measurement_repository::{MeasurementRepository, MeasurementSource};
use crate::domain::motor::MotorProfile;
use crate::domain::series::{seconds_since_midnight, Row, Series, XAxis};
use crate::infrastructure::config::{support_file_name, DataSettings};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveTime;
use csv::{ReaderBuilder, StringRecord};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;

const MODEL_COLUMN: &str = "Modell";

/// Reads the measurement tables from `;`-separated, `,`-decimal CSV files
#[derive(Debug, Clone)]
pub struct CsvRepository {
    dir: PathBuf,
    files: DataSettings,
}

impl CsvRepository {
    pub fn new(files: DataSettings) -> Self {
        Self {
            dir: PathBuf::from(&files.dir),
            files,
        }
    }

    fn file_name(&self, source: MeasurementSource) -> &str {
        match source {
            MeasurementSource::Power => &self.files.power_file,
            MeasurementSource::Cadence => &self.files.cadence_file,
            MeasurementSource::ThermalShort => &self.files.thermal_short_file,
            MeasurementSource::ThermalLong => &self.files.thermal_long_file,
        }
    }

    /// File contents, or `None` when the file does not exist
    async fn read_file(&self, name: &str) -> Result<Option<String>> {
        let path = self.dir.join(name);
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => {
                tracing::debug!("Read {} bytes from {}", content.len(), path.display());
                Ok(Some(content))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("{} not found", path.display());
                Ok(None)
            }
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
        }
    }
}

#[async_trait]
impl MeasurementRepository for CsvRepository {
    async fn load_series(&self, source: MeasurementSource) -> Result<Option<Series>> {
        let name = self.file_name(source).to_string();
        let axis = match source {
            MeasurementSource::ThermalShort | MeasurementSource::ThermalLong => XAxis::TimeOfDay,
            MeasurementSource::Power | MeasurementSource::Cadence => XAxis::Numeric,
        };

        match self.read_file(&name).await? {
            Some(content) => {
                let series = parse_series(&name, &content, axis)
                    .with_context(|| format!("Failed to parse {}", name))?;
                tracing::info!(
                    "Loaded {} rows x {} motors from {}",
                    series.len(),
                    series.columns().len(),
                    series.name()
                );
                Ok(Some(series))
            }
            None => Ok(None),
        }
    }

    async fn load_profiles(&self) -> Result<Option<Vec<MotorProfile>>> {
        let name = self.files.profiles_file.clone();
        match self.read_file(&name).await? {
            Some(content) => {
                let profiles =
                    parse_profiles(&content).with_context(|| format!("Failed to parse {}", name))?;
                Ok(Some(profiles))
            }
            None => Ok(None),
        }
    }

    async fn load_support_table(&self, motor: &str) -> Result<Option<Series>> {
        // the motor name becomes part of a path
        if motor.contains(['/', '\\']) || motor.contains("..") {
            tracing::warn!("Refusing support table lookup for motor {:?}", motor);
            return Ok(None);
        }

        let name = support_file_name(&self.files.support_prefix, motor);
        match self.read_file(&name).await? {
            Some(content) => {
                let series = parse_series(&name, &content, XAxis::Numeric)
                    .with_context(|| format!("Failed to parse {}", name))?;
                Ok(Some(series))
            }
            None => Ok(None),
        }
    }
}

/// Trim a header and collapse runs of spaces
pub fn clean_column_name(name: &str) -> String {
    name.trim_start_matches('\u{feff}')
        .split(' ')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parse a number written with a decimal comma. Blank or non-numeric cells are `None`.
pub fn parse_decimal(cell: &str) -> Option<f64> {
    let cell = cell.trim();
    if cell.is_empty() {
        return None;
    }
    cell.replace(',', ".").parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_time_of_day(cell: &str) -> Option<f64> {
    NaiveTime::parse_from_str(cell.trim(), "%H:%M:%S")
        .ok()
        .map(seconds_since_midnight)
}

fn read_records(content: &str) -> Result<(Vec<String>, Vec<StringRecord>)> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = rdr
        .headers()
        .context("Missing header row")?
        .iter()
        .map(clean_column_name)
        .collect();

    let records = rdr
        .records()
        .collect::<std::result::Result<Vec<_>, _>>()
        .context("Malformed CSV record")?;

    Ok((headers, records))
}

/// Parse a table whose first column is x and whose remaining columns are motors
/// (or assistance modes). Rows with an unparseable x are dropped.
pub fn parse_series(name: &str, content: &str, axis: XAxis) -> Result<Series> {
    let (headers, records) = read_records(content)?;

    let Some((x_column, motor_columns)) = headers.split_first() else {
        anyhow::bail!("{} has no columns", name);
    };
    let x_column = match axis {
        XAxis::TimeOfDay => "Time".to_string(),
        XAxis::Numeric => x_column.clone(),
    };

    // column index (in the record) of each named motor column
    let columns: Vec<(usize, String)> = motor_columns
        .iter()
        .enumerate()
        .filter(|(_, c)| !c.is_empty())
        .map(|(i, c)| (i + 1, c.clone()))
        .collect();

    let mut dropped = 0;
    let mut rows = Vec::with_capacity(records.len());
    for record in &records {
        let x = record.get(0).and_then(|cell| match axis {
            XAxis::Numeric => parse_decimal(cell),
            XAxis::TimeOfDay => parse_time_of_day(cell),
        });
        let Some(x) = x else {
            dropped += 1;
            continue;
        };

        let values: HashMap<String, f64> = columns
            .iter()
            .filter_map(|(i, c)| record.get(*i).and_then(parse_decimal).map(|v| (c.clone(), v)))
            .collect();
        rows.push(Row::new(x, values));
    }

    if dropped > 0 {
        tracing::debug!("Dropped {} rows without a valid x from {}", dropped, name);
    }

    Ok(Series::new(
        name,
        axis,
        x_column,
        columns.into_iter().map(|(_, c)| c).collect(),
        rows,
    ))
}

/// Parse the motor metadata table keyed by its `Modell` column
pub fn parse_profiles(content: &str) -> Result<Vec<MotorProfile>> {
    let (headers, records) = read_records(content)?;
    let index: HashMap<&str, usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| (h.as_str(), i))
        .collect();

    let Some(&model_idx) = index.get(MODEL_COLUMN) else {
        anyhow::bail!("Metadata table has no '{}' column", MODEL_COLUMN);
    };

    let text = |record: &StringRecord, column: &str| -> Option<String> {
        index
            .get(column)
            .and_then(|&i| record.get(i))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };
    let number = |record: &StringRecord, column: &str| -> Option<f64> {
        index
            .get(column)
            .and_then(|&i| record.get(i))
            .and_then(parse_decimal)
    };

    let profiles = records
        .iter()
        .filter_map(|record| {
            let model = record.get(model_idx).map(str::trim).filter(|m| !m.is_empty())?;
            Some(MotorProfile {
                manufacturer: text(record, "Hersteller"),
                weight_kg: number(record, "Gewicht (kg)"),
                max_torque_nm: number(record, "Max. Drehmoment (Nm)"),
                system_voltage_v: number(record, "Systemspannung (V)"),
                remark: text(record, "Besonderheit"),
                article_link: text(record, "Link_Artikel"),
                video_link: text(record, "Link_Youtube"),
                ..MotorProfile::new(model.to_string())
            })
        })
        .collect();

    Ok(profiles)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_column_name() {
        assert_eq!(clean_column_name("  Bafang   M600 "), "Bafang M600");
        assert_eq!(clean_column_name("\u{feff}Eingangsleistung"), "Eingangsleistung");
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal("12,5"), Some(12.5));
        assert_eq!(parse_decimal(" 250 "), Some(250.0));
        assert_eq!(parse_decimal(""), None);
        assert_eq!(parse_decimal("n/a"), None);
    }

    #[test]
    fn test_parse_numeric_series() {
        let content = "Eingangsleistung;Bafang  M600;Shimano EP8\n100;150,5;160\n50;80;\nabc;1;2\n";

        let series = parse_series("leistung.csv", content, XAxis::Numeric).unwrap();

        assert_eq!(series.x_column(), "Eingangsleistung");
        assert_eq!(series.columns(), &["Bafang M600".to_string(), "Shimano EP8".to_string()]);
        assert_eq!(series.len(), 2);
        assert_eq!(series.rows()[0].x, 50.0);
        assert_eq!(series.rows()[0].value("Shimano EP8"), None);
        assert_eq!(series.rows()[1].value("Bafang M600"), Some(150.5));
    }

    #[test]
    fn test_parse_thermal_series_drops_bad_times() {
        let content = "Uhrzeit;M1\n09:00:05;90\nkaputt;50\n09:00:00;100\n";

        let series = parse_series("15minuten.csv", content, XAxis::TimeOfDay).unwrap();

        assert_eq!(series.x_column(), "Time");
        let xs: Vec<f64> = series.rows().iter().map(|r| r.x).collect();
        assert_eq!(xs, vec![32400.0, 32405.0]);
    }

    #[test]
    fn test_parse_profiles() {
        let content = "Modell;Hersteller;Gewicht (kg);Max. Drehmoment (Nm);Link_Youtube\n\
                       M1;Bafang;3,9;120;https://video\n\
                       ;Nobody;1;1;\n";

        let profiles = parse_profiles(content).unwrap();

        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].model, "M1");
        assert_eq!(profiles[0].manufacturer.as_deref(), Some("Bafang"));
        assert_eq!(profiles[0].weight_kg, Some(3.9));
        assert_eq!(profiles[0].max_torque_nm, Some(120.0));
        assert_eq!(profiles[0].system_voltage_v, None);
        assert_eq!(profiles[0].video_link.as_deref(), Some("https://video"));
    }

    #[test]
    fn test_profiles_require_model_column() {
        assert!(parse_profiles("Name;Hersteller\nM1;Bafang\n").is_err());
    }

    fn fixture_dir(test: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("motor-bench-{}-{}", test, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn repository(dir: &std::path::Path) -> CsvRepository {
        CsvRepository::new(DataSettings {
            dir: dir.to_string_lossy().to_string(),
            ..DataSettings::default()
        })
    }

    #[tokio::test]
    async fn test_missing_files_are_none() {
        let dir = fixture_dir("missing");
        let repo = repository(&dir);

        assert!(repo.load_series(MeasurementSource::Power).await.unwrap().is_none());
        assert!(repo.load_profiles().await.unwrap().is_none());
        assert!(repo.load_support_table("M1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_load_from_files() {
        let dir = fixture_dir("load");
        std::fs::write(dir.join("leistung.csv"), "Eingangsleistung;M1\n250;300\n").unwrap();
        std::fs::write(dir.join("20minuten.csv"), "Zeit;M1\n09:00:00;100\n").unwrap();
        std::fs::write(dir.join("support_M1.csv"), "Input;Eco;Turbo\n100;120;340\n").unwrap();
        let repo = repository(&dir);

        let power = repo.load_series(MeasurementSource::Power).await.unwrap().unwrap();
        assert_eq!(power.rows()[0].value("M1"), Some(300.0));

        let thermal = repo.load_series(MeasurementSource::ThermalLong).await.unwrap().unwrap();
        assert_eq!(thermal.axis(), XAxis::TimeOfDay);

        let support = repo.load_support_table("M1").await.unwrap().unwrap();
        assert_eq!(support.columns(), &["Eco".to_string(), "Turbo".to_string()]);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn test_support_lookup_rejects_paths() {
        let dir = fixture_dir("paths");
        let repo = repository(&dir);
        assert!(repo.load_support_table("../secret").await.unwrap().is_none());
    }
}
