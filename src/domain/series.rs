// Measurement series domain model
use chrono::{NaiveTime, Timelike};
use serde::Serialize;
use std::collections::HashMap;

/// How the x column of a series is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum XAxis {
    /// Plain numbers (input watts, cadence rpm)
    Numeric,
    /// Time of day, stored as seconds since midnight
    TimeOfDay,
}

/// One measurement instant: an x-value and the readings of every motor present at it.
/// A motor without a reading has no entry in `values`.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub x: f64,
    pub values: HashMap<String, f64>,
}

impl Row {
    pub fn new(x: f64, values: HashMap<String, f64>) -> Self {
        Self { x, values }
    }

    pub fn value(&self, motor: &str) -> Option<f64> {
        self.values.get(motor).copied()
    }
}

/// An ordered, immutable table of rows keyed by x.
///
/// Rows are sorted ascending by x and never share an x-value. Every operation
/// returns a new series.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    name: String,
    axis: XAxis,
    x_column: String,
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Series {
    /// Build a series, dropping rows with an undefined x, sorting by x and keeping
    /// the first row of any duplicated x-value.
    pub fn new(
        name: impl Into<String>,
        axis: XAxis,
        x_column: impl Into<String>,
        columns: Vec<String>,
        mut rows: Vec<Row>,
    ) -> Self {
        rows.retain(|r| r.x.is_finite());
        rows.sort_by(|a, b| a.x.total_cmp(&b.x));
        rows.dedup_by(|later, earlier| later.x == earlier.x);

        Self {
            name: name.into(),
            axis,
            x_column: x_column.into(),
            columns,
            rows,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn axis(&self) -> XAxis {
        self.axis
    }

    pub fn x_column(&self) -> &str {
        &self.x_column
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, motor: &str) -> bool {
        self.columns.iter().any(|c| c == motor)
    }

    /// Smallest and largest x, or `None` for an empty series
    pub fn x_range(&self) -> Option<(f64, f64)> {
        match (self.rows.first(), self.rows.last()) {
            (Some(first), Some(last)) => Some((first.x, last.x)),
            _ => None,
        }
    }

    /// Rows with `lower <= x <= upper`, order preserved
    pub fn filter_range(&self, lower: f64, upper: f64) -> Series {
        let rows = self
            .rows
            .iter()
            .filter(|r| r.x >= lower && r.x <= upper)
            .cloned()
            .collect();

        self.with_rows(rows)
    }

    /// The row whose x is closest to `target`.
    ///
    /// Equidistant candidates resolve to the first occurrence, which is the lowest x.
    /// Returns `None` only for an empty series.
    pub fn nearest_row(&self, target: f64) -> Option<&Row> {
        let mut best: Option<(&Row, f64)> = None;
        for row in &self.rows {
            let distance = (row.x - target).abs();
            match best {
                Some((_, best_distance)) if distance.total_cmp(&best_distance).is_ge() => {}
                _ => best = Some((row, distance)),
            }
        }
        best.map(|(row, _)| row)
    }

    /// Apply `f` to every present reading of one motor column
    pub fn map_column(&self, motor: &str, f: impl Fn(f64) -> f64) -> Series {
        let rows = self
            .rows
            .iter()
            .map(|r| {
                let mut row = r.clone();
                if let Some(v) = row.values.get_mut(motor) {
                    *v = f(*v);
                }
                row
            })
            .collect();

        self.with_rows(rows)
    }

    /// Keep only the given motor columns, in the given order
    pub fn select(&self, motors: &[String]) -> Series {
        let columns: Vec<String> = motors
            .iter()
            .filter(|m| self.has_column(m))
            .cloned()
            .collect();

        let rows = self
            .rows
            .iter()
            .map(|r| {
                let values = columns
                    .iter()
                    .filter_map(|c| r.value(c).map(|v| (c.clone(), v)))
                    .collect();
                Row::new(r.x, values)
            })
            .collect();

        Series {
            columns,
            rows,
            ..self.with_rows(Vec::new())
        }
    }

    /// Same shape with a different set of rows. The caller keeps rows sorted.
    fn with_rows(&self, rows: Vec<Row>) -> Series {
        Series {
            name: self.name.clone(),
            axis: self.axis,
            x_column: self.x_column.clone(),
            columns: self.columns.clone(),
            rows,
        }
    }
}

pub fn seconds_since_midnight(time: NaiveTime) -> f64 {
    time.num_seconds_from_midnight() as f64 + time.nanosecond() as f64 / 1e9
}

/// Format seconds since midnight as `HH:MM:SS`
pub fn format_time_of_day(seconds: f64) -> Option<String> {
    if !seconds.is_finite() || seconds < 0.0 {
        return None;
    }
    NaiveTime::from_num_seconds_from_midnight_opt(seconds.floor() as u32, 0)
        .map(|t| t.format("%H:%M:%S").to_string())
}

#[cfg(test)]
pub(crate) fn numeric_series(name: &str, motor: &str, points: &[(f64, Option<f64>)]) -> Series {
    let rows = points
        .iter()
        .map(|(x, v)| {
            let mut values = HashMap::new();
            if let Some(v) = v {
                values.insert(motor.to_string(), *v);
            }
            Row::new(*x, values)
        })
        .collect();
    Series::new(name, XAxis::Numeric, "x", vec![motor.to_string()], rows)
}
