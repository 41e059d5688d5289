// Chart and tile view models handed to the front end
use super::series::{Series, XAxis};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub x: f64,
    pub y: f64,
}

impl ChartPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TileData {
    pub id: String,
    pub title: String,
    pub unit: String,
    pub value: Option<f64>,
    pub precision: i32,
}

impl TileData {
    pub fn new(id: &str, title: &str, unit: &str, value: Option<f64>, precision: i32) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            unit: unit.to_string(),
            value,
            precision,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesData {
    pub id: String,
    pub name: String,
    pub color: Option<String>,
    pub points: Vec<ChartPoint>,
}

impl SeriesData {
    /// One motor column as chart points, skipping absent readings
    pub fn from_column(series: &Series, motor: &str, color: Option<String>) -> Self {
        let points = series
            .rows()
            .iter()
            .filter_map(|r| r.value(motor).map(|y| ChartPoint::new(r.x, y)))
            .collect();

        Self {
            id: motor.to_string(),
            name: motor.to_string(),
            color,
            points,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    pub id: String,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub x_axis: XAxis,
    pub kind: ChartKind,
    pub series: Vec<SeriesData>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ChartKind {
    MultiLine,
    /// Single line filled down to zero
    Area,
}

impl ChartData {
    pub fn new(
        id: &str,
        title: &str,
        x_label: &str,
        y_label: &str,
        x_axis: XAxis,
        kind: ChartKind,
        series: Vec<SeriesData>,
    ) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            x_axis,
            kind,
            series,
        }
    }
}
