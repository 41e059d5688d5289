// Dashboard view models
use super::chart::{ChartData, TileData};
use super::motor::MotorProfile;
use super::series::XAxis;
use super::session::{ThermalUnit, View};
use serde::Serialize;
use std::cmp::Ordering;

/// A comparison chart plus the detail panel below it
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonView {
    pub view: View,
    pub title: String,
    pub motors: Vec<String>,
    pub x_axis: XAxis,
    /// Applied x interval, `None` when the filtered chart is empty
    pub range: Option<(f64, f64)>,
    pub unit: Option<ThermalUnit>,
    pub chart: ChartData,
    pub detail: Option<Detail>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Detail {
    Point(PointComparison),
    Thermal(ThermalSummary),
}

/// Every selected motor's reading at the row nearest to a target x
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PointComparison {
    pub target: f64,
    /// x of the row actually used
    pub x: f64,
    pub bars: Vec<BarEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BarEntry {
    pub motor: String,
    pub value: Option<f64>,
    pub color: String,
}

/// Mean and minimum per motor over the start of the thermal run
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThermalSummary {
    pub window_minutes: f64,
    pub value_label: String,
    pub entries: Vec<ThermalBar>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThermalBar {
    pub motor: String,
    pub mean: Option<f64>,
    pub minimum: Option<f64>,
    pub mean_color: String,
    pub minimum_color: String,
}

/// Everything shown for a single motor
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FactSheet {
    pub motor: String,
    pub color: String,
    pub profile: Option<MotorProfile>,
    pub tiles: Vec<TileData>,
    pub article_url: Option<String>,
    pub video_url: Option<String>,
    pub power: Option<ChartData>,
    pub cadence: Option<ChartData>,
    pub support_modes: Option<ChartData>,
}

/// Ascending order with absent values last
pub fn cmp_present_first(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

impl PointComparison {
    pub fn new(target: f64, x: f64, mut bars: Vec<BarEntry>) -> Self {
        bars.sort_by(|a, b| cmp_present_first(a.value, b.value));
        Self { target, x, bars }
    }
}

impl ThermalSummary {
    pub fn new(window_minutes: f64, value_label: String, mut entries: Vec<ThermalBar>) -> Self {
        entries.sort_by(|a, b| cmp_present_first(a.mean, b.mean));
        Self {
            window_minutes,
            value_label,
            entries,
        }
    }
}
