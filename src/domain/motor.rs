// Motor domain model
use super::color::palette_color;
use super::series::Series;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

/// Authoritative set of motor identifiers, sorted, with their chart colors
#[derive(Debug, Clone, Default)]
pub struct MotorRegistry {
    motors: Vec<String>,
    colors: HashMap<String, String>,
}

impl MotorRegistry {
    /// Union of the motor columns of every given series
    pub fn from_series<'a>(series: impl IntoIterator<Item = &'a Series>) -> Self {
        let motors: BTreeSet<String> = series
            .into_iter()
            .flat_map(|s| s.columns().iter().cloned())
            .collect();

        Self::new(motors.into_iter().collect())
    }

    fn new(motors: Vec<String>) -> Self {
        let colors = motors
            .iter()
            .enumerate()
            .map(|(i, m)| (m.clone(), palette_color(i).to_string()))
            .collect();

        Self { motors, colors }
    }

    pub fn motors(&self) -> &[String] {
        &self.motors
    }

    pub fn contains(&self, motor: &str) -> bool {
        self.colors.contains_key(motor)
    }

    pub fn color(&self, motor: &str) -> Option<&str> {
        self.colors.get(motor).map(String::as_str)
    }

    /// Known motors from `requested`, in request order. An empty (or entirely
    /// unknown) request selects every motor.
    pub fn resolve_selection(&self, requested: &[String]) -> Vec<String> {
        let mut selection: Vec<String> = Vec::new();
        for motor in requested {
            if self.contains(motor) && !selection.contains(motor) {
                selection.push(motor.clone());
            }
        }

        if selection.is_empty() {
            self.motors.clone()
        } else {
            selection
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MotorSummary {
    pub name: String,
    pub color: String,
}

/// Descriptive attributes of one motor from the metadata table
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MotorProfile {
    pub model: String,
    pub manufacturer: Option<String>,
    pub weight_kg: Option<f64>,
    pub max_torque_nm: Option<f64>,
    pub system_voltage_v: Option<f64>,
    pub remark: Option<String>,
    pub article_link: Option<String>,
    pub video_link: Option<String>,
}

impl MotorProfile {
    pub fn new(model: String) -> Self {
        Self {
            model,
            ..Default::default()
        }
    }

    /// Article link, only when it is an http(s) URL
    pub fn article_url(&self) -> Option<&str> {
        Self::web_link(self.article_link.as_deref())
    }

    /// Video link, only when it is an http(s) URL
    pub fn video_url(&self) -> Option<&str> {
        Self::web_link(self.video_link.as_deref())
    }

    fn web_link(link: Option<&str>) -> Option<&str> {
        link.map(str::trim).filter(|l| l.starts_with("http"))
    }
}
