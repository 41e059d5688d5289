// Per-request selection state
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    Power,
    Cadence,
    Thermal,
}

impl View {
    pub fn title(self) -> &'static str {
        match self {
            View::Power => "Leistungskurven",
            View::Cadence => "Kadenz-Verlauf",
            View::Thermal => "Thermisches Derating",
        }
    }

    pub fn x_label(self) -> &'static str {
        match self {
            View::Power => "Eingangsleistung (Watt)",
            View::Cadence => "Kadenz (RPM)",
            View::Thermal => "Zeit (mm:ss)",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            View::Power => "power",
            View::Cadence => "cadence",
            View::Thermal => "thermal",
        };
        f.write_str(name)
    }
}

impl FromStr for View {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "power" | "leistung" => Ok(View::Power),
            "cadence" | "kadenz" => Ok(View::Cadence),
            "thermal" | "thermik" => Ok(View::Thermal),
            other => Err(other.to_string()),
        }
    }
}

/// Unit of the thermal view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ThermalUnit {
    /// Percent of the start-of-run output
    #[default]
    Relative,
    /// Watts at the reference input power
    Absolute,
}

impl FromStr for ThermalUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "relative" | "percent" => Ok(ThermalUnit::Relative),
            "absolute" | "watt" | "watts" => Ok(ThermalUnit::Absolute),
            other => Err(other.to_string()),
        }
    }
}

/// Everything one request needs to know about what the user is looking at
#[derive(Debug, Clone, PartialEq)]
pub struct SessionContext {
    pub view: View,
    pub selection: Vec<String>,
    pub lower: Option<f64>,
    pub upper: Option<f64>,
    pub target: Option<f64>,
    pub unit: ThermalUnit,
}

impl SessionContext {
    pub fn new(view: View) -> Self {
        Self {
            view,
            selection: Vec::new(),
            lower: None,
            upper: None,
            target: None,
            unit: ThermalUnit::default(),
        }
    }

    /// Parse a comma-separated motor list, ignoring blanks
    pub fn with_motor_list(mut self, list: &str) -> Self {
        self.selection = list
            .split(',')
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string)
            .collect();
        self
    }
}
