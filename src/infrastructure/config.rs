use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub data: DataSettings,
    #[serde(default)]
    pub analysis: AnalysisSettings,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerSettings {
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Where the measurement tables live
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DataSettings {
    pub dir: String,
    pub power_file: String,
    pub cadence_file: String,
    pub thermal_short_file: String,
    pub thermal_long_file: String,
    pub profiles_file: String,
    pub support_prefix: String,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            dir: ".".to_string(),
            power_file: "leistung.csv".to_string(),
            cadence_file: "kadenz.csv".to_string(),
            thermal_short_file: "15minuten.csv".to_string(),
            thermal_long_file: "20minuten.csv".to_string(),
            profiles_file: "stammdaten.csv".to_string(),
            support_prefix: "support_".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AnalysisSettings {
    /// Input power (W) whose output row converts derating percent to watts
    pub reference_input_watts: f64,
    pub thermal_window_minutes: f64,
    /// Lightening applied to the minimum bars of the thermal summary
    pub lighten_amount: f64,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            reference_input_watts: 250.0,
            thermal_window_minutes: 15.0,
            lighten_amount: 0.5,
        }
    }
}

impl AnalysisSettings {
    pub fn thermal_window_seconds(&self) -> f64 {
        self.thermal_window_minutes * 60.0
    }
}

/// Load `config/dashboard.*` (optional) overlaid with `DASHBOARD__*` environment variables
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/dashboard").required(false))
        .add_source(
            config::Environment::with_prefix("DASHBOARD")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}

/// File name of a motor's support-mode table
pub fn support_file_name(prefix: &str, motor: &str) -> String {
    format!("{}{}.csv", prefix, motor)
}
