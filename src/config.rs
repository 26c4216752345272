use clap::Parser;
use std::time::Duration;

use crate::api::client::{parse_base_url, DEFAULT_BASE_URL};
use crate::dashboard::RefreshSettings;

/// Live match and prediction dashboard
#[derive(Parser, Debug, Clone)]
#[command(name = "livesports-dashboard", version, about)]
pub struct Config {
    /// Prediction backend base URL
    #[arg(long, env = "BACKEND_URL", default_value = DEFAULT_BASE_URL)]
    pub backend_url: String,

    /// Sport selected when the dashboard starts
    #[arg(long, env = "DEFAULT_SPORT", default_value = "soccer")]
    pub default_sport: String,

    /// Sports offered by the selector (comma separated)
    #[arg(
        long,
        env = "SPORTS",
        value_delimiter = ',',
        default_value = "soccer,basketball,tennis"
    )]
    pub sports: Vec<String>,

    /// Prediction type requested for every match
    #[arg(long, env = "PREDICTION_TYPE", default_value = "match_outcome")]
    pub prediction_type: String,

    /// Seconds between scheduled refreshes
    #[arg(long, env = "REFRESH_INTERVAL_SECS", default_value = "60")]
    pub refresh_interval_secs: u64,

    /// Prediction requests allowed in flight at once (1 = one match at a time)
    #[arg(long, env = "PREDICTION_WORKERS", default_value = "1")]
    pub prediction_workers: usize,

    /// Backend request timeout in seconds
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value = "10")]
    pub request_timeout_secs: u64,

    /// Dashboard listen address
    #[arg(long, env = "DASHBOARD_ADDR", default_value = "127.0.0.1:8080")]
    pub dashboard_addr: String,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        parse_base_url(&self.backend_url)?;
        if self.default_sport.trim().is_empty() {
            anyhow::bail!("default_sport must not be empty");
        }
        if self.sports.iter().any(|s| s.trim().is_empty()) {
            anyhow::bail!("sports must not contain empty entries");
        }
        if !self.sports.iter().any(|s| s.trim() == self.default_sport.trim()) {
            anyhow::bail!(
                "default_sport '{}' is not in the sport list {:?}",
                self.default_sport,
                self.sports
            );
        }
        if self.prediction_type.trim().is_empty() {
            anyhow::bail!("prediction_type must not be empty");
        }
        if self.refresh_interval_secs == 0 {
            anyhow::bail!("refresh_interval_secs must be positive");
        }
        if self.prediction_workers == 0 {
            anyhow::bail!("prediction_workers must be at least 1");
        }
        if self.request_timeout_secs == 0 {
            anyhow::bail!("request_timeout_secs must be positive");
        }
        Ok(())
    }

    pub fn refresh_settings(&self) -> RefreshSettings {
        RefreshSettings {
            interval: Duration::from_secs(self.refresh_interval_secs),
            prediction_type: self.prediction_type.trim().to_string(),
            prediction_workers: self.prediction_workers,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn sport_list(&self) -> Vec<String> {
        self.sports.iter().map(|s| s.trim().to_string()).collect()
    }
}
