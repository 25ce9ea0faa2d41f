use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use crate::models::ScoringWeights;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub geo: GeoSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }

/// Listing database; without a URL the service runs stateless
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatabaseSettings {
    pub url: Option<String>,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
}

/// Score thresholds and result limits used by the match endpoints
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct MatchingSettings {
    /// Minimum score for customer suggestions on a property page
    #[serde(default = "default_detail_min_score")]
    pub detail_min_score: u8,
    /// Minimum score for the dashboard top matches
    #[serde(default = "default_dashboard_min_score")]
    pub dashboard_min_score: u8,
    #[serde(default = "default_limit")]
    pub default_limit: u16,
    #[serde(default = "default_max_limit")]
    pub max_limit: u16,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            detail_min_score: default_detail_min_score(),
            dashboard_min_score: default_dashboard_min_score(),
            default_limit: default_limit(),
            max_limit: default_max_limit(),
        }
    }
}

impl MatchingSettings {
    /// Requested limit, or the default, capped at `max_limit`
    pub fn clamp_limit(&self, requested: Option<u16>) -> usize {
        requested.unwrap_or(self.default_limit).min(self.max_limit) as usize
    }
}

fn default_detail_min_score() -> u8 { 50 }
fn default_dashboard_min_score() -> u8 { 70 }
fn default_limit() -> u16 { 20 }
fn default_max_limit() -> u16 { 100 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_status_weight")]
    pub status: u32,
    #[serde(rename = "type", default = "default_type_weight")]
    pub property_type: u32,
    #[serde(default = "default_location_weight")]
    pub location: u32,
    #[serde(default = "default_budget_weight")]
    pub budget: u32,
    #[serde(default = "default_rooms_weight")]
    pub rooms: u32,
    #[serde(default = "default_features_weight")]
    pub features: u32,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            status: default_status_weight(),
            property_type: default_type_weight(),
            location: default_location_weight(),
            budget: default_budget_weight(),
            rooms: default_rooms_weight(),
            features: default_features_weight(),
        }
    }
}

impl From<&WeightsConfig> for ScoringWeights {
    fn from(config: &WeightsConfig) -> Self {
        Self {
            status: config.status,
            property_type: config.property_type,
            location: config.location,
            budget: config.budget,
            rooms: config.rooms,
            features: config.features,
        }
    }
}

fn default_status_weight() -> u32 { 20 }
fn default_type_weight() -> u32 { 15 }
fn default_location_weight() -> u32 { 20 }
fn default_budget_weight() -> u32 { 20 }
fn default_rooms_weight() -> u32 { 10 }
fn default_features_weight() -> u32 { 15 }

/// Extra neighborhood coordinates on top of the built-in table
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeoSettings {
    #[serde(default)]
    pub neighborhoods: HashMap<String, [f64; 2]>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with PORTFOLIO__)
    /// 5. DATABASE_URL
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., PORTFOLIO__SERVER__PORT -> server.port
            .add_source(environment())
            .build()?;

        with_database_url(settings)?.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(environment())
            .build()?;

        with_database_url(settings)?.try_deserialize()
    }

    pub fn weights(&self) -> ScoringWeights {
        ScoringWeights::from(&self.scoring.weights)
    }
}

fn environment() -> Environment {
    Environment::with_prefix("PORTFOLIO")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

/// Let the conventional DATABASE_URL win over file and prefixed settings
fn with_database_url(settings: Config) -> Result<Config, ConfigError> {
    match std::env::var("DATABASE_URL") {
        Ok(url) if !url.is_empty() => Config::builder()
            .add_source(settings)
            .set_override("database.url", url)?
            .build(),
        _ => Ok(settings),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights() {
        let weights = WeightsConfig::default();
        assert_eq!(weights.status, 20);
        assert_eq!(weights.property_type, 15);
        assert_eq!(weights.location, 20);
        assert_eq!(weights.budget, 20);
        assert_eq!(weights.rooms, 10);
        assert_eq!(weights.features, 15);
        assert_eq!(ScoringWeights::from(&weights), ScoringWeights::default());
    }

    #[test]
    fn test_default_logging() {
        let level = default_log_level();
        let format = default_log_format();
        assert_eq!(level, "info");
        assert_eq!(format, "json");
    }

    #[test]
    fn test_default_thresholds() {
        let matching = MatchingSettings::default();
        assert_eq!(matching.detail_min_score, 50);
        assert_eq!(matching.dashboard_min_score, 70);
    }

    #[test]
    fn test_clamp_limit() {
        let matching = MatchingSettings::default();
        assert_eq!(matching.clamp_limit(None), 20);
        assert_eq!(matching.clamp_limit(Some(5)), 5);
        assert_eq!(matching.clamp_limit(Some(500)), 100);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let settings: Settings = Config::builder()
            .add_source(File::from_str(
                "[server]\nport = 9000\n\n[scoring.weights]\nrooms = 5\n\n[geo.neighborhoods]\nkizilay = [39.92, 32.85]\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.weights().rooms, 5);
        assert_eq!(settings.weights().status, 20);
        assert_eq!(settings.geo.neighborhoods["kizilay"], [39.92, 32.85]);
        assert!(settings.database.url.is_none());
    }
}
