use crate::core::session::SessionConfig;
use crate::models::ScoringWeights;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub catalog: CatalogSettings,
    pub geocode: GeocodeSettings,
    #[serde(default)]
    pub discovery: DiscoverySettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogSettings {
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeSettings {
    pub base_url: String,
    #[serde(default = "default_geocode_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_geocode_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_geocode_cache_size")]
    pub cache_size: u64,
    #[serde(default = "default_geocode_cache_ttl")]
    pub cache_ttl_secs: u64,
}

fn default_geocode_user_agent() -> String { "care-match/0.1".to_string() }
fn default_geocode_timeout() -> u64 { 10 }
fn default_geocode_cache_size() -> u64 { 1000 }
fn default_geocode_cache_ttl() -> u64 { 3600 }

#[derive(Debug, Clone, Deserialize)]
pub struct DiscoverySettings {
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
    #[serde(default = "default_match_delay_ms")]
    pub match_delay_ms: u64,
}

impl Default for DiscoverySettings {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            debounce_ms: default_debounce_ms(),
            settle_delay_ms: default_settle_delay_ms(),
            match_delay_ms: default_match_delay_ms(),
        }
    }
}

fn default_batch_size() -> usize { 6 }
fn default_debounce_ms() -> u64 { 500 }
fn default_settle_delay_ms() -> u64 { 500 }
fn default_match_delay_ms() -> u64 { 1200 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_specialization_weight")]
    pub specialization: f64,
    #[serde(default = "default_experience_weight")]
    pub experience: f64,
    #[serde(default = "default_keywords_weight")]
    pub keywords: f64,
    #[serde(default = "default_reputation_weight")]
    pub reputation: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            specialization: default_specialization_weight(),
            experience: default_experience_weight(),
            keywords: default_keywords_weight(),
            reputation: default_reputation_weight(),
        }
    }
}

fn default_specialization_weight() -> f64 { 50.0 }
fn default_experience_weight() -> f64 { 20.0 }
fn default_keywords_weight() -> f64 { 15.0 }
fn default_reputation_weight() -> f64 { 15.0 }

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
    /// 4. Environment variables (prefixed with CARE__)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., CARE__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("CARE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("CARE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    pub fn scoring_weights(&self) -> ScoringWeights {
        ScoringWeights {
            specialization: self.scoring.weights.specialization,
            experience: self.scoring.weights.experience,
            keywords: self.scoring.weights.keywords,
            reputation: self.scoring.weights.reputation,
        }
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            batch_size: self.discovery.batch_size,
            debounce: Duration::from_millis(self.discovery.debounce_ms),
            settle_delay: Duration::from_millis(self.discovery.settle_delay_ms),
            match_delay: Duration::from_millis(self.discovery.match_delay_ms),
        }
    }
}
