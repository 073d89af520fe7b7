use crate::core::geo::DEFAULT_MAX_DISTANCE_KM;
use crate::models::ScoringPolicy;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub candidates: CandidateSettings,
    #[serde(default)]
    pub demo: DemoSettings,
    #[serde(default)]
    pub ratings: RatingSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub catalog: CatalogSettings,
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

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatchingSettings {
    pub max_distance_km: Option<f64>,
    pub default_limit: Option<u16>,
    pub max_limit: Option<u16>,
}

impl MatchingSettings {
    pub fn max_distance_km(&self) -> f64 {
        self.max_distance_km.unwrap_or(DEFAULT_MAX_DISTANCE_KM)
    }

    pub fn default_limit(&self) -> u16 {
        self.default_limit.unwrap_or(20)
    }

    pub fn max_limit(&self) -> u16 {
        self.max_limit.unwrap_or(100)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoringSettings {
    #[serde(default = "default_base_floor")]
    pub base_floor: u8,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            base_floor: default_base_floor(),
        }
    }
}

impl ScoringSettings {
    pub fn policy(&self) -> ScoringPolicy {
        ScoringPolicy {
            base_floor: self.base_floor,
        }
    }
}

fn default_base_floor() -> u8 { 60 }

#[derive(Debug, Clone, Deserialize)]
pub struct CandidateSettings {
    /// `demo` or `remote`
    #[serde(default = "default_candidate_source")]
    pub source: String,
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl Default for CandidateSettings {
    fn default() -> Self {
        Self {
            source: default_candidate_source(),
            endpoint: None,
            api_key: None,
            timeout_secs: None,
        }
    }
}

fn default_candidate_source() -> String { "demo".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct DemoSettings {
    #[serde(default = "default_demo_seed")]
    pub seed: u64,
    #[serde(default = "default_pool_size")]
    pub pool_size: usize,
    #[serde(default)]
    pub simulated_delay_ms: u64,
}

impl Default for DemoSettings {
    fn default() -> Self {
        Self {
            seed: default_demo_seed(),
            pool_size: default_pool_size(),
            simulated_delay_ms: 0,
        }
    }
}

fn default_demo_seed() -> u64 { 42 }
fn default_pool_size() -> usize { 3 }

#[derive(Debug, Clone, Deserialize)]
pub struct RatingSettings {
    /// `log` or `remote`
    #[serde(default = "default_rating_sink")]
    pub sink: String,
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl Default for RatingSettings {
    fn default() -> Self {
        Self {
            sink: default_rating_sink(),
            endpoint: None,
            api_key: None,
            timeout_secs: None,
        }
    }
}

fn default_rating_sink() -> String { "log".to_string() }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CacheSettings {
    pub capacity: Option<u64>,
    pub ttl_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogSettings {
    /// TOML file replacing the built-in stations and topics
    pub path: Option<String>,
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

impl LoggingSettings {
    /// Apply `LOG_LEVEL` / `LOG_FORMAT` style overrides on top of the file values
    pub fn overridden(&self, level: Option<String>, format: Option<String>) -> Self {
        Self {
            level: level.unwrap_or_else(|| self.level.clone()),
            format: format.unwrap_or_else(|| self.format.clone()),
        }
    }

    pub fn is_pretty(&self) -> bool {
        self.format.eq_ignore_ascii_case("pretty")
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
    /// 4. Environment variables (prefixed with CHAVRUTA_)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., CHAVRUTA__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("CHAVRUTA")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = substitute_env_vars(settings)?;

        settings.try_deserialize()
    }
}

/// Pull collaborator credentials from the conventional environment variables
/// so they never need to live in a config file.
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let directory_api_key = env::var("DIRECTORY_API_KEY").ok();
    let directory_endpoint = env::var("DIRECTORY_ENDPOINT").ok();

    let mut builder = Config::builder().add_source(settings);

    if let Some(api_key) = directory_api_key {
        builder = builder
            .set_override("candidates.api_key", api_key.clone())?
            .set_override("ratings.api_key", api_key)?;
    }
    if let Some(endpoint) = directory_endpoint {
        builder = builder
            .set_override("candidates.endpoint", endpoint.clone())?
            .set_override("ratings.endpoint", endpoint)?;
    }

    builder.build()
}
