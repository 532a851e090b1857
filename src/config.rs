use anyhow::Result;
use serde::{Deserialize, Deserializer};
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub throttle: ThrottleConfig,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub tls: TlsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Tokio worker threads. `None` keeps the runtime default (one per core).
    #[serde(default)]
    pub workers: Option<usize>,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_graceful_timeout")]
    pub graceful_timeout_secs: u64,
    /// Allowed CORS origins. Defaults to localhost dev ports.
    /// Set LEAD_INTAKE__SERVER__CORS_ALLOWED_ORIGINS (comma-separated) in production.
    #[serde(default = "default_cors_allowed_origins", deserialize_with = "comma_list")]
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    pub api_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ThrottleConfig {
    #[serde(default = "default_lead_create_per_hour")]
    pub lead_create_per_hour: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Fallback filter when RUST_LOG is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_access_log")]
    pub access_log: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TlsConfig {
    pub cert_path: Option<PathBuf>,
    pub key_path: Option<PathBuf>,
}

fn default_bind() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8000 }
fn default_request_timeout() -> u64 { 30 }
fn default_graceful_timeout() -> u64 { 30 }
fn default_db_path() -> String { "./lead-intake.db".to_string() }
fn default_max_connections() -> u32 { 10 }
fn default_lead_create_per_hour() -> u32 { 10 }
fn default_log_level() -> String { "lead_intake=info,tower_http=info".to_string() }
fn default_access_log() -> bool { true }
fn default_cors_allowed_origins() -> Vec<String> {
    vec![
        "http://localhost:3000".to_string(),
        "http://localhost:5173".to_string(),
    ]
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrList {
    List(Vec<String>),
    Joined(String),
}

/// Accepts a list from a config file or a comma-separated string from the environment.
fn comma_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(match StringOrList::deserialize(deserializer)? {
        StringOrList::List(items) => items,
        StringOrList::Joined(joined) => joined
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
    })
}

const DEFAULT_API_KEY: &str = "change-me-in-production";
const MIN_API_KEY_LEN: usize = 16;

pub fn validate(cfg: &Config) -> Result<()> {
    if cfg.auth.api_key == DEFAULT_API_KEY {
        anyhow::bail!(
            "SECURITY ERROR: API key must be changed from default value '{}'. \
            Set LEAD_INTAKE__AUTH__API_KEY environment variable with a strong random value.",
            DEFAULT_API_KEY
        );
    }

    if cfg.auth.api_key.len() < MIN_API_KEY_LEN {
        anyhow::bail!(
            "CONFIG ERROR: API key must be at least {} characters (current: {})",
            MIN_API_KEY_LEN,
            cfg.auth.api_key.len()
        );
    }

    if cfg.throttle.lead_create_per_hour == 0 {
        anyhow::bail!("CONFIG ERROR: throttle.lead_create_per_hour must be at least 1");
    }

    if cfg.server.workers == Some(0) {
        anyhow::bail!("CONFIG ERROR: server.workers must be at least 1 when set");
    }

    if cfg.tls.cert_path.is_some() != cfg.tls.key_path.is_some() {
        anyhow::bail!("CONFIG ERROR: tls.cert_path and tls.key_path must be set together");
    }

    if let Some(parent) = std::path::Path::new(&cfg.database.path).parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            anyhow::bail!(
                "CONFIG ERROR: Database directory does not exist: {}",
                parent.display()
            );
        }
    }

    Ok(())
}

pub fn load() -> Result<Config> {
    build(environment())
}

/// Env values stay strings; typed fields are converted during deserialization,
/// so a numeric-looking API key keeps its exact text.
fn environment() -> config::Environment {
    config::Environment::with_prefix("LEAD_INTAKE").separator("__")
}

fn build(env: config::Environment) -> Result<Config> {
    let cfg: Config = config::Config::builder()
        .add_source(config::File::with_name("config").required(false))
        .add_source(env)
        .set_default("server.bind", default_bind())?
        .set_default("server.port", default_port() as i64)?
        .set_default("server.request_timeout_secs", default_request_timeout() as i64)?
        .set_default("server.graceful_timeout_secs", default_graceful_timeout() as i64)?
        .set_default("server.cors_allowed_origins", default_cors_allowed_origins())?
        .set_default("database.path", default_db_path())?
        .set_default("database.max_connections", default_max_connections() as i64)?
        .set_default("auth.api_key", DEFAULT_API_KEY)?
        .set_default("throttle.lead_create_per_hour", default_lead_create_per_hour() as i64)?
        .set_default("logging.level", default_log_level())?
        .set_default("logging.access_log", default_access_log())?
        .build()?
        .try_deserialize()?;

    validate(&cfg)?;

    Ok(cfg)
}
