use std::fmt;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::errors::{GenScoreError, GenScoreResult};

pub const DEFAULT_CONFIG_FILE: &str = "genscore.toml";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Runtime settings for the evaluation service.
///
/// Layering, lowest to highest precedence: built-in defaults, `genscore.toml`
/// (or the file named by `GENSCORE_CONFIG`), `GEMINI_API_KEY`, `GENSCORE_*`.
#[derive(Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub api_key: String,
    pub model: String,
    pub api_base: String,
    pub request_timeout_secs: u64,
    pub host: String,
    pub port: u16,
    pub cors_permissive: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            request_timeout_secs: 30,
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors_permissive: true,
        }
    }
}

impl fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("api_key", &if self.api_key.is_empty() { "<unset>" } else { "<redacted>" })
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("cors_permissive", &self.cors_permissive)
            .finish()
    }
}

impl ServiceConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    fn validate(self) -> GenScoreResult<Self> {
        if self.api_key.trim().is_empty() {
            return Err(GenScoreError::config(
                "GEMINI_API_KEY is not set; export it or set api_key in genscore.toml",
            ));
        }
        if self.model.trim().is_empty() {
            return Err(GenScoreError::config("model cannot be empty"));
        }
        if self.request_timeout_secs == 0 {
            return Err(GenScoreError::config(
                "request_timeout_secs must be greater than zero",
            ));
        }
        Ok(self)
    }
}

/// Build the layered figment without extracting it.
pub fn figment(path: Option<&str>) -> Figment {
    let file = path
        .map(str::to_string)
        .or_else(|| std::env::var("GENSCORE_CONFIG").ok())
        .unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string());

    Figment::from(Serialized::defaults(ServiceConfig::default()))
        .merge(Toml::file(file))
        .merge(Env::raw().only(&["GEMINI_API_KEY"]).map(|_| "api_key".into()))
        .merge(Env::prefixed("GENSCORE_").ignore(&["config"]))
}

/// Load and validate configuration. A missing credential is a hard error so
/// the service never starts without one.
pub fn load_config(path: Option<&str>) -> GenScoreResult<ServiceConfig> {
    let config: ServiceConfig = figment(path).extract()?;
    config.validate()
}
