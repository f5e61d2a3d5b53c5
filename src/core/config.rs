use crate::pipelines::utils::DeviceRequest;
use std::path::PathBuf;
use tracing::Level;

pub const DEFAULT_MODEL_ID: &str = "distilbert-base-uncased";
pub const DEFAULT_REVISION: &str = "main";
pub const DEFAULT_MAX_LENGTH: usize = 512;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;

/// Everything needed to bring a sentiment model up.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// Hugging Face repository id, e.g. `distilbert-base-uncased`.
    pub model_id: String,
    /// Branch, tag or commit hash.
    pub revision: String,
    pub device: DeviceRequest,
    /// Token budget; longer inputs are truncated.
    pub max_length: usize,
    /// Build a fresh 7-way head when the checkpoint does not ship one.
    pub allow_untrained_head: bool,
    pub tokenizer_file: Option<PathBuf>,
    pub config_file: Option<PathBuf>,
    pub weight_file: Option<PathBuf>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_id: DEFAULT_MODEL_ID.to_string(),
            revision: DEFAULT_REVISION.to_string(),
            device: DeviceRequest::Default,
            max_length: DEFAULT_MAX_LENGTH,
            allow_untrained_head: false,
            tokenizer_file: None,
            config_file: None,
            weight_file: None,
        }
    }
}

/// Settings for the HTTP service, sourced from the environment.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    pub log_level: Level,
    pub model: ModelConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            log_level: Level::INFO,
            // The stock base checkpoint has no 7-way head, so the service
            // accepts a freshly initialized one unless told otherwise.
            model: ModelConfig {
                allow_untrained_head: true,
                ..ModelConfig::default()
            },
        }
    }
}

impl ServiceConfig {
    /// Reads `SENTIMENT_*` variables from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup; missing or unparseable values fall
    /// back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();

        if let Some(host) = read("SENTIMENT_HOST") {
            config.host = host;
        }
        if let Some(port) = read("SENTIMENT_PORT").and_then(|v| v.parse().ok()) {
            config.port = port;
        }
        if let Some(level) = read("SENTIMENT_LOG_LEVEL").and_then(|v| v.parse().ok()) {
            config.log_level = level;
        }
        if let Some(model_id) = read("SENTIMENT_MODEL_ID") {
            config.model.model_id = model_id;
        }
        if let Some(revision) = read("SENTIMENT_REVISION") {
            config.model.revision = revision;
        }
        if let Some(device) = read("SENTIMENT_DEVICE").and_then(|v| v.parse().ok()) {
            config.model.device = device;
        }
        if let Some(max_length) = read("SENTIMENT_MAX_LENGTH")
            .and_then(|v| v.parse().ok())
            .filter(|n: &usize| *n > 0)
        {
            config.model.max_length = max_length;
        }
        if let Some(allow) = read("SENTIMENT_ALLOW_UNTRAINED_HEAD").and_then(|v| parse_flag(&v)) {
            config.model.allow_untrained_head = allow;
        }

        config
    }

    /// `host:port` for the listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
