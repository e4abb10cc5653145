use serde::Deserialize;
use std::{fs, path::Path};
use tracing::info;

pub const DEFAULT_LISTEN: &str = "0.0.0.0:8080";
pub const DEFAULT_DATASET_PATH: &str = "q-vercel-latency.json";
pub const DEFAULT_MAX_BODY_BYTES: usize = 1_048_576; // 1 MiB
pub const DEFAULT_PREFLIGHT_MAX_AGE_SECS: u64 = 600;

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub listen: Option<String>,
    // Location of the JSON measurement array, relative to the working directory
    // unless absolute. `REGION_METRICS_DATASET` takes precedence.
    pub dataset_path: Option<String>,
    // Requests to POST /metrics larger than this are rejected with 413.
    pub max_request_body_bytes: Option<usize>,
    // Value of Access-Control-Max-Age on preflight responses.
    pub preflight_max_age_secs: Option<u64>,
}

impl Config {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let cfg_str = fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config '{}': {}", path, e))?;
        Self::parse(&cfg_str)
    }

    pub fn parse(s: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Loads the config named by `explicit`, or falls back to `default_path`
    /// and then to built-in defaults when that file does not exist.
    pub fn load(explicit: Option<&str>, default_path: &str) -> anyhow::Result<Self> {
        match explicit {
            Some(path) => {
                info!("Loading config from {}", path);
                Self::from_file(path)
            }
            None if Path::new(default_path).exists() => {
                info!("Loading config from {}", default_path);
                Self::from_file(default_path)
            }
            None => {
                info!("No config file found at {}, using defaults", default_path);
                Ok(Self::default())
            }
        }
    }

    pub fn listen(&self) -> &str {
        self.listen.as_deref().unwrap_or(DEFAULT_LISTEN)
    }

    pub fn dataset_path(&self) -> &str {
        self.dataset_path.as_deref().unwrap_or(DEFAULT_DATASET_PATH)
    }

    /// Dataset path with an override (normally `REGION_METRICS_DATASET`)
    /// taking precedence over the config file.
    pub fn resolve_dataset_path(&self, env_override: Option<String>) -> String {
        env_override
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| self.dataset_path().to_string())
    }

    pub fn max_request_body_bytes(&self) -> usize {
        self.max_request_body_bytes.unwrap_or(DEFAULT_MAX_BODY_BYTES)
    }

    pub fn preflight_max_age_secs(&self) -> u64 {
        self.preflight_max_age_secs
            .unwrap_or(DEFAULT_PREFLIGHT_MAX_AGE_SECS)
    }
}
