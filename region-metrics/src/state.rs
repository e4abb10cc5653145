use crate::config::Config;
use crate::dataset::Dataset;
use tracing::{debug, info, warn};

pub struct AppState {
    pub dataset: Dataset,
    pub preflight_max_age_secs: u64,
}

impl AppState {
    pub fn new(dataset: Dataset, cfg: &Config) -> Self {
        let preflight_max_age_secs = cfg.preflight_max_age_secs();
        debug!("Preflight max age: {}s", preflight_max_age_secs);
        AppState {
            dataset,
            preflight_max_age_secs,
        }
    }

    /// Loads the dataset named by the config. Any failure here is fatal to
    /// startup.
    pub fn from_config(cfg: &Config, dataset_path: &str) -> anyhow::Result<Self> {
        let dataset = Dataset::from_file(dataset_path)?;
        if dataset.is_empty() {
            warn!("Dataset '{}' has no rows; every query will return 404", dataset_path);
        }
        info!(
            "Loaded {} row(s) from '{}', regions: {:?}",
            dataset.len(),
            dataset_path,
            dataset.regions()
        );
        Ok(Self::new(dataset, cfg))
    }
}
