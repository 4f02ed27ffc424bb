//! Startup configuration for courier_app.
//!
//! Reads `./courier.ron` from the working directory. A missing file means
//! defaults; a malformed one is logged and also means defaults, so a bad
//! edit never blocks the app.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use courier_logging::{courier_info, courier_warn};
use serde::{Deserialize, Serialize};

const CONFIG_FILENAME: &str = "courier.ron";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the backend job service.
    pub backend_url: String,
    /// Progress poll cadence while a job is active.
    pub poll_interval_ms: u64,
    /// How long a toast stays visible before it starts exiting.
    pub toast_duration_ms: u64,
    /// Directory exported reports are written into.
    pub report_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url: "http://127.0.0.1:5000".to_string(),
            poll_interval_ms: 2000,
            toast_duration_ms: 5000,
            report_dir: PathBuf::from("./reports"),
        }
    }
}

impl AppConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.toast_duration_ms)
    }
}

pub fn load_config(dir: &Path) -> AppConfig {
    let path = dir.join(CONFIG_FILENAME);
    let content = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            courier_info!("No {} found, using defaults", CONFIG_FILENAME);
            return AppConfig::default();
        }
        Err(err) => {
            courier_warn!("Failed to read {:?}: {}", path, err);
            return AppConfig::default();
        }
    };

    match ron::from_str(&content) {
        Ok(config) => config,
        Err(err) => {
            courier_warn!("Failed to parse {:?}: {}", path, err);
            AppConfig::default()
        }
    }
}
