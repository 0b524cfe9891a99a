use crate::domain::Observation;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Fixed key for the persisted week, matching the original storage slot
/// name.
pub const STORE_KEY: &str = "turnip-prices";

/// The persisted value: the entered week plus when it was last written
/// (unix milliseconds). `saved_at` lets the CLI flag readings that are
/// probably from a finished week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedWeek {
    pub observation: Observation,
    pub saved_at: i64,
}

impl Default for SavedWeek {
    fn default() -> Self {
        Self {
            observation: Observation::default(),
            saved_at: 0,
        }
    }
}

impl SavedWeek {
    pub fn now(observation: Observation) -> Self {
        Self {
            observation,
            saved_at: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// Age of the saved readings in hours, against the current clock.
    pub fn age_hours(&self) -> f64 {
        let age_ms = chrono::Utc::now().timestamp_millis() - self.saved_at;
        age_ms as f64 / 3_600_000.0
    }

    /// Readings older than a week belong to a finished market cycle.
    pub fn is_stale(&self) -> bool {
        !self.observation.is_empty() && self.age_hours() > 7.0 * 24.0
    }
}

/// Store path for the fixed key.
pub fn store_path(data_dir: &str) -> String {
    format!("{}/{}.json", data_dir, STORE_KEY)
}

/// Load the saved week, or the empty default when the file is missing or
/// unreadable. A corrupt file is treated the same as no file.
pub fn load(path: &str) -> SavedWeek {
    if !Path::new(path).exists() {
        return SavedWeek::default();
    }
    match std::fs::read_to_string(path) {
        Ok(json) => match serde_json::from_str(&json) {
            Ok(saved) => saved,
            Err(e) => {
                tracing::debug!(path, error = %e, "ignoring corrupt saved week");
                SavedWeek::default()
            }
        },
        Err(e) => {
            tracing::debug!(path, error = %e, "could not read saved week");
            SavedWeek::default()
        }
    }
}

/// Save the week, creating the parent directory if needed.
pub fn save(saved: &SavedWeek, path: &str) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(saved)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Remove the saved week. Missing file is fine.
pub fn clear(path: &str) -> Result<(), Box<dyn std::error::Error>> {
    if Path::new(path).exists() {
        std::fs::remove_file(path)?;
    }
    Ok(())
}
