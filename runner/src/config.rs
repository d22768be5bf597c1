use std::{fs, path::Path};

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use crate::script::Script;
use common::config::TuningConfig;

// ============================================================================
// Logging
// ============================================================================

// Logs go to stderr so stdout stays a clean snapshot stream.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

// ============================================================================
// File Loading
// ============================================================================

pub fn load_tuning(path: &Path) -> Result<TuningConfig> {
    let text = fs::read_to_string(path).with_context(|| format!("failed to read tuning file {}", path.display()))?;
    let tuning: TuningConfig =
        serde_json::from_str(&text).with_context(|| format!("failed to parse tuning file {}", path.display()))?;
    tuning
        .validate()
        .with_context(|| format!("invalid tuning in {}", path.display()))?;
    Ok(tuning)
}

pub fn load_script(path: &Path) -> Result<Script> {
    let text = fs::read_to_string(path).with_context(|| format!("failed to read script {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse script {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_tuning_file_keeps_defaults() {
        let tuning: TuningConfig = serde_json::from_str(r#"{ "alarm": { "duration": 5.0 } }"#).unwrap();
        assert_eq!(tuning.alarm.duration, 5.0);
        assert_eq!(tuning.guard, TuningConfig::default().guard);
        assert!(tuning.validate().is_ok());
    }

    #[test]
    fn missing_files_report_the_path() {
        let err = load_script(Path::new("/nonexistent/script.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/script.json"));
    }
}
