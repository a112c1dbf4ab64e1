//! Controller configuration
//!
//! Read from a JSON file. Every field is optional:
//!
//! ```json
//! { "heading_tolerance": 0.1, "initial_state": "off", "trace": false }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::errors::{ControllerError, ControllerResult};
use super::state::State;
use super::transition::DEFAULT_HEADING_TOLERANCE;

/// Controller configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ControllerConfig {
    /// Largest heading error, in degrees, at which a turn counts as done
    #[serde(default = "default_heading_tolerance")]
    pub heading_tolerance: f32,

    /// State the controller starts in: "off" or "idle"
    #[serde(default = "default_initial_state")]
    pub initial_state: String,

    /// Emit trace-level records for every variant and dispatch step
    #[serde(default)]
    pub trace: bool,
}

fn default_heading_tolerance() -> f32 {
    DEFAULT_HEADING_TOLERANCE
}

fn default_initial_state() -> String {
    "off".to_string()
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            heading_tolerance: default_heading_tolerance(),
            initial_state: default_initial_state(),
            trace: false,
        }
    }
}

impl ControllerConfig {
    /// Load configuration from file
    pub fn load(path: &Path) -> ControllerResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ControllerError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Parse and validate configuration text
    pub fn from_json(content: &str) -> ControllerResult<Self> {
        let config: ControllerConfig = serde_json::from_str(content)
            .map_err(|e| ControllerError::invalid_config(format!("invalid config JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ControllerResult<()> {
        if !self.heading_tolerance.is_finite() || self.heading_tolerance <= 0.0 {
            return Err(ControllerError::invalid_config(format!(
                "heading_tolerance must be a positive number, got {}",
                self.heading_tolerance
            )));
        }

        if State::from_name(&self.initial_state).is_none() {
            return Err(ControllerError::invalid_config(format!(
                "invalid initial_state: '{}'. Only 'off' and 'idle' are allowed.",
                self.initial_state
            )));
        }

        Ok(())
    }

    /// The configured starting state.
    pub fn initial_state(&self) -> ControllerResult<State> {
        State::from_name(&self.initial_state).ok_or_else(|| {
            ControllerError::invalid_config(format!(
                "invalid initial_state: '{}'",
                self.initial_state
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helm::state::{Idle, Off};
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = ControllerConfig::from_json("{}").unwrap();
        assert_eq!(config, ControllerConfig::default());
        assert_eq!(config.heading_tolerance, 0.1);
        assert_eq!(config.initial_state().unwrap(), State::Off(Off));
        assert!(!config.trace);
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("helm.json");
        fs::write(
            &path,
            r#"{ "heading_tolerance": 0.5, "initial_state": "idle", "trace": true }"#,
        )
        .unwrap();

        let config = ControllerConfig::load(&path).unwrap();
        assert_eq!(config.heading_tolerance, 0.5);
        assert_eq!(config.initial_state().unwrap(), State::Idle(Idle));
        assert!(config.trace);
    }

    #[test]
    fn test_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = ControllerConfig::load(&temp_dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ControllerError::ConfigIo { .. }));
    }

    #[test]
    fn test_rejects_bad_values() {
        for content in [
            r#"{ "heading_tolerance": 0 }"#,
            r#"{ "heading_tolerance": -1.5 }"#,
            r#"{ "initial_state": "turning" }"#,
            r#"{ "unknown": 1 }"#,
            "not json",
        ] {
            let err = ControllerConfig::from_json(content).unwrap_err();
            assert!(matches!(err, ControllerError::InvalidConfig(_)), "{content}");
        }
    }
}
