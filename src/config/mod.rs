mod defaults;
mod types;

pub use types::*;

use crate::error::ConfigError;
use defaults::*;
use std::path::Path;

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            repo: String::new(),
            target: default_target(),
            handoff_dir: default_handoff_dir(),
            outgoing_dir: default_outgoing_dir(),
            plans_dir: default_plans_dir(),
            report_dir: default_report_dir(),
            state_file: default_state_file(),
            include: default_include(),
            verification_commands: Vec::new(),
            timeout_sec: default_timeout_sec(),
        }
    }
}

impl Config {
    /// Load config from a YAML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Validate the config.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.repo.trim().is_empty() {
            return Err(ConfigError::NoRepoIdentity);
        }
        Ok(())
    }
}
