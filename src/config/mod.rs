use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::PpResult;

pub mod log;
pub mod plugin;

pub use log::{Level, LogConfig};
pub use plugin::FaultAttitude;

pub static DEFAULT_CONFIG: &str = include_str!("../../default_config/plugin.toml");

const CONFIG_PATH: &str = "pp_bridge.toml";
const CONFIG_PATH_ENV: &str = "PP_BRIDGE_CONFIG";

/// Location of the plugin config, `$PP_BRIDGE_CONFIG` or `pp_bridge.toml`
/// in the working directory.
pub fn config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(CONFIG_PATH))
}

#[derive(Serialize, Deserialize, Debug, Default, Clone)]
#[serde(default)]
pub struct PluginConfig {
    pub fault_attitude: FaultAttitude,
    pub log: LogConfig,
}

impl PluginConfig {
    pub fn from_toml_str(s: &str) -> PpResult<Self> {
        Ok(toml::from_str(s)?)
    }

    /// A missing file is not an error, the defaults apply.
    pub fn read<P: AsRef<Path>>(path: P) -> PpResult<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Ok(Self::default());
        }

        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_parses() {
        let config = PluginConfig::from_toml_str(DEFAULT_CONFIG).expect("default config");
        assert_eq!(config.fault_attitude, FaultAttitude::FastFault);
        assert_eq!(config.log.max_level, Level::Info);
        assert!(config.log.log_dir.is_none());
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let config = PluginConfig::from_toml_str("fault_attitude = \"Ignore\"").unwrap();
        assert_eq!(config.fault_attitude, FaultAttitude::Ignore);
        assert_eq!(config.log.time_format, LogConfig::default().time_format);
        assert_eq!(config.log.max_level, Level::Info);
    }

    #[test]
    fn level_accepts_tracing_spelling() {
        let spellings = [
            ("Debug", Level::Debug),
            ("WARN", Level::Warn),
            ("trace", Level::Trace),
        ];
        for (text, level) in spellings {
            let config =
                PluginConfig::from_toml_str(&format!("[log]\nmax_level = \"{text}\"")).unwrap();
            assert_eq!(config.log.max_level, level);
        }
        assert_eq!(tracing::Level::from(Level::Warn), tracing::Level::WARN);
        assert!(PluginConfig::from_toml_str("[log]\nmax_level = \"Loud\"").is_err());
    }

    #[test]
    fn malformed_config_is_an_error() {
        let err = PluginConfig::from_toml_str("fault_attitude = 3").unwrap_err();
        assert!(matches!(err, crate::error::PpError::Config(_)));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let config = PluginConfig::read("this/path/does/not/exist.toml").unwrap();
        assert_eq!(config.fault_attitude, FaultAttitude::default());
    }
}
