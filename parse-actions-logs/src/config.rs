use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_OUTPUT_DIR: &str = "output";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractConfig {
    /// Root directory the failure excerpts are written under
    pub output_dir: PathBuf,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

impl ExtractConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.output_dir.as_os_str().is_empty() {
            return Err("Output directory cannot be empty".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ExtractConfig::default();
        assert_eq!(config.output_dir, PathBuf::from("output"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = ExtractConfig::new().with_output_dir("/tmp/failures");
        assert_eq!(config.output_dir(), Path::new("/tmp/failures"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let config = ExtractConfig::new().with_output_dir("");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_serialization() {
        let config = ExtractConfig::new().with_output_dir("failures");
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: ExtractConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }
}
