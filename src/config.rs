use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    encoder::EncoderParams,
    error::{ConfigError, Result},
    sequence::FramePattern,
};

/// Main configuration for the sbs-compositor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Fixed encoding parameters applied to every invocation
    pub encoder: EncoderParams,

    /// Filename pattern both frame sequences follow
    pub pattern: FramePattern,

    /// Side-by-side layout settings
    pub layout: LayoutConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            encoder: EncoderParams::default(),
            pattern: FramePattern::default(),
            layout: LayoutConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|_| ConfigError::ParseFailed {
            path: path.display().to_string(),
        })?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::InvalidValue {
            key: "config".to_string(),
            value: e.to_string(),
        })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.validate_encoder()?;
        self.validate_pattern()?;
        self.layout.validate()?;
        Ok(())
    }

    fn validate_encoder(&self) -> Result<()> {
        if self.encoder.quality > 100 {
            return Err(ConfigError::InvalidValue {
                key: "encoder.quality".to_string(),
                value: self.encoder.quality.to_string(),
            }
            .into());
        }

        if self.encoder.codec.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "encoder.codec".to_string(),
                value: self.encoder.codec.clone(),
            }
            .into());
        }

        if self.encoder.pixel_format.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "encoder.pixel_format".to_string(),
                value: self.encoder.pixel_format.clone(),
            }
            .into());
        }

        Ok(())
    }

    fn validate_pattern(&self) -> Result<()> {
        if self.pattern.prefix.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "pattern.prefix".to_string(),
                value: self.pattern.prefix.clone(),
            }
            .into());
        }

        if !(1..=9).contains(&self.pattern.index_width) {
            return Err(ConfigError::InvalidValue {
                key: "pattern.index_width".to_string(),
                value: self.pattern.index_width.to_string(),
            }
            .into());
        }

        if self.pattern.extension.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "pattern.extension".to_string(),
                value: self.pattern.extension.clone(),
            }
            .into());
        }

        Ok(())
    }
}

/// Side-by-side layout configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Height both halves are scaled to before stacking; width is derived
    /// from each input's aspect ratio
    pub target_height: u32,

    /// Name of the subdirectory under the base directory holding the
    /// secondary frame sequence
    pub secondary_subdir: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            target_height: 720,
            secondary_subdir: "output".to_string(),
        }
    }
}

impl LayoutConfig {
    fn validate(&self) -> Result<()> {
        // yuv420p needs even dimensions on both axes
        if self.target_height == 0 || self.target_height % 2 != 0 {
            return Err(ConfigError::InvalidValue {
                key: "layout.target_height".to_string(),
                value: self.target_height.to_string(),
            }
            .into());
        }

        if self.secondary_subdir.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "layout.secondary_subdir".to_string(),
                value: self.secondary_subdir.clone(),
            }
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_roundtrip() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("test_config.toml");

        let original_config = Config::default();

        // Save and load
        original_config.save_to_file(&file_path).unwrap();
        let loaded_config = Config::from_file(&file_path).unwrap();

        assert_eq!(original_config.encoder, loaded_config.encoder);
        assert_eq!(original_config.pattern, loaded_config.pattern);
        assert_eq!(
            original_config.layout.target_height,
            loaded_config.layout.target_height
        );
    }

    #[test]
    fn test_missing_config_file() {
        let dir = tempdir().unwrap();
        let result = Config::from_file(dir.path().join("nope.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_target_height() {
        let mut config = Config::default();
        config.layout.target_height = 0;
        assert!(config.validate().is_err());

        config.layout.target_height = 721; // odd
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_pattern_width() {
        let mut config = Config::default();
        config.pattern.index_width = 0;
        assert!(config.validate().is_err());

        config.pattern.index_width = 12;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_secondary_subdir() {
        let mut config = Config::default();
        config.layout.secondary_subdir = String::new();
        assert!(config.validate().is_err());
    }
}
