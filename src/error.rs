use std::fmt;

use thiserror::Error;

/// Identifies which pipeline stage an error occurred in.
///
/// The pipeline is strictly sequential; a run is always in exactly one of
/// these stages when it fails, and the stage travels inside the error value
/// so callers can match on it instead of parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ResolvingPrimary,
    EncodingPrimary,
    ResolvingSecondary,
    EncodingSecondary,
    Compositing,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::ResolvingPrimary => "resolving primary frame sequence",
            Stage::EncodingPrimary => "encoding primary frame sequence",
            Stage::ResolvingSecondary => "resolving secondary frame sequence",
            Stage::EncodingSecondary => "encoding secondary frame sequence",
            Stage::Compositing => "compositing side-by-side output",
        };
        write!(f, "{}", name)
    }
}

/// Main error type for the sbs-compositor library
#[derive(Error, Debug)]
pub enum CompositorError {
    #[error("failed while {stage}: {source}")]
    Sequence {
        stage: Stage,
        source: SequenceError,
    },

    #[error("failed while {stage}: {source}")]
    Encode { stage: Stage, source: EncoderError },

    #[error("failed while compositing side-by-side output: {source}")]
    Composite { source: EncoderError },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Frame-sequence resolution errors
#[derive(Error, Debug)]
pub enum SequenceError {
    #[error("frame directory not found: {path}")]
    DirectoryNotFound { path: String },

    #[error("no frames matching '{pattern}' found in {path}")]
    NoFramesFound { path: String, pattern: String },

    #[error("failed to read frame directory {path}: {reason}")]
    ScanFailed { path: String, reason: String },
}

/// External encoder invocation errors
#[derive(Error, Debug)]
pub enum EncoderError {
    #[error("encoder binary '{name}' not found on PATH")]
    NotFound { name: String },

    #[error("encoder command failed: {reason}")]
    CommandFailed { reason: String },
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration file: {path}")]
    ParseFailed { path: String },

    #[error("Invalid configuration value: {key} = {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },
}

/// Convenience type alias for Results using CompositorError
pub type Result<T> = std::result::Result<T, CompositorError>;

impl CompositorError {
    /// The pipeline stage this error occurred in, if it came from one.
    ///
    /// Configuration and IO errors happen before the pipeline starts and
    /// carry no stage.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::Sequence { stage, .. } | Self::Encode { stage, .. } => Some(*stage),
            Self::Composite { .. } => Some(Stage::Compositing),
            Self::Config(_) | Self::Io(_) => None,
        }
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Sequence {
                source: SequenceError::DirectoryNotFound { path },
                ..
            } => {
                format!(
                    "Frame directory '{}' does not exist. Check the base directory layout.",
                    path
                )
            }
            Self::Sequence {
                source: SequenceError::NoFramesFound { path, pattern },
                ..
            } => {
                format!(
                    "Directory '{}' contains no frames matching '{}'. Was the render completed?",
                    path, pattern
                )
            }
            Self::Encode {
                source: EncoderError::NotFound { name },
                ..
            } => {
                format!("Encoder '{}' not found. Please install FFmpeg.", name)
            }
            _ => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_is_carried_by_pipeline_errors() {
        let err = CompositorError::Sequence {
            stage: Stage::ResolvingSecondary,
            source: SequenceError::DirectoryNotFound {
                path: "/renders/output".to_string(),
            },
        };
        assert_eq!(err.stage(), Some(Stage::ResolvingSecondary));

        let err = CompositorError::Composite {
            source: EncoderError::CommandFailed {
                reason: "exit status 1".to_string(),
            },
        };
        assert_eq!(err.stage(), Some(Stage::Compositing));
    }

    #[test]
    fn test_config_errors_have_no_stage() {
        let err = CompositorError::Config(ConfigError::InvalidValue {
            key: "layout.target_height".to_string(),
            value: "0".to_string(),
        });
        assert_eq!(err.stage(), None);
    }

    #[test]
    fn test_display_names_the_stage_and_path() {
        let err = CompositorError::Sequence {
            stage: Stage::ResolvingPrimary,
            source: SequenceError::NoFramesFound {
                path: "/renders".to_string(),
                pattern: "frame_%04d.png".to_string(),
            },
        };
        let message = err.to_string();
        assert!(message.contains("resolving primary frame sequence"));
        assert!(message.contains("/renders"));
    }
}
