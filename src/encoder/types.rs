use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Fixed encoding parameters shared by every invocation in a run
///
/// Both intermediate encodes and the final composite use identical
/// parameters, so the scaled halves of the output behave the same way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncoderParams {
    /// Video codec to use for output
    pub codec: String,

    /// Pixel format for player compatibility
    pub pixel_format: String,

    /// Quality setting (0-100, higher is better)
    pub quality: u8,
}

impl Default for EncoderParams {
    fn default() -> Self {
        Self {
            codec: "libx264".to_string(),
            pixel_format: "yuv420p".to_string(),
            quality: 60,
        }
    }
}

impl EncoderParams {
    /// Map the 0-100 quality setting onto the encoder's constant-rate
    /// factor scale, where 0 is lossless and 51 is worst.
    pub fn crf(&self) -> u8 {
        (51 - ((self.quality as f32 / 100.0) * 51.0) as u8).clamp(0, 51)
    }
}

/// One sequence-to-video encode invocation
///
/// Reads a numbered image sequence starting at `start_index` and writes a
/// single video file, overwriting any prior file at `output`.
#[derive(Debug, Clone)]
pub struct EncodeRequest {
    /// Numbered input template, e.g. `/renders/frame_%04d.png`
    pub input_template: PathBuf,

    /// Index of the first frame to read
    pub start_index: u32,

    /// Frames per second of the produced video
    pub frame_rate: f64,

    /// Path of the video file to write
    pub output: PathBuf,

    pub params: EncoderParams,
}

/// One scale-and-stack composite invocation
///
/// Scales both inputs to `target_height` (width derived, aspect preserved)
/// and stacks them horizontally into `output`, overwriting any prior file.
#[derive(Debug, Clone)]
pub struct CompositeRequest {
    /// Left-hand input video
    pub left: PathBuf,

    /// Right-hand input video
    pub right: PathBuf,

    /// Common height both inputs are scaled to before stacking
    pub target_height: u32,

    /// Path of the video file to write
    pub output: PathBuf,

    pub params: EncoderParams,
}
