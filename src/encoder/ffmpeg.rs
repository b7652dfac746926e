use std::process::{Command, Stdio};

use tracing::debug;

use crate::encoder::types::{CompositeRequest, EncodeRequest};
use crate::encoder::Encoder;
use crate::error::EncoderError;

const FFMPEG_BIN: &str = "ffmpeg";

/// FFmpeg-backed encoder using external commands
///
/// Builds one command line per invocation shape and judges success purely
/// by the process exit status; stderr is captured and surfaced in the
/// error when the encoder fails.
#[derive(Debug, Default)]
pub struct FfmpegEncoder;

impl FfmpegEncoder {
    pub fn new() -> Self {
        Self
    }

    /// Check whether the ffmpeg binary is reachable on PATH
    pub fn is_available() -> bool {
        Command::new(FFMPEG_BIN)
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }

    fn run(&self, args: &[String]) -> Result<(), EncoderError> {
        debug!("Running {} {}", FFMPEG_BIN, args.join(" "));

        let output = Command::new(FFMPEG_BIN)
            .args(args)
            .output()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => EncoderError::NotFound {
                    name: FFMPEG_BIN.to_string(),
                },
                _ => EncoderError::CommandFailed {
                    reason: format!("failed to launch {}: {}", FFMPEG_BIN, e),
                },
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(EncoderError::CommandFailed {
                reason: format!("{} exited with {}: {}", FFMPEG_BIN, output.status, stderr),
            });
        }

        Ok(())
    }
}

impl Encoder for FfmpegEncoder {
    fn encode_sequence(&self, request: &EncodeRequest) -> Result<(), EncoderError> {
        self.run(&sequence_args(request))
    }

    fn composite_side_by_side(&self, request: &CompositeRequest) -> Result<(), EncoderError> {
        self.run(&composite_args(request))
    }
}

/// Command line for one sequence-to-video encode
fn sequence_args(request: &EncodeRequest) -> Vec<String> {
    vec![
        "-framerate".to_string(),
        request.frame_rate.to_string(),
        "-start_number".to_string(),
        request.start_index.to_string(),
        "-i".to_string(),
        request.input_template.display().to_string(),
        "-c:v".to_string(),
        request.params.codec.clone(),
        "-pix_fmt".to_string(),
        request.params.pixel_format.clone(),
        "-crf".to_string(),
        request.params.crf().to_string(),
        "-y".to_string(),
        request.output.display().to_string(),
    ]
}

/// Command line for the scale-and-stack composite
///
/// Each input is scaled to the target height independently before the
/// horizontal stack; `-2` derives the width from the aspect ratio while
/// keeping it even for the pixel format.
fn composite_args(request: &CompositeRequest) -> Vec<String> {
    let filter = format!(
        "[0:v]scale=-2:{h}[left];[1:v]scale=-2:{h}[right];[left][right]hstack=inputs=2[out]",
        h = request.target_height
    );

    vec![
        "-i".to_string(),
        request.left.display().to_string(),
        "-i".to_string(),
        request.right.display().to_string(),
        "-filter_complex".to_string(),
        filter,
        "-map".to_string(),
        "[out]".to_string(),
        "-c:v".to_string(),
        request.params.codec.clone(),
        "-pix_fmt".to_string(),
        request.params.pixel_format.clone(),
        "-crf".to_string(),
        request.params.crf().to_string(),
        "-y".to_string(),
        request.output.display().to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::types::EncoderParams;
    use std::path::PathBuf;

    fn encode_request() -> EncodeRequest {
        EncodeRequest {
            input_template: PathBuf::from("/renders/frame_%04d.png"),
            start_index: 5,
            frame_rate: 24.0,
            output: PathBuf::from("/renders/temp_primary.mp4"),
            params: EncoderParams::default(),
        }
    }

    #[test]
    fn test_sequence_args_shape() {
        let args = sequence_args(&encode_request());

        let framerate = args.iter().position(|a| a == "-framerate").unwrap();
        assert_eq!(args[framerate + 1], "24");

        let start = args.iter().position(|a| a == "-start_number").unwrap();
        assert_eq!(args[start + 1], "5");

        let input = args.iter().position(|a| a == "-i").unwrap();
        assert_eq!(args[input + 1], "/renders/frame_%04d.png");

        // Overwrite policy must precede the output path
        assert_eq!(args[args.len() - 2], "-y");
        assert_eq!(args[args.len() - 1], "/renders/temp_primary.mp4");
    }

    #[test]
    fn test_sequence_args_fixed_codec_parameters() {
        let args = sequence_args(&encode_request());

        let codec = args.iter().position(|a| a == "-c:v").unwrap();
        assert_eq!(args[codec + 1], "libx264");

        let pix_fmt = args.iter().position(|a| a == "-pix_fmt").unwrap();
        assert_eq!(args[pix_fmt + 1], "yuv420p");

        let crf = args.iter().position(|a| a == "-crf").unwrap();
        assert_eq!(args[crf + 1], "21");
    }

    #[test]
    fn test_composite_filter_graph() {
        let request = CompositeRequest {
            left: PathBuf::from("/renders/temp_primary.mp4"),
            right: PathBuf::from("/renders/temp_secondary.mp4"),
            target_height: 720,
            output: PathBuf::from("/renders/combined_video.mp4"),
            params: EncoderParams::default(),
        };

        let args = composite_args(&request);

        let filter = args.iter().position(|a| a == "-filter_complex").unwrap();
        assert_eq!(
            args[filter + 1],
            "[0:v]scale=-2:720[left];[1:v]scale=-2:720[right];[left][right]hstack=inputs=2[out]"
        );

        let map = args.iter().position(|a| a == "-map").unwrap();
        assert_eq!(args[map + 1], "[out]");

        // Both inputs, in order
        assert_eq!(args[0], "-i");
        assert_eq!(args[1], "/renders/temp_primary.mp4");
        assert_eq!(args[2], "-i");
        assert_eq!(args[3], "/renders/temp_secondary.mp4");

        assert_eq!(args[args.len() - 1], "/renders/combined_video.mp4");
    }
}
