use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::task;
use tracing::{debug, info, warn};

use crate::{
    config::Config,
    encoder::{CompositeRequest, EncodeRequest, Encoder},
    error::{CompositorError, ConfigError, EncoderError, Result, Stage},
    sequence::FrameSequence,
};

/// Intermediate clip names, owned by the engine for the duration of one
/// run. Both live in the base directory next to the final output.
const PRIMARY_INTERMEDIATE: &str = "temp_primary.mp4";
const SECONDARY_INTERMEDIATE: &str = "temp_secondary.mp4";

/// Report of a successful pipeline run
#[derive(Debug, Clone)]
pub struct CompositeVideo {
    /// Path of the final side-by-side video
    pub path: PathBuf,

    /// Size of the final file in bytes
    pub file_size: u64,

    /// Approximate duration in seconds; the shorter sequence governs
    pub duration: f64,

    /// Frames resolved in the primary sequence
    pub primary_frames: usize,

    /// Frames resolved in the secondary sequence
    pub secondary_frames: usize,
}

/// Pipeline engine that orchestrates the side-by-side composition
///
/// The pipeline is a strict sequence of five stages:
/// 1. Resolve the primary frame sequence in the base directory
/// 2. Encode it into the primary intermediate clip
/// 3. Resolve the secondary frame sequence in the configured subdirectory
/// 4. Encode it into the secondary intermediate clip
/// 5. Scale both clips to a common height and stack them horizontally
///
/// The first failing stage aborts the run with a stage-tagged error.
/// Intermediate clips are removed only after a successful composite;
/// anything produced before a failure stays on disk for diagnosis.
pub struct PipelineEngine {
    config: Config,
    encoder: Arc<dyn Encoder>,
}

impl PipelineEngine {
    /// Create a new engine with the given configuration and encoder
    pub fn new(config: Config, encoder: Arc<dyn Encoder>) -> Self {
        Self { config, encoder }
    }

    /// Run the full composition pipeline
    ///
    /// # Arguments
    ///
    /// * `base_dir` - Directory holding the primary frame sequence; the
    ///   secondary sequence lives in the configured subdirectory below it
    /// * `frame_rate` - Frames per second applied to both intermediate
    ///   encodes
    /// * `output_name` - Filename of the final video, written inside the
    ///   base directory
    pub async fn run<P: AsRef<Path>>(
        &self,
        base_dir: P,
        frame_rate: f64,
        output_name: &str,
    ) -> Result<CompositeVideo> {
        let base_dir = base_dir.as_ref();

        info!("🎬 Starting side-by-side composition");
        info!("   Base directory: {:?}", base_dir);
        info!("   Frame rate: {} fps", frame_rate);
        info!("   Output: {}", output_name);

        self.config.validate()?;
        if frame_rate <= 0.0 || !frame_rate.is_finite() {
            return Err(ConfigError::InvalidValue {
                key: "frame_rate".to_string(),
                value: frame_rate.to_string(),
            }
            .into());
        }

        // ==========================================
        // STAGE 1: RESOLVE PRIMARY SEQUENCE
        // ==========================================

        info!("📂 Stage 1/5: {}", Stage::ResolvingPrimary);
        let primary = self.resolve_stage(Stage::ResolvingPrimary, base_dir)?;

        // ==========================================
        // STAGE 2: ENCODE PRIMARY SEQUENCE
        // ==========================================

        info!("🎞️  Stage 2/5: {}", Stage::EncodingPrimary);
        let primary_clip = base_dir.join(PRIMARY_INTERMEDIATE);
        self.encode_stage(Stage::EncodingPrimary, &primary, frame_rate, &primary_clip)
            .await?;

        // ==========================================
        // STAGE 3: RESOLVE SECONDARY SEQUENCE
        // ==========================================

        info!("📂 Stage 3/5: {}", Stage::ResolvingSecondary);
        let secondary_dir = base_dir.join(&self.config.layout.secondary_subdir);
        let secondary = self.resolve_stage(Stage::ResolvingSecondary, &secondary_dir)?;

        if primary.frame_count() != secondary.frame_count() {
            warn!(
                "Frame count mismatch: primary has {}, secondary has {}; the composite follows the shorter stream",
                primary.frame_count(),
                secondary.frame_count()
            );
        }

        // ==========================================
        // STAGE 4: ENCODE SECONDARY SEQUENCE
        // ==========================================

        info!("🎞️  Stage 4/5: {}", Stage::EncodingSecondary);
        let secondary_clip = base_dir.join(SECONDARY_INTERMEDIATE);
        self.encode_stage(
            Stage::EncodingSecondary,
            &secondary,
            frame_rate,
            &secondary_clip,
        )
        .await?;

        // ==========================================
        // STAGE 5: COMPOSITE SIDE BY SIDE
        // ==========================================

        info!("🧩 Stage 5/5: {}", Stage::Compositing);
        let output_path = base_dir.join(output_name);
        self.composite_stage(&primary_clip, &secondary_clip, &output_path)
            .await?;

        // Intermediates are removable only after a successful composite;
        // every earlier exit leaves them on disk for diagnosis.
        self.cleanup_intermediates(&[&primary_clip, &secondary_clip]);

        let file_size = fs::metadata(&output_path)?.len();
        let shortest = primary.frame_count().min(secondary.frame_count());
        let report = CompositeVideo {
            path: output_path,
            file_size,
            duration: shortest as f64 / frame_rate,
            primary_frames: primary.frame_count(),
            secondary_frames: secondary.frame_count(),
        };

        info!("🎉 Composition complete:");
        info!("   File saved: {:?}", report.path);
        info!("   Duration: {:.1}s", report.duration);
        info!(
            "   Frames: {} primary, {} secondary",
            report.primary_frames, report.secondary_frames
        );
        info!(
            "   File size: {:.1} MB",
            report.file_size as f64 / 1024.0 / 1024.0
        );

        Ok(report)
    }

    fn resolve_stage(&self, stage: Stage, directory: &Path) -> Result<FrameSequence> {
        FrameSequence::resolve(directory, &self.config.pattern)
            .map_err(|source| CompositorError::Sequence { stage, source })
    }

    async fn encode_stage(
        &self,
        stage: Stage,
        sequence: &FrameSequence,
        frame_rate: f64,
        output: &Path,
    ) -> Result<()> {
        debug!(
            "Encoding {:?} (start index {}) -> {:?}",
            sequence.directory(),
            sequence.start_index(),
            output
        );

        let request = EncodeRequest {
            input_template: sequence.input_template(),
            start_index: sequence.start_index(),
            frame_rate,
            output: output.to_path_buf(),
            params: self.config.encoder.clone(),
        };

        let encoder = Arc::clone(&self.encoder);
        task::spawn_blocking(move || encoder.encode_sequence(&request))
            .await
            .map_err(|e| CompositorError::Encode {
                stage,
                source: EncoderError::CommandFailed {
                    reason: format!("encode task failed to complete: {}", e),
                },
            })?
            .map_err(|source| CompositorError::Encode { stage, source })
    }

    async fn composite_stage(&self, left: &Path, right: &Path, output: &Path) -> Result<()> {
        debug!("Compositing {:?} + {:?} -> {:?}", left, right, output);

        let request = CompositeRequest {
            left: left.to_path_buf(),
            right: right.to_path_buf(),
            target_height: self.config.layout.target_height,
            output: output.to_path_buf(),
            params: self.config.encoder.clone(),
        };

        let encoder = Arc::clone(&self.encoder);
        task::spawn_blocking(move || encoder.composite_side_by_side(&request))
            .await
            .map_err(|e| CompositorError::Composite {
                source: EncoderError::CommandFailed {
                    reason: format!("composite task failed to complete: {}", e),
                },
            })?
            .map_err(|source| CompositorError::Composite { source })
    }

    fn cleanup_intermediates(&self, clips: &[&Path]) {
        for clip in clips {
            debug!("Removing intermediate clip {:?}", clip);
            if let Err(e) = fs::remove_file(clip) {
                warn!("Failed to remove intermediate clip {:?}: {}", clip, e);
            }
        }
    }
}
