//! # SBS-Compositor
//!
//! Compose two independently rendered frame sequences into a single
//! side-by-side comparison video.
//!
//! The pipeline locates the two sequences on disk, infers their start
//! indices from the filenames, drives an external ffmpeg binary to encode
//! each into an intermediate clip, then drives it once more to scale both
//! clips to a common height and stack them horizontally. Intermediates are
//! cleaned up after a successful run and deliberately preserved on failure.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use sbs_compositor::{
//!     config::Config,
//!     encoder::FfmpegEncoder,
//!     pipeline::PipelineEngine,
//! };
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let engine = PipelineEngine::new(Config::default(), Arc::new(FfmpegEncoder::new()));
//! let report = engine.run("renders/", 30.0, "combined_video.mp4").await?;
//! println!("wrote {:?}", report.path);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`sequence`] - Frame sequence discovery and start-index resolution
//! - [`encoder`] - The external-encoder boundary and its ffmpeg backend
//! - [`pipeline`] - The five-stage composition pipeline
//! - [`config`] - Configuration management
//!
//! ## Substituting the encoder
//!
//! The engine only talks to the encoder through the
//! [`Encoder`](encoder::Encoder) trait, one method per invocation shape,
//! so tests can drive the whole pipeline with a fake:
//!
//! ```rust,no_run
//! use sbs_compositor::encoder::{CompositeRequest, EncodeRequest, Encoder};
//! use sbs_compositor::error::EncoderError;
//!
//! struct NullEncoder;
//!
//! impl Encoder for NullEncoder {
//!     fn encode_sequence(&self, _request: &EncodeRequest) -> Result<(), EncoderError> {
//!         Ok(())
//!     }
//!
//!     fn composite_side_by_side(&self, _request: &CompositeRequest) -> Result<(), EncoderError> {
//!         Ok(())
//!     }
//! }
//! ```

pub mod config;
pub mod encoder;
pub mod error;
pub mod pipeline;
pub mod sequence;

// Re-export commonly used types for convenience
pub use crate::{
    config::Config,
    encoder::{Encoder, FfmpegEncoder},
    error::{CompositorError, Result, Stage},
    pipeline::{CompositeVideo, PipelineEngine},
    sequence::{FramePattern, FrameSequence},
};
