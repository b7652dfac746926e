use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::SequenceError;

/// Filename pattern of a rendered frame sequence
///
/// Frames are named `<prefix>_<zero-padded index>.<extension>`, e.g.
/// `frame_0042.png` for the default pattern. The index is fixed-width, so
/// lexicographic order of matching filenames equals numeric order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FramePattern {
    /// Filename prefix before the underscore
    pub prefix: String,

    /// Number of digits in the zero-padded frame index
    pub index_width: usize,

    /// File extension without the leading dot
    pub extension: String,
}

impl Default for FramePattern {
    fn default() -> Self {
        Self {
            prefix: "frame".to_string(),
            index_width: 4,
            extension: "png".to_string(),
        }
    }
}

impl FramePattern {
    /// Parse the frame index out of a filename, if it matches this pattern
    ///
    /// A filename matches only on an exact prefix, exactly `index_width`
    /// ASCII digits, and an exact extension. `frame_001.png` does not match
    /// a 4-wide pattern, and neither does `frame_0001.png.bak`.
    pub fn match_index(&self, filename: &str) -> Option<u32> {
        let rest = filename.strip_prefix(self.prefix.as_str())?;
        let rest = rest.strip_prefix('_')?;
        let digits = rest.strip_suffix(self.extension.as_str())?;
        let digits = digits.strip_suffix('.')?;

        if digits.len() != self.index_width || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }

        digits.parse().ok()
    }

    /// Render the numbered-input template the encoder understands,
    /// e.g. `frame_%04d.png`
    pub fn encoder_template(&self) -> String {
        format!(
            "{}_%0{}d.{}",
            self.prefix, self.index_width, self.extension
        )
    }
}

/// A resolved frame sequence on disk
///
/// Invariant: at least one file matching the pattern existed in the
/// directory at resolution time. Immutable once resolved; a fresh scan is
/// performed on every pipeline run.
#[derive(Debug, Clone)]
pub struct FrameSequence {
    directory: PathBuf,
    pattern: FramePattern,
    start_index: u32,
    frame_count: usize,
}

impl FrameSequence {
    /// Scan a directory and resolve the frame sequence inside it
    ///
    /// Collects every filename matching the pattern, sorts lexicographically
    /// (equivalent to numeric order for a fixed-width index), and takes the
    /// smallest index as the sequence start. Missing directories and empty
    /// scans are hard errors; encoding from an assumed start index would
    /// silently misalign the composite.
    pub fn resolve<P: AsRef<Path>>(
        directory: P,
        pattern: &FramePattern,
    ) -> Result<Self, SequenceError> {
        let directory = directory.as_ref();

        if !directory.is_dir() {
            return Err(SequenceError::DirectoryNotFound {
                path: directory.display().to_string(),
            });
        }

        let entries = std::fs::read_dir(directory).map_err(|e| SequenceError::ScanFailed {
            path: directory.display().to_string(),
            reason: e.to_string(),
        })?;

        let mut matches: Vec<(String, u32)> = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| SequenceError::ScanFailed {
                path: directory.display().to_string(),
                reason: e.to_string(),
            })?;

            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };

            if entry.path().is_file() {
                if let Some(index) = pattern.match_index(name) {
                    matches.push((name.to_string(), index));
                }
            }
        }

        if matches.is_empty() {
            return Err(SequenceError::NoFramesFound {
                path: directory.display().to_string(),
                pattern: pattern.encoder_template(),
            });
        }

        // Fixed-width zero-padded indices make lexicographic order equal
        // numeric order, so the first name carries the start index.
        matches.sort();
        let (first, start_index) = &matches[0];
        let start_index = *start_index;

        debug!("First frame in {:?}: {}", directory, first);
        info!(
            "Resolved sequence in {:?}: {} frames starting at index {}",
            directory,
            matches.len(),
            start_index
        );

        Ok(Self {
            directory: directory.to_path_buf(),
            pattern: pattern.clone(),
            start_index,
            frame_count: matches.len(),
        })
    }

    /// Directory the sequence lives in
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Index of the first frame present
    pub fn start_index(&self) -> u32 {
        self.start_index
    }

    /// Number of frames matching the pattern at resolution time
    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    /// Full numbered-input template for the encoder,
    /// e.g. `/renders/frame_%04d.png`
    pub fn input_template(&self) -> PathBuf {
        self.directory.join(self.pattern.encoder_template())
    }
}
