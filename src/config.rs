// Generator configuration
// Run settings with defaults matching the stock training setup

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Configuration for one corpus-generation run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Length of each training example in milliseconds
    ///
    /// The window length in samples is derived from this and the WAV's own
    /// sample rate.
    pub example_length_ms: u32,

    /// How close (in samples) a generated negative example may get to a
    /// positive marker
    pub min_negative_buffer: usize,

    /// Requested example count; the planner reports the achievable count
    pub desired_num_examples: usize,

    /// Labels per window; defaults to the feature count when absent
    pub num_labels: Option<usize>,

    /// Samples to shift the audio relative to the markers
    pub marker_offset: usize,

    /// Trailing label samples zeroed in every window
    pub late_marker_window: usize,

    /// Add a polarity-inversion pass, doubling the corpus
    pub invert_polarity: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            example_length_ms: 125,
            min_negative_buffer: 50,
            desired_num_examples: 5000,
            num_labels: None,
            marker_offset: 0,
            late_marker_window: 0,
            invert_polarity: false,
        }
    }
}

impl GeneratorConfig {
    /// Load settings from a JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Example window length in samples at a given sample rate
    pub fn example_length_samples(&self, sample_rate: u32) -> usize {
        (sample_rate as f64 * self.example_length_ms as f64 / 1000.0).round() as usize
    }
}
