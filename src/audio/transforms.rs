// Signal transforms
// Fixed per-pass transforms applied to the whole audio buffer before windowing

use serde::{Deserialize, Serialize};

/// A whole-buffer transform applied once per example-production pass
///
/// Registering extra transforms multiplies the corpus size: every transform
/// gets a full pass over all planned windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalTransform {
    /// Pass samples through unchanged
    Identity,

    /// Multiply every sample by -1
    ///
    /// A polarity-inverted waveform is indistinguishable to the ear but is a
    /// distinct input vector, so it doubles the corpus for free.
    InvertPolarity,
}

impl SignalTransform {
    /// Apply the transform to a buffer, producing a new buffer
    pub fn apply(&self, samples: &[f32]) -> Vec<f32> {
        match self {
            SignalTransform::Identity => samples.to_vec(),
            SignalTransform::InvertPolarity => {
                log::info!("Reversing polarity...");
                samples.iter().map(|s| -s).collect()
            }
        }
    }
}
