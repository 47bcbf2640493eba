// WAV ingestion
// Decodes a WAV file and exposes channel 0 as normalized f32 samples

use std::path::Path;

use hound::{SampleFormat, WavReader};

use crate::error::{NdatError, Result};

/// Decoded audio ready for windowing
#[derive(Debug, Clone)]
pub struct AudioData {
    /// Channel-0 samples normalized to f32 in range [-1.0, 1.0]
    pub samples: Vec<f32>,

    /// Sample rate in Hz (e.g., 44100, 48000)
    pub sample_rate: u32,

    /// Number of channels in the source file
    pub channels: u16,

    /// Bit depth of original audio (8, 16, 24, 32)
    pub bit_depth: u16,
}

impl AudioData {
    /// Duration of the retained channel in seconds
    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// Load a WAV file and keep only channel 0
///
/// Multi-channel files are not mixed down; the pipeline consumes a single
/// channel and the remaining channels are discarded.
pub fn load(path: &Path) -> Result<AudioData> {
    if !path.exists() {
        return Err(NdatError::FileNotFound(path.to_path_buf()));
    }

    log::info!("Reading wav from {}...", path.display());

    let mut reader = WavReader::open(path)?;
    let spec = reader.spec();
    let channels = spec.channels.max(1);

    // Read and normalize samples to f32 [-1.0, 1.0]
    let interleaved: Vec<f32> = match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Int, 8) => {
            // 8-bit PCM: unsigned, range [0, 255] -> [-1.0, 1.0]
            reader
                .samples::<i32>()
                .collect::<std::result::Result<Vec<_>, _>>()?
                .into_iter()
                .map(|s| (s as f32 - 128.0) / 128.0)
                .collect()
        }
        (SampleFormat::Int, 16) => {
            reader
                .samples::<i16>()
                .collect::<std::result::Result<Vec<_>, _>>()?
                .into_iter()
                .map(|s| s as f32 / 32768.0)
                .collect()
        }
        (SampleFormat::Int, 24) => {
            reader
                .samples::<i32>()
                .collect::<std::result::Result<Vec<_>, _>>()?
                .into_iter()
                .map(|s| s as f32 / 8388608.0)
                .collect()
        }
        (SampleFormat::Int, 32) => {
            reader
                .samples::<i32>()
                .collect::<std::result::Result<Vec<_>, _>>()?
                .into_iter()
                .map(|s| s as f32 / 2147483648.0)
                .collect()
        }
        (SampleFormat::Float, 32) => reader
            .samples::<f32>()
            .collect::<std::result::Result<Vec<_>, _>>()?,
        (format, bits) => {
            return Err(NdatError::UnsupportedAudio(format!(
                "{:?} {}-bit audio",
                format, bits
            )));
        }
    };

    let samples: Vec<f32> = interleaved
        .iter()
        .step_by(channels as usize)
        .copied()
        .collect();

    log::info!(
        "Read wave successfully: {} samples at {} Hz ({} channel(s))",
        samples.len(),
        spec.sample_rate,
        channels
    );

    Ok(AudioData {
        samples,
        sample_rate: spec.sample_rate,
        channels,
        bit_depth: spec.bits_per_sample,
    })
}
