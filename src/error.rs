// Error types
// One crate-wide taxonomy; per-file failures are caught at the batch boundary

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while generating or reading training data
#[derive(Debug, Error)]
pub enum NdatError {
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Invalid midi map: {0}")]
    InvalidMidiMap(String),

    #[error("Unrecognized header id: {0}")]
    CorruptHeader(String),

    #[error("Unknown element format tag: {0}")]
    UnknownFormat(u16),

    #[error("Truncated file: header promises {expected} body bytes, found {actual}")]
    TruncatedFile { expected: u64, actual: u64 },

    #[error("Unsupported MIDI timing: expected ticks-per-beat (metrical) timing")]
    UnsupportedTiming,

    #[error("Unsupported audio format: {0}")]
    UnsupportedAudio(String),

    #[error("Failed to read WAV file: {0}")]
    Wav(#[from] hound::Error),

    #[error("Failed to parse MIDI file: {0}")]
    Midi(#[from] midly::Error),

    #[error("Failed to parse midi map file: {0}")]
    MapParse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, NdatError>;
