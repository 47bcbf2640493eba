// Audio module
// Handles WAV file ingestion and per-pass signal transforms

pub mod transforms;
pub mod wav;

pub use transforms::SignalTransform;
pub use wav::{load, AudioData};
