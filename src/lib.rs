// ndatgen - MIDI-marker + WAV to NDAT training corpus generator
// Module declarations

pub mod audio;
pub mod config;
pub mod dataset;
pub mod error;
pub mod markers;
pub mod pipeline;

pub use config::GeneratorConfig;
pub use dataset::{read_ndat, write_ndat, ElementFormat, ExampleBuilder, NdatHeader, WindowPlan};
pub use error::{NdatError, Result};
pub use markers::{MarkerSource, MarkerTimeline, MidiMap, NUM_ARTICULATIONS};
