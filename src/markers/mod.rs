// Marker module
// Midi-map lookup, marker timeline extraction, and negative marker synthesis

pub mod midi_map;
pub mod negative;
pub mod timeline;

pub use midi_map::{Articulation, MidiMap, MIDI_MAP_SIZE, NUM_ARTICULATIONS};
pub use negative::generate_negative_markers;
pub use timeline::{Marker, MarkerSource, MarkerTimeline, RawEvent, RawEventKind};
