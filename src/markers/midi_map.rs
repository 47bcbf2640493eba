// Midi map
// Maps the 128 possible MIDI note numbers onto drum articulation classes

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{NdatError, Result};

/// Number of entries a midi map must have (one per MIDI note number)
pub const MIDI_MAP_SIZE: usize = 128;

/// Drum articulation classes
///
/// Each class is one position in the fixed-length label vector a marker
/// carries. Simultaneous hits OR together into a multi-hot vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Articulation {
    Kick,
    Snare,
    SnareSidestick,
    SnareRimshot,
    Tom2,
    Tom3,
    Tom4,
    Tom5,
    Tom6,
    HihatClosed,
    HihatOpen,
    HihatPedal,
    RideBow,
    RideEdge,
    RideBell,
    Crash1,
    China,
    Cowbell,
}

/// Length of every marker label vector
pub const NUM_ARTICULATIONS: usize = 18;

impl Articulation {
    /// Position of this class in the one-hot label vector
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Lookup table from MIDI note number to articulation class
///
/// Exactly 128 entries; `None` means the note does not correspond to any
/// articulation ("no hit") and is ignored during extraction. The shape is
/// validated once at load time, never per lookup.
#[derive(Debug, Clone)]
pub struct MidiMap {
    entries: [Option<u8>; MIDI_MAP_SIZE],
}

impl MidiMap {
    /// Articulation class index for a note number, or `None` for no hit
    pub fn class_for(&self, note: u8) -> Option<usize> {
        self.entries[note as usize].map(|c| c as usize)
    }

    /// Build a map from a raw 128-entry table
    ///
    /// Fails with `InvalidMidiMap` when the table is not exactly 128 entries
    /// or names a class index outside the articulation range.
    pub fn from_entries(entries: Vec<Option<u8>>) -> Result<Self> {
        if entries.len() != MIDI_MAP_SIZE {
            return Err(NdatError::InvalidMidiMap(format!(
                "expected length {}, got length {}",
                MIDI_MAP_SIZE,
                entries.len()
            )));
        }

        for (note, entry) in entries.iter().enumerate() {
            if let Some(class) = entry {
                if *class as usize >= NUM_ARTICULATIONS {
                    return Err(NdatError::InvalidMidiMap(format!(
                        "note {} maps to class {}, but only {} classes exist",
                        note, class, NUM_ARTICULATIONS
                    )));
                }
            }
        }

        let mut table = [None; MIDI_MAP_SIZE];
        table.copy_from_slice(&entries);
        Ok(MidiMap { entries: table })
    }

    /// Load a map override from a JSON file: an array of 128 entries, each a
    /// class index or `null` for no hit
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(NdatError::FileNotFound(path.to_path_buf()));
        }

        let raw = std::fs::read_to_string(path)?;
        let entries: Vec<Option<u8>> = serde_json::from_str(&raw)?;
        Self::from_entries(entries)
    }

    /// Load the per-audio-folder map override, falling back to the default
    /// map with a warning when the override file is absent
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::warn!(
                "No midi map found at {}. Using default midi map",
                path.display()
            );
            return Ok(MidiMap::default());
        }

        log::info!("Using midi map at {}", path.display());
        Self::from_file(path)
    }
}

impl Default for MidiMap {
    /// General MIDI percussion layout
    fn default() -> Self {
        let mut entries: [Option<u8>; MIDI_MAP_SIZE] = [None; MIDI_MAP_SIZE];
        let assign = |entries: &mut [Option<u8>; MIDI_MAP_SIZE], note: usize, art: Articulation| {
            entries[note] = Some(art.index() as u8);
        };

        assign(&mut entries, 35, Articulation::Kick); // acoustic bass drum
        assign(&mut entries, 36, Articulation::Kick);
        assign(&mut entries, 37, Articulation::SnareSidestick);
        assign(&mut entries, 38, Articulation::Snare);
        assign(&mut entries, 40, Articulation::SnareRimshot);
        assign(&mut entries, 41, Articulation::Tom6); // low floor tom
        assign(&mut entries, 42, Articulation::HihatClosed);
        assign(&mut entries, 43, Articulation::Tom5); // high floor tom
        assign(&mut entries, 44, Articulation::HihatPedal);
        assign(&mut entries, 45, Articulation::Tom4);
        assign(&mut entries, 46, Articulation::HihatOpen);
        assign(&mut entries, 47, Articulation::Tom3);
        assign(&mut entries, 48, Articulation::Tom2); // hi-mid tom
        assign(&mut entries, 49, Articulation::Crash1);
        assign(&mut entries, 50, Articulation::Tom2); // high tom
        assign(&mut entries, 51, Articulation::RideBow);
        assign(&mut entries, 52, Articulation::China);
        assign(&mut entries, 53, Articulation::RideBell);
        assign(&mut entries, 55, Articulation::Crash1); // splash
        assign(&mut entries, 56, Articulation::Cowbell);
        assign(&mut entries, 57, Articulation::Crash1);
        assign(&mut entries, 59, Articulation::RideEdge);

        MidiMap { entries }
    }
}
