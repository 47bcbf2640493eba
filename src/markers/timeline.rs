// Marker timeline extraction
// Converts tick-based MIDI event timing plus tempo changes into absolute
// sample positions with one-hot articulation label vectors

use std::collections::BTreeMap;
use std::path::Path;

use midly::{MetaMessage, MidiMessage, Smf, Timing, TrackEventKind};

use crate::error::{NdatError, Result};
use crate::markers::midi_map::{MidiMap, NUM_ARTICULATIONS};

const US_PER_SECOND: f64 = 1_000_000.0;

/// A single timed event: where in the audio, and which articulation(s)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    /// Absolute sample position
    pub pos: usize,

    /// Multi-hot label vector, exactly `NUM_ARTICULATIONS` entries of 0/1
    pub labels: Vec<u8>,
}

impl Marker {
    /// A marker carrying no articulation (a negative example anchor)
    pub fn silent(pos: usize) -> Self {
        Marker {
            pos,
            labels: vec![0; NUM_ARTICULATIONS],
        }
    }

    /// True when at least one articulation bit is set
    pub fn is_positive(&self) -> bool {
        self.labels.iter().any(|&bit| bit != 0)
    }
}

/// Ordered sequence of markers
#[derive(Debug, Clone, Default)]
pub struct MarkerTimeline {
    markers: Vec<Marker>,
}

impl MarkerTimeline {
    pub fn new(markers: Vec<Marker>) -> Self {
        MarkerTimeline { markers }
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Append another timeline (e.g., generated negative markers)
    pub fn extend(&mut self, other: MarkerTimeline) {
        self.markers.extend(other.markers);
    }
}

/// Raw timing-relevant content of one MIDI track event
///
/// Only tempo changes and note-ons are interpreted, but every event's delta
/// still advances the elapsed-time accumulator, so unrelated events are kept
/// as `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawEventKind {
    Tempo { us_per_beat: u32 },
    NoteOn { note: u8 },
    Other,
}

/// One event with its delta time in ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawEvent {
    pub delta_ticks: u32,
    pub kind: RawEventKind,
}

/// Parsed marker source: the retained event list of track 0 plus the midi map
///
/// Extraction is separated from parsing so the same source can be re-walked
/// at a different effective sample rate (the label-rate path).
#[derive(Debug, Clone)]
pub struct MarkerSource {
    ticks_per_beat: u16,
    events: Vec<RawEvent>,
    map: MidiMap,
}

impl MarkerSource {
    /// Parse a marker MIDI file
    ///
    /// Fails with `FileNotFound` when the file is missing and
    /// `UnsupportedTiming` for SMPTE-timecode files, whose deltas cannot be
    /// converted with ticks-per-beat math.
    pub fn from_file(marker_path: &Path, map: MidiMap) -> Result<Self> {
        if !marker_path.exists() {
            return Err(NdatError::FileNotFound(marker_path.to_path_buf()));
        }

        log::info!("Loading markers from {}...", marker_path.display());

        let raw = std::fs::read(marker_path)?;
        let smf = Smf::parse(&raw)?;

        let ticks_per_beat = match smf.header.timing {
            Timing::Metrical(tpb) => tpb.as_int(),
            Timing::Timecode(..) => return Err(NdatError::UnsupportedTiming),
        };

        let events = smf
            .tracks
            .first()
            .map(|track| {
                track
                    .iter()
                    .map(|event| RawEvent {
                        delta_ticks: event.delta.as_int(),
                        kind: match event.kind {
                            TrackEventKind::Meta(MetaMessage::Tempo(us_per_beat)) => {
                                RawEventKind::Tempo {
                                    us_per_beat: us_per_beat.as_int(),
                                }
                            }
                            TrackEventKind::Midi {
                                message: MidiMessage::NoteOn { key, .. },
                                ..
                            } => RawEventKind::NoteOn { note: key.as_int() },
                            _ => RawEventKind::Other,
                        },
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(MarkerSource {
            ticks_per_beat,
            events,
            map,
        })
    }

    /// Build a source directly from events (primarily for tests)
    pub fn new(ticks_per_beat: u16, events: Vec<RawEvent>, map: MidiMap) -> Self {
        MarkerSource {
            ticks_per_beat,
            events,
            map,
        }
    }

    /// Walk the event list and emit markers at absolute sample positions
    ///
    /// `samples_per_beat` stays 0 until the first tempo event, so any note-on
    /// before a tempo change lands at position 0. Notes that coincide at the
    /// same derived position OR-merge into a single marker; the result is
    /// strictly increasing by position.
    pub fn sample_positions(&self, sample_rate: f64) -> MarkerTimeline {
        let mut samples_per_beat = 0.0f64;
        let mut elapsed_samples = 0.0f64;
        let mut by_pos: BTreeMap<usize, Vec<u8>> = BTreeMap::new();

        for event in &self.events {
            let beats_since_last = event.delta_ticks as f64 / self.ticks_per_beat as f64;
            elapsed_samples += beats_since_last * samples_per_beat;

            match event.kind {
                RawEventKind::Tempo { us_per_beat } => {
                    samples_per_beat = (us_per_beat as f64 / US_PER_SECOND) * sample_rate;
                }
                RawEventKind::NoteOn { note } => {
                    if let Some(class) = self.map.class_for(note) {
                        let pos = elapsed_samples.round() as usize;
                        by_pos
                            .entry(pos)
                            .or_insert_with(|| vec![0; NUM_ARTICULATIONS])[class] = 1;
                    }
                }
                RawEventKind::Other => {}
            }
        }

        let markers: Vec<Marker> = by_pos
            .into_iter()
            .map(|(pos, labels)| Marker { pos, labels })
            .collect();

        // Fewer than the raw note-on count whenever notes coincide
        log::info!("{} markers loaded.", markers.len());
        MarkerTimeline::new(markers)
    }
}
