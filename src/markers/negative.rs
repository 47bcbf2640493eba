// Negative marker generation
// Synthesizes "no event" markers in the gaps between positive markers

use rand::Rng;

use crate::markers::timeline::{Marker, MarkerTimeline};

/// Generate one all-zero marker per gap between adjacent positive markers
///
/// For each adjacent pair `(a, b)` the candidate interval is
/// `(a.pos + min_buffer, b.pos - min_buffer)`; a position is drawn uniformly
/// inside it when it has positive width, otherwise the gap yields nothing.
/// `min_buffer` keeps negatives from landing close enough to a real hit to
/// pick up its transient.
///
/// The RNG is injected so tests can seed it and assert bounds.
pub fn generate_negative_markers<R: Rng>(
    positives: &MarkerTimeline,
    min_buffer: usize,
    rng: &mut R,
) -> MarkerTimeline {
    log::info!("Generating negative markers...");
    let mut negatives = Vec::new();

    for pair in positives.markers().windows(2) {
        let (first, second) = (&pair[0], &pair[1]);
        let width = second.pos as i64 - first.pos as i64 - 2 * min_buffer as i64;
        if width <= 0 {
            continue;
        }

        let offset = (rng.gen::<f64>() * width as f64).floor() as usize;
        negatives.push(Marker::silent(first.pos + min_buffer + offset));
    }

    log::info!("{} negative markers generated", negatives.len());
    MarkerTimeline::new(negatives)
}
