// Pipeline orchestration
// One synchronous load -> extract -> plan -> produce -> write run per audio
// file, with sequential batch driving on top

use std::path::{Path, PathBuf};

use crate::audio::{self, SignalTransform};
use crate::config::GeneratorConfig;
use crate::dataset::{write_ndat, ElementFormat, ExampleBuilder, WindowPlan};
use crate::error::Result;
use crate::markers::{generate_negative_markers, MarkerSource, MidiMap};

/// Name of the per-audio-folder midi map override file
const MAP_FILE_NAME: &str = "map.json";

/// Convert one audio file plus the marker MIDI file into an NDAT corpus
///
/// The output lands next to the audio file (or under `out_dir` when given)
/// as `<audio stem>.ndat`. Returns the output path.
pub fn create_training_data(
    audio_path: &Path,
    marker_path: &Path,
    config: &GeneratorConfig,
    out_dir: Option<&Path>,
) -> Result<PathBuf> {
    let audio = audio::load(audio_path)?;

    let audio_dir = audio_path.parent().unwrap_or_else(|| Path::new("."));
    let map = MidiMap::load_or_default(&audio_dir.join(MAP_FILE_NAME))?;
    let source = MarkerSource::from_file(marker_path, map)?;

    let num_features = config.example_length_samples(audio.sample_rate);
    let num_labels = config.num_labels.unwrap_or(num_features);
    let ratio = num_labels as f64 / num_features as f64;

    // Marker positions live in label-buffer coordinates, so extract at the
    // effective label sample rate and scale the negative buffer with it
    let label_rate = audio.sample_rate as f64 * ratio;
    let mut markers = source.sample_positions(label_rate);
    let scaled_buffer = (config.min_negative_buffer as f64 * ratio).round() as usize;
    let negatives = generate_negative_markers(&markers, scaled_buffer, &mut rand::thread_rng());
    markers.extend(negatives);

    let available_space = audio.samples.len() + config.marker_offset;
    let mut plan = WindowPlan::compute(
        available_space,
        num_features,
        num_labels,
        config.desired_num_examples,
    );
    plan.label_offset = config.marker_offset as i32;
    plan.late_marker_window = config.late_marker_window;

    let mut builder =
        ExampleBuilder::new(audio.samples, &markers, plan, config.marker_offset);
    if config.invert_polarity {
        builder = builder.transform(SignalTransform::InvertPolarity);
    }

    let out_path = output_path(audio_path, out_dir);
    write_ndat(&out_path, &mut builder, ElementFormat::F32, ElementFormat::F32)?;
    Ok(out_path)
}

/// Process many audio files against one marker file, in order
///
/// A failing file is logged and skipped; the rest of the batch continues.
/// Returns the number of files converted successfully.
pub fn run_batch(
    audio_paths: &[PathBuf],
    marker_path: &Path,
    config: &GeneratorConfig,
    out_dir: Option<&Path>,
) -> usize {
    let mut succeeded = 0;

    for audio_path in audio_paths {
        match create_training_data(audio_path, marker_path, config, out_dir) {
            Ok(out_path) => {
                log::info!("{} -> {}", audio_path.display(), out_path.display());
                succeeded += 1;
            }
            Err(err) => {
                log::error!("Skipping {}: {}", audio_path.display(), err);
            }
        }
    }

    succeeded
}

fn output_path(audio_path: &Path, out_dir: Option<&Path>) -> PathBuf {
    let dir = out_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(|| audio_path.parent().unwrap_or_else(|| Path::new(".")).to_path_buf());
    let stem = audio_path.file_stem().unwrap_or_default();
    dir.join(stem).with_extension("ndat")
}
