// ndatgen CLI
// Resolves audio files and drives the batch pipeline

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use ndatgen::config::GeneratorConfig;
use ndatgen::pipeline;

#[derive(Debug, Parser)]
#[command(version, about = "Convert WAV audio plus a marker MIDI file into NDAT training data")]
struct Cli {
    /// Audio file, or a directory whose .wav files are processed in order
    #[arg(short, long)]
    audio: PathBuf,

    /// Marker MIDI file
    #[arg(short, long)]
    markers: PathBuf,

    /// Length (ms) of each training example
    #[arg(short = 'l', long)]
    example_length: Option<u32>,

    /// Minimum distance (samples) between a negative example and any
    /// positive marker
    #[arg(short = 'b', long)]
    example_buffer: Option<usize>,

    /// Desired number of examples per file
    #[arg(short = 'n', long)]
    num_examples: Option<usize>,

    /// Labels per window (defaults to the feature count)
    #[arg(long)]
    num_labels: Option<usize>,

    /// Samples to shift audio relative to the markers
    #[arg(long)]
    marker_offset: Option<usize>,

    /// Trailing label samples zeroed in every window
    #[arg(long)]
    late_marker_window: Option<usize>,

    /// Add a polarity-inversion pass, doubling the corpus
    #[arg(long)]
    invert_polarity: bool,

    /// Directory for the .ndat output (default: next to each audio file)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// JSON config file; command-line flags override its fields
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl Cli {
    fn build_config(&self) -> Result<GeneratorConfig, ndatgen::NdatError> {
        let mut config = match &self.config {
            Some(path) => GeneratorConfig::from_file(path)?,
            None => GeneratorConfig::default(),
        };

        if let Some(length) = self.example_length {
            config.example_length_ms = length;
        }
        if let Some(buffer) = self.example_buffer {
            config.min_negative_buffer = buffer;
        }
        if let Some(count) = self.num_examples {
            config.desired_num_examples = count;
        }
        if let Some(labels) = self.num_labels {
            config.num_labels = Some(labels);
        }
        if let Some(offset) = self.marker_offset {
            config.marker_offset = offset;
        }
        if let Some(window) = self.late_marker_window {
            config.late_marker_window = window;
        }
        if self.invert_polarity {
            config.invert_polarity = true;
        }

        Ok(config)
    }

    /// Expand a directory argument into its .wav files, sorted for a stable
    /// processing order
    fn resolve_audio_files(&self) -> Result<Vec<PathBuf>, ndatgen::NdatError> {
        if !self.audio.exists() {
            return Err(ndatgen::NdatError::FileNotFound(self.audio.clone()));
        }

        if self.audio.is_file() {
            return Ok(vec![self.audio.clone()]);
        }

        let mut files: Vec<PathBuf> = std::fs::read_dir(&self.audio)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.extension()
                    .map(|ext| ext.eq_ignore_ascii_case("wav"))
                    .unwrap_or(false)
            })
            .collect();
        files.sort();
        Ok(files)
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let config = match cli.build_config() {
        Ok(config) => config,
        Err(err) => {
            log::error!("{}", err);
            return ExitCode::FAILURE;
        }
    };

    let files = match cli.resolve_audio_files() {
        Ok(files) if files.is_empty() => {
            log::error!("No .wav files found at {}", cli.audio.display());
            return ExitCode::FAILURE;
        }
        Ok(files) => files,
        Err(err) => {
            log::error!("{}", err);
            return ExitCode::FAILURE;
        }
    };

    log::info!(
        "Output info - Length: {} ms, {} file(s) to process",
        config.example_length_ms,
        files.len()
    );

    let succeeded = pipeline::run_batch(&files, &cli.markers, &config, cli.output_dir.as_deref());
    if succeeded == 0 {
        return ExitCode::FAILURE;
    }

    log::info!("{}/{} file(s) converted", succeeded, files.len());
    ExitCode::SUCCESS
}
