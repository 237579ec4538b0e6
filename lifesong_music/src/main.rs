// Lifesong CLI entry point.
//
// Reads a DNA sequence (argument or file), generates a score and writes it
// to MIDI, or just prints the analysis.
//
// Usage:
//   lifesong generate <SEQUENCE> [--input FILE] [--duration SECS]
//     [--output out.mid] [--analysis-json FILE] [--config FILE]
//   lifesong analyze <SEQUENCE> [--input FILE] [--config FILE]
//
// Logging goes through `tracing`; set RUST_LOG (default "info") to change
// verbosity, e.g. RUST_LOG=lifesong_music=trace for per-note detail.

use clap::{Parser, Subcommand};
use lifesong_music::analysis::clean_sequence;
use lifesong_music::config::LifesongConfig;
use lifesong_music::error::{LifesongError, Result};
use lifesong_music::midi::write_midi;
use lifesong_music::{analyze, generate_score};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "lifesong", author, version, about = "Turn DNA sequences into music", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a MIDI file from a sequence
    Generate {
        /// DNA sequence (A/T/G/C); other characters are skipped
        sequence: Option<String>,
        /// Read the sequence from a file instead (FASTA headers are skipped)
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Piece length in seconds
        #[arg(short, long)]
        duration: Option<f64>,
        /// Output MIDI path, relative to the configured output directory
        #[arg(short, long, default_value = "lifesong.mid")]
        output: PathBuf,
        /// Also write the analysis summary as JSON
        #[arg(long)]
        analysis_json: Option<PathBuf>,
        /// JSON configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Print the analysis of a sequence as JSON
    Analyze {
        sequence: Option<String>,
        #[arg(short, long)]
        input: Option<PathBuf>,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Generate {
            sequence,
            input,
            duration,
            output,
            analysis_json,
            config,
        } => {
            let config = load_config(config.as_deref())?;
            let sequence = read_sequence(sequence, input.as_deref(), &config)?;
            let duration = duration.unwrap_or(config.default_duration_seconds);

            info!(length = sequence.len(), duration, "generating");
            let (score, analysis) = generate_score(&sequence, duration);
            let summary = analysis.summary();
            println!("{}", serde_json::to_string_pretty(&summary)?);

            let stats = score.stats();
            for track in &stats.tracks {
                info!(track = %track.name, notes = track.notes, range = ?track.pitch_range, "track");
            }

            let midi_path = config.output_path(&output);
            write_midi(&score, &midi_path)?;

            if let Some(path) = analysis_json {
                std::fs::write(&path, serde_json::to_string_pretty(&summary)?)?;
                info!(path = %path.display(), "wrote analysis");
            }
            Ok(())
        }
        Command::Analyze {
            sequence,
            input,
            config,
        } => {
            let config = load_config(config.as_deref())?;
            let sequence = read_sequence(sequence, input.as_deref(), &config)?;
            let summary = analyze(&sequence).summary();
            println!("{}", serde_json::to_string_pretty(&summary)?);
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<LifesongConfig> {
    match path {
        Some(path) => {
            info!(path = %path.display(), "loading config");
            LifesongConfig::load(path)
        }
        None => Ok(LifesongConfig::default()),
    }
}

/// Take the sequence from the argument or the input file, then apply the
/// configured minimum length.
fn read_sequence(
    argument: Option<String>,
    input: Option<&Path>,
    config: &LifesongConfig,
) -> Result<String> {
    let raw = match (input, argument) {
        (Some(path), _) => {
            let text = std::fs::read_to_string(path)?;
            text.lines()
                .filter(|line| !line.starts_with('>'))
                .collect::<Vec<_>>()
                .concat()
        }
        (None, Some(sequence)) => sequence,
        (None, None) => return Err(LifesongError::EmptyInput),
    };

    let length = clean_sequence(&raw).chars().count();
    if length == 0 {
        return Err(LifesongError::EmptyInput);
    }
    if length < config.min_sequence_length {
        return Err(LifesongError::SequenceTooShort {
            length,
            minimum: config.min_sequence_length,
        });
    }
    Ok(raw)
}
