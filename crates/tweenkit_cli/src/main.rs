//! Tweenkit CLI
//!
//! Plays tween sequence files against a simulated frame loop and samples
//! easing curves.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::EnvFilter;

use tweenkit_animation::Easing;

mod config;
mod play;

use config::SequenceFile;

#[derive(Parser)]
#[command(name = "tweenkit")]
#[command(version, about = "Tweenkit - easing curves and tween sequences from the command line")]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every easing curve name
    Curves,

    /// Print sampled values of one easing curve
    Sample {
        /// Curve name, e.g. easeOutBounce
        easing: String,

        /// Start value
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        from: f64,

        /// End value
        #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
        to: f64,

        /// Duration in milliseconds
        #[arg(short, long, default_value_t = 1000.0)]
        duration: f64,

        /// Number of intervals (samples - 1)
        #[arg(short, long, default_value_t = 10)]
        samples: u32,
    },

    /// Play a sequence file frame by frame
    Play {
        /// Path to the sequence TOML file
        path: PathBuf,

        /// Override the frame rate from the file
        #[arg(long)]
        fps: Option<u32>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(io::stderr)
        .init();

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Curves => {
            for easing in Easing::ALL {
                writeln!(out, "{easing}")?;
            }
        }
        Commands::Sample {
            easing,
            from,
            to,
            duration,
            samples,
        } => {
            let easing: Easing = easing.parse()?;
            sample(&mut out, easing, from, to, duration, samples.max(1))?;
        }
        Commands::Play { path, fps } => {
            let file = SequenceFile::load(&path)?;
            tracing::info!(path = %path.display(), steps = file.steps.len(), "playing sequence");
            let report = play::play(&file, fps, &mut out)
                .with_context(|| format!("Failed to play {}", path.display()))?;
            tracing::info!(
                frames = report.frames,
                elapsed_ms = report.elapsed_ms,
                completed = report.completed,
                "playback finished"
            );
        }
    }

    Ok(())
}

fn sample(
    out: &mut impl Write,
    easing: Easing,
    from: f64,
    to: f64,
    duration: f64,
    intervals: u32,
) -> Result<()> {
    if duration.is_nan() || duration <= 0.0 {
        anyhow::bail!("duration must be greater than zero, got {duration}");
    }

    for i in 0..=intervals {
        let t = duration * i as f64 / intervals as f64;
        let value = easing.ease(t, from, to - from, duration);
        writeln!(out, "{t:>10.2} {value:>12.6}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_hits_both_ends() {
        let mut out = Vec::new();
        sample(&mut out, Easing::EaseOutBounce, 10.0, 20.0, 500.0, 4).unwrap();
        let output = String::from_utf8(out).unwrap();
        let lines: Vec<_> = output.lines().collect();

        assert_eq!(lines.len(), 5);
        assert!(lines[0].ends_with("10.000000"));
        assert!(lines[4].ends_with("20.000000"));
    }

    #[test]
    fn test_sample_rejects_non_positive_duration() {
        let mut out = Vec::new();
        assert!(sample(&mut out, Easing::Linear, 0.0, 1.0, 0.0, 4).is_err());
        assert!(sample(&mut out, Easing::Linear, 0.0, 1.0, -10.0, 4).is_err());
        assert!(out.is_empty());
    }

    #[test]
    fn test_cli_parses_play() {
        let cli =
            Cli::try_parse_from(["tweenkit", "-v", "play", "intro.toml", "--fps", "30"]).unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Play { path, fps } => {
                assert_eq!(path, PathBuf::from("intro.toml"));
                assert_eq!(fps, Some(30));
            }
            _ => panic!("expected play"),
        }
    }
}
