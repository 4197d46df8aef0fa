//! rollcred CLI Tool
//!
//! Command-line interface for inspecting and playing credits scripts.

mod config;
mod host;
mod metrics;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::CliConfig;
use host::PlayOptions;
use metrics::MonospaceMetrics;
use rollcred_core::{layout, resolve_anchor, resolve_duration, Hold, Sequence};
use rollcred_player::{Sequencer, SkipController};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{info, warn, Level};

#[derive(Parser)]
#[command(name = "rollcred")]
#[command(about = "Timed text-block credits sequencer")]
#[command(version)]
struct Cli {
    /// JSON configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the parsed blocks of a script
    Info {
        /// Script file path
        script: PathBuf,
    },

    /// Show the measured geometry and timing of every block
    Layout {
        /// Script file path
        script: PathBuf,
    },

    /// Play a script headlessly and print a per-frame trace
    Play {
        /// Script file path; defaults to `<folder>/<name>.txt`
        script: Option<PathBuf>,

        /// Script name looked up in the configured folder
        #[arg(short, long)]
        name: Option<String>,

        /// Stop after this many frames
        #[arg(long, default_value = "100000")]
        frames: u64,

        /// Frames on which to press advance
        #[arg(long, value_delimiter = ',')]
        advance_at: Vec<u64>,

        /// Frame on which to press cancel
        #[arg(long)]
        cancel_at: Option<u64>,

        /// Print JSON lines instead of text
        #[arg(long)]
        json: bool,

        /// Only print frames with events or input
        #[arg(long)]
        events_only: bool,

        /// Value substituted for the version token
        #[arg(long)]
        game_version: Option<String>,

        /// Ignore cancel presses
        #[arg(long)]
        no_skip: bool,

        /// Ignore advance presses
        #[arg(long)]
        no_block_skip: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = CliConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Info { script } => {
            let sequence = load_sequence(&script, &config)?;
            print_info(&sequence);
        }

        Commands::Layout { script } => {
            let sequence = load_sequence(&script, &config)?;
            print_layout(&sequence, &config);
        }

        Commands::Play {
            script,
            name,
            frames,
            advance_at,
            cancel_at,
            json,
            events_only,
            game_version,
            no_skip,
            no_block_skip,
        } => {
            if game_version.is_some() {
                config.version = game_version;
            }
            if no_skip {
                config.playback.skippable = false;
            }
            if no_block_skip {
                config.playback.block_skippable = false;
            }

            let path = config.script_path(script.as_deref(), name.as_deref());
            let options = PlayOptions {
                max_frames: frames,
                advance_at,
                cancel_at,
                json,
                events_only,
            };
            play(&path, &config, &options)?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_sequence(path: &Path, config: &CliConfig) -> Result<Sequence> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open script {}", path.display()))?;
    let sequence = Sequence::read(BufReader::new(file), &config.parse_options())
        .with_context(|| format!("Failed to read script {}", path.display()))?;
    info!(path = %path.display(), blocks = sequence.len(), "loaded script");
    Ok(sequence)
}

fn metrics(config: &CliConfig) -> MonospaceMetrics {
    MonospaceMetrics::new(config.metrics.char_width, config.metrics.line_height)
}

fn play(path: &Path, config: &CliConfig, options: &PlayOptions) -> Result<()> {
    let sequence = load_sequence(path, config)?;
    let mut sequencer = Sequencer::new(config.playback.clone(), metrics(config))
        .context("Failed to create sequencer")?;
    let controller = SkipController::from_config(sequencer.config());

    sequencer
        .start(sequence)
        .context("Failed to start playback")?;
    if let Some(sequence) = sequencer.sequence() {
        info!(
            blocks = sequence.len(),
            issues = sequence.issues().len(),
            "playing {}",
            path.display()
        );
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let summary = host::run(&mut sequencer, &controller, options, &mut out)?;

    if !summary.finished {
        warn!(frames = summary.frames, "frame limit reached before the sequence ended");
    }
    Ok(())
}

fn print_info(sequence: &Sequence) {
    println!("\n=== Credits Script ===");
    println!("Blocks: {}", sequence.len());
    println!("Issues: {}", sequence.issues().len());
    for issue in sequence.issues() {
        println!("  ! {}", issue);
    }

    println!("\n=== Blocks ===");
    for block in sequence.blocks() {
        let params = &block.params;
        println!(
            "  [{}] {} ({} lines){}",
            block.index,
            params,
            block.content_lines().len(),
            if block.terminated { "" } else { " UNTERMINATED" }
        );
        if let Some(tag) = block.tag_line() {
            println!("      tag: {}", tag.trim());
        }
        if let Some(background) = &block.resolved_background {
            println!("      background: {}", background);
        }
        for line in block.content_lines().iter().take(3) {
            println!("      | {}", line);
        }
        if block.content_lines().len() > 3 {
            println!("      ... and {} more lines", block.content_lines().len() - 3);
        }
    }
}

fn print_layout(sequence: &Sequence, config: &CliConfig) {
    let metrics = metrics(config);
    println!(
        "\n=== Layout ({}x{}) ===",
        config.playback.viewport_width, config.playback.viewport_height
    );
    for block in sequence.blocks() {
        if !block.is_playable() {
            println!("  [{}] skipped (unterminated)", block.index);
            continue;
        }
        let block_layout = layout(block, &metrics, &config.playback);
        let initial_y = resolve_anchor(block.params.anchor, &block_layout, &config.playback);
        let hold = match resolve_duration(&block.params, block_layout.total_height, initial_y) {
            Hold::Frames(frames) => format!("{} frames", frames),
            Hold::Indefinite => "until skipped".to_string(),
        };
        println!(
            "  [{}] {} lines, height {:.1}, starts at y={:.1}, align {}, speed {}, hold {}",
            block.index,
            block_layout.line_count(),
            block_layout.total_height,
            initial_y,
            block.params.alignment,
            block.params.scroll_speed,
            hold
        );
        for (line, x) in block.content_lines().iter().zip(&block_layout.line_offsets) {
            println!("      x={:>6.1} {}", x, line);
        }
    }
}
