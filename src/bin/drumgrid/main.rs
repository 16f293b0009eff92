//! drumgrid - sixteen-step drum machine in the terminal
//!
//! Run with: cargo run -- --bpm 120 --template rock8beat

mod app;
mod ui;

use std::{fs, path::PathBuf};

use clap::Parser;
use color_eyre::eyre::{bail, WrapErr};
use tracing_subscriber::EnvFilter;

use app::App;
use drumgrid::{sequencing::Template, DrumMachine, MachineConfig, DEFAULT_BPM, DEFAULT_SAMPLE_RATE};

#[derive(Parser, Debug)]
#[command(name = "drumgrid", version, about = "Sixteen-step drum machine")]
struct Args {
    /// Starting tempo (40-240)
    #[arg(long, default_value_t = DEFAULT_BPM)]
    bpm: u32,

    /// Load a built-in pattern: clear, basic8beat, rock8beat, disco, shuffle, funk
    #[arg(long, short)]
    template: Option<String>,

    /// Import a pattern saved with the `e` key
    #[arg(long, short, value_name = "FILE")]
    pattern: Option<PathBuf>,

    /// Output sample rate in Hz
    #[arg(long, default_value_t = DEFAULT_SAMPLE_RATE)]
    sample_rate: f32,

    /// Run without opening an audio device
    #[arg(long)]
    silent: bool,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    // Quiet by default: anything below warn would draw over the grid.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let config = MachineConfig::new().bpm(args.bpm).sample_rate(args.sample_rate);
    let mut machine = if args.silent {
        DrumMachine::silent(config)
    } else {
        DrumMachine::open(config)
    };

    if let Some(id) = &args.template {
        if !machine.load_template(id) {
            let known: Vec<_> = Template::all().iter().map(|t| t.id).collect();
            bail!("unknown template {id:?} (known: {})", known.join(", "));
        }
    }

    if let Some(path) = &args.pattern {
        let raw = fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read {}", path.display()))?;
        machine
            .import_pattern(&raw)
            .wrap_err_with(|| format!("failed to import {}", path.display()))?;
    }

    let mut terminal = ratatui::init();
    let result = App::new(machine).run(&mut terminal);
    ratatui::restore();
    result
}
