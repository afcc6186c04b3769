//! Terminal playground for the Tuner guide.
//!
//! Runs a channel stack and program bar against a fake line-up. Interactive
//! by default; `--script` replays keys headlessly on a simulated clock and
//! prints every event.

mod app;
mod input;
mod source;
mod tui;

use std::{
    fs::File,
    path::PathBuf,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use tuner_config::{ConfigSource, RuntimeConfig, apply_guard_rails, load_from_env, load_from_file};

use crate::app::App;
use crate::input::Action;
use crate::source::{FakeSource, load_lineup};

#[derive(Debug, Parser)]
#[command(name = "tuner-playground", version, about = "Browse a fake TV guide with the arrow keys")]
struct Args {
    /// Number of channels in the line-up
    #[arg(long, default_value_t = 30)]
    channels: u32,

    /// Programs returned per fetch
    #[arg(long, default_value_t = 24)]
    programs: usize,

    /// Channel number playing at start
    #[arg(long, default_value_t = 0)]
    playing: u32,

    /// JSON array of channels to use instead of the generated line-up
    #[arg(long, value_name = "PATH")]
    lineup: Option<PathBuf>,

    /// Navigation settings file (TOML or JSON); otherwise
    /// $TUNER_CONFIG_PATH, $TUNER_CONFIG_JSON or ./tuner.toml
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Simulated response time of the fake source
    #[arg(long, value_name = "MS", default_value_t = 120)]
    latency_ms: u64,

    /// Replay keys from a script instead of reading the terminal
    #[arg(long, value_name = "PATH")]
    script: Option<PathBuf>,

    /// Write logs to a file (stderr would garble the interactive screen)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args)?;

    let (config, source) = load_config(&args)?;
    info!("navigation settings from {source}");

    let mut fake = FakeSource::new(
        args.channels,
        args.playing,
        args.programs,
        chrono::Utc::now(),
    );
    if let Some(path) = &args.lineup {
        fake = fake.with_lineup(load_lineup(path)?);
    }
    let latency = Duration::from_millis(args.latency_ms);

    match &args.script {
        Some(path) => {
            let actions = input::load_script(path)?;
            run_script(config, fake, latency, &actions);
            Ok(())
        }
        None => {
            let mut app = App::new(config, fake, latency, Instant::now());
            tui::run(&mut app)
        }
    }
}

fn init_logging(args: &Args) -> Result<()> {
    let mut builder = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("warn"),
    );
    if let Some(path) = &args.log_file {
        let file = File::create(path)
            .with_context(|| format!("failed to create log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

fn load_config(args: &Args) -> Result<(RuntimeConfig, ConfigSource)> {
    match &args.config {
        Some(path) => {
            let config = load_from_file(path)?;
            let warnings = apply_guard_rails(&config)
                .with_context(|| format!("rejected settings from {}", path.display()))?;
            warnings.log();
            Ok((config, ConfigSource::File(path.clone())))
        }
        None => {
            let load = load_from_env()?;
            Ok((load.config, load.source))
        }
    }
}

/// Replay `actions` on a simulated clock, printing events as they happen.
fn run_script(config: RuntimeConfig, fake: FakeSource, latency: Duration, actions: &[Action]) {
    let t0 = Instant::now();
    let mut now = t0;
    let mut app = App::new(config, fake, latency, now);
    print_events(&app, t0, now);

    for action in actions {
        match *action {
            Action::Remote(key) => {
                println!("{:>7}ms key {}", (now - t0).as_millis(), key.name());
                app.press(key, now);
            }
            Action::Wait(delay) => {
                now = app.advance(now, now + delay);
            }
            Action::Quit => break,
        }
        print_events(&app, t0, now);
    }
}

fn print_events(app: &App, t0: Instant, now: Instant) {
    for line in app.drain_events() {
        println!("{:>7}ms {line}", (now - t0).as_millis());
    }
}
