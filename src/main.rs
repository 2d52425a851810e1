use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod app;
mod console;
mod participant;
mod presenter;
mod settings;

use app::{App, RunOptions};
use settings::Settings;

/// Adaptive pitch discrimination test
#[derive(Parser, Debug)]
#[command(name = "pitch-discrimination")]
#[command(version)]
struct Args {
    /// TOML settings file
    #[arg(short, long, env = "PITCHEX_CONFIG")]
    config: Option<PathBuf>,

    /// Override the number of trials
    #[arg(short, long)]
    trials: Option<usize>,

    /// Seed for a reproducible trial order and stimuli
    #[arg(long)]
    seed: Option<u64>,

    /// Directory holding voice/ and piano/ tone recordings
    #[arg(short, long, default_value = "media", env = "PITCHEX_MEDIA_DIR")]
    media_dir: PathBuf,

    /// External command used to play each tone file (e.g. aplay, afplay)
    #[arg(short, long, env = "PITCHEX_PLAYER")]
    player: Option<String>,

    /// Directory for the JSON result files
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Skip uploading to the remote table store
    #[arg(long)]
    no_upload: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pitch_discrimination=info,pitchex_experiment=info,pitchex_export=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let mut settings = match &args.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    if let Some(trials) = args.trials {
        settings.experiment.total_trials = trials;
    }
    info!(
        trials = settings.experiment.total_trials,
        media = %args.media_dir.display(),
        "starting"
    );

    let options = RunOptions {
        media_dir: args.media_dir,
        output_dir: args.output_dir,
        player: args.player,
        seed: args.seed,
        upload: !args.no_upload,
    };

    let stdin = std::io::stdin();
    App::new(settings, options, stdin.lock())?.run()
}
