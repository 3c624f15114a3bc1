//! Molehunt - terminal whack-a-mole.
//!
//! A countdown, a row of holes, and a score counter. Moles pop up at a
//! fixed interval; whack them with the digit keys before they drop back
//! down.

use clap::Parser;
use color_eyre::eyre::Result;
use game::{GameConfig, GameEvent, GameRunner};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod game;
mod ui;

/// Terminal whack-a-mole
#[derive(Parser, Debug, Clone)]
#[command(version, about)]
struct Args {
    /// Game length in seconds
    #[arg(short, long, default_value = "5")]
    time_limit: i64,

    /// Number of holes on the board (1-9, whacked with the digit keys)
    #[arg(long, default_value = "5")]
    holes: usize,

    /// How long a mole stays up before it counts as missed, in milliseconds
    #[arg(long, default_value = "1000")]
    mole_ms: u64,

    /// How long the hit effect is shown, in milliseconds
    #[arg(long, default_value = "500")]
    flash_ms: u64,

    /// RNG seed for reproducible mole placement
    #[arg(long)]
    seed: Option<u64>,

    /// Print the final summary as JSON on stdout
    #[arg(long)]
    json: bool,
}

impl Args {
    fn config(&self) -> GameConfig {
        GameConfig {
            time_limit: self.time_limit.max(1),
            hole_count: self.holes.clamp(1, 9),
            mole_interval: Duration::from_millis(self.mole_ms),
            hit_flash: Duration::from_millis(self.flash_ms),
            seed: self.seed,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing; logs go to stderr so the game screen stays clean
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(ErrorLayer::default())
        .init();

    color_eyre::install()?;

    let args = Args::parse();
    tracing::debug!(?args, "Starting molehunt");
    let config = args.config();

    // Channel from the keyboard reader to the session loop
    let (tx, mut rx) = mpsc::channel::<GameEvent>(32);
    let input_handle = ui::spawn_reader(tx, config.hole_count);

    let mut screen = ui::Screen::new()?;
    let mut runner = GameRunner::new(config);
    let outcome = runner.run(&mut rx, &mut screen).await;

    // Leave the alternate screen before reporting anything
    drop(screen);
    input_handle.abort();
    let summary = outcome?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        tracing::info!(
            score = summary.score,
            time_remaining = summary.time_remaining,
            game_over = summary.game_over,
            "Session finished"
        );
    }

    Ok(())
}
