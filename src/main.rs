use std::io::BufRead;
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use fortune_wheel::{Config, Prize, StatusLine, Wheel, WheelCommand};

/// Simulated frame interval for headless spins.
const HEADLESS_FRAME: Duration = Duration::from_micros(16_667);

#[derive(Parser, Debug)]
#[command(name = "fortune-wheel")]
#[command(author, version, about = "Spinning prize wheel")]
struct Args {
    /// Config file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Comma separated prize list, e.g. 100,x2,300
    #[arg(short, long, value_delimiter = ',')]
    prizes: Option<Vec<Prize>>,

    /// Upper bound for the wheel side in pixels
    #[arg(long)]
    max_size: Option<u32>,

    /// Fixed RNG seed for reproducible spins
    #[arg(long)]
    seed: Option<u64>,

    /// Window title
    #[arg(long)]
    title: Option<String>,

    /// Spin once without a window and print the winner
    #[arg(long)]
    headless: bool,
}

impl Args {
    fn apply(&self, config: &mut Config) {
        if let Some(prizes) = &self.prizes {
            config.prizes = prizes.clone();
        }
        if let Some(max_size) = self.max_size {
            config.window.max_size = max_size;
        }
        if let Some(seed) = self.seed {
            config.spin.seed = Some(seed);
        }
        if let Some(title) = &self.title {
            config.window.title = title.clone();
        }
    }
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("fortune_wheel=info".parse()?),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => {
            info!("No config file given, using defaults");
            Config::default()
        }
    };
    args.apply(&mut config);
    config.validate().context("invalid configuration")?;

    let mut wheel = Wheel::new(config)?;

    if args.headless {
        let mut status = StatusLine::default();
        let winner = wheel.spin_to_completion(Instant::now(), HEADLESS_FRAME, &mut status);
        println!("{}", winner.label());
        return Ok(());
    }

    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            match line.parse::<WheelCommand>() {
                Ok(command) => {
                    if sender.send(command).is_err() {
                        break;
                    }
                }
                Err(e) => warn!("{}", e),
            }
        }
    });

    println!("Press Space, Enter or click to spin. Type 'spin' or 'angle <radians>' on stdin.");
    wheel.show_with_commands(receiver)?;
    Ok(())
}
