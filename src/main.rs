use std::error::Error;
use std::fs::File;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode, WriteLogger};
use snake_autopilot::autopilot::Autopilot;
use snake_autopilot::config::{default_config_path, SimConfig};
use snake_autopilot::game::{GameOptions, GameState};
use snake_autopilot::input::parse_direction_script;
use snake_autopilot::pathfinder::TailPolicy;
use snake_autopilot::session::{
    run_session, DirectionSource, ScriptedInput, SessionLimits, SessionSummary,
};

/// Runs one headless snake game, steered by the autopilot or a move script.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Config file (JSON). Defaults to the platform config directory.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    rows: Option<u16>,

    #[arg(long)]
    cols: Option<u16>,

    /// RNG seed for reproducible food and obstacle placement.
    #[arg(long)]
    seed: Option<u64>,

    /// Spawn an obstacle every ten points.
    #[arg(long)]
    obstacles: bool,

    #[arg(long)]
    max_ticks: Option<u64>,

    /// Delay between ticks in milliseconds.
    #[arg(long)]
    tick_ms: Option<u64>,

    #[arg(long, value_enum)]
    tail_policy: Option<TailPolicy>,

    /// Play these moves instead of the autopilot, e.g. "up,right,r,d".
    #[arg(long)]
    script: Option<String>,

    /// Print the summary as JSON.
    #[arg(long)]
    json: bool,

    /// Write logs to this file instead of stderr.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log at debug level.
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn apply_overrides(&self, config: &mut SimConfig) {
        if let Some(rows) = self.rows {
            config.rows = rows;
        }
        if let Some(cols) = self.cols {
            config.cols = cols;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.obstacles {
            config.obstacles = true;
        }
        if let Some(max_ticks) = self.max_ticks {
            config.max_ticks = max_ticks;
        }
        if let Some(tick_ms) = self.tick_ms {
            config.tick_interval_ms = tick_ms;
        }
        if let Some(tail_policy) = self.tail_policy {
            config.tail_policy = tail_policy;
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    let mut config = SimConfig::load(&config_path)?;
    cli.apply_overrides(&mut config);

    let summary = run(&cli, &config)?;
    print_summary(&summary, cli.json)?;
    Ok(())
}

fn run(cli: &Cli, config: &SimConfig) -> Result<SessionSummary, Box<dyn Error>> {
    let size = config.grid_size()?;
    let options = GameOptions {
        obstacles: config.obstacles,
    };
    let seed = config.seed.unwrap_or_else(rand::random);
    let mut state = GameState::with_options(size, options, seed);

    let mut source: Box<dyn DirectionSource> = match &cli.script {
        Some(script) => Box::new(ScriptedInput::new(parse_direction_script(script)?)),
        None => Box::new(Autopilot::new(config.tail_policy)),
    };

    log::info!(
        "starting {}x{} game (seed {seed}, obstacles: {}, {})",
        size.rows,
        size.cols,
        config.obstacles,
        if cli.script.is_some() { "scripted" } else { "autopilot" }
    );

    let summary = run_session(
        &mut state,
        source.as_mut(),
        SessionLimits {
            max_ticks: config.max_ticks,
            tick_interval: Duration::from_millis(config.tick_interval_ms),
        },
    );
    log::info!("finished after {} ticks with score {}", summary.ticks, summary.score);

    Ok(summary)
}

fn init_logging(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    match &cli.log_file {
        Some(path) => WriteLogger::init(level, Config::default(), File::create(path)?)?,
        None => TermLogger::init(
            level,
            Config::default(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        )?,
    }

    Ok(())
}

fn print_summary(summary: &SessionSummary, json: bool) -> Result<(), Box<dyn Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(summary)?);
        return Ok(());
    }

    println!("ticks:  {}", summary.ticks);
    println!("score:  {}", summary.score);
    println!("length: {}", summary.length);
    match summary.death_reason {
        Some(reason) => println!("status: game over ({reason:?})"),
        None => println!("status: {:?}", summary.status),
    }
    Ok(())
}
