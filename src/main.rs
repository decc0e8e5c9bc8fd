use clap::Parser;
use restaurant_sim::config::{SimulationConfig, SimulationMode};
use restaurant_sim::menu::default_menu;
use restaurant_sim::restaurant::Restaurant;
use restaurant_sim::scenario::{self, SAMPLE_ORDERS};
use restaurant_sim::error::describe_error_code;
use restaurant_sim::SimError;
use std::path::PathBuf;
use tracing::{debug, error, trace};
use tracing_subscriber::EnvFilter;

/// Simulate a restaurant's order pipeline from kitchen to delivery
#[derive(Parser)]
#[command(name = "restaurant-sim")]
#[command(about = "Restaurant order pipeline simulator", long_about = None)]
struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace, -vvv for all)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Restaurant number (1-999)
    #[arg(short, long)]
    restaurant: Option<u32>,

    /// Simulation mode: 'realtime' (rt) or 'fastforward' (ff)
    #[arg(short, long)]
    mode: Option<SimulationMode>,

    /// Number of chefs
    #[arg(long)]
    chefs: Option<usize>,

    /// Maximum orders in preparation at once
    #[arg(long)]
    capacity: Option<usize>,

    /// Seed for delivery and arrival randomness
    #[arg(long)]
    seed: Option<u64>,

    /// Path to a TOML configuration file
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Print the final report as JSON on stdout
    #[arg(long)]
    json: bool,
}

impl Cli {
    async fn resolve_config(&self) -> restaurant_sim::Result<SimulationConfig> {
        let mut config = match &self.config {
            Some(path) => SimulationConfig::load(path).await?,
            None => SimulationConfig::default(),
        };

        if let Some(restaurant) = self.restaurant {
            config.restaurant = restaurant;
        }
        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        if let Some(chefs) = self.chefs {
            config.chefs = chefs;
        }
        if let Some(capacity) = self.capacity {
            config.capacity = capacity;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)),
        )
        .with_target(cli.verbose >= 2) // Show target module for -vv and above
        .with_thread_ids(cli.verbose >= 3) // Show thread IDs for -vvv
        .with_line_number(cli.verbose >= 3) // Show line numbers for -vvv
        .init();

    debug!("restaurant-sim started with verbosity level: {}", cli.verbose);
    trace!("Full CLI args: {:?}", std::env::args().collect::<Vec<_>>());

    if let Err(e) = run(&cli).await {
        error!("Fatal error: {}", e);
        eprintln!("Error: {e:#}");
        let code = match e.downcast_ref::<SimError>() {
            Some(sim_error) => {
                eprintln!("  {}", describe_error_code(sim_error.code()));
                sim_error.exit_code()
            }
            None => 1,
        };
        std::process::exit(code);
    }
}

async fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = cli.resolve_config().await?;
    let restaurant = Restaurant::from_config(&config)?;

    let report = scenario::run(&restaurant, &default_menu(), &SAMPLE_ORDERS, config.seed).await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    Ok(())
}
