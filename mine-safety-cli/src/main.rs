//! Mine Safety Console CLI
//!
//! Command-line front end for the mine-safety-core library. It adds:
//! - Role login kept in a small state file
//! - Text and JSON dashboards per role
//! - Mine map clicks from the command line
//! - A random alert feed simulation
//! - An interactive session shell

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mine_safety_core::{MineSite, Position, Role};
use std::io;
use std::path::PathBuf;

mod callbacks;
mod config;
mod events;
mod report;
mod shell;
mod state;

use callbacks::ConsoleNotifier;
use config::AppConfig;
use events::FeedPump;
use report::{AlertTable, Dashboard, DetailsView};
use state::RoleStore;

/// Mine Safety Console - role dashboards, mine map and emergency alerts
#[derive(Parser, Debug)]
#[command(name = "mine-safety")]
#[command(about = "Mine safety and productivity console", long_about = None)]
#[command(version)]
struct Args {
    /// Path to configuration file (config.toml)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Verbosity level (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in as worker, supervisor or regulator
    Login {
        /// Role name (worker, supervisor, regulator)
        role: Role,
    },
    /// Forget the stored role
    Logout,
    /// Show the stored role
    Whoami,
    /// Render the dashboard for the stored role
    Dashboard {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Click the mine map and show the marker details
    Click {
        x: f64,
        y: f64,
    },
    /// Run the random alert feed and print the alert log
    Simulate {
        /// Number of generator ticks
        #[arg(long, default_value_t = 720)]
        ticks: u32,

        /// RNG seed for a reproducible run
        #[arg(long)]
        seed: Option<u64>,

        /// Alert probability per tick
        #[arg(long)]
        probability: Option<f64>,

        /// Sleep one tick interval between ticks
        #[arg(long)]
        realtime: bool,
    },
    /// Interactive session on stdin
    Shell,
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.verbose, args.quiet);

    log::info!("Mine Safety Console v{}", env!("CARGO_PKG_VERSION"));
    log::debug!("Using core library v{}", mine_safety_core::VERSION);

    let config = match &args.config {
        Some(path) => config::load_config(path)?,
        None => AppConfig::default(),
    };
    let store = RoleStore::new(&config.session.state_dir);

    match args.command {
        Command::Login { role } => {
            store.save(role)?;
            println!("✓ Logged in as {}", role);
        }
        Command::Logout => {
            if store.clear()? {
                println!("✓ Logged out");
            } else {
                println!("Not logged in");
            }
        }
        Command::Whoami => match store.load()? {
            Some(role) => println!("{} ({})", role, role.dashboard_title()),
            None => println!("Not logged in"),
        },
        Command::Dashboard { json } => {
            let role = require_role(&store)?;
            let site = build_site(&config)?;
            if json {
                println!("{}", report::dashboard_json(role, &site)?);
            } else {
                print!("{}", Dashboard { role, site: &site });
            }
        }
        Command::Click { x, y } => {
            let mut site = build_site(&config)?;
            print!("{}", DetailsView(site.click(Position::new(x, y))));
        }
        Command::Simulate {
            ticks,
            seed,
            probability,
            realtime,
        } => {
            let mut config = config;
            if seed.is_some() {
                config.feed.seed = seed;
            }
            if let Some(p) = probability {
                config.feed.probability = p;
            }
            simulate(&config, ticks, realtime, args.quiet)?;
        }
        Command::Shell => {
            let role = require_role(&store)?;
            let site = build_site(&config)?;
            let mut session = shell::Session::new(role, site, ConsoleNotifier::new(args.quiet))?;
            let stdin = io::stdin();
            session.run(stdin.lock(), io::stdout())?;
        }
    }

    Ok(())
}

fn require_role(store: &RoleStore) -> Result<Role> {
    store
        .load()?
        .context("Not logged in. Run `mine-safety login <worker|supervisor|regulator>` first")
}

fn build_site(config: &AppConfig) -> Result<MineSite> {
    MineSite::with_markers(config.site_config(), config.marker_set()?).context("Failed to set up mine site")
}

fn simulate(config: &AppConfig, ticks: u32, realtime: bool, quiet: bool) -> Result<()> {
    let mut site = build_site(config)?;
    let mut pump = FeedPump::new(&site.config.feed)?;
    let mut notifier = ConsoleNotifier::new(quiet);

    println!("═══════════════════════════════════════════════");
    println!("  Alert Feed Simulation");
    println!("═══════════════════════════════════════════════\n");
    println!(
        "Ticks: {} every {}s, probability {}",
        ticks, site.config.feed.tick_secs, site.config.feed.probability
    );
    if let Some(seed) = site.config.feed.seed {
        println!("Seed: {}", seed);
    }
    println!();

    let summary = pump.run(&mut site, ticks, realtime, &mut notifier)?;

    println!("\n═══════════════════════════════════════════════");
    println!("  Summary");
    println!("═══════════════════════════════════════════════");
    println!("Ticks:   {}", pump.total_ticks());
    println!("Raised:  {}", summary.raised);
    println!("Dropped: {}", summary.dropped);
    log::debug!("{} notifications shown", notifier.shown());
    println!();
    print!("{}", AlertTable(&site.alerts));

    Ok(())
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
