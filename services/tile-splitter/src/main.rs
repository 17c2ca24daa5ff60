//! Tile splitter CLI.
//!
//! Stages the SS-DB benchmark tiles: slices `normal_obs` at each tile's `Z`
//! index, reshapes the tile footprint to its own array and stores it as
//! `normal_obs_<Z>`.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use scidb_client::{build_executor, Backend};
use std::path::PathBuf;
use tile_plan::TileEdge;
use tile_splitter::{load_tiles, SplitterConfig, TileSplitter};
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "tile-splitter")]
#[command(about = "Split normal_obs into per-slice tile arrays in SciDB")]
#[command(version)]
struct Cli {
    /// Log level
    #[arg(long, global = true, default_value = "info", env = "SPLITTER_LOG_LEVEL")]
    log_level: String,

    /// Log format: text or json
    #[arg(long, global = true, default_value = "text")]
    log_format: String,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command that plans tiles.
#[derive(Args, Debug)]
struct PlanArgs {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Descriptor file (x,y,z per line, or .yaml)
    #[arg(short, long)]
    tiles: Option<PathBuf>,

    /// Tile edge length in cells
    #[arg(short, long)]
    edge: Option<i64>,

    /// Stop after this many tiles
    #[arg(short, long, conflicts_with = "all")]
    max_tiles: Option<usize>,

    /// Process every descriptor
    #[arg(long)]
    all: bool,

    /// Fail when two descriptors share a slice index
    #[arg(long)]
    strict_duplicates: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Submit one store query per tile
    Run {
        #[command(flatten)]
        plan: PlanArgs,

        /// Execution backend: iquery, shim or dry-run
        #[arg(short, long)]
        backend: Option<Backend>,

        /// SciDB host
        #[arg(long)]
        host: Option<String>,

        /// SciDB port (coordinator for iquery, shim for shim)
        #[arg(short, long)]
        port: Option<u16>,

        /// Summary format: text or json
        #[arg(short, long, default_value = "text")]
        output: String,
    },

    /// Print the queries without connecting
    Plan {
        #[command(flatten)]
        plan: PlanArgs,
    },

    /// Report descriptor count and repeated slice indices or footprints
    Check {
        #[command(flatten)]
        plan: PlanArgs,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    init_tracing(&cli.log_level, &cli.log_format)?;

    match cli.command {
        Commands::Run {
            plan,
            backend,
            host,
            port,
            output,
        } => {
            let mut config = build_config(&plan)?;
            if let Some(backend) = backend {
                config.backend = backend;
            }
            if let Some(host) = host {
                config.endpoint.host = host;
            }
            if let Some(port) = port {
                config.endpoint.port = port;
            }
            config.validate()?;

            let tiles = load_tiles(&config)?;
            let mut executor = build_executor(config.backend, &config.endpoint)?;

            info!(
                backend = %config.backend,
                endpoint = %config.endpoint,
                "Connecting to SciDB"
            );

            let splitter = TileSplitter::new(config);
            let summary = match splitter.run(&tiles, executor.as_mut()).await {
                Ok(summary) => summary,
                Err(e) => {
                    error!(error = %e, "Tile split failed");
                    return Err(e.into());
                }
            };

            match output.as_str() {
                "json" => println!("{}", serde_json::to_string_pretty(&summary)?),
                _ => {
                    println!(
                        "Stored {} tile(s), skipped {}, in {} ms",
                        summary.submitted, summary.skipped, summary.elapsed_ms
                    );
                    if let (Some(first), Some(last)) =
                        (summary.stored.first(), summary.stored.last())
                    {
                        println!("  {} .. {}", first, last);
                    }
                    println!("Done!");
                }
            }
            Ok(())
        }
        Commands::Plan { plan } => {
            let config = build_config(&plan)?;
            config.validate()?;

            let tiles = load_tiles(&config)?;
            let splitter = TileSplitter::new(config);
            splitter.check_duplicates(&tiles)?;

            for tile in splitter.plan_all(&tiles)? {
                println!("{}", tile.query);
            }
            Ok(())
        }
        Commands::Check { plan } => {
            let config = build_config(&plan)?;
            let tiles = load_tiles(&config)?;
            let splitter = TileSplitter::new(config);
            let report = splitter.check_duplicates(&tiles)?;

            println!("Descriptors: {}", tiles.len());
            println!("Selected:    {}", splitter.selected(&tiles).len());
            if report.is_clean() {
                println!("No repeated slice indices or footprints");
            }
            for dup in &report.slices {
                println!("  slice {} repeats at positions {:?}", dup.key, dup.positions);
            }
            if !report.origins.is_empty() {
                println!("  {} footprint(s) repeat:", report.origins.len());
                for dup in &report.origins {
                    println!(
                        "    ({}, {}) at positions {:?}",
                        dup.key.0, dup.key.1, dup.positions
                    );
                }
            }
            Ok(())
        }
    }
}

/// Defaults, then the config file, then `SPLITTER_*` env, then flags.
fn build_config(args: &PlanArgs) -> Result<SplitterConfig> {
    let mut config = match &args.config {
        Some(path) => SplitterConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => SplitterConfig::default(),
    };
    config.apply_env()?;

    if let Some(tiles) = &args.tiles {
        config.tiles = Some(tiles.clone());
    }
    if let Some(edge) = args.edge {
        config.tile_edge = TileEdge::new(edge)?;
    }
    if args.all {
        config.max_tiles = None;
    } else if let Some(max) = args.max_tiles {
        config.max_tiles = Some(max);
    }
    if args.strict_duplicates {
        config.strict_duplicates = true;
    }
    Ok(config)
}

fn init_tracing(log_level: &str, log_format: &str) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr);

    // stdout carries queries and summaries; logs go to stderr
    if log_format == "json" {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}
