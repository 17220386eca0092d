use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use roadwatch_client::{ClientConfig, Endpoint, RefreshOutcome, RefreshReport, Roadwatch};
use roadwatch_disruptions::FeedSource;
use std::path::PathBuf;
use std::time::Duration;

mod check;
mod output;

use check::{check_route, load_registry, read_route};
use output::{
    print_disruptions, print_routes, print_status, write_disruptions_geojson,
    write_routes_geojson,
};

#[derive(Parser, Debug)]
#[command(
    name = "roadwatch",
    author,
    version,
    about = "Live road disruptions and disruption-aware route planning",
    long_about = "Fetches the national traffic authority and regional council \
                  road disruption feeds, and plans driving routes that avoid \
                  known closures.\n\n\
                  Routes come from an OSRM server and place names are resolved \
                  with Nominatim. A route conflicts with a disruption when it \
                  passes within the conflict threshold of it."
)]
struct Args {
    /// JSON configuration file (every field optional)
    #[arg(short, long, global = true, env = "ROADWATCH_CONFIG")]
    config: Option<PathBuf>,

    /// Conflict threshold in meters
    #[arg(long, global = true, env = "ROADWATCH_THRESHOLD_M")]
    threshold: Option<f64>,

    /// Verbose output (show debug messages)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch both feeds once and list current disruptions
    Feeds {
        /// Only list disruptions from this source
        #[arg(long)]
        source: Option<SourceArg>,

        /// Also write the disruptions to this GeoJSON file
        #[arg(long)]
        geojson: Option<PathBuf>,
    },

    /// Plan a route, preferring alternatives clear of disruptions
    Plan {
        /// Start: "lat,lng" or a place name
        #[arg(long)]
        from: String,

        /// Destination: "lat,lng" or a place name
        #[arg(long)]
        to: String,

        /// Also write every alternative to this GeoJSON file
        #[arg(long)]
        geojson: Option<PathBuf>,
    },

    /// Suggest places (known disruptions first) for a partial name
    Suggest { query: String },

    /// Keep refreshing the feeds and report each pass
    Watch {
        /// Seconds between refreshes (defaults to the configured interval)
        #[arg(long)]
        interval: Option<u64>,
    },

    /// Check a saved route against saved feed payloads, without network access
    Check {
        /// GeoJSON file holding the route LineString
        route: PathBuf,

        /// Saved authority feed payload
        #[arg(long)]
        authority: Option<PathBuf>,

        /// Saved council feed payload
        #[arg(long)]
        council: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SourceArg {
    Authority,
    Council,
}

impl From<SourceArg> for FeedSource {
    fn from(source: SourceArg) -> Self {
        match source {
            SourceArg::Authority => FeedSource::Authority,
            SourceArg::Council => FeedSource::Council,
        }
    }
}

fn load_config(args: &Args) -> Result<ClientConfig> {
    let mut config = match &args.config {
        Some(path) => {
            log::info!("Config: {}", path.display());
            ClientConfig::from_json_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?
        }
        None => ClientConfig::default(),
    };

    if let Some(threshold) = args.threshold {
        config.conflict_threshold_m = threshold;
    }
    config.validate().context("Invalid configuration")?;

    Ok(config)
}

fn log_refresh(report: &RefreshReport) {
    for (source, result) in report.iter() {
        match result {
            Ok(RefreshOutcome::Applied {
                disruptions,
                report: batch,
            }) => log::info!("{}: {} disruptions ({})", source, disruptions, batch),
            Ok(RefreshOutcome::Unchanged) => log::info!("{}: unchanged", source),
            Err(err) => log::warn!("{}: refresh failed: {}", source, err),
        }
    }
}

fn connect(config: &ClientConfig) -> Result<Roadwatch> {
    Roadwatch::new(config).context("Failed to set up HTTP client")
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if args.verbose { "debug" } else { "info" }),
    )
    .format_timestamp(None)
    .init();

    let config = load_config(&args)?;

    match args.command {
        Command::Feeds { source, geojson } => {
            let roadwatch = connect(&config)?;
            log_refresh(&roadwatch.refresher.refresh_all().await);

            for feed in FeedSource::ALL {
                print_status(feed, &roadwatch.refresher.status(feed).await);
            }

            let registry = roadwatch.registry.read().await;
            let disruptions: Vec<_> = match source {
                Some(source) => registry.by_source(source.into()).cloned().collect(),
                None => registry.snapshot().to_vec(),
            };
            println!("{} disruptions", disruptions.len());
            print_disruptions(&disruptions);

            if let Some(path) = geojson {
                write_disruptions_geojson(&disruptions, &path)?;
            }
        }

        Command::Plan { from, to, geojson } => {
            let roadwatch = connect(&config)?;
            log_refresh(&roadwatch.refresher.refresh_all().await);

            let plan = roadwatch
                .planner
                .plan(&Endpoint::parse(&from), &Endpoint::parse(&to))
                .await
                .context("Routing failed")?;
            log::info!(
                "From ({:.5}, {:.5}) to ({:.5}, {:.5})",
                plan.from.y(),
                plan.from.x(),
                plan.to.y(),
                plan.to.x()
            );
            print_routes(&plan.filter);

            if let Some(path) = geojson {
                write_routes_geojson(&plan.filter, &path)?;
            }
        }

        Command::Suggest { query } => {
            let roadwatch = connect(&config)?;
            log_refresh(&roadwatch.refresher.refresh_all().await);

            for suggestion in roadwatch.planner.suggest(&query).await {
                println!(
                    "  {} ({:.5}, {:.5})",
                    suggestion.name,
                    suggestion.location.y(),
                    suggestion.location.x()
                );
            }
        }

        Command::Watch { interval } => {
            anyhow::ensure!(interval != Some(0), "--interval must be greater than zero");
            let roadwatch = connect(&config)?;
            let interval = interval
                .map(Duration::from_secs)
                .unwrap_or_else(|| config.refresh_interval());
            log::info!("Refreshing every {} s", interval.as_secs());

            roadwatch.refresher.run_with(interval, log_refresh).await;
        }

        Command::Check {
            route,
            authority,
            council,
        } => {
            let threshold = config.conflict_threshold_m;
            let line = read_route(&route)?;
            let registry = load_registry(authority.as_deref(), council.as_deref())?;
            log::info!(
                "Checking route ({} vertices) against {} disruptions, threshold {} m",
                line.0.len(),
                registry.len(),
                threshold
            );

            let check = check_route(&line, &registry, threshold);
            match &check.conflict {
                Some(id) => {
                    let disruption = registry.get(id)?;
                    println!("Route conflicts with {} ({})", disruption.name, disruption.status);
                }
                None => println!("Route is clear of {} known disruptions", registry.len()),
            }
        }
    }

    Ok(())
}
