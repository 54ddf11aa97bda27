//! Transloc CLI
//!
//! Command-line access to the Transloc API for the UChicago and CTA agencies.

#![allow(clippy::print_stdout)]

mod settings;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use domain::{AgencySet, RouteId};
use integration_transloc::{TranslocClient, Verb, build_url};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Transloc CLI
#[derive(Parser)]
#[command(name = "transloc-cli")]
#[command(author, version, about = "Transloc transit API CLI", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// TOML file with `host` and `apiKey` entries
    #[arg(short, long, env = "TRANSLOC_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// RapidAPI host, used when no configuration file is given
    #[arg(long, env = "RAPIDAPI_HOST", global = true)]
    host: Option<String>,

    /// RapidAPI key, used when no configuration file is given
    #[arg(long, env = "RAPIDAPI_KEY", hide_env_values = true, global = true)]
    api_key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Verb, agencies and route filter of a query
#[derive(Args)]
struct QueryArgs {
    /// Query verb: agencies, routes, segments, vehicles, stops, arrival-estimates
    verb: Verb,

    /// Agencies to query: uchicago, cta, all, or upstream ids (comma-separated)
    #[arg(short, long, default_value = "all")]
    agencies: AgencySet,

    /// Route id to narrow the query to (segments and vehicles only)
    #[arg(short, long = "route")]
    routes: Vec<RouteId>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a query and print its payload as JSON
    Query {
        #[command(flatten)]
        query: QueryArgs,

        /// Also print the response metadata (rate limit, versions)
        #[arg(long)]
        envelope: bool,
    },

    /// Print the URL a query would use, without sending it
    Url {
        #[command(flatten)]
        query: QueryArgs,
    },

    /// List the supported verbs
    Verbs,
}

/// Determine log filter level from verbosity count
const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = log_filter_from_verbosity(cli.verbose);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Arc::new(settings::load_configuration(
        cli.config.as_deref(),
        cli.host,
        cli.api_key,
    )?);

    match cli.command {
        Commands::Query { query, envelope } => {
            let client = TranslocClient::new(config)?;
            let request =
                client.request(query.verb, query.agencies, Some(query.routes.as_slice()))?;
            info!(url = %request.url(), "Querying Transloc");

            let response = client
                .fetch_envelope::<serde_json::Value>(&request)
                .await?;

            if envelope {
                println!("{response}");
            }
            println!("{}", serde_json::to_string_pretty(response.payload())?);
        },

        Commands::Url { query } => {
            let url = build_url(
                &config,
                query.verb,
                query.agencies,
                Some(query.routes.as_slice()),
            )?;
            println!("{url}");
        },

        Commands::Verbs => {
            for verb in Verb::ALL {
                let routes = if verb.is_route_qualifiable() {
                    " (accepts --route)"
                } else {
                    ""
                };
                println!("{verb}{routes}");
            }
        },
    }

    Ok(())
}
