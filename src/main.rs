use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{self, EnvFilter};

mod error;
mod journeys;
mod oebb;

use oebb::{DEFAULT_API_BASE, OebbClient};

const AFTER_HELP: &str = "\
Station identifiers:
    Origin and destination are ÖBB station numbers, e.g. 8100002 (Salzburg Hbf)
    or 8100001 (Linz Hbf). They are passed to the API as given.

Output:
    Up to five connections departing now, printed as one line of JSON.
    Lookup errors are printed to stderr.";

#[derive(Parser, Debug)]
#[command(name = "oebb-journeys")]
#[command(about = "Look up ÖBB train connections between two stations", long_about = None)]
#[command(version)]
#[command(after_help = AFTER_HELP)]
struct Cli {
    /// Station number to depart from
    origin: Option<String>,

    /// Station number to travel to
    destination: Option<String>,

    /// Base URL of the ÖBB ticket shop API
    #[arg(long, env = "OEBB_API_BASE", default_value = DEFAULT_API_BASE, hide_env_values = true)]
    api_base: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // stdout is reserved for the journeys
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let client = OebbClient::new(cli.api_base);
    tracing::info!(
        "looking up journeys {:?} -> {:?} via {}",
        cli.origin,
        cli.destination,
        client.base_url()
    );

    // A failed lookup is reported on stderr and still exits 0, only write errors propagate.
    journeys::query_and_report(
        &client,
        cli.origin.as_deref(),
        cli.destination.as_deref(),
        &mut std::io::stdout(),
        &mut std::io::stderr(),
    )
    .await?;

    Ok(())
}
