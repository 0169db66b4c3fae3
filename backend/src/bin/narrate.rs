use clap::Parser;
use shared::{
    clipboard::ClipboardContent,
    config::{DEFAULT_ORIGIN_ADDRESS, MapboxConfig, NarratorConfig},
    form::SELF_PARKING_PREFIX,
    links::map_links,
    pipeline::{GenerateRequest, RouteNarrator},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Describe the driving route between two places as a paragraph of prose"
)]
struct Args {
    /// Starting point: an address, a `lat, lng` pair or a pasted map link
    #[arg(long, default_value = DEFAULT_ORIGIN_ADDRESS)]
    from: String,

    /// Destination, in any of the forms accepted by --from
    #[arg(long)]
    to: String,

    /// Optional self-parking location that replaces the destination for routing
    #[arg(long)]
    self_parking: Option<String>,

    /// ISO country code restricting address lookups (defaults to GEOCODE_COUNTRY or "us")
    #[arg(long)]
    country: Option<String>,

    /// URL of the prose endpoint (defaults to NARRATIVE_ENDPOINT)
    #[arg(long)]
    endpoint: Option<String>,

    /// Also print map links to where the route ends
    #[arg(long)]
    links: bool,
}

impl Args {
    fn config(&self) -> NarratorConfig {
        let mut mapbox = MapboxConfig::from_env();
        if self.country.is_some() {
            mapbox = mapbox.with_country(self.country.clone());
        }
        let endpoint = self
            .endpoint
            .clone()
            .or_else(|| std::env::var("NARRATIVE_ENDPOINT").ok());

        let config = NarratorConfig::new(mapbox);
        match endpoint {
            Some(endpoint) => config.with_narrative_endpoint(endpoint),
            None => config,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "narrate=info,shared=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let narrator = RouteNarrator::new(&args.config());

    let origin = narrator.resolve(&args.from).await?;
    tracing::info!("origin resolved to {}", origin.label);
    let destination = narrator.resolve(&args.to).await?;
    tracing::info!("destination resolved to {}", destination.label);

    let request = GenerateRequest::new(
        &origin,
        &destination,
        args.self_parking.as_deref().unwrap_or_default(),
    )?;
    let outcome = narrator.generate(&request).await?;

    println!("{}", outcome.prose);
    if outcome.effective_destination != destination {
        eprintln!("{SELF_PARKING_PREFIX} {}", outcome.effective_destination.label);
    }
    if args.links {
        let links = map_links(&outcome.effective_destination);
        println!();
        println!("{}", ClipboardContent::links(&links).plain);
    }

    Ok(())
}
