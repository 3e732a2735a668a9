//! location-sync-demo: Runs an in-memory router and store side by side and
//! shows the synchronizer keeping them in step.

mod script;

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use anyhow::{Result, bail};
use clap::Parser;
use serde_json::json;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use location_sync::{
    InMemoryRouter, InMemoryStore, LocationEvent, LocationSynchronizer, Navigator, RouterLocation,
    Store, SyncOptions,
};

use script::Step;

/// Time given to the synchronizer to settle after each step.
const SETTLE: Duration = Duration::from_millis(20);

#[derive(Parser, Debug)]
#[command(name = "location-sync-demo")]
#[command(about = "Keep an in-memory router and store in sync")]
struct Args {
    /// Path the router boots at
    #[arg(long, default_value = "/")]
    initial_path: String,

    /// Location already recorded in the store (e.g. rehydrated state)
    #[arg(long)]
    stored_location: Option<String>,

    /// Comma-separated list of known routes (all paths accepted if omitted)
    #[arg(long, value_delimiter = ',')]
    routes: Vec<String>,

    /// Comma-separated list of paths a guard refuses
    #[arg(long, value_delimiter = ',')]
    blocked: Vec<String>,

    /// JSON file with the steps to run (built-in scenario if omitted)
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Set up logging - respects RUST_LOG env var, defaults to info (or debug with --verbose)
    let default_filter = if args.verbose {
        "debug,location_sync=debug"
    } else {
        "info,location_sync=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let steps = match &args.script {
        Some(path) => script::load(path)?,
        None => script::builtin(),
    };
    if steps.is_empty() {
        bail!("Script has no steps");
    }

    let mut router = InMemoryRouter::new(args.initial_path.clone()).with_blocked(args.blocked.clone());
    if !args.routes.is_empty() {
        router = router.with_routes(args.routes.clone());
    }
    let router = Arc::new(router);

    let initial_state = match &args.stored_location {
        Some(location) => json!({ "router": location }),
        None => json!({}),
    };
    let store = Arc::new(InMemoryStore::json(initial_state));

    let refreshes = Arc::new(AtomicUsize::new(0));
    let refreshes_clone = Arc::clone(&refreshes);
    let mut sync = LocationSynchronizer::new(
        Arc::clone(&router),
        Arc::clone(&store),
        Arc::new(move || {
            refreshes_clone.fetch_add(1, Ordering::Relaxed);
            debug!("Render refresh");
        }),
    );

    let _subscription = sync.events().subscribe(|event: LocationEvent| {
        info!("{}", serde_json::to_string(&event).unwrap_or_else(|_| format!("{event:?}")));
    });

    sync.initialize(SyncOptions::default())?;
    router.initial_navigation();
    tokio::time::sleep(SETTLE).await;

    for step in steps {
        info!("Step: {:?}", step);
        match step {
            Step::Navigate { path } => match router.navigate_by_url(&path).await {
                Ok(true) => {}
                Ok(false) => info!("Navigation to {} was cancelled", path),
                Err(e) => info!("Navigation to {} failed: {}", path, e),
            },
            Step::Replay { location } => {
                store.replace_state(json!({ "router": location }));
            }
            Step::Pause { millis } => {
                tokio::time::sleep(Duration::from_millis(millis)).await;
            }
        }
        tokio::time::sleep(SETTLE).await;
    }

    sync.destroy();

    let report = json!({
        "routerPath": router.path(),
        "storeLocation": store.state().router_location(),
        "dispatched": store.dispatched(),
        "navigations": router.navigations(),
        "refreshes": refreshes.load(Ordering::Relaxed),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
