use std::path::PathBuf;

use clap::Parser;
use dune_calc_logic::catalog::Catalog;
use dune_calc_server::{router, ApiError, AppState};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "dune-calc-server")]
#[command(about = "Resource calculator API for Dune placeables")]
struct Args {
    /// Address to listen on.
    #[arg(long, env = "DUNE_CALC_LISTEN", default_value = "0.0.0.0:8000")]
    listen: String,

    /// Placeable catalog (JSON array of {name, resources}).
    #[arg(long, env = "DUNE_CALC_CATALOG", default_value = "data/dune_placeables.json")]
    catalog: PathBuf,

    /// Emit logs as JSON lines.
    #[arg(long, env = "DUNE_CALC_LOG_JSON")]
    log_json: bool,
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    let args = Args::parse();
    init_tracing(args.log_json);

    let catalog = Catalog::load(&args.catalog)?;
    info!(
        path = %args.catalog.display(),
        placeables = catalog.len(),
        resources = catalog.resource_names().len(),
        "catalog loaded"
    );

    let app = router(AppState::new(catalog));

    let listener = TcpListener::bind(&args.listen).await?;
    let addr = listener.local_addr()?;
    info!("dune-calc-server listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
