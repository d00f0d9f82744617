// GEN-SCORE - main.rs
// Fails fast on configuration errors; everything else is handled per request.

use clap::Parser;
use genscore::cli::{dispatch, Cli};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("genscore=info,tower_http=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    if let Err(e) = dispatch(cli).await {
        eprintln!("genscore: {e:#}");
        std::process::exit(1);
    }
}
