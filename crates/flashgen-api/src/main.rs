//! Binary entrypoint for the Flashgen API server.
use flashgen_api::{run, ApiConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    run(ApiConfig::from_env()).await
}
