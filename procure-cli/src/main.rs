use clap::Parser as _;
use procure::BaseArgs;
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _};

#[tokio::main]
pub async fn main() -> anyhow::Result<()> {
    // Allocations are written to stdout, so diagnostics go to stderr.
    // Set RUST_LOG (e.g. `RUST_LOG=procure_solver=debug`) to see the search.
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = BaseArgs::parse();
    args.evaluate().await
}
