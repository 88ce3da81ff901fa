use clap::Parser;
use eyre::Result;
use tracing_subscriber::{fmt, EnvFilter};

use stunpeersniff::Config;

#[tokio::main]
async fn main() -> Result<()> {
	let config = Config::parse();

	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
	fmt()
		.with_env_filter(filter)
		.with_target(false)
		.with_writer(std::io::stdout)
		.init();

	stunpeersniff::run(config).await
}
