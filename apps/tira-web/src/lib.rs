pub mod page;
pub mod routes;
pub mod state;

use std::{
	net::{IpAddr, SocketAddr},
	path::PathBuf,
};

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use crate::state::AppState;

#[derive(Debug, Parser)]
#[command(
	version = tira_cli::VERSION,
	rename_all = "kebab",
	styles = tira_cli::styles(),
)]
pub struct Args {
	/// TOML config file. Environment variables override it; defaults apply when omitted.
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: Option<PathBuf>,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = tira_config::load(args.config.as_deref())?;

	init_tracing(&config);

	let ip: IpAddr = config.service.host.parse()?;
	let http_addr = SocketAddr::new(ip, config.service.port);
	let state = AppState::new(config).await?;
	let app = routes::router(state);
	let listener = TcpListener::bind(http_addr).await?;

	tracing::info!(%http_addr, "HTTP server listening.");

	axum::serve(listener, app).await?;

	Ok(())
}

fn init_tracing(config: &tira_config::Config) {
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt().with_env_filter(filter).init();
}
