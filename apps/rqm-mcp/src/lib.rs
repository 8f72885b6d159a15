pub mod server;

use std::{net::SocketAddr, path::PathBuf};

use clap::Parser;
use color_eyre::{Result, eyre};
use tracing_subscriber::EnvFilter;

use rqm_config::Security;

#[derive(Debug, Parser)]
#[command(
	version = rqm_cli::VERSION,
	rename_all = "kebab",
	styles = rqm_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum McpAuthState {
	Off,
	StaticToken { bearer_token: String },
}

pub async fn run(args: Args) -> Result<()> {
	let config = rqm_config::load(&args.config)?;
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt().with_env_filter(filter).init();

	let auth_state = build_auth_state(&config.security, &config.service.mcp_bind)?;

	server::serve_mcp(&config.service.mcp_bind, &config.service.http_bind, auth_state).await
}

fn build_auth_state(security: &Security, mcp_bind: &str) -> Result<McpAuthState> {
	match security.auth_mode.trim() {
		"off" => {
			enforce_loopback_for_off_mode(mcp_bind)?;

			Ok(McpAuthState::Off)
		},
		"static_token" => security
			.mcp_token
			.as_deref()
			.map(str::trim)
			.filter(|token| !token.is_empty())
			.map(|token| McpAuthState::StaticToken { bearer_token: token.to_string() })
			.ok_or_else(|| {
				eyre::eyre!("security.mcp_token is required when security.auth_mode=static_token.")
			}),
		other => Err(eyre::eyre!(
			"security.auth_mode must be one of off or static_token for rqm-mcp, got {other}."
		)),
	}
}

fn enforce_loopback_for_off_mode(mcp_bind: &str) -> Result<()> {
	let bind_addr: SocketAddr = mcp_bind.parse().map_err(|err| {
		eyre::eyre!(
			"service.mcp_bind must be a valid socket address when security.auth_mode=off: {err}"
		)
	})?;

	if !bind_addr.ip().is_loopback() {
		return Err(eyre::eyre!(
			"service.mcp_bind must be a loopback address when security.auth_mode=off."
		));
	}

	Ok(())
}
