use clap::Parser;

use rqm_mcp::Args;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	rqm_mcp::run(Args::parse()).await
}
