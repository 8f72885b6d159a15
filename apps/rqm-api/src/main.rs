use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	rqm_api::run(rqm_api::Args::parse()).await
}
