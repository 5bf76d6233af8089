use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = sundial_api::Args::parse();

	sundial_api::run(args).await
}
