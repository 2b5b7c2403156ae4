use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = podpaper::Args::parse();

	podpaper::run(args).await
}
