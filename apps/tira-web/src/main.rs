use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = tira_web::Args::parse();

	tira_web::run(args).await
}
