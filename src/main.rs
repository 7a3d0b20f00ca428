mod api;
mod app;
mod application;
mod cli;
mod domain;
mod logging;
mod ui;
mod utils;

use clap::Parser;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    logging::init_logging(cli.verbose)?;

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    app::run(&cli, stdin, std::io::stdout()).await?;
    Ok(())
}
