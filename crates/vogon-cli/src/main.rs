use clap::Parser;

mod cli;
mod commands;
mod logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();
    let cli = cli::Cli::parse();
    commands::run_command(cli).await
}
