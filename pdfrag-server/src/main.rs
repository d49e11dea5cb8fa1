use clap::Parser;
use pdfrag_server::config::log_filter;
use pdfrag_server::{Cli, Command, model_check, run_server};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(log_filter())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => run_server(cli.config).await,
        Command::CheckModel(args) => {
            if model_check::run(&cli.config, &args).await {
                Ok(())
            } else {
                std::process::exit(1)
            }
        }
    }
}
