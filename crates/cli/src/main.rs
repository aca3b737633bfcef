use clap::Parser;
use tracing::error;

mod cli;
mod console;
mod logging;
mod terminal;

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();
    logging::init(cli.verbose);

    if let Err(err) = console::run(cli).await {
        error!(target = "tether", error = %err, "session failed");
        std::process::exit(1);
    }
}
