mod cli;

use clap::Parser;
use cli::{Cli, Commands};
use fetchdrop::config::Config;
use fetchdrop::observability;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Server(args) => {
            let mut config = Config::load(args.config)?;
            if let Some(address) = args.address {
                config.server.bind_addr = address;
            }

            let _log_guard = observability::init_tracing(&config.logging)?;
            fetchdrop::api::run(config).await?;
        }
    }

    Ok(())
}
