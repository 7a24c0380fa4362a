use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use flotilla::{init_logging, serve, FleetPolicy, GameService};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Parser)]
enum Commands {
    /// Run the match server and wait for players to connect.
    Serve {
        #[arg(long, default_value = "0.0.0.0:8080")]
        bind: String,
        #[arg(long, default_value_t = 5, help = "Ships each player places before the game starts")]
        fleet_size: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { bind, fleet_size } => {
            let service = Arc::new(GameService::new(FleetPolicy::new(fleet_size)));
            let listener = TcpListener::bind(&bind).await?;
            log::info!("match server listening on {}", bind);
            serve(service, listener).await
        }
    }
}
