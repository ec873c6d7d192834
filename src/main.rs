use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tonic::transport::Server;
use tracing_subscriber::EnvFilter;

use logan_match_engine::server::proto::match_engine_service_server::MatchEngineServiceServer;
use logan_match_engine::server::MatchEngineServer;
use logan_match_engine::settings;
use logan_match_engine::store::MatchStore;

#[derive(Parser)]
#[command(name = "logan-match-engine", about = "Logan 501 match engine gRPC server")]
struct Cli {
    /// Port to listen on
    #[arg(short, long, default_value = "50051", env = "LOGAN_ENGINE_PORT")]
    port: u16,

    /// Path to match_settings.toml (default: auto-discover)
    #[arg(long, env = "LOGAN_MATCH_SETTINGS")]
    settings: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let cli = Cli::parse();

    let file = if let Some(ref settings_path) = cli.settings {
        settings::load_settings(settings_path)
            .map_err(|e| format!("Failed to load settings: {}", e))?
    } else {
        settings::load_default_settings()
    };

    let config = file.match_config();
    tracing::info!(
        starting_score = config.starting_score,
        legs_per_set = config.legs_per_set,
        sets_to_win = config.sets_to_win,
        double_out = config.double_out,
        "match configured"
    );

    let store = Arc::new(MatchStore::with_calibrations(
        config,
        file.board_calibrations(),
    ));
    let server = MatchEngineServer::new(store);

    let addr: SocketAddr = ([0, 0, 0, 0], cli.port).into();
    tracing::info!(%addr, "starting gRPC server");

    Server::builder()
        .add_service(MatchEngineServiceServer::new(server))
        .serve(addr)
        .await?;

    Ok(())
}
