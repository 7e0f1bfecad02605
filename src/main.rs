use clap::Parser;
use proteus::cli::Cli;
use proteus::config::Settings;
use proteus::domain::Contract;
use proteus::MockServerOptions;
use std::net::SocketAddr;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let settings = Settings::new_with_cli(&cli)?;

    let contract = Contract::from_file(&settings.mock.contract)?;
    info!(
        "Loaded contract {} ({} endpoints, {} schemas)",
        settings.mock.contract,
        contract.endpoints.len(),
        contract.components.schemas.len()
    );

    let options = MockServerOptions {
        scenario: settings.mock.scenario,
        seed: settings.mock.seed,
        inferencer: None,
    };
    let app = proteus::create_app(&contract, options);

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port).parse()?;
    info!(
        "Starting Proteus mock server on {} (scenario: {})",
        addr, settings.mock.scenario
    );
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
