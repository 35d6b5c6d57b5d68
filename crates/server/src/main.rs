use recon_server::{config::ServerConfig, startup, telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::load()?;
    telemetry::init_tracing(&config);

    startup::run(config).await
}
