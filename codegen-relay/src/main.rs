use codegen_relay::config::RelayConfig;
use codegen_relay::startup::Application;
use dotenvy::dotenv;
use service_core::observability::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = RelayConfig::load().map_err(|e| {
        eprintln!("Failed to read configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    init_tracing("codegen-relay", "info", config.otlp_endpoint.as_deref());

    let app = Application::build(config).await?;
    app.run_until_stopped().await?;

    Ok(())
}
