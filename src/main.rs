use formsite::config::{AppSettings, ConfigService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ConfigService::from_env();
    let settings = AppSettings::from_config(&config)?;
    formsite::logging::init(&settings.log_filter)?;

    tracing::info!("Starting formsite...");
    formsite::server::serve(settings).await
}
