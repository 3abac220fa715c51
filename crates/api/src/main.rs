use anyhow::Context;

use pizzapos_api::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;
    pizzapos_observability::init(config.log_format);

    let app = pizzapos_api::app::build_app(&config)?;

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    let persistence = match &config.data_dir {
        Some(dir) => dir.display().to_string(),
        None => "memory".to_string(),
    };
    tracing::info!(addr = %listener.local_addr()?, %persistence, "listening");

    axum::serve(listener, app).await?;
    Ok(())
}
