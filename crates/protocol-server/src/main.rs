use protocol_server::{router, ApiMailer, ServerConfig};
use std::net::SocketAddr;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ServerConfig::from_env();
    let missing = config.mail.missing();
    if !missing.is_empty() {
        log::warn!(
            "email delivery disabled until set: {}; applications will fail with 500",
            missing.join(", ")
        );
    }

    let mailer = ApiMailer::new(config.mail.clone())?;
    let app = router(mailer, &config.web_root);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("Server running at http://localhost:{}", config.port);
    log::info!("Serving {}", config.web_root.display());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::warn!("failed to listen for ctrl-c: {e}");
        std::future::pending::<()>().await;
    }
    log::info!("shutting down");
}
