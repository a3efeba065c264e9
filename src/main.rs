use std::net::SocketAddr;
use std::time::Duration;

use tokio::time;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use romshelf::{config, routes, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logging (stdout + tägliche Datei-Rotation unter ./logs)
    std::fs::create_dir_all("logs").ok();
    let (stdout_nb, stdout_guard) = tracing_appender::non_blocking(std::io::stdout());
    let file_appender = tracing_appender::rolling::daily("logs", "romshelf.log");
    let (file_nb, file_guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=info".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(stdout_nb))
        .with(tracing_subscriber::fmt::layer().with_ansi(false).with_writer(file_nb))
        .init();
    // Guards am Leben halten, damit die Non-Blocking Writer beim Beenden flushen
    let _log_guards = (stdout_guard, file_guard);

    // Konfiguration: eingebettete Defaults -> romshelf.toml -> env/.env
    let app_cfg = config::load()?;

    let state = AppState::new(app_cfg.clone());
    if !state.catalog.dir().is_dir() {
        tracing::warn!(
            "ROMs directory '{}' does not exist yet; listings stay empty until it is created",
            state.catalog.dir().display()
        );
    }

    // Periodisches Aufräumen der Rate-Limiter, damit die IP-Maps nicht wachsen
    if app_cfg.rate_limit.enabled {
        let rl = state.rate_limiter.clone();
        let every = Duration::from_secs(app_cfg.rate_limit.cleanup_interval_secs);
        tokio::spawn(async move {
            let mut ticker = time::interval(every);
            loop {
                ticker.tick().await;
                rl.cleanup_all().await;
            }
        });
    }

    let app = routes::router(state);

    let host = app_cfg.server.host.clone();
    let port = app_cfg.server.port;
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid listen addr {}:{} - {}", host, port, e))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!(
        "romshelf listening on http://{} (ROMs from '{}')",
        listener.local_addr()?,
        app_cfg.catalog.dir.display()
    );
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = term.recv() => {},
                }
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", e);
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
    info!("Shutdown signal received. Stopping server...");
}
