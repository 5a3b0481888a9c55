mod actors;
mod assets;
mod server;

use std::sync::Arc;

#[cfg(target_os = "linux")]
use actors::spawn_tray;
use actors::{NotifierActor, TimerActor};
use anyhow::Result;
use assets::AssetService;
use server::{Server, Services};
use tock_adapters::HttpResourceFetcher;
use tock_core::{Config, TimerSession};
use tokio::sync::broadcast;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("tock_daemon=debug".parse()?))
        .init();

    info!("tock daemon starting");

    let config = Config::load().unwrap_or_else(|error| {
        warn!(%error, "failed to load config, using defaults");
        Config::default()
    });

    let (shutdown_sender, shutdown_receiver) = broadcast::channel::<()>(1);

    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("SIGINT received, initiating shutdown");
        shutdown_sender.send(()).ok();
    });

    let (notifier_actor, notifier_handle) =
        NotifierActor::new(&config.notifications, config.cache.base_url.clone());
    tokio::spawn(notifier_actor.run());

    let permission_delay = config.notifications.permission_request_delay();
    let permission_handle = notifier_handle.clone();
    tokio::spawn(async move {
        tokio::time::sleep(permission_delay).await;
        permission_handle.request_permission();
    });

    #[cfg(target_os = "linux")]
    let (tray_handle, tray_state) = if config.tray.enabled {
        match spawn_tray() {
            Ok(handle) => {
                let state = handle.state_handle.clone();
                (Some(handle), Some(state))
            }
            Err(error) => {
                warn!(%error, "tray initialization failed, continuing without tray");
                (None, None)
            }
        }
    } else {
        (None, None)
    };

    #[cfg(target_os = "linux")]
    let _tray_handle = tray_handle;

    let session = TimerSession::new(config.session_settings());
    let (timer_actor, timer_handle) = TimerActor::new(
        session,
        config.timer.transition_delay(),
        Some(notifier_handle.clone()),
    );

    #[cfg(target_os = "linux")]
    let timer_actor = timer_actor.with_tray(tray_state);

    tokio::spawn(timer_actor.run());

    let assets = Arc::new(AssetService::new(
        &config.cache,
        Arc::new(HttpResourceFetcher::new()),
    ));

    if config.cache.enabled {
        let bootstrap_assets = Arc::clone(&assets);
        tokio::spawn(async move {
            if let Err(error) = bootstrap_assets.bootstrap().await {
                warn!(%error, "offline cache install failed, serving from network");
            }
        });
    }

    let server = Server::new(Services {
        timer: timer_handle,
        notifier: Some(notifier_handle),
        assets,
    })?;
    server.run(shutdown_receiver).await?;

    info!("tock daemon stopped");
    std::process::exit(0);
}
