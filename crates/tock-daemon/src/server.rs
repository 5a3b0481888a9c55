use crate::actors::{NotifierHandle, TimerHandle};
use crate::assets::AssetService;
use anyhow::{Context, Result};
use interprocess::local_socket::{
    tokio::{prelude::*, Stream},
    GenericFilePath, ListenerOptions,
};
use std::path::PathBuf;
use std::sync::Arc;
use tock_core::SettingsError;
use tock_protocol::{socket_path, Request, Response};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing::{debug, error, info, instrument};

const MAX_REQUEST_BYTES: usize = 64 * 1024;

#[derive(Clone)]
pub struct Services {
    pub timer: TimerHandle,
    pub notifier: Option<NotifierHandle>,
    pub assets: Arc<AssetService>,
}

pub struct Server {
    socket_path: PathBuf,
    services: Services,
}

impl Server {
    pub fn new(services: Services) -> Result<Self> {
        Ok(Self {
            socket_path: socket_path(),
            services,
        })
    }

    fn cleanup_stale_socket(&self) -> Result<()> {
        if self.socket_path.exists() {
            std::fs::remove_file(&self.socket_path).context("failed to remove stale socket")?;
            debug!("removed stale socket file");
        }
        Ok(())
    }

    #[instrument(skip(self, shutdown))]
    pub async fn run(&self, mut shutdown: tokio::sync::broadcast::Receiver<()>) -> Result<()> {
        self.cleanup_stale_socket()?;

        let listener = ListenerOptions::new()
            .name(self.socket_path.as_os_str().to_fs_name::<GenericFilePath>()?)
            .create_tokio()?;

        info!(path = %self.socket_path.display(), "server listening");

        loop {
            tokio::select! {
                accept_result = listener.accept() => {
                    match accept_result {
                        Ok(stream) => {
                            let services = self.services.clone();
                            tokio::spawn(async move {
                                if let Err(error) = handle_connection(stream, services).await {
                                    error!(%error, "connection handler failed");
                                }
                            });
                        }
                        Err(error) => {
                            error!(%error, "failed to accept connection");
                        }
                    }
                }
                _ = shutdown.recv() => {
                    info!("shutdown signal received");
                    break;
                }
            }
        }

        self.cleanup_socket();
        Ok(())
    }

    fn cleanup_socket(&self) {
        if let Err(error) = std::fs::remove_file(&self.socket_path) {
            debug!(%error, "socket file already removed");
        } else {
            debug!("socket file cleaned up");
        }
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        self.cleanup_socket();
    }
}

async fn handle_connection(mut stream: Stream, services: Services) -> Result<()> {
    debug!("new connection accepted");

    let mut length_buffer = [0u8; 4];
    stream.read_exact(&mut length_buffer).await?;
    let length = u32::from_le_bytes(length_buffer) as usize;
    anyhow::ensure!(length <= MAX_REQUEST_BYTES, "request too large: {} bytes", length);

    let mut payload = vec![0u8; length];
    stream.read_exact(&mut payload).await?;

    let request: Request =
        bincode::deserialize(&payload).context("failed to deserialize request")?;

    debug!(?request, "received request");

    let response = handle_request(request, &services).await;

    debug!(?response, "sending response");

    let response_bytes = bincode::serialize(&response)?;
    let response_length = (response_bytes.len() as u32).to_le_bytes();

    stream.write_all(&response_length).await?;
    stream.write_all(&response_bytes).await?;
    stream.flush().await?;

    Ok(())
}

fn acknowledge<E>(result: Result<(), E>, failure: &str) -> Response {
    match result {
        Ok(()) => Response::Ok,
        Err(_) => Response::Error {
            message: failure.to_string(),
        },
    }
}

fn settings_response(result: Option<Result<(), SettingsError>>) -> Response {
    match result {
        Some(Ok(())) => Response::Ok,
        Some(Err(error)) => Response::Error {
            message: error.to_string(),
        },
        None => Response::Error {
            message: "timer unavailable".to_string(),
        },
    }
}

async fn handle_request(request: Request, services: &Services) -> Response {
    let timer = &services.timer;

    match request {
        Request::Ping => Response::Pong,

        Request::GetStatus => match timer.get_status().await {
            Some(snapshot) => Response::Status(snapshot),
            None => Response::Error {
                message: "failed to read timer status".to_string(),
            },
        },

        Request::Start => acknowledge(timer.start().await, "failed to start timer"),
        Request::Stop => acknowledge(timer.stop().await, "failed to stop timer"),
        Request::Toggle => acknowledge(timer.toggle().await, "failed to toggle timer"),
        Request::Reset => acknowledge(timer.reset().await, "failed to reset timer"),
        Request::ResetSessions => {
            acknowledge(timer.reset_sessions().await, "failed to reset session count")
        }
        Request::SwitchMode { mode } => {
            acknowledge(timer.switch_mode(mode).await, "failed to switch mode")
        }

        Request::SetMiniBell {
            enabled,
            interval_minutes,
        } => settings_response(timer.set_mini_bell(enabled, interval_minutes).await),

        Request::SetVariant { variant } => settings_response(timer.set_variant(variant).await),

        Request::Push { payload } => match services.notifier {
            Some(ref notifier) => {
                notifier.send_push(payload);
                Response::Ok
            }
            None => Response::Error {
                message: "notifications unavailable".to_string(),
            },
        },

        Request::FetchAsset { url } => match services.assets.fetch(&url).await {
            Ok(outcome) => Response::Asset {
                from_cache: outcome.is_cached(),
                resource: outcome.into_resource(),
            },
            Err(error) => Response::Error {
                message: error.to_string(),
            },
        },
    }
}
