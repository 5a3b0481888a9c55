use super::exit_on_client_error;
use crate::client::DaemonClient;
use anyhow::{bail, Context, Result};
use std::io::Write;
use std::path::PathBuf;
use tock_protocol::{Request, Response};

pub async fn execute(url: String, output: Option<PathBuf>) -> Result<()> {
    let client = DaemonClient::new();

    let (resource, from_cache) = match client.send(Request::FetchAsset { url }).await {
        Ok(Response::Asset {
            resource,
            from_cache,
        }) => (resource, from_cache),
        Ok(Response::Error { message }) => bail!("{}", message),
        Ok(_) => bail!("unexpected response from the daemon"),
        Err(error) => return exit_on_client_error(error),
    };

    let origin = if from_cache { "cache" } else { "network" };
    eprintln!(
        "📦 {} ({} bytes, {}) from {}",
        resource.url,
        resource.body.len(),
        resource.content_type.as_deref().unwrap_or("unknown type"),
        origin
    );

    match output {
        Some(path) => std::fs::write(&path, &resource.body)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&resource.body)?;
            stdout.flush()?;
        }
    }

    Ok(())
}
