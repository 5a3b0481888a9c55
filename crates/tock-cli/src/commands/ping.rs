use crate::client::{ClientError, DaemonClient};
use anyhow::{bail, Result};
use tock_protocol::{Request, Response};

pub async fn execute() -> Result<()> {
    match DaemonClient::new().send(Request::Ping).await {
        Ok(Response::Pong) => println!("🟢 Daemon is running"),
        Ok(_) => bail!("unexpected response from the daemon"),
        Err(ClientError::DaemonNotRunning) => {
            println!("⚫ Daemon is not running");
            std::process::exit(1);
        }
        Err(error) => bail!("{}", error),
    }

    Ok(())
}
