use super::acknowledge;
use crate::client::DaemonClient;
use anyhow::Result;
use clap::ValueEnum;
use tock_protocol::{Request, TimerMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Focus,
    Relax,
}

impl From<ModeArg> for TimerMode {
    fn from(value: ModeArg) -> Self {
        match value {
            ModeArg::Focus => TimerMode::Focus,
            ModeArg::Relax => TimerMode::Relax,
        }
    }
}

pub async fn execute(mode: ModeArg) -> Result<()> {
    let mode = TimerMode::from(mode);

    acknowledge(
        &DaemonClient::new(),
        Request::SwitchMode { mode },
        &format!("🎚️  Switched to {} mode", mode),
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_argument_maps_to_timer_mode() {
        assert_eq!(TimerMode::from(ModeArg::Focus), TimerMode::Focus);
        assert_eq!(TimerMode::from(ModeArg::Relax), TimerMode::Relax);
        assert_eq!(
            ModeArg::from_str("relax", true).map(TimerMode::from),
            Ok(TimerMode::Relax)
        );
    }
}
