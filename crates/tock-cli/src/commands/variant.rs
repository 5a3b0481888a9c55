use super::acknowledge;
use crate::client::DaemonClient;
use anyhow::{bail, Result};
use clap::ValueEnum;
use tock_protocol::{Request, TimerVariant};

pub const DEFAULT_COUNTDOWN_MINUTES: u64 = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum VariantArg {
    Stopwatch,
    Countdown,
}

fn resolve_variant(variant: VariantArg, minutes: Option<u64>) -> Result<TimerVariant> {
    match variant {
        VariantArg::Stopwatch => {
            if minutes.is_some() {
                bail!("--minutes only applies to the countdown variant");
            }
            Ok(TimerVariant::Stopwatch)
        }
        VariantArg::Countdown => Ok(TimerVariant::countdown_minutes(
            minutes.unwrap_or(DEFAULT_COUNTDOWN_MINUTES),
        )),
    }
}

pub async fn execute(variant: VariantArg, minutes: Option<u64>) -> Result<()> {
    let variant = resolve_variant(variant, minutes)?;

    let success = match variant {
        TimerVariant::Stopwatch => "⏱️  Stopwatch selected".to_string(),
        TimerVariant::Countdown { total_seconds } => {
            format!("⏲️  Countdown of {} min selected", total_seconds / 60)
        }
    };

    acknowledge(&DaemonClient::new(), Request::SetVariant { variant }, &success).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn countdown_defaults_to_twenty_five_minutes() {
        let variant = resolve_variant(VariantArg::Countdown, None).unwrap();
        assert_eq!(variant, TimerVariant::Countdown { total_seconds: 1500 });
    }

    #[test]
    fn countdown_uses_requested_minutes() {
        let variant = resolve_variant(VariantArg::Countdown, Some(50)).unwrap();
        assert_eq!(variant, TimerVariant::Countdown { total_seconds: 3000 });
    }

    #[test]
    fn stopwatch_rejects_minutes() {
        assert!(resolve_variant(VariantArg::Stopwatch, Some(10)).is_err());
        assert_eq!(
            resolve_variant(VariantArg::Stopwatch, None).unwrap(),
            TimerVariant::Stopwatch
        );
    }
}
