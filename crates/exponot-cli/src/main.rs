//! Exposure Notification key schedule inspector.
//!
//! # Usage
//!
//! ```bash
//! # Values for the current interval
//! exponot --metadata 40080000
//!
//! # Values for a fixed moment (Unix seconds)
//! exponot --timestamp 1590580800 --metadata 40080000
//! ```

use clap::Parser;
use exponot_core::{
    Environment, ExposureNotifier, NotifierConfig, SystemEnv,
    exponot_crypto::{TEK_LIFETIME, key_day},
};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Exposure Notification key schedule inspector
#[derive(Parser, Debug)]
#[command(name = "exponot")]
#[command(about = "Print the current TEK, rolling identifier and encrypted metadata")]
#[command(version)]
struct Args {
    /// Unix timestamp to compute values for (defaults to now)
    #[arg(short, long)]
    timestamp: Option<u64>,

    /// Metadata to encrypt, as hex
    #[arg(short, long, default_value = "")]
    metadata: String,

    /// Past key days to retain
    #[arg(long, default_value_t = TEK_LIFETIME)]
    retention_days: u32,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let env = SystemEnv::new();
    let unix_secs = args.timestamp.unwrap_or_else(|| env.wall_clock_secs());
    let config = NotifierConfig { retention_days: args.retention_days };
    let notifier = ExposureNotifier::new(env, config);

    tracing::debug!(unix_secs, retention_days = config.retention_days, "computing broadcast");

    for line in report(&notifier, unix_secs, &args.metadata)? {
        print_line(&line);
    }

    Ok(())
}

/// Render the key schedule for `unix_secs` as `name: value` lines.
fn report<E: Environment>(
    notifier: &ExposureNotifier<E>,
    unix_secs: u64,
    metadata_hex: &str,
) -> Result<Vec<String>, Box<dyn std::error::Error>> {
    let metadata = hex::decode(metadata_hex)?;

    let tek = notifier.temporary_exposure_key_at(unix_secs)?;
    let payload = notifier.advertisement_payload_at(&metadata, unix_secs)?;

    Ok(vec![
        format!("interval_number: {}", payload.interval_number),
        format!("key_day: {}", key_day(payload.interval_number)),
        format!("rolling_start_interval_number: {}", tek.rolling_start_interval_number()),
        format!("tek: {}", hex::encode(tek.key())),
        format!("rpi: {}", hex::encode(payload.rpi.as_bytes())),
        format!("aem: {}", hex::encode(&payload.aem)),
    ])
}

#[allow(clippy::print_stdout, reason = "CLI output")]
fn print_line(line: &str) {
    println!("{line}");
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use exponot_core::SimEnv;

    use super::*;

    #[test]
    fn parses_defaults() {
        let args = Args::try_parse_from(["exponot"]).unwrap();

        assert_eq!(args.timestamp, None);
        assert_eq!(args.metadata, "");
        assert_eq!(args.retention_days, 14);
        assert_eq!(args.log_level, "info");
    }

    #[test]
    fn parses_timestamp_and_metadata() {
        let args =
            Args::try_parse_from(["exponot", "--timestamp", "1590580800", "-m", "40080000"])
                .unwrap();

        assert_eq!(args.timestamp, Some(1_590_580_800));
        assert_eq!(args.metadata, "40080000");
    }

    #[test]
    fn report_lists_every_value() {
        let notifier = ExposureNotifier::new(SimEnv::new(1, 0), NotifierConfig::default());

        let lines = report(&notifier, 1_590_580_800, "40080000").unwrap();

        assert_eq!(lines[0], "interval_number: 2650968");
        assert_eq!(lines[1], "key_day: 18409");
        assert_eq!(lines[2], "rolling_start_interval_number: 2650896");
        assert!(lines[3].starts_with("tek: ") && lines[3].len() == "tek: ".len() + 32);
        assert!(lines[4].starts_with("rpi: ") && lines[4].len() == "rpi: ".len() + 32);
        assert_eq!(lines[5].len(), "aem: ".len() + 8);
    }

    #[test]
    fn report_rejects_bad_hex() {
        let notifier = ExposureNotifier::new(SimEnv::new(1, 0), NotifierConfig::default());
        assert!(report(&notifier, 0, "zz").is_err());
    }
}
