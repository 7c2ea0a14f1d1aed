use clap::{Arg, ArgMatches, Command};
use diesel::sqlite::SqliteConnection;
use std::error::Error;
use std::fmt;
use std::time::Duration;

use feedgator::feeds::{self, Aggregator, FeedFetcher};

pub const NAME: &str = "agg";

pub fn app() -> Command {
    Command::new(NAME)
        .about("Collect feeds on a fixed interval until interrupted")
        .arg(
            Arg::new("interval")
                .help("Time between requests, e.g. 30s, 1m, 1h30m")
                .required(true),
        )
}

pub async fn execute(
    matches: &ArgMatches,
    config: &config::Config,
    conn: SqliteConnection,
) -> Result<(), Box<dyn Error>> {
    let interval = parse_duration(super::required_arg(matches, "interval")?)?;
    if interval.is_zero() {
        return Err("interval must be greater than zero".into());
    }

    let fetcher = FeedFetcher::new(super::request_timeout(config)?)?;
    let (shutdown_tx, shutdown_rx) = feeds::shutdown_channel();

    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                log::info!("Interrupted, finishing up");
                let _ = shutdown_tx.send(true);
            }
            Err(err) => {
                log::error!("Unable to listen for Ctrl-C - {}", err);
                // keep the sender alive so the aggregator keeps running
                std::future::pending::<()>().await;
            }
        }
    });

    Aggregator::new(conn, fetcher, shutdown_rx)
        .run(interval)
        .await;
    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
pub struct DurationError {
    input: String,
    reason: &'static str,
}

impl fmt::Display for DurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid duration {:?}: {}", self.input, self.reason)
    }
}

impl Error for DurationError {}

/// Parse durations like `300ms`, `1.5h` or `2h45m`. Units are `ns`, `us`
/// (or `µs`), `ms`, `s`, `m` and `h`; a bare `0` is also accepted.
pub fn parse_duration(input: &str) -> Result<Duration, DurationError> {
    let err = |reason: &'static str| DurationError {
        input: input.to_string(),
        reason,
    };

    let text = input.strip_prefix('+').unwrap_or(input);
    if text.starts_with('-') {
        return Err(err("negative durations are not allowed"));
    }
    if text == "0" {
        return Ok(Duration::ZERO);
    }
    if text.is_empty() {
        return Err(err("empty duration"));
    }

    let mut nanos = 0f64;
    let mut rest = text;
    while !rest.is_empty() {
        let number_end = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        let (number, tail) = rest.split_at(number_end);
        if number.is_empty() || number == "." {
            return Err(err("expected a number"));
        }
        let value: f64 = number.parse().map_err(|_| err("malformed number"))?;

        let unit_end = tail
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(tail.len());
        let (unit, tail) = tail.split_at(unit_end);
        let scale = match unit {
            "ns" => 1.0,
            "us" | "µs" | "μs" => 1e3,
            "ms" => 1e6,
            "s" => 1e9,
            "m" => 60e9,
            "h" => 3600e9,
            "" => return Err(err("missing unit")),
            _ => return Err(err("unknown unit")),
        };

        nanos += value * scale;
        rest = tail;
    }

    if !nanos.is_finite() || nanos > u64::MAX as f64 {
        return Err(err("duration out of range"));
    }
    Ok(Duration::from_nanos(nanos.round() as u64))
}
