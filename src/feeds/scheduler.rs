use std::time::Duration;

use diesel::sqlite::SqliteConnection;
use tokio::sync::watch;
use tokio::time::{self, MissedTickBehavior};

use crate::db::{self, feeds};
use crate::feeds::fetch::FeedFetcher;
use crate::feeds::poll_one_feed;
use crate::feeds::result::{FeedPollError, TickOutcome};

const MIN_TICK_INTERVAL: Duration = Duration::from_millis(1);

/// Send `true` on the returned sender to stop a running [`Aggregator`].
#[must_use]
pub fn shutdown_channel() -> (watch::Sender<bool>, watch::Receiver<bool>) {
    watch::channel(false)
}

/// Single worker that polls one feed per tick, least recently fetched first.
pub struct Aggregator {
    conn: SqliteConnection,
    fetcher: FeedFetcher,
    shutdown: watch::Receiver<bool>,
}

impl Aggregator {
    #[must_use]
    pub fn new(
        conn: SqliteConnection,
        fetcher: FeedFetcher,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            conn,
            fetcher,
            shutdown,
        }
    }

    /// A dropped sender counts as a shutdown request.
    fn is_shutdown(&self) -> bool {
        *self.shutdown.borrow() || self.shutdown.has_changed().is_err()
    }

    /// Tick every `interval` until shutdown is signalled. The first tick runs
    /// immediately and ticks missed during a slow fetch are skipped.
    pub async fn run(&mut self, interval: Duration) {
        log::info!("Collecting feeds every {:?}", interval);
        let mut timer = time::interval(interval.max(MIN_TICK_INTERVAL));
        timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = timer.tick() => {}
                _ = self.shutdown.changed() => {}
            }
            if self.is_shutdown() {
                break;
            }
            if let TickOutcome::Cancelled = self.tick().await {
                break;
            }
        }
        log::info!("Stopped collecting feeds");
    }

    /// Claim the next feed and poll it. Every failure is logged and folded
    /// into the outcome; nothing escapes a tick.
    pub async fn tick(&mut self) -> TickOutcome {
        if self.is_shutdown() {
            return TickOutcome::Cancelled;
        }

        let feed = match feeds::claim_next_feed(&mut self.conn, db::current_time()) {
            Ok(Some(feed)) => feed,
            Ok(None) => {
                log::debug!("No feeds registered, skipping tick");
                return TickOutcome::Idle;
            }
            Err(error) => {
                log::error!("Could not pick the next feed - {}", error);
                return TickOutcome::Failed {
                    feed: None,
                    error: FeedPollError::Database(error),
                };
            }
        };

        log::info!("Fetching feed {} ({})", feed.name, feed.url);
        // Storage writes happen without an await in between, so the only
        // place this can be interrupted is the fetch.
        let result = tokio::select! {
            result = poll_one_feed(&mut self.conn, &self.fetcher, &feed) => result,
            _ = self.shutdown.changed() => {
                log::info!("Shutdown requested while fetching {}", feed.url);
                return TickOutcome::Cancelled;
            }
        };

        match result {
            Ok(report) => {
                log::info!(
                    "Updated feed {} - {} new, {} already seen, {} failed",
                    feed.url,
                    report.created,
                    report.duplicates,
                    report.failed
                );
                TickOutcome::Ingested { feed, report }
            }
            Err(error) => {
                log::error!("Error polling feed {} - {}", feed.url, error);
                TickOutcome::Failed {
                    feed: Some(feed),
                    error,
                }
            }
        }
    }
}
