use diesel::sqlite::SqliteConnection;

pub mod dates;
pub mod fetch;
pub mod ingest;
pub mod parse;
pub mod result;
pub mod scheduler;

pub use fetch::FeedFetcher;
pub use ingest::IngestReport;
pub use parse::{RawFeed, RawItem};
pub use result::{FeedPollError, TickOutcome};
pub use scheduler::{shutdown_channel, Aggregator};

use crate::models::Feed;

/// Fetch and parse a feed without touching the database.
///
/// # Errors
///
/// Will return Err if the feed cannot be fetched or parsed
pub async fn fetch_and_parse(fetcher: &FeedFetcher, url: &str) -> Result<RawFeed, FeedPollError> {
    let body = fetcher.fetch(url).await?;
    Ok(parse::parse(&body)?)
}

/// Fetch, parse and store one feed's items.
///
/// # Errors
///
/// Will return Err if the feed cannot be fetched or parsed. Per-item storage
/// failures are counted in the report instead.
pub async fn poll_one_feed(
    conn: &mut SqliteConnection,
    fetcher: &FeedFetcher,
    feed: &Feed,
) -> Result<IngestReport, FeedPollError> {
    let raw_feed = fetch_and_parse(fetcher, &feed.url).await?;
    log::debug!(
        "Parsed {} items from {} ({})",
        raw_feed.items.len(),
        feed.url,
        raw_feed.title
    );
    Ok(ingest::ingest(conn, feed, &raw_feed))
}
