use chrono::{DateTime, Utc};
use diesel::sqlite::SqliteConnection;

use crate::db::{self, posts};
use crate::feeds::dates;
use crate::feeds::parse::{RawFeed, RawItem};
use crate::models::{Feed, NewPost};

/// Per-item tally of one ingest pass. Conflicts and failures are counted,
/// never raised.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IngestReport {
    pub created: usize,
    pub duplicates: usize,
    pub failed: usize,
    pub undated: usize,
}

impl IngestReport {
    #[must_use]
    pub fn total(&self) -> usize {
        self.created + self.duplicates + self.failed
    }
}

/// The post id covers feed, link and title, so seeing the same item again
/// collides on the primary key instead of adding a row.
#[must_use]
pub fn post_id(feed: &Feed, item: &RawItem) -> String {
    db::id_from(&["post", &feed.id, &item.link, &item.title])
}

/// Store every item of `raw_feed` as a post of `feed`.
pub fn ingest(conn: &mut SqliteConnection, feed: &Feed, raw_feed: &RawFeed) -> IngestReport {
    let mut report = IngestReport::default();

    for item in &raw_feed.items {
        let published_at = publication_date(feed, item);
        if published_at.is_none() {
            report.undated += 1;
        }

        let now = db::current_time();
        let id = post_id(feed, item);
        let new_post = NewPost {
            id: &id,
            feed_id: &feed.id,
            title: &item.title,
            url: &item.link,
            description: &item.description,
            published_at,
            created_at: now,
            updated_at: now,
        };

        match posts::create(conn, &new_post) {
            Ok(post) => {
                log::trace!("Post new {}", post.id);
                report.created += 1;
            }
            Err(error) if db::is_unique_violation(&error) => {
                log::trace!("Post exists {}", id);
                report.duplicates += 1;
            }
            Err(error) => {
                log::error!(
                    "Could not save post {:?} from {} - {}",
                    item.title,
                    feed.url,
                    error
                );
                report.failed += 1;
            }
        }
    }

    report
}

fn publication_date(feed: &Feed, item: &RawItem) -> Option<DateTime<Utc>> {
    if item.pub_date.trim().is_empty() {
        return None;
    }
    match dates::normalize(&item.pub_date) {
        Ok(date) => Some(date),
        Err(error) => {
            log::warn!("Feed: {}, Title: {} - {}", feed.name, item.title, error);
            None
        }
    }
}
