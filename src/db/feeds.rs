use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::result::Error;
use diesel::sqlite::SqliteConnection;

use crate::db;
use crate::models::{Feed, NewFeed, User};
use crate::schema::{feeds, users};

/// The feed id is derived from its URL, so the same URL always maps to the
/// same row.
#[must_use]
pub fn feed_id_from_url(url: &str) -> String {
    db::id_from(&["feed", url])
}

pub fn create(
    conn: &mut SqliteConnection,
    owner: &User,
    name: &str,
    url: &str,
) -> Result<Feed, Error> {
    let now = db::current_time();
    let id = feed_id_from_url(url);
    diesel::insert_into(feeds::table)
        .values(NewFeed {
            id: &id,
            name,
            url,
            user_id: &owner.id,
            created_at: now,
            updated_at: now,
        })
        .returning(Feed::as_returning())
        .get_result(conn)
}

pub fn find_by_url(conn: &mut SqliteConnection, url: &str) -> Result<Option<Feed>, Error> {
    feeds::table
        .filter(feeds::url.eq(url))
        .select(Feed::as_select())
        .first(conn)
        .optional()
}

pub fn list_with_owner(conn: &mut SqliteConnection) -> Result<Vec<(Feed, User)>, Error> {
    feeds::table
        .inner_join(users::table)
        .order((feeds::created_at.asc(), feeds::id.asc()))
        .select((Feed::as_select(), User::as_select()))
        .load(conn)
}

/// The feed fetched longest ago. SQLite sorts NULL first in ascending order,
/// so feeds that were never fetched win over everything else.
pub fn next_feed_to_fetch(conn: &mut SqliteConnection) -> Result<Option<Feed>, Error> {
    feeds::table
        .order((
            feeds::last_fetched_at.asc(),
            feeds::created_at.asc(),
            feeds::id.asc(),
        ))
        .select(Feed::as_select())
        .first(conn)
        .optional()
}

pub fn mark_feed_fetched(
    conn: &mut SqliteConnection,
    feed_id: &str,
    at: DateTime<Utc>,
) -> Result<Feed, Error> {
    diesel::update(feeds::table.find(feed_id))
        .set((
            feeds::last_fetched_at.eq(Some(at)),
            feeds::updated_at.eq(at),
        ))
        .returning(Feed::as_returning())
        .get_result(conn)
}

/// Select the next feed and stamp it as fetched at `now` in one transaction,
/// so two workers can never claim the same feed.
pub fn claim_next_feed(
    conn: &mut SqliteConnection,
    now: DateTime<Utc>,
) -> Result<Option<Feed>, Error> {
    conn.immediate_transaction(|conn| match next_feed_to_fetch(conn)? {
        Some(feed) => mark_feed_fetched(conn, &feed.id, now).map(Some),
        None => Ok(None),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support;
    use chrono::{Duration, TimeZone};

    fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn it_rejects_duplicate_urls() {
        let mut conn = test_support::connection();
        let user = test_support::user(&mut conn, "dave");
        test_support::feed(&mut conn, &user, "One", "https://example.com/rss");

        let error = create(&mut conn, &user, "Two", "https://example.com/rss").unwrap_err();

        assert!(db::is_unique_violation(&error));
    }

    #[test]
    fn it_finds_feeds_by_url() {
        let mut conn = test_support::connection();
        let user = test_support::user(&mut conn, "dave");
        let feed = test_support::feed(&mut conn, &user, "One", "https://example.com/rss");

        assert_eq!(
            find_by_url(&mut conn, "https://example.com/rss").unwrap(),
            Some(feed)
        );
        assert_eq!(find_by_url(&mut conn, "https://example.com/nope").unwrap(), None);
    }

    #[test]
    fn it_claims_nothing_without_feeds() {
        let mut conn = test_support::connection();
        assert_eq!(claim_next_feed(&mut conn, db::current_time()).unwrap(), None);
    }

    #[test]
    fn it_selects_feeds_round_robin() {
        let mut conn = test_support::connection();
        let user = test_support::user(&mut conn, "dave");
        let never = test_support::feed(&mut conn, &user, "Never", "https://a.example/rss");
        let older = test_support::feed(&mut conn, &user, "Older", "https://b.example/rss");
        let newer = test_support::feed(&mut conn, &user, "Newer", "https://c.example/rss");

        let start = base_time();
        mark_feed_fetched(&mut conn, &newer.id, start + Duration::minutes(2)).unwrap();
        mark_feed_fetched(&mut conn, &older.id, start + Duration::minutes(1)).unwrap();

        let claimed: Vec<Feed> = (1..=3)
            .map(|minute| {
                claim_next_feed(&mut conn, start + Duration::minutes(10 + minute))
                    .unwrap()
                    .unwrap()
            })
            .collect();

        let ids: Vec<&str> = claimed.iter().map(|feed| feed.id.as_str()).collect();
        assert_eq!(ids, vec![never.id.as_str(), older.id.as_str(), newer.id.as_str()]);

        let stamps: Vec<DateTime<Utc>> = claimed
            .iter()
            .map(|feed| feed.last_fetched_at.unwrap())
            .collect();
        assert!(stamps.windows(2).all(|pair| pair[0] < pair[1]));

        // a full round later the first feed comes up again
        let next = claim_next_feed(&mut conn, start + Duration::minutes(20))
            .unwrap()
            .unwrap();
        assert_eq!(next.id, never.id);
    }

    #[test]
    fn it_persists_the_fetch_stamp() {
        let mut conn = test_support::connection();
        let user = test_support::user(&mut conn, "dave");
        let feed = test_support::feed(&mut conn, &user, "One", "https://example.com/rss");
        assert_eq!(feed.last_fetched_at, None);

        let at = base_time();
        claim_next_feed(&mut conn, at).unwrap();

        let stored = find_by_url(&mut conn, &feed.url).unwrap().unwrap();
        assert_eq!(stored.last_fetched_at, Some(at));
        assert_eq!(stored.updated_at, at);
    }
}
