use diesel::prelude::*;
use diesel::result::Error;
use diesel::sqlite::SqliteConnection;

use crate::db;
use crate::models::{Feed, FeedFollow, NewFeedFollow};
use crate::schema::{feed_follows, feeds};

pub fn create(
    conn: &mut SqliteConnection,
    user_id: &str,
    feed_id: &str,
) -> Result<FeedFollow, Error> {
    let id = db::id_from(&["follow", user_id, feed_id]);
    diesel::insert_into(feed_follows::table)
        .values(NewFeedFollow {
            id: &id,
            user_id,
            feed_id,
            created_at: db::current_time(),
        })
        .returning(FeedFollow::as_returning())
        .get_result(conn)
}

pub fn delete(conn: &mut SqliteConnection, user_id: &str, feed_id: &str) -> Result<usize, Error> {
    diesel::delete(
        feed_follows::table
            .filter(feed_follows::user_id.eq(user_id))
            .filter(feed_follows::feed_id.eq(feed_id)),
    )
    .execute(conn)
}

pub fn list_for_user(conn: &mut SqliteConnection, user_id: &str) -> Result<Vec<Feed>, Error> {
    feed_follows::table
        .inner_join(feeds::table)
        .filter(feed_follows::user_id.eq(user_id))
        .order(feeds::name.asc())
        .select(Feed::as_select())
        .load(conn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support;

    #[test]
    fn it_follows_and_unfollows() {
        let mut conn = test_support::connection();
        let user = test_support::user(&mut conn, "dave");
        let feed = test_support::feed(&mut conn, &user, "One", "https://example.com/rss");

        create(&mut conn, &user.id, &feed.id).unwrap();
        assert_eq!(list_for_user(&mut conn, &user.id).unwrap(), vec![feed.clone()]);

        let error = create(&mut conn, &user.id, &feed.id).unwrap_err();
        assert!(db::is_unique_violation(&error));

        assert_eq!(delete(&mut conn, &user.id, &feed.id).unwrap(), 1);
        assert!(list_for_user(&mut conn, &user.id).unwrap().is_empty());
        assert_eq!(delete(&mut conn, &user.id, &feed.id).unwrap(), 0);
    }
}
