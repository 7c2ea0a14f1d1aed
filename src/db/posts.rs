use diesel::prelude::*;
use diesel::result::Error;
use diesel::sqlite::SqliteConnection;

use crate::models::{NewPost, Post};
use crate::schema::{feed_follows, feeds, posts};

/// Insert a post. A post that already exists comes back as a
/// `DatabaseErrorKind::UniqueViolation`, see [`crate::db::is_unique_violation`].
pub fn create(conn: &mut SqliteConnection, new_post: &NewPost) -> Result<Post, Error> {
    diesel::insert_into(posts::table)
        .values(new_post)
        .returning(Post::as_returning())
        .get_result(conn)
}

pub fn list_for_feed(conn: &mut SqliteConnection, feed_id: &str) -> Result<Vec<Post>, Error> {
    posts::table
        .filter(posts::feed_id.eq(feed_id))
        .order((posts::created_at.asc(), posts::id.asc()))
        .select(Post::as_select())
        .load(conn)
}

/// Latest posts from the feeds a user follows, paired with the feed name.
/// Undated posts sort after dated ones.
pub fn list_for_user(
    conn: &mut SqliteConnection,
    user_id: &str,
    limit: i64,
) -> Result<Vec<(Post, String)>, Error> {
    let followed = feed_follows::table
        .filter(feed_follows::user_id.eq(user_id))
        .select(feed_follows::feed_id);

    posts::table
        .inner_join(feeds::table)
        .filter(posts::feed_id.eq_any(followed))
        .order((posts::published_at.desc(), posts::created_at.desc()))
        .limit(limit)
        .select((Post::as_select(), feeds::name))
        .load(conn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{self, follows, test_support};
    use chrono::{TimeZone, Utc};

    fn new_post<'a>(
        id: &'a str,
        feed_id: &'a str,
        title: &'a str,
        published_at: Option<chrono::DateTime<Utc>>,
    ) -> NewPost<'a> {
        let now = db::current_time();
        NewPost {
            id,
            feed_id,
            title,
            url: "https://example.com/post",
            description: "",
            published_at,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn it_reports_duplicates_as_unique_violations() {
        let mut conn = test_support::connection();
        let user = test_support::user(&mut conn, "dave");
        let feed = test_support::feed(&mut conn, &user, "One", "https://example.com/rss");

        create(&mut conn, &new_post("p1", &feed.id, "First", None)).unwrap();
        let error = create(&mut conn, &new_post("p1", &feed.id, "First", None)).unwrap_err();

        assert!(db::is_unique_violation(&error));
        assert_eq!(list_for_feed(&mut conn, &feed.id).unwrap().len(), 1);
    }

    #[test]
    fn it_lists_posts_from_followed_feeds_only() {
        let mut conn = test_support::connection();
        let user = test_support::user(&mut conn, "dave");
        let followed = test_support::feed(&mut conn, &user, "Followed", "https://a.example/rss");
        let ignored = test_support::feed(&mut conn, &user, "Ignored", "https://b.example/rss");
        follows::create(&mut conn, &user.id, &followed.id).unwrap();

        let early = Utc.with_ymd_and_hms(2023, 1, 2, 10, 0, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2023, 1, 3, 10, 0, 0).unwrap();
        create(&mut conn, &new_post("p1", &followed.id, "Early", Some(early))).unwrap();
        create(&mut conn, &new_post("p2", &followed.id, "Undated", None)).unwrap();
        create(&mut conn, &new_post("p3", &followed.id, "Late", Some(late))).unwrap();
        create(&mut conn, &new_post("p4", &ignored.id, "Elsewhere", Some(late))).unwrap();

        let listed = list_for_user(&mut conn, &user.id, 10).unwrap();
        let titles: Vec<&str> = listed.iter().map(|(post, _)| post.title.as_str()).collect();
        assert_eq!(titles, vec!["Late", "Early", "Undated"]);
        assert!(listed.iter().all(|(_, feed_name)| feed_name == "Followed"));

        assert_eq!(list_for_user(&mut conn, &user.id, 2).unwrap().len(), 2);
    }
}
