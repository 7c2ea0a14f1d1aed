use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::{feed_follows, feeds, posts, users};

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = users)]
pub struct User {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = users)]
pub struct NewUser<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A registered feed. `last_fetched_at` is only ever written by the
/// aggregator when it claims the feed for a fetch.
#[derive(Queryable, Selectable, Identifiable, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = feeds)]
pub struct Feed {
    pub id: String,
    pub name: String,
    pub url: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_fetched_at: Option<DateTime<Utc>>,
}

#[derive(Insertable)]
#[diesel(table_name = feeds)]
pub struct NewFeed<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub url: &'a str,
    pub user_id: &'a str,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = feed_follows)]
pub struct FeedFollow {
    pub id: String,
    pub user_id: String,
    pub feed_id: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = feed_follows)]
pub struct NewFeedFollow<'a> {
    pub id: &'a str,
    pub user_id: &'a str,
    pub feed_id: &'a str,
    pub created_at: DateTime<Utc>,
}

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = posts)]
pub struct Post {
    pub id: String,
    pub feed_id: String,
    pub title: String,
    pub url: String,
    pub description: String,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = posts)]
pub struct NewPost<'a> {
    pub id: &'a str,
    pub feed_id: &'a str,
    pub title: &'a str,
    pub url: &'a str,
    pub description: &'a str,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
