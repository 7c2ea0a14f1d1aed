table! {
    feed_follows (id) {
        id -> Text,
        user_id -> Text,
        feed_id -> Text,
        created_at -> TimestamptzSqlite,
    }
}

table! {
    feeds (id) {
        id -> Text,
        name -> Text,
        url -> Text,
        user_id -> Text,
        created_at -> TimestamptzSqlite,
        updated_at -> TimestamptzSqlite,
        last_fetched_at -> Nullable<TimestamptzSqlite>,
    }
}

table! {
    posts (id) {
        id -> Text,
        feed_id -> Text,
        title -> Text,
        url -> Text,
        description -> Text,
        published_at -> Nullable<TimestamptzSqlite>,
        created_at -> TimestamptzSqlite,
        updated_at -> TimestamptzSqlite,
    }
}

table! {
    users (id) {
        id -> Text,
        name -> Text,
        created_at -> TimestamptzSqlite,
        updated_at -> TimestamptzSqlite,
    }
}

joinable!(feed_follows -> feeds (feed_id));
joinable!(feed_follows -> users (user_id));
joinable!(feeds -> users (user_id));
joinable!(posts -> feeds (feed_id));

allow_tables_to_appear_in_same_query!(feed_follows, feeds, posts, users,);
