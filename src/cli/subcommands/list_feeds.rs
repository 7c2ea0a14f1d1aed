use clap::Command;
use diesel::sqlite::SqliteConnection;
use std::error::Error;

use feedgator::db;

pub const NAME: &str = "feeds";

pub fn app() -> Command {
    Command::new(NAME).about("List every registered feed")
}

pub fn execute(mut conn: SqliteConnection) -> Result<(), Box<dyn Error>> {
    for (feed, owner) in db::feeds::list_with_owner(&mut conn)? {
        let fetched = feed
            .last_fetched_at
            .map_or_else(|| "never".to_string(), |at| at.to_rfc3339());
        println!("* {} ({})", feed.name, feed.url);
        println!("    added by {}, last fetched {}", owner.name, fetched);
    }
    Ok(())
}
