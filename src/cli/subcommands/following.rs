use clap::Command;
use diesel::sqlite::SqliteConnection;
use std::error::Error;

use feedgator::db;

pub const NAME: &str = "following";

pub fn app() -> Command {
    Command::new(NAME).about("List the feeds the current user follows")
}

pub fn execute(config: &config::Config, mut conn: SqliteConnection) -> Result<(), Box<dyn Error>> {
    let user = super::current_user(&mut conn, config)?;
    let feeds = db::follows::list_for_user(&mut conn, &user.id)?;
    if feeds.is_empty() {
        println!("{} is not following any feeds", user.name);
    }
    for feed in feeds {
        println!("* {} ({})", feed.name, feed.url);
    }
    Ok(())
}
