use clap::{Arg, ArgMatches, Command};
use diesel::sqlite::SqliteConnection;
use std::error::Error;

use feedgator::db;

pub const NAME: &str = "unfollow";

pub fn app() -> Command {
    Command::new(NAME)
        .about("Stop following a feed")
        .arg(Arg::new("url").help("Feed URL").required(true))
}

pub fn execute(
    matches: &ArgMatches,
    config: &config::Config,
    mut conn: SqliteConnection,
) -> Result<(), Box<dyn Error>> {
    let url = super::required_arg(matches, "url")?;
    let user = super::current_user(&mut conn, config)?;
    let feed = db::feeds::find_by_url(&mut conn, url)?
        .ok_or_else(|| format!("no feed registered for {}", url))?;

    if db::follows::delete(&mut conn, &user.id, &feed.id)? == 0 {
        return Err(format!("{} does not follow {}", user.name, feed.name).into());
    }
    println!("{} unfollowed {}", user.name, feed.name);
    Ok(())
}
