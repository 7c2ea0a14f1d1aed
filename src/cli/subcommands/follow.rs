use clap::{Arg, ArgMatches, Command};
use diesel::sqlite::SqliteConnection;
use std::error::Error;

use feedgator::db;

pub const NAME: &str = "follow";

pub fn app() -> Command {
    Command::new(NAME)
        .about("Follow a registered feed as the current user")
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

    db::follows::create(&mut conn, &user.id, &feed.id).map_err(|err| -> Box<dyn Error> {
        if db::is_unique_violation(&err) {
            format!("{} already follows {}", user.name, feed.name).into()
        } else {
            err.into()
        }
    })?;
    println!("{} now follows {}", user.name, feed.name);
    Ok(())
}
