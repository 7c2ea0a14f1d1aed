use clap::{Arg, ArgMatches, Command};
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use std::error::Error;
use url::Url;

use feedgator::db;

pub const NAME: &str = "addfeed";

pub fn app() -> Command {
    Command::new(NAME)
        .about("Register a feed and follow it as the current user")
        .arg(Arg::new("name").help("Display name").required(true))
        .arg(Arg::new("url").help("Feed URL").required(true))
}

pub fn execute(
    matches: &ArgMatches,
    config: &config::Config,
    mut conn: SqliteConnection,
) -> Result<(), Box<dyn Error>> {
    let name = super::required_arg(matches, "name")?;
    let url = super::required_arg(matches, "url")?.trim();
    validate_feed_url(url)?;

    let user = super::current_user(&mut conn, config)?;
    let feed = conn
        .transaction(|conn| {
            let feed = db::feeds::create(conn, &user, name, url)?;
            db::follows::create(conn, &user.id, &feed.id)?;
            Ok::<_, diesel::result::Error>(feed)
        })
        .map_err(|err| -> Box<dyn Error> {
            if db::is_unique_violation(&err) {
                format!("feed {} is already registered", url).into()
            } else {
                err.into()
            }
        })?;

    println!("Added feed {} ({}) for {}", feed.name, feed.url, user.name);
    Ok(())
}

fn validate_feed_url(url: &str) -> Result<(), Box<dyn Error>> {
    let parsed = Url::parse(url).map_err(|err| format!("invalid feed url {} - {}", url, err))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(format!("unsupported feed url scheme {}", scheme).into()),
    }
}
