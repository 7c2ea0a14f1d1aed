use clap::{Arg, ArgMatches, Command};
use diesel::sqlite::SqliteConnection;
use std::error::Error;

use crate::cli::config;
use feedgator::db;

pub const NAME: &str = "login";

pub fn app() -> Command {
    Command::new(NAME)
        .about("Switch the current user")
        .arg(Arg::new("name").help("User name").required(true))
}

pub fn execute(matches: &ArgMatches, mut conn: SqliteConnection) -> Result<(), Box<dyn Error>> {
    let name = super::required_arg(matches, "name")?;
    if db::users::find_by_name(&mut conn, name)?.is_none() {
        return Err(format!("user {} does not exist", name).into());
    }
    config::remember_user(name)?;
    println!("Logged in as {}", name);
    Ok(())
}
