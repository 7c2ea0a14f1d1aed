use clap::{Arg, ArgMatches, Command};
use diesel::sqlite::SqliteConnection;
use std::error::Error;

use crate::cli::config;
use feedgator::db;

pub const NAME: &str = "register";

pub fn app() -> Command {
    Command::new(NAME)
        .about("Register a new user and log in as them")
        .arg(Arg::new("name").help("User name").required(true))
}

pub fn execute(matches: &ArgMatches, mut conn: SqliteConnection) -> Result<(), Box<dyn Error>> {
    let name = super::required_arg(matches, "name")?;
    let user = db::users::create(&mut conn, name).map_err(|err| -> Box<dyn Error> {
        if db::is_unique_violation(&err) {
            format!("user {} already exists", name).into()
        } else {
            err.into()
        }
    })?;
    config::remember_user(&user.name)?;
    log::debug!("Registered user {:?}", user);
    println!("User {} has been created", user.name);
    Ok(())
}
