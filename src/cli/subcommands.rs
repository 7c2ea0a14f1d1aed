use clap::{ArgMatches, Command};
use diesel::sqlite::SqliteConnection;
use std::error::Error;
use std::time::Duration;

use feedgator::db;
use feedgator::models::User;

pub mod addfeed;
pub mod agg;
pub mod browse;
pub mod check;
pub mod follow;
pub mod following;
pub mod list_feeds;
pub mod list_users;
pub mod login;
pub mod register;
pub mod reset;
pub mod unfollow;

pub fn setup(app: Command) -> Command {
    app.subcommand(agg::app())
        .subcommand(register::app())
        .subcommand(login::app())
        .subcommand(list_users::app())
        .subcommand(reset::app())
        .subcommand(addfeed::app())
        .subcommand(list_feeds::app())
        .subcommand(follow::app())
        .subcommand(unfollow::app())
        .subcommand(following::app())
        .subcommand(browse::app())
        .subcommand(check::app())
}

pub async fn execute(config: &config::Config, app_m: ArgMatches) -> Result<(), Box<dyn Error>> {
    // check never touches the database
    if let Some((check::NAME, sub_m)) = app_m.subcommand() {
        return check::execute(sub_m, config).await;
    }

    let conn = db::setup(config)?;
    match app_m.subcommand() {
        Some((agg::NAME, sub_m)) => agg::execute(sub_m, config, conn).await,
        Some((register::NAME, sub_m)) => register::execute(sub_m, conn),
        Some((login::NAME, sub_m)) => login::execute(sub_m, conn),
        Some((list_users::NAME, _)) => list_users::execute(config, conn),
        Some((reset::NAME, _)) => reset::execute(conn),
        Some((addfeed::NAME, sub_m)) => addfeed::execute(sub_m, config, conn),
        Some((list_feeds::NAME, _)) => list_feeds::execute(conn),
        Some((follow::NAME, sub_m)) => follow::execute(sub_m, config, conn),
        Some((unfollow::NAME, sub_m)) => unfollow::execute(sub_m, config, conn),
        Some((following::NAME, _)) => following::execute(config, conn),
        Some((browse::NAME, sub_m)) => browse::execute(sub_m, config, conn),
        _ => Ok(()),
    }
}

fn required_arg<'a>(matches: &'a ArgMatches, id: &str) -> Result<&'a str, Box<dyn Error>> {
    matches
        .get_one::<String>(id)
        .map(String::as_str)
        .ok_or_else(|| format!("missing argument <{}>", id).into())
}

fn request_timeout(config: &config::Config) -> Result<Duration, Box<dyn Error>> {
    let seconds = u64::try_from(config.get_int("fetch_request_timeout")?)?;
    Ok(Duration::from_secs(seconds))
}

/// The user most recently named by `register` or `login`.
fn current_user(conn: &mut SqliteConnection, config: &config::Config) -> Result<User, Box<dyn Error>> {
    let name = config
        .get_string("current_user_name")
        .map_err(|_| "no current user, run `register` or `login` first")?;
    db::users::find_by_name(conn, &name)?
        .ok_or_else(|| format!("current user {} is not registered", name).into())
}
