use clap::ArgMatches;
use config::{Config, Environment, File, FileFormat};
use serde::Serialize;
use std::error::Error;

/// Written by `register` and `login`, read back as a config source.
pub const USER_STATE_FILE: &str = "feedgator.toml";

#[derive(Serialize)]
struct UserState<'a> {
    current_user_name: &'a str,
}

pub fn setup(app_m: &ArgMatches) -> Result<Config, Box<dyn Error>> {
    let mut builder = Config::builder()
        .set_default("debug", false)?
        .set_default("log_level", "info")?
        .set_default("database_url", "feedgator.sqlite")?
        .set_default("fetch_request_timeout", 10)?
        .set_default("browse_default_limit", 2)?
        .add_source(File::with_name("config").required(false))
        .add_source(File::new(USER_STATE_FILE, FileFormat::Toml).required(false))
        .add_source(Environment::with_prefix("FEEDGATOR"));

    if app_m.get_flag("debug") {
        builder = builder
            .set_override("debug", true)?
            .set_override("log_level", "debug")?;
    }

    Ok(builder.build()?)
}

pub fn remember_user(name: &str) -> Result<(), Box<dyn Error>> {
    let state = toml::to_string(&UserState {
        current_user_name: name,
    })?;
    std::fs::write(USER_STATE_FILE, state)?;
    Ok(())
}
