use clap::Command;
use diesel::sqlite::SqliteConnection;
use std::error::Error;

use feedgator::db;

pub const NAME: &str = "users";

pub fn app() -> Command {
    Command::new(NAME).about("List registered users")
}

pub fn execute(config: &config::Config, mut conn: SqliteConnection) -> Result<(), Box<dyn Error>> {
    let current = config.get_string("current_user_name").ok();
    for user in db::users::list(&mut conn)? {
        if current.as_deref() == Some(user.name.as_str()) {
            println!("* {} (current)", user.name);
        } else {
            println!("* {}", user.name);
        }
    }
    Ok(())
}
