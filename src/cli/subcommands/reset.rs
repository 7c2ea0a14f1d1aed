use clap::Command;
use diesel::sqlite::SqliteConnection;
use std::error::Error;

use feedgator::db;

pub const NAME: &str = "reset";

pub fn app() -> Command {
    Command::new(NAME).about("Delete all users along with their feeds, follows and posts")
}

pub fn execute(mut conn: SqliteConnection) -> Result<(), Box<dyn Error>> {
    let count = db::users::delete_all(&mut conn)?;
    log::info!("Deleted {} users", count);
    println!("Database has been reset");
    Ok(())
}
