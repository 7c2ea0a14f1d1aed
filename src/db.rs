use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error};
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use sha2::{Digest, Sha256};

pub mod feeds;
pub mod follows;
pub mod posts;
pub mod users;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// # Errors
///
/// Will return Err for any problem in connection to database or running migrations
pub fn setup(config: &config::Config) -> Result<SqliteConnection, Box<dyn std::error::Error>> {
    let database_url = config.get_string("database_url")?;
    open(&database_url)
}

/// Connect to the database at `database_url` and bring its schema up to date.
///
/// # Errors
///
/// Will return Err for any problem in connection to database or running migrations
pub fn open(database_url: &str) -> Result<SqliteConnection, Box<dyn std::error::Error>> {
    let mut conn = connect(database_url)?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|error| -> Box<dyn std::error::Error> { error })?;
    for version in applied {
        log::debug!("Applied migration {}", version);
    }
    Ok(conn)
}

/// # Errors
///
/// Will return Err for any problem in connection to database
pub fn connect(database_url: &str) -> Result<SqliteConnection, Box<dyn std::error::Error>> {
    let mut conn = SqliteConnection::establish(database_url)?;
    diesel::sql_query("PRAGMA foreign_keys = ON").execute(&mut conn)?;
    Ok(conn)
}

#[must_use]
pub fn current_time() -> DateTime<Utc> {
    Utc::now()
}

/// Derive a stable hex id from the given parts.
#[must_use]
pub fn id_from(parts: &[&str]) -> String {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part.as_bytes());
        hasher.update([0u8]);
    }
    format!("{:x}", hasher.finalize())
}

#[must_use]
pub fn is_unique_violation(error: &Error) -> bool {
    matches!(
        error,
        Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _)
    )
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::{feeds, users};
    use crate::models::{Feed, User};
    use diesel::sqlite::SqliteConnection;

    pub fn connection() -> SqliteConnection {
        super::open(":memory:").unwrap()
    }

    pub fn user(conn: &mut SqliteConnection, name: &str) -> User {
        users::create(conn, name).unwrap()
    }

    pub fn feed(conn: &mut SqliteConnection, user: &User, name: &str, url: &str) -> Feed {
        feeds::create(conn, user, name, url).unwrap()
    }
}
