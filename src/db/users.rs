use diesel::prelude::*;
use diesel::result::Error;
use diesel::sqlite::SqliteConnection;

use crate::db;
use crate::models::{NewUser, User};
use crate::schema::users;

pub fn create(conn: &mut SqliteConnection, name: &str) -> Result<User, Error> {
    let now = db::current_time();
    let id = db::id_from(&["user", name]);
    diesel::insert_into(users::table)
        .values(NewUser {
            id: &id,
            name,
            created_at: now,
            updated_at: now,
        })
        .returning(User::as_returning())
        .get_result(conn)
}

pub fn find_by_name(conn: &mut SqliteConnection, name: &str) -> Result<Option<User>, Error> {
    users::table
        .filter(users::name.eq(name))
        .select(User::as_select())
        .first(conn)
        .optional()
}

pub fn list(conn: &mut SqliteConnection) -> Result<Vec<User>, Error> {
    users::table
        .order(users::name.asc())
        .select(User::as_select())
        .load(conn)
}

/// Removes every user; feeds, follows and posts go with them.
pub fn delete_all(conn: &mut SqliteConnection) -> Result<usize, Error> {
    diesel::delete(users::table).execute(conn)
}

#[cfg(test)]
mod tests {
    use crate::db::test_support;
    use crate::db::{feeds, users};

    #[test]
    fn it_lists_users_by_name() {
        let mut conn = test_support::connection();
        test_support::user(&mut conn, "kahya");
        test_support::user(&mut conn, "holgith");

        let names: Vec<String> = users::list(&mut conn)
            .unwrap()
            .into_iter()
            .map(|user| user.name)
            .collect();

        assert_eq!(names, vec!["holgith", "kahya"]);
    }

    #[test]
    fn it_finds_nothing_for_unknown_names() {
        let mut conn = test_support::connection();
        assert_eq!(users::find_by_name(&mut conn, "nobody").unwrap(), None);
    }

    #[test]
    fn it_cascades_deletes_to_feeds() {
        let mut conn = test_support::connection();
        let user = test_support::user(&mut conn, "lane");
        test_support::feed(&mut conn, &user, "Lanes", "https://example.com/lane.xml");

        assert_eq!(users::delete_all(&mut conn).unwrap(), 1);
        assert!(feeds::list_with_owner(&mut conn).unwrap().is_empty());
    }
}
