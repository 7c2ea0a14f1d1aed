use clap::{value_parser, Arg, ArgMatches, Command};
use diesel::sqlite::SqliteConnection;
use std::error::Error;

use feedgator::db;

pub const NAME: &str = "browse";

pub fn app() -> Command {
    Command::new(NAME)
        .about("Show the latest posts from followed feeds")
        .arg(
            Arg::new("limit")
                .help("Number of posts to show")
                .value_parser(value_parser!(i64).range(1..)),
        )
}

pub fn execute(
    matches: &ArgMatches,
    config: &config::Config,
    mut conn: SqliteConnection,
) -> Result<(), Box<dyn Error>> {
    let limit = match matches.get_one::<i64>("limit") {
        Some(limit) => *limit,
        None => config.get_int("browse_default_limit")?,
    };

    let user = super::current_user(&mut conn, config)?;
    let posts = db::posts::list_for_user(&mut conn, &user.id, limit)?;
    log::debug!("Found {} posts for {}", posts.len(), user.name);

    for (post, feed_name) in posts {
        let published = post.published_at.map_or_else(
            || "unknown date".to_string(),
            |at| at.format("%a %b %e %Y %H:%M").to_string(),
        );
        println!("{} from {}", published, feed_name);
        println!("--- {} ---", post.title);
        println!("    {}", post.description);
        println!("Link: {}", post.url);
        println!("=====================================");
    }
    Ok(())
}
