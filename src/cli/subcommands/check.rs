use clap::{Arg, ArgMatches, Command};
use std::error::Error;

use feedgator::feeds::{self, dates, FeedFetcher};

pub const NAME: &str = "check";

pub fn app() -> Command {
    Command::new(NAME).about("Check parsing for a feed").arg(
        Arg::new("url")
            .long("url")
            .help("Feed URL")
            .required(true),
    )
}

pub async fn execute(matches: &ArgMatches, config: &config::Config) -> Result<(), Box<dyn Error>> {
    let url = super::required_arg(matches, "url")?;
    let fetcher = FeedFetcher::new(super::request_timeout(config)?)?;

    log::info!("Fetching {}", url);
    let feed = feeds::fetch_and_parse(&fetcher, url).await?;
    log::info!("Parsed {} items from {}", feed.items.len(), url);

    for item in feed.items.iter().filter(|item| !item.pub_date.trim().is_empty()) {
        if let Err(err) = dates::normalize(&item.pub_date) {
            log::warn!("Item {} would be stored undated - {}", item.link, err);
        }
    }

    println!("{}", serde_json::to_string_pretty(&feed)?);
    Ok(())
}
