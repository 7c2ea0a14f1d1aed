use std::time::Duration;

use crate::feeds::result::FetchError;

pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// HTTP client for feed documents. Redirects are not followed and there are
/// no retries: a feed that fails now gets another turn on a later tick.
#[derive(Clone, Debug)]
pub struct FeedFetcher {
    client: reqwest::Client,
}

impl FeedFetcher {
    /// # Errors
    ///
    /// Will return Err if the HTTP client cannot be initialized
    pub fn new(request_timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(request_timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;
        Ok(Self { client })
    }

    /// GET `url` and return the raw response body.
    ///
    /// # Errors
    ///
    /// Will return Err on transport failure, timeout, a non-2xx status or a
    /// failure while reading the body
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = match self.client.get(url).send().await {
            Err(error) if error.is_timeout() => {
                return Err(FetchError::Timedout {
                    url: String::from(url),
                    error,
                })
            }
            Err(error) => {
                return Err(FetchError::Transport {
                    url: String::from(url),
                    error,
                })
            }
            Ok(response) => response,
        };

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: String::from(url),
                status,
            });
        }

        match response.bytes().await {
            Ok(body) => {
                log::trace!("Fetched {} bytes from {}", body.len(), url);
                Ok(body.to_vec())
            }
            Err(error) if error.is_timeout() => Err(FetchError::Timedout {
                url: String::from(url),
                error,
            }),
            Err(error) => Err(FetchError::Body {
                url: String::from(url),
                error,
            }),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn fetcher() -> FeedFetcher {
        FeedFetcher::new(Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn it_returns_the_body_and_identifies_itself() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/feed.xml")
            .match_header("user-agent", Matcher::Exact(USER_AGENT.to_string()))
            .with_status(200)
            .with_header("content-type", "application/rss+xml")
            .with_body("<rss/>")
            .create_async()
            .await;

        let body = fetcher()
            .fetch(&format!("{}/feed.xml", server.url()))
            .await
            .unwrap();

        assert_eq!(body, b"<rss/>".to_vec());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn it_treats_server_errors_as_fetch_errors() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/broken")
            .with_status(500)
            .create_async()
            .await;

        let error = fetcher()
            .fetch(&format!("{}/broken", server.url()))
            .await
            .unwrap_err();

        match error {
            FetchError::Status { status, .. } => assert_eq!(status.as_u16(), 500),
            other => panic!("expected a status error, got {:?}", other),
        }
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn it_does_not_follow_redirects() {
        let mut server = Server::new_async().await;
        let redirect = server
            .mock("GET", "/old")
            .with_status(301)
            .with_header("location", "/new")
            .create_async()
            .await;
        let target = server
            .mock("GET", "/new")
            .with_status(200)
            .expect(0)
            .create_async()
            .await;

        let error = fetcher()
            .fetch(&format!("{}/old", server.url()))
            .await
            .unwrap_err();

        assert!(matches!(error, FetchError::Status { .. }));
        redirect.assert_async().await;
        target.assert_async().await;
    }

    #[tokio::test]
    async fn it_reports_transport_failures() {
        let error = fetcher().fetch("not a url").await.unwrap_err();
        assert!(matches!(error, FetchError::Transport { .. }));
    }

    #[tokio::test]
    async fn it_gives_up_on_silent_servers() {
        let url = test_support::silent_feed_url().await;
        let fetcher = FeedFetcher::new(Duration::from_millis(200)).unwrap();

        let error = tokio::time::timeout(Duration::from_secs(5), fetcher.fetch(&url))
            .await
            .expect("request timeout was not applied")
            .unwrap_err();

        assert!(matches!(error, FetchError::Timedout { .. }), "{:?}", error);
    }
}
