use reqwest::blocking::Client;
use reqwest::StatusCode;
use thiserror::Error;
use tracing::info;
use url::Url;

const USER_AGENT: &str = "Mozilla/5.0";

/// A fetched page: the decoded body plus the final post-redirect URL, which
/// anchors relative image links during extraction.
#[derive(Debug)]
pub struct FetchedPage {
    pub url: Url,
    pub body: String,
}

#[derive(Debug, Error)]
pub enum FetchError {
    /// No usable response: bad URL, DNS, connect, timeout or body decode.
    #[error("request for {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    /// The server answered with a client or server error status.
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: StatusCode },
}

impl FetchError {
    fn request(url: &str, source: reqwest::Error) -> Self {
        FetchError::Request {
            url: url.to_string(),
            source,
        }
    }
}

/// GET one page. Any 4xx or 5xx status is an error even though a body
/// arrived; redirects are followed silently.
pub fn fetch_page(url: &str) -> Result<FetchedPage, FetchError> {
    info!("Fetching page: {}", url);

    let client = Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| FetchError::request(url, e))?;

    let response = client.get(url).send().map_err(|e| FetchError::request(url, e))?;

    let status = response.status();
    if status.is_client_error() || status.is_server_error() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status,
        });
    }

    let final_url = response.url().clone();
    let body = response.text().map_err(|e| FetchError::request(url, e))?;
    Ok(FetchedPage {
        url: final_url,
        body,
    })
}
