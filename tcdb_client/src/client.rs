//! HTTP session for tcdb.com pages.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE, COOKIE};
use url::Url;

use crate::{
    retry::{is_retryable, RetryPolicy},
    user_agent, Error,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A page body together with the URL it was finally served from.
///
/// The final URL differs from the requested one after redirects and is the
/// base for resolving relative links in the body.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub url: Url,
    pub body: String,
}

/// HTTP session for the catalog site.
///
/// Sends browser-like headers and, when configured, the session cookie on
/// every request. Transient failures are retried according to the
/// [`RetryPolicy`].
pub struct Session {
    http: reqwest::Client,
    retry: RetryPolicy,
}

impl Session {
    /// Creates a session with the given cookie header value (empty for none)
    /// and the retry policy from the environment.
    pub fn new(cookie: &str) -> Result<Self, Error> {
        Self::with_retry(cookie, RetryPolicy::from_env())
    }

    /// Creates a session with an explicit retry policy. Used for testing.
    pub fn with_retry(cookie: &str, retry: RetryPolicy) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static(user_agent::ACCEPT_LANGUAGE),
        );
        if !cookie.is_empty() {
            let value = HeaderValue::from_str(cookie).map_err(|_| Error::InvalidCookie)?;
            headers.insert(COOKIE, value);
        }

        let http = reqwest::Client::builder()
            .user_agent(user_agent::USER_AGENT)
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(Error::Client)?;

        Ok(Self { http, retry })
    }

    /// Fetches `url`, retrying 429 and 5xx gateway statuses with exponential
    /// backoff. Other failures are returned immediately.
    pub async fn fetch(&self, url: &str) -> Result<FetchedPage, Error> {
        let target = Url::parse(url).map_err(|_| Error::InvalidUrl(url.to_string()))?;
        let mut attempt = 0usize;
        loop {
            attempt += 1;
            let resp = self
                .http
                .get(target.clone())
                .send()
                .await
                .map_err(|source| Error::Request {
                    url: url.to_string(),
                    source,
                })?;

            let status = resp.status();
            if is_retryable(status.as_u16()) && attempt < self.retry.attempts {
                let delay = self.retry.delay_for_retry(attempt);
                tracing::warn!(
                    "{} returned {} (attempt {}/{}), retrying in {:.2}s",
                    url,
                    status,
                    attempt,
                    self.retry.attempts,
                    delay.as_secs_f64()
                );
                tokio::time::sleep(delay).await;
                continue;
            }

            if !status.is_success() {
                tracing::debug!("Request to {} failed with status {}", url, status);
                return Err(Error::HttpStatus {
                    status: status.as_u16(),
                    url: url.to_string(),
                });
            }

            let final_url = resp.url().clone();
            let body = resp.text().await.map_err(|source| Error::Request {
                url: url.to_string(),
                source,
            })?;
            tracing::debug!("Fetched {} ({} bytes)", final_url, body.len());
            return Ok(FetchedPage {
                url: final_url,
                body,
            });
        }
    }
}
