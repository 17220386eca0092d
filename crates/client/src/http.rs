//! reqwest-backed [`DataFetcher`].

use std::future::Future;
use std::pin::Pin;

use chrono::{DateTime, Utc};
use reqwest::Url;
use roadwatch_disruptions::{DataFetcher, DisruptionError, Result};

use crate::config::ClientConfig;

/// Shared HTTP client; cheap to clone
#[derive(Clone, Debug)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.as_str());
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(transport)?;
        Ok(Self { client })
    }
}

impl DataFetcher for HttpFetcher {
    fn fetch<'a>(
        &'a self,
        url: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<u8>>> + Send + 'a>> {
        Box::pin(async move {
            let response = self.client.get(url).send().await.map_err(transport)?;

            let status = response.status();
            if !status.is_success() {
                return Err(DisruptionError::Transport(format!(
                    "HTTP {} from {}",
                    status, url
                )));
            }

            let bytes = response.bytes().await.map_err(transport)?;
            tracing::trace!(url, bytes = bytes.len(), "Fetched");
            Ok(bytes.to_vec())
        })
    }
}

/// Append a `t=<unix millis>` parameter so intermediate caches serve a
/// fresh copy of the feed.
pub fn with_cache_buster(url: &str, now: DateTime<Utc>) -> Result<String> {
    let mut url = parse_url(url)?;
    url.query_pairs_mut()
        .append_pair("t", &now.timestamp_millis().to_string());
    Ok(url.into())
}

pub(crate) fn parse_url(url: &str) -> Result<Url> {
    Url::parse(url)
        .map_err(|err| DisruptionError::Transport(format!("Invalid URL {}: {}", url, err)))
}

fn transport(err: reqwest::Error) -> DisruptionError {
    DisruptionError::Transport(err.to_string())
}
