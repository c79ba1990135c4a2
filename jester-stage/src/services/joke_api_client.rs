//! JokeAPI v2 client
//!
//! Fetches two-part jokes from `https://v2.jokeapi.dev/joke`. JokeAPI cannot
//! exclude ids server-side, so the exclusion set is ignored here and handled
//! by [`FetchRetryCoordinator`](crate::fetch::FetchRetryCoordinator).

use crate::error::SourceError;
use crate::types::JokeSource;
use async_trait::async_trait;
use jester_common::config::JokeApiConfig;
use jester_common::{Joke, JokeFlags, JokeId, JokeKind};
use serde::Deserialize;
use std::collections::HashSet;
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = concat!("jester-stage/", env!("CARGO_PKG_VERSION"));

/// JokeAPI response body
#[derive(Debug, Deserialize)]
struct JokeApiResponse {
    #[serde(default)]
    error: bool,
    message: Option<String>,
    #[serde(default)]
    id: JokeId,
    category: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    setup: Option<String>,
    delivery: Option<String>,
    /// Text of a single-form joke
    joke: Option<String>,
    #[serde(default)]
    flags: JokeApiFlags,
}

#[derive(Debug, Default, Deserialize)]
struct JokeApiFlags {
    #[serde(default)]
    nsfw: bool,
    #[serde(default)]
    religious: bool,
    #[serde(default)]
    political: bool,
    #[serde(default)]
    racist: bool,
    #[serde(default)]
    sexist: bool,
    #[serde(default)]
    explicit: bool,
}

impl JokeApiResponse {
    fn into_joke(self, safe_mode: bool) -> Result<Joke, SourceError> {
        if self.error {
            return Err(SourceError::Rejected(
                self.message.unwrap_or_else(|| "Unknown error".to_string()),
            ));
        }

        let category = self.category.unwrap_or_else(|| "Unknown".to_string());
        let kind = match self.kind.as_deref() {
            None | Some("twopart") => JokeKind::TwoPart,
            Some("single") => JokeKind::Single,
            Some(other) => {
                return Err(SourceError::Malformed(format!("Unknown joke type: {}", other)))
            }
        };

        let joke = match kind {
            JokeKind::TwoPart => Joke::two_part(
                self.id,
                category,
                self.setup.unwrap_or_default(),
                self.delivery.unwrap_or_default(),
            ),
            JokeKind::Single => Joke::single(self.id, category, self.joke.unwrap_or_default()),
        };

        let flags = JokeFlags {
            explicit: self.flags.explicit,
            political: self.flags.political,
            religious: self.flags.religious,
            racist: self.flags.racist,
            sexist: self.flags.sexist,
            nsfw: self.flags.nsfw,
        };

        Ok(joke.with_flags(flags).with_safe_mode(safe_mode))
    }
}

/// HTTP joke source backed by JokeAPI
pub struct JokeApiClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl JokeApiClient {
    pub fn new(config: &JokeApiConfig) -> Result<Self, SourceError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| SourceError::Transport(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn joke_url(&self, safe_mode: bool) -> String {
        let mut url = format!("{}/Any?type=twopart", self.base_url);
        if safe_mode {
            url.push_str("&safe-mode");
        }
        url
    }
}

#[async_trait]
impl JokeSource for JokeApiClient {
    async fn fetch(
        &self,
        safe_mode: bool,
        _exclude_ids: Option<&HashSet<JokeId>>,
    ) -> Result<Joke, SourceError> {
        let url = self.joke_url(safe_mode);
        debug!(url = %url, "Fetching joke");

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| SourceError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Transport(format!("JokeAPI returned {}", status)));
        }

        let body: JokeApiResponse = response
            .json()
            .await
            .map_err(|e| SourceError::Malformed(e.to_string()))?;

        body.into_joke(safe_mode)
    }
}
