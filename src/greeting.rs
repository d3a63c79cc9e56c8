//! AI-written greeting text.
//!
//! Issues `GET {base}/prompt/{prompt}` with the prompt percent-encoded as a
//! single path segment and takes the plain-text body as the greeting.
//! [`Greeter`] tracks the display state of the last request; a failed request
//! ends in [`GreetingState::Error`] and can be retried by calling
//! [`Greeter::fetch`] again.

use reqwest::Url;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;

use crate::config::GreetingConfig;

pub const DEFAULT_BASE_URL: &str = "https://text.pollinations.ai/";

#[derive(Debug, Error)]
pub enum GreetingError {
    #[error("invalid greeting endpoint {0}")]
    InvalidBaseUrl(String),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("No response")]
    Empty,
}

pub struct GreetingClient {
    http: reqwest::Client,
    base: Url,
}

impl GreetingClient {
    pub fn new(config: &GreetingConfig) -> Result<Self, GreetingError> {
        let base = Url::parse(&config.base_url)
            .map_err(|_| GreetingError::InvalidBaseUrl(config.base_url.clone()))?;
        if base.cannot_be_a_base() {
            return Err(GreetingError::InvalidBaseUrl(config.base_url.clone()));
        }
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { http, base })
    }

    /// `{base}/prompt/{prompt}` with the prompt encoded as one path segment.
    pub fn prompt_url(&self, prompt: &str) -> Result<Url, GreetingError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| GreetingError::InvalidBaseUrl(self.base.to_string()))?
            .pop_if_empty()
            .push("prompt")
            .push(prompt);
        Ok(url)
    }

    pub async fn fetch(&self, prompt: &str) -> Result<String, GreetingError> {
        let url = self.prompt_url(prompt)?;
        tracing::debug!(%url, "requesting greeting");
        let body = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        if body.trim().is_empty() {
            return Err(GreetingError::Empty);
        }
        Ok(body)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum GreetingState {
    #[default]
    Idle,
    Loading,
    Success(String),
    Error(String),
}

/// A greeting client plus the observable state of its latest request.
pub struct Greeter {
    client: GreetingClient,
    state: watch::Sender<GreetingState>,
}

impl Greeter {
    pub fn new(client: GreetingClient) -> Self {
        let (state, _) = watch::channel(GreetingState::Idle);
        Self { client, state }
    }

    pub fn state(&self) -> GreetingState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<GreetingState> {
        self.state.subscribe()
    }

    /// Request a greeting and return the state it ended in.
    pub async fn fetch(&self, prompt: &str) -> GreetingState {
        self.state.send_replace(GreetingState::Loading);
        let next = match self.client.fetch(prompt).await {
            Ok(text) => GreetingState::Success(text),
            Err(e) => {
                tracing::warn!(error = %e, "greeting request failed");
                GreetingState::Error(e.to_string())
            }
        };
        self.state.send_replace(next.clone());
        next
    }

    pub fn reset(&self) {
        self.state.send_replace(GreetingState::Idle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> GreetingClient {
        GreetingClient::new(&GreetingConfig {
            base_url: base.into(),
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[test]
    fn prompt_is_one_encoded_segment() {
        let url = client(DEFAULT_BASE_URL)
            .prompt_url("happy birthday / best wishes?")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://text.pollinations.ai/prompt/happy%20birthday%20%2F%20best%20wishes%3F"
        );
    }

    #[test]
    fn base_without_trailing_slash_still_joins() {
        let url = client("http://localhost:8080/api").prompt_url("hi").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/prompt/hi");
    }

    #[test]
    fn rejects_unusable_base() {
        let config = GreetingConfig {
            base_url: "mailto:someone@example.com".into(),
            timeout_secs: 5,
        };
        assert!(matches!(
            GreetingClient::new(&config),
            Err(GreetingError::InvalidBaseUrl(_))
        ));
    }

    #[tokio::test]
    async fn transport_failure_becomes_error_state_and_resets() {
        let greeter = Greeter::new(client("http://127.0.0.1:1/"));
        assert_eq!(greeter.state(), GreetingState::Idle);

        let mut rx = greeter.subscribe();
        assert_eq!(*rx.borrow_and_update(), GreetingState::Idle);

        let state = greeter.fetch("hello").await;
        assert!(matches!(state, GreetingState::Error(_)));
        assert_eq!(greeter.state(), state);
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), state);

        greeter.reset();
        assert_eq!(greeter.state(), GreetingState::Idle);
    }
}
