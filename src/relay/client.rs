//! HTTP client for the relay server

use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::command::{Command, MAX_BRIGHTNESS, RelayId};
use crate::{Error, Result};

use super::types::{Outcome, RelayStatus, StatusMap};

/// Issues the relay server's GET requests
#[derive(Clone)]
pub struct RelayClient {
    base_url: String,
    client: reqwest::Client,
}

impl RelayClient {
    /// Create a client for the server at `base_url` (e.g. `http://127.0.0.1:3000`)
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Server base URL without a trailing slash
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the state of every relay
    ///
    /// # Errors
    ///
    /// Returns error on network failure, non-2xx status, or malformed JSON
    pub async fn status(&self) -> Result<StatusMap> {
        self.get("/status").await
    }

    /// Switch a relay on or off
    ///
    /// # Errors
    ///
    /// Returns error on network failure, non-2xx status, or malformed JSON
    pub async fn set_power(&self, relay: RelayId, on: bool) -> Result<RelayStatus> {
        let action = if on { "on" } else { "off" };
        self.get(&format!("/relay/{relay}/{action}")).await
    }

    /// Set a relay's brightness, clamped to 0-100
    ///
    /// # Errors
    ///
    /// Returns error on network failure, non-2xx status, or malformed JSON
    pub async fn set_brightness(&self, relay: RelayId, level: u8) -> Result<RelayStatus> {
        let level = level.min(MAX_BRIGHTNESS);
        self.get(&format!("/relay/{relay}/brightness/{level}")).await
    }

    /// Send the request matching `command`
    ///
    /// [`Command::Unrecognized`] makes no request.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails
    pub async fn dispatch(&self, command: &Command) -> Result<Outcome> {
        match command {
            Command::QueryState => self.status().await.map(Outcome::Status),
            Command::SetPower { relay, on } => {
                let status = self.set_power(*relay, *on).await?;
                Ok(Outcome::Power {
                    relay: *relay,
                    status,
                })
            }
            Command::SetBrightness { relay, level } => {
                let status = self.set_brightness(*relay, *level).await?;
                Ok(Outcome::Brightness {
                    relay: *relay,
                    status,
                })
            }
            Command::Unrecognized(text) => Ok(Outcome::Unrecognized(text.clone())),
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{path}", self.base_url);
        tracing::debug!(url = %url, "relay request");

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Relay {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }
}
