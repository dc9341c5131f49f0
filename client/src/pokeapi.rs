use anyhow::{Context, Result};
use async_trait::async_trait;
use pokearena_battle::{BattleError, OpponentSpecies};
use pokearena_protocol::{PokemonRecord, normalize_name, parse_pokemon, species_path};
use rand::Rng;
use reqwest::StatusCode;
use thiserror::Error;

use crate::config::{ArenaConfig, RetryPolicy};
use crate::source::OpponentSource;

/// A failed HTTP fetch
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned {status}")]
    Status { url: String, status: StatusCode },

    #[error("{url} does not exist")]
    NotFound { url: String },
}

impl FetchError {
    /// Whether trying again could help
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport { .. } => true,
            Self::Status { status, .. } => {
                status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS
            }
            Self::NotFound { .. } => false,
        }
    }
}

/// Species data source backed by PokeAPI
pub struct PokeApiClient {
    http: reqwest::Client,
    base_url: String,
    max_species_id: u32,
    retry: RetryPolicy,
}

impl PokeApiClient {
    pub fn new(config: &ArenaConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            max_species_id: config.max_species_id.max(1),
            retry: config.retry.clone(),
        })
    }

    /// Absolute URL of a path under the API root
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Fetch and parse one species record
    pub async fn species(&self, name_or_id: &str) -> Result<PokemonRecord> {
        let body = match self.get_text(&species_path(name_or_id)).await {
            Ok(body) => body,
            Err(FetchError::NotFound { .. }) => {
                return Err(BattleError::NotFound(format!("pokemon '{}'", name_or_id)).into());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to fetch pokemon '{}'", name_or_id));
            }
        };

        parse_pokemon(&body).with_context(|| format!("Failed to parse pokemon '{}'", name_or_id))
    }

    async fn get_text(&self, path: &str) -> std::result::Result<String, FetchError> {
        let url = self.url(path);
        let max_attempts = self.retry.max_attempts.max(1);
        let mut delay = self.retry.initial_delay;
        let mut attempt = 1;

        loop {
            match self.try_get(&url).await {
                Ok(body) => return Ok(body),
                Err(e) if e.is_transient() && attempt < max_attempts => {
                    tracing::warn!(
                        attempt = attempt,
                        max_attempts = max_attempts,
                        url = %url,
                        error = %e,
                        "Fetch attempt failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                    delay = self.retry.next_delay(delay);
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn try_get(&self, url: &str) -> std::result::Result<String, FetchError> {
        tracing::debug!(url = %url, "GET");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound {
                url: url.to_string(),
            });
        }
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        response.text().await.map_err(|source| FetchError::Transport {
            url: url.to_string(),
            source,
        })
    }
}

#[async_trait]
impl OpponentSource for PokeApiClient {
    async fn fetch_by_name(&self, name: &str) -> Result<OpponentSpecies> {
        let name = normalize_name(name)?;
        let record = self.species(&name).await?;
        Ok(OpponentSpecies::try_from(&record)?)
    }

    async fn fetch_random(&self) -> Result<OpponentSpecies> {
        let id = rand::thread_rng().gen_range(1..=self.max_species_id);
        let record = self.species(&id.to_string()).await?;
        Ok(OpponentSpecies::try_from(&record)?)
    }
}
