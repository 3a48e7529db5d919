//! HTTP client for the external public-holiday source.
//!
//! The source exposes `GET {base}/PublicHolidays/{year}/{countryCode}`
//! returning a JSON array of holidays. A 404 is an authoritative "no data"
//! answer and is never retried; any other non-2xx status or transport error
//! is transient and retried with exponential backoff.

use std::time::Duration;

use chrono::NaiveDate;
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::error::ConfigError;
use crate::holiday::Holiday;
use crate::storage::config::HolidayApiConfig;

/// Transient failure talking to the holiday source.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("holiday source returned HTTP {0}")]
    Http(u16),
}

/// Tagged outcome of a retried fetch. The caller decides whether to degrade
/// or propagate; nothing is thrown through layers.
#[derive(Debug)]
pub enum FetchOutcome {
    /// The source answered with a holiday list.
    Success(Vec<Holiday>),
    /// The source answered 404: authoritative empty result.
    NoData,
    /// All attempts failed; the last error is attached.
    Exhausted(FetchError),
}

/// Bounded retry schedule: `max_attempts` tries with sleeps of
/// `initial_backoff`, doubled after each failed attempt.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Sleep to apply after the given 1-based failed attempt: 1s, 2s, 4s, ...
    fn backoff_after(&self, attempt: u32) -> Duration {
        self.initial_backoff * 2u32.saturating_pow(attempt.saturating_sub(1))
    }
}

/// Wire representation of one holiday entry.
///
/// The source also carries `fixed`, `global`, `counties` and `types` fields;
/// they are not consumed here and serde skips them.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HolidayDto {
    date: NaiveDate,
    name: String,
    local_name: String,
    country_code: String,
}

impl From<HolidayDto> for Holiday {
    fn from(dto: HolidayDto) -> Self {
        Holiday {
            date: dto.date,
            name: dto.name,
            local_name: dto.local_name,
            country: dto.country_code,
        }
    }
}

/// Client for the public-holiday REST source.
#[derive(Clone)]
pub struct HolidayApiClient {
    http: reqwest::Client,
    base_url: String,
    retry: RetryPolicy,
}

impl HolidayApiClient {
    /// Build a client with the default 10s request timeout and retry policy.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Self::with_timeout(base_url, Duration::from_secs(10))
    }

    /// Build a client from the engine configuration.
    pub fn from_config(config: &HolidayApiConfig) -> Result<Self, ConfigError> {
        let client = Self::with_timeout(
            &config.base_url,
            Duration::from_secs(config.timeout_secs),
        )?;
        Ok(client.with_retry(RetryPolicy {
            max_attempts: config.max_attempts,
            initial_backoff: Duration::from_millis(config.initial_backoff_ms),
        }))
    }

    fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, ConfigError> {
        Url::parse(base_url).map_err(|e| ConfigError::InvalidValue {
            key: "holiday_api.base_url".to_string(),
            message: e.to_string(),
        })?;

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ConfigError::InvalidValue {
                key: "holiday_api".to_string(),
                message: e.to_string(),
            })?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            retry: RetryPolicy::default(),
        })
    }

    /// Replace the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Single attempt. `Ok(None)` is the 404 "no data" answer.
    async fn fetch_once(
        &self,
        country: &str,
        year: i32,
    ) -> Result<Option<Vec<Holiday>>, FetchError> {
        let url = format!("{}/PublicHolidays/{}/{}", self.base_url, year, country);
        let response = self.http.get(&url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(FetchError::Http(response.status().as_u16()));
        }

        let holidays: Vec<HolidayDto> = response.json().await?;
        Ok(Some(holidays.into_iter().map(Holiday::from).collect()))
    }

    /// Fetch with the configured bounded retry loop.
    pub async fn fetch_with_retry(&self, country: &str, year: i32) -> FetchOutcome {
        let mut attempt = 1;
        loop {
            match self.fetch_once(country, year).await {
                Ok(Some(holidays)) => return FetchOutcome::Success(holidays),
                Ok(None) => return FetchOutcome::NoData,
                Err(err) if attempt < self.retry.max_attempts => {
                    let backoff = self.retry.backoff_after(attempt);
                    debug!(
                        country,
                        year,
                        attempt,
                        backoff_ms = backoff.as_millis() as u64,
                        error = %err,
                        "transient holiday fetch failure, backing off"
                    );
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                }
                Err(err) => return FetchOutcome::Exhausted(err),
            }
        }
    }
}
