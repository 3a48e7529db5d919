//! Public-holiday lookup with a TTL cache and graceful degradation.
//!
//! Lookups validate their arguments, consult the cache (fresh within 7 days
//! by default), and only then reach the external source through the retrying
//! client. Persistent source failure degrades to an empty holiday list: a
//! scheduling request never hard-fails because the holiday source is down,
//! and the degradation is logged for operational monitoring.

pub mod client;

use std::sync::Arc;

use chrono::{Datelike, Duration as ChronoDuration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

pub use client::{FetchError, FetchOutcome, HolidayApiClient, RetryPolicy};

use crate::error::{EngineError, ValidationError};
use crate::storage::holiday_db::HolidayStore;

/// Supported lookup year range.
pub const MIN_YEAR: i32 = 1975;
pub const MAX_YEAR: i32 = 2100;

/// Number of concurrent fetches a batch prefetch may issue.
const PREFETCH_CONCURRENCY: usize = 4;

/// A public holiday on one calendar day (no time component).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holiday {
    pub date: NaiveDate,
    pub name: String,
    pub local_name: String,
    pub country: String,
}

/// Exact calendar-day match, ignoring time-of-day. The caller passes the
/// *local* calendar day, not the UTC day.
pub fn is_holiday<'a>(date: NaiveDate, holidays: &'a [Holiday]) -> Option<&'a Holiday> {
    holidays.iter().find(|h| h.date == date)
}

fn validate_country(code: &str) -> Result<String, ValidationError> {
    if code.len() == 2 && code.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(code.to_ascii_uppercase())
    } else {
        Err(ValidationError::InvalidCountryCode(code.to_string()))
    }
}

fn validate_year(year: i32) -> Result<(), ValidationError> {
    if (MIN_YEAR..=MAX_YEAR).contains(&year) {
        Ok(())
    } else {
        Err(ValidationError::YearOutOfRange {
            year,
            min: MIN_YEAR,
            max: MAX_YEAR,
        })
    }
}

/// Holiday lookup service: cache in front of the retrying API client.
///
/// The store is constructor-injected and the scope string isolates tenants
/// sharing one store. Clone is cheap; clones share the cache.
#[derive(Clone)]
pub struct HolidayService {
    client: HolidayApiClient,
    store: Arc<HolidayStore>,
    scope: String,
    ttl: ChronoDuration,
}

impl HolidayService {
    /// Default cache freshness window.
    pub const DEFAULT_TTL_DAYS: i64 = 7;

    pub fn new(
        client: HolidayApiClient,
        store: Arc<HolidayStore>,
        scope: impl Into<String>,
    ) -> Self {
        Self {
            client,
            store,
            scope: scope.into(),
            ttl: ChronoDuration::days(Self::DEFAULT_TTL_DAYS),
        }
    }

    pub fn with_ttl_days(mut self, days: i64) -> Self {
        self.ttl = ChronoDuration::days(days);
        self
    }

    /// Public holidays for a (country, year), cached for the TTL window.
    ///
    /// Fails only on invalid arguments. Source unavailability degrades to an
    /// empty list; a 404 is cached as an authoritative empty year.
    pub async fn fetch_holidays(&self, country: &str, year: i32) -> Result<Vec<Holiday>, EngineError> {
        let country = validate_country(country)?;
        validate_year(year)?;

        let now = Utc::now();
        let cached = match self.store.get(&self.scope, &country, year) {
            Ok(entry) => entry,
            Err(err) => {
                warn!(%country, year, error = %err, "holiday cache read failed, treating as miss");
                None
            }
        };
        if let Some(entry) = cached {
            if now - entry.cached_at < self.ttl {
                debug!(%country, year, "holiday cache hit");
                return Ok(entry.holidays);
            }
            debug!(%country, year, "holiday cache entry stale, refreshing");
        } else {
            debug!(%country, year, "holiday cache miss");
        }

        match self.client.fetch_with_retry(&country, year).await {
            FetchOutcome::Success(holidays) => {
                self.store_entry(&country, year, &holidays, now);
                Ok(holidays)
            }
            FetchOutcome::NoData => {
                debug!(%country, year, "holiday source has no data for this pair");
                self.store_entry(&country, year, &[], now);
                Ok(Vec::new())
            }
            FetchOutcome::Exhausted(err) => {
                warn!(
                    %country,
                    year,
                    error = %err,
                    "holiday lookup failed after retries, proceeding without holiday data"
                );
                Ok(Vec::new())
            }
        }
    }

    fn store_entry(
        &self,
        country: &str,
        year: i32,
        holidays: &[Holiday],
        cached_at: chrono::DateTime<Utc>,
    ) {
        if let Err(err) = self
            .store
            .upsert(&self.scope, country, year, holidays, cached_at)
        {
            warn!(%country, year, error = %err, "failed to cache holiday list");
        }
    }

    /// Warm the cache for a set of countries, current and next year, with
    /// bounded concurrency. Individual failures are logged and swallowed so
    /// one country cannot abort the batch. Returns the number of
    /// (country, year) pairs that loaded.
    pub async fn prefetch(&self, countries: &[String]) -> usize {
        let year = Utc::now().year();
        self.prefetch_years(countries, &[year, year + 1]).await
    }

    /// [`prefetch`](Self::prefetch) with an explicit year set.
    pub async fn prefetch_years(&self, countries: &[String], years: &[i32]) -> usize {
        let semaphore = Arc::new(Semaphore::new(PREFETCH_CONCURRENCY));
        let mut tasks = JoinSet::new();

        for country in countries {
            for &year in years {
                let service = self.clone();
                let country = country.clone();
                let semaphore = Arc::clone(&semaphore);
                tasks.spawn(async move {
                    let Ok(_permit) = semaphore.acquire_owned().await else {
                        return 0;
                    };
                    match service.fetch_holidays(&country, year).await {
                        Ok(holidays) => {
                            debug!(%country, year, count = holidays.len(), "prefetched");
                            1
                        }
                        Err(err) => {
                            warn!(%country, year, error = %err, "prefetch skipped");
                            0
                        }
                    }
                });
            }
        }

        let mut loaded = 0;
        while let Some(result) = tasks.join_next().await {
            loaded += result.unwrap_or(0);
        }
        info!(
            countries = countries.len(),
            years = years.len(),
            loaded,
            "holiday prefetch complete"
        );
        loaded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn country_codes_are_normalized() {
        assert_eq!(validate_country("us").unwrap(), "US");
        assert_eq!(validate_country("Jp").unwrap(), "JP");
    }

    #[test]
    fn malformed_country_codes_are_rejected() {
        assert!(validate_country("USA").is_err());
        assert!(validate_country("U").is_err());
        assert!(validate_country("U1").is_err());
        assert!(validate_country("").is_err());
    }

    #[test]
    fn year_range_is_bounded() {
        assert!(validate_year(2026).is_ok());
        assert!(validate_year(MIN_YEAR).is_ok());
        assert!(validate_year(MAX_YEAR).is_ok());
        assert!(validate_year(1974).is_err());
        assert!(validate_year(2101).is_err());
    }

    #[test]
    fn is_holiday_matches_exact_day() {
        let holidays = vec![Holiday {
            date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            name: "New Year's Day".to_string(),
            local_name: "New Year's Day".to_string(),
            country: "US".to_string(),
        }];

        let hit = is_holiday(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(), &holidays);
        assert_eq!(hit.map(|h| h.name.as_str()), Some("New Year's Day"));
        assert!(is_holiday(NaiveDate::from_ymd_opt(2026, 1, 2).unwrap(), &holidays).is_none());
    }

    #[test]
    fn is_holiday_ignores_time_of_day() {
        let holidays = vec![Holiday {
            date: NaiveDate::from_ymd_opt(2026, 12, 25).unwrap(),
            name: "Christmas Day".to_string(),
            local_name: "Christmas Day".to_string(),
            country: "DE".to_string(),
        }];

        // A local instant one second before midnight still matches once
        // reduced to its calendar day.
        let late = NaiveDate::from_ymd_opt(2026, 12, 25)
            .unwrap()
            .and_hms_opt(23, 59, 59)
            .unwrap();
        assert!(is_holiday(late.date(), &holidays).is_some());
    }
}
