//! Working-hours status classification.
//!
//! Given a participant's local wall-clock time, the per-country working-hours
//! policy and the holiday flag, a single status tier is assigned in strict
//! priority order: holiday, non-working day, optimal window, acceptable
//! buffer windows, outside hours.

use std::collections::HashMap;
use std::fmt;

use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::holiday::Holiday;

/// Ordered fairness tiers for a single participant at a single hour, from
/// optimal to unacceptable.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum StatusTier {
    Green,
    Orange,
    Red,
    Critical,
}

impl StatusTier {
    pub fn label(&self) -> &'static str {
        match self {
            StatusTier::Green => "green",
            StatusTier::Orange => "orange",
            StatusTier::Red => "red",
            StatusTier::Critical => "critical",
        }
    }
}

/// Why a participant landed in a tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "detail")]
pub enum StatusReason {
    NationalHoliday(String),
    NonWorkingDay,
    OptimalHours,
    AcceptableEarly,
    AcceptableLate,
    OutsideWorkingHours,
}

impl fmt::Display for StatusReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusReason::NationalHoliday(name) => write!(f, "national holiday: {name}"),
            StatusReason::NonWorkingDay => write!(f, "non-working day"),
            StatusReason::OptimalHours => write!(f, "optimal hours"),
            StatusReason::AcceptableEarly => write!(f, "acceptable, early"),
            StatusReason::AcceptableLate => write!(f, "acceptable, late"),
            StatusReason::OutsideWorkingHours => write!(f, "outside working hours"),
        }
    }
}

/// Computed status for one participant at one candidate hour. Derived,
/// recomputed per (participant, hour) pair, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantStatus {
    pub participant_id: String,
    pub tier: StatusTier,
    pub reason: StatusReason,
}

/// Per-country working-hours policy.
///
/// Time windows are `HH:MM[:SS]` strings; the classifier compares
/// minutes-since-midnight with half-open `[start, end)` windows. Window
/// ordering (morning orange before green, evening orange after green, no
/// overlap) is a caller contract checked by [`CountryWorkConfig::validate`]
/// at configuration-entry time, not at classification time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryWorkConfig {
    pub green_start: String,
    pub green_end: String,
    pub orange_morning_start: String,
    pub orange_morning_end: String,
    pub orange_evening_start: String,
    pub orange_evening_end: String,
    /// Weekdays that count as working days, 0=Sun .. 6=Sat.
    pub work_days: Vec<u8>,
}

impl Default for CountryWorkConfig {
    fn default() -> Self {
        Self {
            green_start: "09:00".to_string(),
            green_end: "18:00".to_string(),
            orange_morning_start: "08:00".to_string(),
            orange_morning_end: "09:00".to_string(),
            orange_evening_start: "18:00".to_string(),
            orange_evening_end: "20:00".to_string(),
            work_days: vec![1, 2, 3, 4, 5],
        }
    }
}

impl CountryWorkConfig {
    /// Validate field syntax and window ordering.
    ///
    /// For use when configurations are entered or edited; the classifier
    /// assumes valid input.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let fields = [
            ("green_start", &self.green_start),
            ("green_end", &self.green_end),
            ("orange_morning_start", &self.orange_morning_start),
            ("orange_morning_end", &self.orange_morning_end),
            ("orange_evening_start", &self.orange_evening_start),
            ("orange_evening_end", &self.orange_evening_end),
        ];
        for (name, value) in fields {
            if parse_time_strict(value).is_none() {
                return Err(ValidationError::InvalidValue {
                    field: name.to_string(),
                    message: format!("'{value}' is not a HH:MM[:SS] time"),
                });
            }
        }

        let green = (
            parse_time_to_minutes(&self.green_start),
            parse_time_to_minutes(&self.green_end),
        );
        let morning = (
            parse_time_to_minutes(&self.orange_morning_start),
            parse_time_to_minutes(&self.orange_morning_end),
        );
        let evening = (
            parse_time_to_minutes(&self.orange_evening_start),
            parse_time_to_minutes(&self.orange_evening_end),
        );

        if morning.1 > green.0 {
            return Err(ValidationError::InvalidValue {
                field: "orange_morning_end".to_string(),
                message: "morning window must end at or before green_start".to_string(),
            });
        }
        if evening.0 < green.1 {
            return Err(ValidationError::InvalidValue {
                field: "orange_evening_start".to_string(),
                message: "evening window must start at or after green_end".to_string(),
            });
        }

        for day in &self.work_days {
            if *day > 6 {
                return Err(ValidationError::InvalidValue {
                    field: "work_days".to_string(),
                    message: format!("weekday {day} out of range 0..=6"),
                });
            }
        }
        Ok(())
    }

    fn is_work_day(&self, day_from_sunday: u8) -> bool {
        self.work_days.contains(&day_from_sunday)
    }
}

/// Parse a `HH:MM[:SS]` string to minutes since midnight, strictly.
fn parse_time_strict(time_str: &str) -> Option<i64> {
    let parts: Vec<&str> = time_str.split(':').collect();
    if parts.len() != 2 && parts.len() != 3 {
        return None;
    }
    let hours: i64 = parts[0].parse().ok()?;
    let minutes: i64 = parts[1].parse().ok()?;
    if parts.len() == 3 {
        let _seconds: i64 = parts[2].parse().ok()?;
    }
    if hours > 23 || minutes > 59 {
        return None;
    }
    Some(hours * 60 + minutes)
}

/// Parse a `HH:MM[:SS]` string to minutes since midnight.
///
/// Lenient: seconds are truncated and malformed components read as 0
/// (malformed configuration is a caller contract violation).
pub fn parse_time_to_minutes(time_str: &str) -> i64 {
    let parts: Vec<&str> = time_str.split(':').collect();
    if parts.len() == 2 || parts.len() == 3 {
        let hours: i64 = parts[0].parse().unwrap_or(0);
        let minutes: i64 = parts[1].parse().unwrap_or(0);
        hours * 60 + minutes
    } else {
        0
    }
}

/// Classify a participant's local time against a working-hours policy.
///
/// Priority order, first match wins:
/// 1. holiday on the local calendar date -> Critical
/// 2. local weekday not a working day    -> Critical
/// 3. within `[green_start, green_end)`  -> Green
/// 4. within a morning/evening orange window -> Orange
/// 5. otherwise -> Red
pub fn classify(
    local: NaiveDateTime,
    config: &CountryWorkConfig,
    holiday: Option<&Holiday>,
) -> (StatusTier, StatusReason) {
    if let Some(holiday) = holiday {
        return (
            StatusTier::Critical,
            StatusReason::NationalHoliday(holiday.name.clone()),
        );
    }

    let day = local.weekday().num_days_from_sunday() as u8;
    if !config.is_work_day(day) {
        return (StatusTier::Critical, StatusReason::NonWorkingDay);
    }

    let t = local.hour() as i64 * 60 + local.minute() as i64;
    let in_window = |start: &str, end: &str| {
        let s = parse_time_to_minutes(start);
        let e = parse_time_to_minutes(end);
        s <= t && t < e
    };

    if in_window(&config.green_start, &config.green_end) {
        return (StatusTier::Green, StatusReason::OptimalHours);
    }
    if in_window(&config.orange_morning_start, &config.orange_morning_end) {
        return (StatusTier::Orange, StatusReason::AcceptableEarly);
    }
    if in_window(&config.orange_evening_start, &config.orange_evening_end) {
        return (StatusTier::Orange, StatusReason::AcceptableLate);
    }

    (StatusTier::Red, StatusReason::OutsideWorkingHours)
}

/// Per-country config lookup with a system default fallback.
#[derive(Debug, Clone, Default)]
pub struct WorkConfigRegistry {
    configs: HashMap<String, CountryWorkConfig>,
    fallback: CountryWorkConfig,
}

impl WorkConfigRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from per-country entries, keeping the system default
    /// as fallback.
    pub fn from_configs(configs: HashMap<String, CountryWorkConfig>) -> Self {
        let configs = configs
            .into_iter()
            .map(|(country, config)| (country.to_ascii_uppercase(), config))
            .collect();
        Self {
            configs,
            fallback: CountryWorkConfig::default(),
        }
    }

    pub fn insert(&mut self, country: impl Into<String>, config: CountryWorkConfig) {
        self.configs
            .insert(country.into().to_ascii_uppercase(), config);
    }

    /// Config for a country, or the system default if absent.
    pub fn get(&self, country: &str) -> &CountryWorkConfig {
        self.configs
            .get(&country.to_ascii_uppercase())
            .unwrap_or(&self.fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn local(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, 0)
            .unwrap()
    }

    fn holiday(y: i32, mo: u32, d: u32) -> Holiday {
        Holiday {
            date: NaiveDate::from_ymd_opt(y, mo, d).unwrap(),
            name: "New Year's Day".to_string(),
            local_name: "New Year's Day".to_string(),
            country: "US".to_string(),
        }
    }

    #[test]
    fn holiday_wins_over_green_hours() {
        let config = CountryWorkConfig::default();
        // Thursday 2026-01-01, 10:00 local: would be green.
        let h = holiday(2026, 1, 1);
        let (tier, reason) = classify(local(2026, 1, 1, 10, 0), &config, Some(&h));
        assert_eq!(tier, StatusTier::Critical);
        assert!(matches!(reason, StatusReason::NationalHoliday(_)));
    }

    #[test]
    fn weekend_is_critical_even_during_green_hours() {
        let config = CountryWorkConfig::default();
        // 2026-08-09 is a Sunday.
        let (tier, reason) = classify(local(2026, 8, 9, 10, 0), &config, None);
        assert_eq!(tier, StatusTier::Critical);
        assert_eq!(reason, StatusReason::NonWorkingDay);
    }

    #[test]
    fn early_buffer_is_orange() {
        let config = CountryWorkConfig::default();
        // Monday 08:30 with green 09:00 and morning orange 08:00-09:00.
        let (tier, reason) = classify(local(2026, 8, 10, 8, 30), &config, None);
        assert_eq!(tier, StatusTier::Orange);
        assert_eq!(reason, StatusReason::AcceptableEarly);
    }

    #[test]
    fn late_buffer_is_orange() {
        let config = CountryWorkConfig::default();
        let (tier, reason) = classify(local(2026, 8, 10, 19, 0), &config, None);
        assert_eq!(tier, StatusTier::Orange);
        assert_eq!(reason, StatusReason::AcceptableLate);
    }

    #[test]
    fn window_boundaries_are_half_open() {
        let config = CountryWorkConfig::default();
        // green_start is inclusive
        let (tier, _) = classify(local(2026, 8, 10, 9, 0), &config, None);
        assert_eq!(tier, StatusTier::Green);
        // orange_morning_end == green_start: the boundary minute is green, not
        // double-counted as orange
        let (tier, reason) = classify(local(2026, 8, 10, 8, 59), &config, None);
        assert_eq!(tier, StatusTier::Orange);
        assert_eq!(reason, StatusReason::AcceptableEarly);
        // green_end is exclusive; the evening window picks it up
        let (tier, reason) = classify(local(2026, 8, 10, 18, 0), &config, None);
        assert_eq!(tier, StatusTier::Orange);
        assert_eq!(reason, StatusReason::AcceptableLate);
        // orange_evening_end is exclusive
        let (tier, _) = classify(local(2026, 8, 10, 20, 0), &config, None);
        assert_eq!(tier, StatusTier::Red);
    }

    #[test]
    fn outside_all_windows_is_red() {
        let config = CountryWorkConfig::default();
        let (tier, reason) = classify(local(2026, 8, 10, 3, 0), &config, None);
        assert_eq!(tier, StatusTier::Red);
        assert_eq!(reason, StatusReason::OutsideWorkingHours);
    }

    #[test]
    fn time_parsing_accepts_seconds() {
        assert_eq!(parse_time_to_minutes("08:00"), 480);
        assert_eq!(parse_time_to_minutes("09:30:45"), 570);
        assert_eq!(parse_time_to_minutes("23:59"), 1439);
        assert_eq!(parse_time_to_minutes(""), 0);
    }

    #[test]
    fn validate_accepts_default() {
        assert!(CountryWorkConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_overlapping_morning_window() {
        let config = CountryWorkConfig {
            orange_morning_end: "10:00".to_string(),
            ..CountryWorkConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_malformed_time() {
        let config = CountryWorkConfig {
            green_start: "9am".to_string(),
            ..CountryWorkConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_out_of_range_weekday() {
        let config = CountryWorkConfig {
            work_days: vec![1, 7],
            ..CountryWorkConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn registry_falls_back_to_default() {
        let mut registry = WorkConfigRegistry::new();
        registry.insert(
            "jp",
            CountryWorkConfig {
                green_end: "17:00".to_string(),
                ..CountryWorkConfig::default()
            },
        );
        assert_eq!(registry.get("JP").green_end, "17:00");
        assert_eq!(registry.get("US"), &CountryWorkConfig::default());
    }
}
