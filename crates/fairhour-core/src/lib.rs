//! # Fairhour Core Library
//!
//! This library implements the meeting-equity scheduling engine: given a
//! group of participants spread across time zones and countries, it scores
//! how fair each hour of a candidate day is for a meeting.
//!
//! ## Architecture
//!
//! - **Timezone conversion**: DST-correct projection between UTC instants
//!   and participant wall-clock time via the IANA tz database
//! - **Working-hours classifier**: per-country policy windows mapped to
//!   ordered status tiers (green/orange/red/critical)
//! - **Holiday lookup**: external public-holiday source behind a SQLite
//!   cache with a 7-day freshness window, bounded retries and graceful
//!   degradation
//! - **Equity scoring**: normalized 0-100 fairness score plus a per-tier
//!   breakdown
//! - **Heatmap generation**: the 24 hourly evaluations for one candidate
//!   date, cached per participant set, with ranked suggestions
//!
//! ## Key Components
//!
//! - [`HeatmapGenerator`]: drives a full 24-hour evaluation
//! - [`HolidayService`]: cached, retrying holiday lookups
//! - [`EquityScorer`]: status aggregation and normalization
//! - [`WorkConfigRegistry`]: per-country working-hours policies

pub mod error;
pub mod heatmap;
pub mod holiday;
pub mod participant;
pub mod scoring;
pub mod storage;
pub mod timezone;
pub mod workhours;

pub use error::{ConfigError, EngineError, StorageError, TimezoneError, ValidationError};
pub use heatmap::{render_ascii, top_suggestions, HeatmapEntry, HeatmapGenerator};
pub use holiday::{
    is_holiday, FetchOutcome, Holiday, HolidayApiClient, HolidayService, RetryPolicy,
};
pub use participant::Participant;
pub use scoring::{EquityResult, EquityScorer, StatusBreakdown, StatusWeights};
pub use storage::{EngineConfig, HolidayStore};
pub use timezone::{offset_at, resolve_local, to_local, to_utc, ZoneOffset};
pub use workhours::{
    classify, CountryWorkConfig, ParticipantStatus, StatusReason, StatusTier, WorkConfigRegistry,
};
