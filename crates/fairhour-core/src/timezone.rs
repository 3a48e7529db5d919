//! Timezone conversion between absolute instants and participant wall-clock
//! time.
//!
//! All conversions go through the IANA tz database via chrono-tz, so DST
//! transitions are applied exactly as the zone rules define them at the
//! instant in question. Everything here is pure and deterministic for a given
//! tz database version.

use std::str::FromStr;

use chrono::{DateTime, LocalResult, NaiveDateTime, TimeZone, Utc};
use chrono_tz::{OffsetComponents, Tz};

use crate::error::TimezoneError;

/// UTC offset of a zone at a specific instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneOffset {
    /// Total offset from UTC in minutes (standard + DST component).
    pub minutes: i32,
    /// Whether a daylight-saving offset is in effect at the instant.
    ///
    /// Informational only. Status classification relies on [`to_local`],
    /// which already applies the full offset.
    pub is_dst: bool,
}

/// Parse an IANA timezone identifier.
pub fn parse_zone(timezone: &str) -> Result<Tz, TimezoneError> {
    Tz::from_str(timezone).map_err(|_| TimezoneError::InvalidTimezone(timezone.to_string()))
}

/// Project an absolute instant into the wall-clock representation for the
/// given IANA timezone.
pub fn to_local(instant: DateTime<Utc>, timezone: &str) -> Result<DateTime<Tz>, TimezoneError> {
    Ok(instant.with_timezone(&parse_zone(timezone)?))
}

/// Inverse of [`to_local`]. Exact: the zoned datetime carries its offset, so
/// `to_utc(to_local(t, tz)) == t` for every instant and zone.
pub fn to_utc(local: &DateTime<Tz>) -> DateTime<Utc> {
    local.with_timezone(&Utc)
}

/// Resolve a raw wall-clock time in a zone to an absolute instant.
///
/// Times repeated by a DST fall-back transition resolve to the earlier
/// instant; times skipped by a spring-forward transition fail with
/// `InvalidLocalTime`.
pub fn resolve_local(naive: NaiveDateTime, timezone: &str) -> Result<DateTime<Utc>, TimezoneError> {
    let zone = parse_zone(timezone)?;
    match zone.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Ok(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _latest) => Ok(earliest.with_timezone(&Utc)),
        LocalResult::None => Err(TimezoneError::InvalidLocalTime {
            zone: timezone.to_string(),
            naive,
        }),
    }
}

/// UTC offset and DST flag for a zone at an instant.
///
/// The DST flag is read from the tz database's own DST component of the
/// offset, so Southern-hemisphere zones and zones without DST report
/// correctly.
pub fn offset_at(instant: DateTime<Utc>, timezone: &str) -> Result<ZoneOffset, TimezoneError> {
    let local = to_local(instant, timezone)?;
    let offset = local.offset();
    let total = offset.base_utc_offset() + offset.dst_offset();
    Ok(ZoneOffset {
        minutes: total.num_minutes() as i32,
        is_dst: !offset.dst_offset().is_zero(),
    })
}
