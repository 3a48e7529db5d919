//! Heatmap generation: equity scores for all 24 hours of a candidate day.
//!
//! For each hour of the target date the generator projects the UTC instant
//! into every participant's local time, resolves holiday and work-day flags,
//! classifies each participant and scores the group. Holiday data is
//! gathered once per unique (country, local year) pair before the hour loop,
//! so the loop itself is pure computation.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::EngineError;
use crate::holiday::{is_holiday, Holiday, HolidayService};
use crate::participant::Participant;
use crate::scoring::{EquityResult, EquityScorer};
use crate::timezone;
use crate::workhours::{classify, ParticipantStatus, WorkConfigRegistry};

/// Equity evaluation for one hour of the candidate date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapEntry {
    /// Hour of day, 0-23, in UTC.
    pub hour: u8,
    /// The absolute instant evaluated.
    pub instant: DateTime<Utc>,
    pub equity: EquityResult,
    pub statuses: Vec<ParticipantStatus>,
}

/// Cache key: candidate date plus the sorted participant identifiers, so
/// identical requests hit the cache regardless of participant order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct HeatmapKey {
    date: NaiveDate,
    participants: Vec<String>,
}

impl HeatmapKey {
    fn new(date: NaiveDate, participants: &[Participant]) -> Self {
        let mut ids: Vec<String> = participants.iter().map(|p| p.id.clone()).collect();
        ids.sort();
        Self {
            date,
            participants: ids,
        }
    }
}

/// Drives the classifier and scorer across all 24 hours of a candidate day.
pub struct HeatmapGenerator {
    holidays: HolidayService,
    configs: WorkConfigRegistry,
    scorer: EquityScorer,
    cache: RwLock<HashMap<HeatmapKey, Arc<Vec<HeatmapEntry>>>>,
}

impl HeatmapGenerator {
    pub fn new(holidays: HolidayService, configs: WorkConfigRegistry) -> Self {
        Self {
            holidays,
            configs,
            scorer: EquityScorer::new(),
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_scorer(mut self, scorer: EquityScorer) -> Self {
        self.scorer = scorer;
        self
    }

    /// The 24-entry heatmap for a candidate date, cached per
    /// (date, participant set).
    pub async fn generate(
        &self,
        date: NaiveDate,
        participants: &[Participant],
    ) -> Result<Arc<Vec<HeatmapEntry>>, EngineError> {
        let key = HeatmapKey::new(date, participants);
        if let Ok(cache) = self.cache.read() {
            if let Some(entries) = cache.get(&key) {
                debug!(%date, "heatmap cache hit");
                return Ok(Arc::clone(entries));
            }
        }

        // Unknown zones fail the whole request before any network traffic.
        let zones = participants
            .iter()
            .map(|p| timezone::parse_zone(&p.timezone))
            .collect::<Result<Vec<Tz>, _>>()?;

        let midnight = Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN));
        let instants: Vec<DateTime<Utc>> =
            (0..24).map(|h| midnight + Duration::hours(h)).collect();

        // Local wall-clock per (hour, participant).
        let locals: Vec<Vec<DateTime<Tz>>> = instants
            .iter()
            .map(|instant| zones.iter().map(|tz| instant.with_timezone(tz)).collect())
            .collect();

        // One holiday lookup per unique (country, local year) pair; around a
        // year boundary a participant's local year can differ from the
        // request date's year.
        let mut pairs: BTreeSet<(String, i32)> = BTreeSet::new();
        for row in &locals {
            for (participant, local) in participants.iter().zip(row) {
                pairs.insert((participant.country.to_ascii_uppercase(), local.year()));
            }
        }
        let mut holiday_lists: HashMap<(String, i32), Vec<Holiday>> = HashMap::new();
        for (country, year) in pairs {
            let holidays = self.holidays.fetch_holidays(&country, year).await?;
            holiday_lists.insert((country, year), holidays);
        }

        let entries: Vec<HeatmapEntry> = instants
            .iter()
            .zip(&locals)
            .enumerate()
            .map(|(hour, (instant, row))| {
                let statuses: Vec<ParticipantStatus> = participants
                    .iter()
                    .zip(row)
                    .map(|(participant, local)| {
                        let lookup = (participant.country.to_ascii_uppercase(), local.year());
                        let holidays = holiday_lists
                            .get(&lookup)
                            .map(Vec::as_slice)
                            .unwrap_or(&[]);
                        let holiday = is_holiday(local.date_naive(), holidays);
                        let config = self.configs.get(&participant.country);
                        let (tier, reason) = classify(local.naive_local(), config, holiday);
                        ParticipantStatus {
                            participant_id: participant.id.clone(),
                            tier,
                            reason,
                        }
                    })
                    .collect();

                HeatmapEntry {
                    hour: hour as u8,
                    instant: *instant,
                    equity: self.scorer.score(&statuses),
                    statuses,
                }
            })
            .collect();

        let entries = Arc::new(entries);
        if let Ok(mut cache) = self.cache.write() {
            cache.insert(key, Arc::clone(&entries));
        }
        Ok(entries)
    }
}

/// Best meeting hours, score descending; equal scores order by hour
/// ascending so output is reproducible.
pub fn top_suggestions(entries: &[HeatmapEntry], count: usize) -> Vec<HeatmapEntry> {
    let mut ranked = entries.to_vec();
    ranked.sort_by(|a, b| {
        b.equity
            .score
            .cmp(&a.equity.score)
            .then(a.hour.cmp(&b.hour))
    });
    ranked.truncate(count);
    ranked
}

/// Render a heatmap as an ASCII table for terminal display.
pub fn render_ascii(date: NaiveDate, entries: &[HeatmapEntry]) -> String {
    let mut output = String::new();

    output.push_str(&format!("\nEquity heatmap for {date}\n"));
    output.push_str(&"=".repeat(72));
    output.push('\n');

    if entries.is_empty() {
        output.push_str("No hours evaluated.\n");
        return output;
    }

    for entry in entries {
        let bar_len = (entry.equity.score / 10) as usize;
        let breakdown = entry.equity.breakdown;
        output.push_str(&format!(
            "{:02}:00 UTC  {:<10} {:>3}   green {}  orange {}  red {}  critical {}\n",
            entry.hour,
            "\u{2588}".repeat(bar_len),
            entry.equity.score,
            breakdown.green,
            breakdown.orange,
            breakdown.red,
            breakdown.critical,
        ));
    }

    output.push_str(&"=".repeat(72));
    output.push('\n');

    let best = top_suggestions(entries, 3);
    if !best.is_empty() {
        output.push_str("Best hours:\n");
        for entry in best {
            output.push_str(&format!(
                "  {:02}:00 UTC - score {}\n",
                entry.hour, entry.equity.score
            ));
        }
    }

    output
}
