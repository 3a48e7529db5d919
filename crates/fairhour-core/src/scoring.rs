//! Equity scoring: collapse per-participant statuses into one 0-100 score.
//!
//! Each tier carries a point weight (green +10, orange +5, red -15,
//! critical -50). The total is min-max normalized against the best case
//! (all green) and the worst case (all critical), so an all-green group
//! scores 100, an all-critical group scores 0, and mixed groups keep their
//! full ordering instead of saturating at the clamp boundaries.

use serde::{Deserialize, Serialize};

use crate::workhours::{ParticipantStatus, StatusTier};

/// Point weights per status tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusWeights {
    pub green: i32,
    pub orange: i32,
    pub red: i32,
    pub critical: i32,
}

impl Default for StatusWeights {
    fn default() -> Self {
        Self {
            green: 10,
            orange: 5,
            red: -15,
            critical: -50,
        }
    }
}

impl StatusWeights {
    pub fn weight(&self, tier: StatusTier) -> i32 {
        match tier {
            StatusTier::Green => self.green,
            StatusTier::Orange => self.orange,
            StatusTier::Red => self.red,
            StatusTier::Critical => self.critical,
        }
    }
}

/// Per-tier participant counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusBreakdown {
    pub green: usize,
    pub orange: usize,
    pub red: usize,
    pub critical: usize,
    pub total: usize,
}

impl StatusBreakdown {
    /// Count statuses per tier. Independent of the scoring formula.
    pub fn from_statuses(statuses: &[ParticipantStatus]) -> Self {
        let mut breakdown = Self::default();
        for status in statuses {
            match status.tier {
                StatusTier::Green => breakdown.green += 1,
                StatusTier::Orange => breakdown.orange += 1,
                StatusTier::Red => breakdown.red += 1,
                StatusTier::Critical => breakdown.critical += 1,
            }
            breakdown.total += 1;
        }
        breakdown
    }
}

/// Normalized fairness result for one (date, hour) evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquityResult {
    /// Normalized score, 0-100.
    pub score: u8,
    /// Raw weighted point total before normalization.
    pub total_points: i32,
    pub breakdown: StatusBreakdown,
}

/// Equity scoring engine.
#[derive(Debug, Clone, Default)]
pub struct EquityScorer {
    weights: StatusWeights,
}

impl EquityScorer {
    /// Engine with the default weights.
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine with custom weights.
    pub fn with_weights(weights: StatusWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &StatusWeights {
        &self.weights
    }

    /// Score a set of participant statuses.
    ///
    /// Empty input scores 0 with all counts 0.
    pub fn score(&self, statuses: &[ParticipantStatus]) -> EquityResult {
        let breakdown = StatusBreakdown::from_statuses(statuses);
        let total_points: i32 = statuses
            .iter()
            .map(|s| self.weights.weight(s.tier))
            .sum();

        let n = statuses.len() as i32;
        let max_possible = n * self.weights.green;
        let min_possible = n * self.weights.critical;

        let score = if n == 0 || max_possible == min_possible {
            0
        } else {
            let normalized = 100.0 * f64::from(total_points - min_possible)
                / f64::from(max_possible - min_possible);
            normalized.round().clamp(0.0, 100.0) as u8
        };

        EquityResult {
            score,
            total_points,
            breakdown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workhours::StatusReason;

    fn status(id: &str, tier: StatusTier) -> ParticipantStatus {
        let reason = match tier {
            StatusTier::Green => StatusReason::OptimalHours,
            StatusTier::Orange => StatusReason::AcceptableEarly,
            StatusTier::Red => StatusReason::OutsideWorkingHours,
            StatusTier::Critical => StatusReason::NonWorkingDay,
        };
        ParticipantStatus {
            participant_id: id.to_string(),
            tier,
            reason,
        }
    }

    #[test]
    fn empty_input_scores_zero() {
        let result = EquityScorer::new().score(&[]);
        assert_eq!(result.score, 0);
        assert_eq!(result.total_points, 0);
        assert_eq!(result.breakdown, StatusBreakdown::default());
    }

    #[test]
    fn single_green_scores_hundred() {
        let result = EquityScorer::new().score(&[status("a", StatusTier::Green)]);
        assert_eq!(result.score, 100);
    }

    #[test]
    fn single_critical_scores_zero() {
        let result = EquityScorer::new().score(&[status("a", StatusTier::Critical)]);
        assert_eq!(result.score, 0);
    }

    #[test]
    fn all_green_group_scores_hundred() {
        let statuses: Vec<_> = (0..5)
            .map(|i| status(&format!("p{i}"), StatusTier::Green))
            .collect();
        assert_eq!(EquityScorer::new().score(&statuses).score, 100);
    }

    #[test]
    fn all_critical_group_scores_zero() {
        let statuses: Vec<_> = (0..5)
            .map(|i| status(&format!("p{i}"), StatusTier::Critical))
            .collect();
        assert_eq!(EquityScorer::new().score(&statuses).score, 0);
    }

    #[test]
    fn mixed_green_critical_pair() {
        // New York green, Tokyo critical.
        let statuses = vec![
            status("new-york", StatusTier::Green),
            status("tokyo", StatusTier::Critical),
        ];
        let result = EquityScorer::new().score(&statuses);

        assert_eq!(result.total_points, 10 - 50);
        assert_eq!(result.breakdown.green, 1);
        assert_eq!(result.breakdown.critical, 1);
        assert_eq!(result.breakdown.total, 2);
        // min-max: 100 * (-40 - (-100)) / (20 - (-100)) = 50
        assert_eq!(result.score, 50);
    }

    #[test]
    fn breakdown_counts_all_tiers() {
        let statuses = vec![
            status("a", StatusTier::Green),
            status("b", StatusTier::Green),
            status("c", StatusTier::Orange),
            status("d", StatusTier::Red),
            status("e", StatusTier::Critical),
        ];
        let breakdown = StatusBreakdown::from_statuses(&statuses);
        assert_eq!(breakdown.green, 2);
        assert_eq!(breakdown.orange, 1);
        assert_eq!(breakdown.red, 1);
        assert_eq!(breakdown.critical, 1);
        assert_eq!(breakdown.total, 5);
    }

    #[test]
    fn orange_scores_between_red_and_green() {
        let scorer = EquityScorer::new();
        let green = scorer.score(&[status("a", StatusTier::Green)]).score;
        let orange = scorer.score(&[status("a", StatusTier::Orange)]).score;
        let red = scorer.score(&[status("a", StatusTier::Red)]).score;
        assert!(orange < green);
        assert!(red < orange);
    }

    #[test]
    fn custom_weights_are_applied() {
        let scorer = EquityScorer::with_weights(StatusWeights {
            green: 1,
            orange: 0,
            red: -1,
            critical: -2,
        });
        let result = scorer.score(&[status("a", StatusTier::Red)]);
        assert_eq!(result.total_points, -1);
        // 100 * (-1 - (-2)) / (1 - (-2)) = 33.3 -> 33
        assert_eq!(result.score, 33);
    }
}
