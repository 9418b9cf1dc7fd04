//! Scoring arithmetic: a goal is worth six points, a behind one.

use serde::{Deserialize, Serialize};

use crate::models::common::MatchResult;
use crate::models::match_record::{MatchRecord, QuarterLine};

pub const POINTS_PER_GOAL: i64 = 6;

/// Hard ceiling for any single goals/behinds/points value. Larger values are
/// rejected by validation; arithmetic below saturates instead of wrapping.
pub const MAX_SCORE_VALUE: i64 = 1_000_000;

pub fn points_of(goals: i64, behinds: i64) -> i64 {
    goals.saturating_mul(POINTS_PER_GOAL).saturating_add(behinds)
}

/// `G.B (P)`, e.g. `3.2 (20)`. Points are derived when not given.
pub fn format_scoreline(goals: i64, behinds: i64, points: Option<i64>) -> String {
    let points = points.unwrap_or_else(|| points_of(goals, behinds));
    format!("{}.{} ({})", goals, behinds, points)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamTotals {
    pub goals: i64,
    pub behinds: i64,
    pub points: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchTotals {
    pub home: TeamTotals,
    pub away: TeamTotals,
}

/// Sum one side's (goals, behinds, points) triples.
pub fn sum_quarters_team<I>(quarters: I) -> TeamTotals
where
    I: IntoIterator<Item = (i64, i64, i64)>,
{
    quarters
        .into_iter()
        .fold(TeamTotals::default(), |acc, (goals, behinds, points)| TeamTotals {
            goals: acc.goals.saturating_add(goals),
            behinds: acc.behinds.saturating_add(behinds),
            points: acc.points.saturating_add(points),
        })
}

pub fn sum_quarters_match(quarters: &[QuarterLine]) -> MatchTotals {
    MatchTotals {
        home: sum_quarters_team(
            quarters.iter().map(|q| (q.home_goals, q.home_behinds, q.home_points)),
        ),
        away: sum_quarters_team(
            quarters.iter().map(|q| (q.away_goals, q.away_behinds, q.away_points)),
        ),
    }
}

/// Overwrite the declared totals with the quarter sums. No-op without quarters.
pub fn compute_totals_from_quarters(record: &mut MatchRecord) {
    if record.quarters.is_empty() {
        return;
    }
    let totals = sum_quarters_match(&record.quarters);
    record.total_home_points = Some(totals.home.points);
    record.total_away_points = Some(totals.away.points);
}

pub fn winner(home_points: i64, away_points: i64) -> MatchResult {
    if home_points > away_points {
        MatchResult::Home
    } else if home_points < away_points {
        MatchResult::Away
    } else {
        MatchResult::Draw
    }
}

pub fn margin(home_points: i64, away_points: i64) -> i64 {
    home_points.saturating_sub(away_points).saturating_abs()
}

/// Scorelines for both sides. Goal/behind breakdown is only known when
/// quarters were recorded; otherwise just the points are shown.
pub fn scoreline_home_away(record: &MatchRecord) -> (String, String) {
    if record.quarters.is_empty() {
        return (
            format!("({})", record.home_points()),
            format!("({})", record.away_points()),
        );
    }
    let totals = sum_quarters_match(&record.quarters);
    (
        format_scoreline(totals.home.goals, totals.home.behinds, Some(record.home_points())),
        format_scoreline(totals.away.goals, totals.away.behinds, Some(record.away_points())),
    )
}
