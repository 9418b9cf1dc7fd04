use std::collections::BTreeMap;

use crate::game::scoring::{points_of, MAX_SCORE_VALUE};
use crate::models::match_record::{MatchRecord, PlayerStatLine, UNKNOWN_PLAYER};
use crate::models::common::TeamSide;
use crate::utils::normalize::player_key;
use super::{MatchValidator, TeamSelector, ValidationIssue};

impl MatchValidator {
    /// Row-level checks: name present, non-negative counts, points formula.
    pub fn validate_player_rows(&self, rows: &[PlayerStatLine]) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        for (idx, row) in rows.iter().enumerate() {
            let line = idx + 1;

            if row.player_name.trim().is_empty() {
                issues.push(
                    ValidationIssue::warning(
                        "player.name.missing",
                        format!("Row {}: player name is missing.", line),
                    )
                    .on_field("player_name"),
                );
            }

            for (field, value) in [("goals", row.goals), ("behinds", row.behinds), ("points", row.points)] {
                if value < 0 {
                    issues.push(
                        ValidationIssue::error(
                            "player.field.invalid",
                            format!("Row {}: {} must be an integer >= 0.", line, field),
                        )
                        .on_field(field)
                        .with_context("value", value)
                        .with_context("row", line as u64),
                    );
                } else if value > MAX_SCORE_VALUE {
                    issues.push(
                        ValidationIssue::error(
                            "player.field.out_of_range",
                            format!("Row {}: {} must not exceed {}.", line, field, MAX_SCORE_VALUE),
                        )
                        .on_field(field)
                        .with_context("value", value)
                        .with_context("row", line as u64),
                    );
                }
            }

            if row.points != points_of(row.goals, row.behinds) {
                issues.push(
                    ValidationIssue::error(
                        "player.points.formula",
                        format!(
                            "Row {}: points mismatch ({} ≠ 6*{}+{}).",
                            line, row.points, row.goals, row.behinds
                        ),
                    )
                    .on_field("points")
                    .with_context("row", line as u64),
                );
            }
        }

        issues
    }

    /// One warning naming every player that appears more than once,
    /// comparing names trimmed and lower-cased. Blank names count as `Unknown`.
    pub fn validate_duplicate_players(&self, rows: &[PlayerStatLine]) -> Vec<ValidationIssue> {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for row in rows {
            let key = match player_key(&row.player_name) {
                key if key.is_empty() => player_key(UNKNOWN_PLAYER),
                key => key,
            };
            *counts.entry(key).or_default() += 1;
        }

        let duplicates: Vec<String> = counts
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(name, _)| name)
            .collect();

        if duplicates.is_empty() {
            return Vec::new();
        }

        vec![ValidationIssue::warning(
            "players.duplicates",
            format!("Duplicate player names: {}.", duplicates.join(", ")),
        )
        .on_field("player_name")
        .with_context("names", duplicates)]
    }

    /// The player lines' points must add up to the declared score of the selected side.
    pub fn validate_players_vs_declared(
        &self,
        record: &MatchRecord,
        team: &TeamSelector,
    ) -> Vec<ValidationIssue> {
        if record.player_stats.is_empty() {
            return Vec::new();
        }

        let Some(side) = team.resolve(record) else {
            return vec![ValidationIssue::warning(
                "players.sum_vs_declared.skipped",
                "Player points were not compared with the declared score (no team side given).",
            )
            .on_field("player_stats")];
        };

        let sum_players = record
            .player_stats
            .iter()
            .fold(0i64, |acc, row| acc.saturating_add(row.points));
        let declared = match side {
            TeamSide::Home => record.home_points(),
            TeamSide::Away => record.away_points(),
        };

        if sum_players == declared {
            return Vec::new();
        }

        vec![ValidationIssue::error(
            "players.sum_vs_declared",
            format!(
                "Player points sum ({}) ≠ declared score ({}) for the {} side.",
                sum_players, declared, side
            ),
        )
        .on_field("player_stats")
        .with_context("side", side.to_string())
        .with_context("sum_players", sum_players)
        .with_context("declared", declared)]
    }
}
