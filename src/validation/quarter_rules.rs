use std::collections::{BTreeMap, BTreeSet};

use crate::game::scoring::{points_of, sum_quarters_match, MAX_SCORE_VALUE};
use crate::models::match_record::{MatchRecord, QuarterLine};
use super::{MatchValidator, ValidationIssue};

pub const EXPECTED_QUARTER_NUMBERS: [i64; 4] = [1, 2, 3, 4];

fn exceeds(value: i64, ceiling: Option<i64>) -> bool {
    ceiling.is_some_and(|max| value > max)
}

fn quarter_list(numbers: &[i64]) -> String {
    numbers
        .iter()
        .map(|n| format!("Q{}", n))
        .collect::<Vec<_>>()
        .join(", ")
}

impl MatchValidator {
    /// Non-negative fields, the points formula per side, and soft ceilings.
    pub fn validate_quarter_values(&self, quarters: &[QuarterLine]) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        for q in quarters {
            let fields = [
                ("home_goals", q.home_goals),
                ("home_behinds", q.home_behinds),
                ("home_points", q.home_points),
                ("away_goals", q.away_goals),
                ("away_behinds", q.away_behinds),
                ("away_points", q.away_points),
            ];
            for (field, value) in fields {
                if value < 0 {
                    issues.push(
                        ValidationIssue::error(
                            "quarter.field.invalid",
                            format!("Q{}: {} must be an integer >= 0.", q.q, field),
                        )
                        .on_field(field)
                        .with_context("value", value)
                        .with_context("quarter", q.q),
                    );
                } else if value > MAX_SCORE_VALUE {
                    issues.push(
                        ValidationIssue::error(
                            "quarter.field.out_of_range",
                            format!("Q{}: {} must not exceed {}.", q.q, field, MAX_SCORE_VALUE),
                        )
                        .on_field(field)
                        .with_context("value", value)
                        .with_context("quarter", q.q),
                    );
                }
            }

            if q.home_points != points_of(q.home_goals, q.home_behinds) {
                issues.push(
                    ValidationIssue::error(
                        "quarter.home_points.formula",
                        format!(
                            "Q{}: home points mismatch ({} ≠ 6*{}+{}).",
                            q.q, q.home_points, q.home_goals, q.home_behinds
                        ),
                    )
                    .on_field("home_points")
                    .with_context("quarter", q.q),
                );
            }
            if q.away_points != points_of(q.away_goals, q.away_behinds) {
                issues.push(
                    ValidationIssue::error(
                        "quarter.away_points.formula",
                        format!(
                            "Q{}: away points mismatch ({} ≠ 6*{}+{}).",
                            q.q, q.away_points, q.away_goals, q.away_behinds
                        ),
                    )
                    .on_field("away_points")
                    .with_context("quarter", q.q),
                );
            }

            let settings = &self.settings;
            if exceeds(q.home_goals, settings.max_goals_per_quarter)
                || exceeds(q.away_goals, settings.max_goals_per_quarter)
            {
                issues.push(ValidationIssue::warning(
                    "quarter.goals.unusually_high",
                    format!(
                        "Q{}: unusual number of goals (home={}, away={}).",
                        q.q, q.home_goals, q.away_goals
                    ),
                ));
            }
            if exceeds(q.home_behinds, settings.max_behinds_per_quarter)
                || exceeds(q.away_behinds, settings.max_behinds_per_quarter)
            {
                issues.push(ValidationIssue::warning(
                    "quarter.behinds.unusually_high",
                    format!(
                        "Q{}: unusual number of behinds (home={}, away={}).",
                        q.q, q.home_behinds, q.away_behinds
                    ),
                ));
            }
            if exceeds(q.home_points, settings.max_points_per_quarter)
                || exceeds(q.away_points, settings.max_points_per_quarter)
            {
                issues.push(ValidationIssue::warning(
                    "quarter.points.unusually_high",
                    format!(
                        "Q{}: unusual points total (home={}, away={}).",
                        q.q, q.home_points, q.away_points
                    ),
                ));
            }
        }

        issues
    }

    /// Duplicate numbers, and missing or unexpected ones relative to Q1..Q4.
    pub fn validate_quarter_sequence(&self, quarters: &[QuarterLine]) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        if quarters.is_empty() {
            return issues;
        }

        let mut counts: BTreeMap<i64, usize> = BTreeMap::new();
        for q in quarters {
            *counts.entry(q.q).or_default() += 1;
        }

        for (number, count) in &counts {
            if *count > 1 {
                issues.push(
                    ValidationIssue::warning(
                        "quarters.duplicate_number",
                        format!("Duplicate quarter number: Q{}.", number),
                    )
                    .on_field("q")
                    .with_context("duplicate", *number),
                );
            }
        }

        if self.settings.expect_four_quarters {
            let expected: BTreeSet<i64> = EXPECTED_QUARTER_NUMBERS.into_iter().collect();
            let got: BTreeSet<i64> = counts.keys().copied().collect();
            let missing: Vec<i64> = expected.difference(&got).copied().collect();
            let unexpected: Vec<i64> = got.difference(&expected).copied().collect();

            if !missing.is_empty() {
                issues.push(ValidationIssue::warning(
                    "quarters.missing",
                    format!("Missing quarters: {}.", quarter_list(&missing)),
                ));
            }
            if !unexpected.is_empty() {
                issues.push(ValidationIssue::warning(
                    "quarters.unexpected",
                    format!("Unexpected quarters: {}.", quarter_list(&unexpected)),
                ));
            }
        }

        issues
    }

    /// Quarter points per side must add up to the declared totals.
    pub fn validate_match_quarters_vs_totals(&self, record: &MatchRecord) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        if record.quarters.is_empty() {
            return issues;
        }

        let sums = sum_quarters_match(&record.quarters);
        if sums.home.points != record.home_points() {
            issues.push(
                ValidationIssue::error(
                    "match.totals.home_mismatch",
                    format!(
                        "Home quarter sum ({}) ≠ declared total ({}).",
                        sums.home.points,
                        record.home_points()
                    ),
                )
                .on_field("total_home_points")
                .with_context("sum_quarters", sums.home.points)
                .with_context("declared", record.home_points()),
            );
        }
        if sums.away.points != record.away_points() {
            issues.push(
                ValidationIssue::error(
                    "match.totals.away_mismatch",
                    format!(
                        "Away quarter sum ({}) ≠ declared total ({}).",
                        sums.away.points,
                        record.away_points()
                    ),
                )
                .on_field("total_away_points")
                .with_context("sum_quarters", sums.away.points)
                .with_context("declared", record.away_points()),
            );
        }

        issues
    }
}
