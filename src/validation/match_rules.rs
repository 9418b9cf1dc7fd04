use chrono::Datelike;

use crate::game::scoring::MAX_SCORE_VALUE;
use crate::models::match_record::MatchRecord;
use super::{MatchValidator, ValidationIssue};

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

impl MatchValidator {
    /// Required fields, non-negative totals, season format and venue length.
    pub fn validate_match_structure(&self, record: &MatchRecord) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        if is_blank(&record.home_club) {
            issues.push(
                ValidationIssue::error("match.home_club.missing", "Home club is missing.")
                    .on_field("home_club"),
            );
        }
        if is_blank(&record.away_club) {
            issues.push(
                ValidationIssue::error("match.away_club.missing", "Away club is missing.")
                    .on_field("away_club"),
            );
        }

        for (field, side, total) in [
            ("total_home_points", "home", record.total_home_points),
            ("total_away_points", "away", record.total_away_points),
        ] {
            match total {
                None => issues.push(
                    ValidationIssue::error(
                        &format!("match.{}.missing", field),
                        format!("Total {} points are missing.", side),
                    )
                    .on_field(field),
                ),
                Some(points) if points < 0 => issues.push(
                    ValidationIssue::error(
                        &format!("match.{}.invalid", field),
                        format!("Total {} points must be an integer >= 0.", side),
                    )
                    .on_field(field)
                    .with_context("value", points),
                ),
                Some(points) if points > MAX_SCORE_VALUE => issues.push(
                    ValidationIssue::error(
                        &format!("match.{}.out_of_range", field),
                        format!("Total {} points must not exceed {}.", side, MAX_SCORE_VALUE),
                    )
                    .on_field(field)
                    .with_context("value", points),
                ),
                Some(_) => {}
            }
        }

        if record.date.is_none() {
            issues.push(
                ValidationIssue::error("match.date.missing", "Match date is required.")
                    .on_field("date"),
            );
        }

        let season = record.season_id.trim();
        if season.is_empty() {
            issues.push(
                ValidationIssue::error(
                    "match.season_id.missing",
                    "Season (e.g. '2025') is required.",
                )
                .on_field("season_id"),
            );
        } else if !(season.len() == 4 && season.chars().all(|c| c.is_ascii_digit())) {
            issues.push(
                ValidationIssue::warning("match.season_id.format", "Expected season format: 'YYYY'.")
                    .on_field("season_id")
                    .with_context("value", season),
            );
        }

        if let Some(venue) = &record.venue {
            let len = venue.chars().count();
            if len > self.settings.max_venue_length {
                issues.push(
                    ValidationIssue::warning(
                        "match.venue.too_long",
                        format!(
                            "Venue name is unusually long (>{}).",
                            self.settings.max_venue_length
                        ),
                    )
                    .on_field("venue")
                    .with_context("len", len as u64),
                );
            }
        }

        issues
    }

    /// Future dates and season/date-year agreement.
    pub fn validate_date_and_season(&self, record: &MatchRecord) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        let Some(date) = record.date else {
            return issues;
        };

        if date > self.today {
            let message = format!("The date ({}) is in the future.", date);
            let issue = if self.settings.disallow_future_dates {
                ValidationIssue::error("match.date.future", message)
            } else {
                ValidationIssue::warning("match.date.future", message)
            };
            issues.push(issue.on_field("date"));
        }

        if self.settings.warn_if_season_mismatch_with_date {
            if let Ok(season_year) = record.season_id.trim().parse::<i32>() {
                if season_year != date.year() {
                    issues.push(
                        ValidationIssue::warning(
                            "match.season_id.mismatch_with_date",
                            format!(
                                "Season year ({}) differs from the match date year ({}).",
                                season_year,
                                date.year()
                            ),
                        )
                        .on_field("season_id")
                        .with_context("season", season_year)
                        .with_context("date_year", date.year()),
                    );
                }
            }
        }

        issues
    }
}
