//! Consistency checks for a candidate match.
//!
//! Every pass returns a list of issues; [`MatchValidator::validate_match`]
//! runs the relevant passes and splits the result into errors and warnings.

use chrono::{NaiveDate, Utc};

use crate::config::settings::ValidationSettings;
use crate::models::common::TeamSide;
use crate::models::match_record::MatchRecord;
use crate::utils::normalize::club_key;

pub mod issue;
mod match_rules;
mod player_rules;
mod quarter_rules;

pub use issue::{issues_as_strings, Severity, ValidationIssue, ValidationReport};

/// How to pick the side whose declared total the player lines are compared with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TeamSelector {
    Side(TeamSide),
    Name(String),
    Unspecified,
}

impl TeamSelector {
    /// Resolve against the match's clubs. Names compare trimmed and case-insensitively.
    pub fn resolve(&self, record: &MatchRecord) -> Option<TeamSide> {
        match self {
            TeamSelector::Side(side) => Some(*side),
            TeamSelector::Name(name) => {
                let wanted = club_key(name);
                if wanted.is_empty() {
                    None
                } else if club_key(&record.home_club) == wanted {
                    Some(TeamSide::Home)
                } else if club_key(&record.away_club) == wanted {
                    Some(TeamSide::Away)
                } else {
                    None
                }
            }
            TeamSelector::Unspecified => None,
        }
    }
}

pub struct MatchValidator {
    settings: ValidationSettings,
    today: NaiveDate,
}

impl MatchValidator {
    pub fn new(settings: ValidationSettings) -> Self {
        Self {
            settings,
            today: Utc::now().date_naive(),
        }
    }

    /// Fix the reference date used for the future-date check.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn settings(&self) -> &ValidationSettings {
        &self.settings
    }

    pub fn validate_match(&self, record: &MatchRecord, team: &TeamSelector) -> ValidationReport {
        let mut issues = self.validate_match_structure(record);
        issues.extend(self.validate_date_and_season(record));

        if !record.quarters.is_empty() {
            issues.extend(self.validate_quarter_values(&record.quarters));
            issues.extend(self.validate_quarter_sequence(&record.quarters));
            issues.extend(self.validate_match_quarters_vs_totals(record));
        }

        if !record.player_stats.is_empty() {
            issues.extend(self.validate_player_rows(&record.player_stats));
            issues.extend(self.validate_duplicate_players(&record.player_stats));
            issues.extend(self.validate_players_vs_declared(record, team));
        }

        ValidationReport::from_issues(issues)
    }
}

impl Default for MatchValidator {
    fn default() -> Self {
        Self::new(ValidationSettings::default())
    }
}
