use chrono::NaiveDate;

use footy_score::config::settings::ValidationSettings;
use footy_score::models::common::TeamSide;
use footy_score::models::match_record::{MatchRecord, PlayerStatLine, QuarterLine};
use footy_score::validation::{MatchValidator, Severity, TeamSelector};

fn validator() -> MatchValidator {
    MatchValidator::new(ValidationSettings::default())
        .with_today(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap())
}

fn base_record() -> MatchRecord {
    MatchRecord {
        season_id: "2025".to_string(),
        date: NaiveDate::from_ymd_opt(2025, 5, 10),
        venue: Some("Stade des Argoulets".to_string()),
        home_club: "Toulouse".to_string(),
        away_club: "Paris".to_string(),
        total_home_points: Some(30),
        total_away_points: Some(20),
        ..Default::default()
    }
}

fn line(name: &str, goals: i64, behinds: i64) -> PlayerStatLine {
    PlayerStatLine {
        player_id: None,
        player_name: name.to_string(),
        goals,
        behinds,
        points: goals * 6 + behinds,
    }
}

fn codes(issues: &[footy_score::validation::ValidationIssue]) -> Vec<&str> {
    issues.iter().map(|i| i.code.as_str()).collect()
}

#[test]
fn minimal_match_passes() {
    let report = validator().validate_match(&base_record(), &TeamSelector::Unspecified);
    assert!(report.ok);
    assert!(report.errors.is_empty());
    assert!(report.warnings.is_empty());
}

#[test]
fn missing_required_fields_are_errors() {
    let record = MatchRecord {
        total_home_points: Some(-1),
        ..Default::default()
    };
    let report = validator().validate_match(&record, &TeamSelector::Unspecified);
    assert!(!report.ok);
    let codes = codes(&report.errors);
    for expected in [
        "match.home_club.missing",
        "match.away_club.missing",
        "match.total_home_points.invalid",
        "match.total_away_points.missing",
        "match.date.missing",
        "match.season_id.missing",
    ] {
        assert!(codes.contains(&expected), "missing {}", expected);
    }
}

#[test]
fn odd_season_and_future_date_are_warnings() {
    let mut record = base_record();
    record.season_id = "25".to_string();
    record.date = NaiveDate::from_ymd_opt(2025, 12, 1);
    let report = validator().validate_match(&record, &TeamSelector::Unspecified);
    assert!(report.ok);
    let codes = codes(&report.warnings);
    assert!(codes.contains(&"match.season_id.format"));
    assert!(codes.contains(&"match.date.future"));
}

#[test]
fn future_date_blocks_when_disallowed() {
    let settings = ValidationSettings {
        disallow_future_dates: true,
        ..Default::default()
    };
    let mut record = base_record();
    record.date = NaiveDate::from_ymd_opt(2026, 1, 1);
    let report = MatchValidator::new(settings)
        .with_today(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap())
        .validate_match(&record, &TeamSelector::Unspecified);
    assert!(!report.ok);
    assert_eq!(codes(&report.errors), vec!["match.date.future"]);
    // Next year's date also disagrees with the season
    assert_eq!(codes(&report.warnings), vec!["match.season_id.mismatch_with_date"]);
}

#[test]
fn quarter_sums_disagreeing_with_declared_away_total() {
    let mut record = base_record();
    record.total_home_points = Some(20);
    record.total_away_points = Some(20);
    record.quarters = vec![
        QuarterLine { q: 1, home_goals: 2, home_behinds: 0, home_points: 12, away_goals: 1, away_behinds: 3, away_points: 9, },
        QuarterLine { q: 2, home_goals: 1, home_behinds: 2, home_points: 8, away_goals: 1, away_behinds: 3, away_points: 9, },
    ];

    let issues = validator().validate_match_quarters_vs_totals(&record);
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].code, "match.totals.away_mismatch");
    assert_eq!(issues[0].severity, Severity::Error);
    assert_eq!(issues[0].field.as_deref(), Some("total_away_points"));
}

#[test]
fn wrong_quarter_points_give_one_formula_error() {
    let quarters = vec![QuarterLine {
        q: 1,
        home_goals: 3,
        home_behinds: 2,
        home_points: 19,
        away_goals: 1,
        away_behinds: 1,
        away_points: 7,
    }];
    let errors: Vec<_> = validator()
        .validate_quarter_values(&quarters)
        .into_iter()
        .filter(|i| i.is_error())
        .collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].field.as_deref(), Some("home_points"));
    assert_eq!(errors[0].message, "Q1: home points mismatch (19 ≠ 6*3+2).");
}

#[test]
fn negative_quarter_value_is_an_error() {
    let quarters = vec![QuarterLine {
        q: 2,
        home_goals: -1,
        home_behinds: 0,
        home_points: -6,
        ..Default::default()
    }];
    let issues = validator().validate_quarter_values(&quarters);
    assert!(issues.iter().any(|i| i.code == "quarter.field.invalid"));
}

#[test]
fn unusually_high_quarter_is_a_warning() {
    let quarters = vec![QuarterLine {
        q: 1,
        home_goals: 21,
        home_behinds: 0,
        home_points: 126,
        ..Default::default()
    }];
    let issues = validator().validate_quarter_values(&quarters);
    assert_eq!(codes(&issues), vec!["quarter.goals.unusually_high"]);
    assert_eq!(issues[0].severity, Severity::Warning);
}

#[test]
fn quarter_sequence_reports_duplicates_and_gaps() {
    let quarters: Vec<QuarterLine> = [1, 1, 5]
        .into_iter()
        .map(|q| QuarterLine { q, ..Default::default() })
        .collect();
    let issues = validator().validate_quarter_sequence(&quarters);
    let codes = codes(&issues);
    assert!(codes.contains(&"quarters.duplicate_number"));
    assert!(codes.contains(&"quarters.missing"));
    assert!(codes.contains(&"quarters.unexpected"));
    assert!(issues.iter().all(|i| i.severity == Severity::Warning));
}

#[test]
fn same_name_with_different_case_is_one_duplicate_warning() {
    let rows = vec![line("Lucas", 1, 0), line(" lucas ", 0, 1)];
    let issues = validator().validate_duplicate_players(&rows);
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].severity, Severity::Warning);
    assert!(issues[0].message.contains("lucas"));
}

#[test]
fn player_formula_is_checked() {
    let mut row = line("Hugo", 2, 1);
    row.points = 14;
    let issues = validator().validate_player_rows(&[row]);
    assert_eq!(codes(&issues), vec!["player.points.formula"]);
}

#[test]
fn player_sum_must_match_declared_score() {
    let mut record = base_record();
    record.player_stats = vec![line("Lucas", 3, 1), line("Hugo", 1, 2)];

    let issues = validator().validate_players_vs_declared(&record, &TeamSelector::Side(TeamSide::Home));
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].code, "players.sum_vs_declared");
    assert!(issues[0].message.contains("27"));
    assert!(issues[0].message.contains("30"));
}

#[test]
fn team_name_selects_the_side() {
    let mut record = base_record();
    record.player_stats = vec![line("Lucas", 3, 2)];
    // 20 points match the away side's declared total
    let issues = validator().validate_players_vs_declared(&record, &TeamSelector::Name(" paris ".to_string()));
    assert!(issues.is_empty());
}

#[test]
fn unknown_side_skips_the_comparison_with_a_warning() {
    let mut record = base_record();
    record.player_stats = vec![line("Lucas", 1, 0)];
    let issues = validator().validate_players_vs_declared(&record, &TeamSelector::Name("Lyon".to_string()));
    assert_eq!(codes(&issues), vec!["players.sum_vs_declared.skipped"]);
    assert_eq!(issues[0].severity, Severity::Warning);
}

#[test]
fn full_report_splits_errors_and_warnings() {
    let mut record = base_record();
    record.player_stats = vec![line("Lucas", 3, 1), line("lucas", 0, 2)];
    let report = validator().validate_match(&record, &TeamSelector::Side(TeamSide::Home));
    assert!(!report.ok);
    assert_eq!(codes(&report.errors), vec!["players.sum_vs_declared"]);
    assert_eq!(codes(&report.warnings), vec!["players.duplicates"]);
    assert_eq!(report.summary(), "1 error(s), 1 warning(s).");
}

#[test]
fn blank_names_repeat_as_unknown() {
    let rows = vec![line("", 1, 0), line("  ", 0, 1), line("Hugo", 1, 1)];
    let issues = validator().validate_duplicate_players(&rows);
    assert_eq!(codes(&issues), vec!["players.duplicates"]);
    assert_eq!(issues[0].severity, Severity::Warning);
    assert!(issues[0].message.contains("unknown"));
}

#[test]
fn counts_above_the_ceiling_are_errors_not_overflows() {
    let huge = 2_000_000_000_000_000_000;
    let quarters = vec![QuarterLine {
        q: 1,
        home_goals: huge,
        home_behinds: 0,
        home_points: 0,
        ..Default::default()
    }];
    let issues = validator().validate_quarter_values(&quarters);
    assert!(codes(&issues).contains(&"quarter.field.out_of_range"));
    assert!(codes(&issues).contains(&"quarter.home_points.formula"));

    let mut big = line("Lucas", 0, 0);
    big.points = i64::MAX;
    let mut record = base_record();
    record.total_home_points = Some(i64::MAX);
    record.player_stats = vec![big.clone(), big];
    let report = validator().validate_match(&record, &TeamSelector::Side(TeamSide::Home));
    assert!(!report.ok);
    let errors = codes(&report.errors);
    assert!(errors.contains(&"match.total_home_points.out_of_range"));
    assert!(errors.contains(&"player.field.out_of_range"));
}
