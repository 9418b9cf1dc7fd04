//! Tabular exports of matches, quarters, player lines and users, as CSV or JSON.

use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::error::{AppError, AppResult};
use crate::models::match_record::{MatchDetail, MatchRow, PlayerStatRow, QuarterRow};
use crate::models::user::UserResponse;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    #[default]
    Json,
}

/// Which part of a single match to export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportPart {
    #[default]
    Bundle,
    Match,
    Quarters,
    Players,
}

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    #[serde(default)]
    pub format: ExportFormat,
    #[serde(default)]
    pub part: ExportPart,
}

/// Header row plus cells; rendered either as CSV or as JSON records.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl ExportTable {
    pub fn new<S: Into<String>>(headers: impl IntoIterator<Item = S>) -> Self {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: Vec<Value>) {
        self.rows.push(row);
    }

    pub fn to_csv(&self) -> AppResult<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        let csv_error = |e: csv::Error| AppError::Internal(format!("CSV export failed: {}", e));

        writer.write_record(&self.headers).map_err(csv_error)?;
        for row in &self.rows {
            writer
                .write_record(row.iter().map(cell_text))
                .map_err(csv_error)?;
        }
        writer
            .into_inner()
            .map_err(|e| AppError::Internal(format!("CSV export failed: {}", e)))
    }

    pub fn to_json(&self) -> Value {
        let records = self
            .rows
            .iter()
            .map(|row| {
                let record: Map<String, Value> = self
                    .headers
                    .iter()
                    .cloned()
                    .zip(row.iter().cloned())
                    .collect();
                Value::Object(record)
            })
            .collect();
        Value::Array(records)
    }
}

/// One line per match, newest first.
pub fn matches_overview(rows: &[MatchRow]) -> ExportTable {
    let mut sorted: Vec<&MatchRow> = rows.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));

    let mut table = ExportTable::new([
        "ID", "Date", "Season", "Home", "Away", "Home Points", "Away Points", "Venue",
    ]);
    for m in sorted {
        table.push(vec![
            json!(m.id),
            json!(m.date),
            json!(m.season_id),
            json!(m.home_club),
            json!(m.away_club),
            json!(m.total_home_points),
            json!(m.total_away_points),
            json!(m.venue),
        ]);
    }
    table
}

/// Goals, behinds and points per side per quarter, with a closing Total row.
pub fn quarters_table(quarters: &[QuarterRow], home_label: &str, away_label: &str, with_total: bool) -> ExportTable {
    let mut table = ExportTable::new(vec![
        "Q".to_string(),
        format!("{} G", home_label),
        format!("{} B", home_label),
        format!("{} P", home_label),
        format!("{} G", away_label),
        format!("{} B", away_label),
        format!("{} P", away_label),
    ]);

    let mut totals = [0i64; 6];
    for q in quarters {
        let values = [
            q.home_goals,
            q.home_behinds,
            q.home_points,
            q.away_goals,
            q.away_behinds,
            q.away_points,
        ];
        for (total, value) in totals.iter_mut().zip(values) {
            *total = total.saturating_add(value);
        }
        let mut row = vec![json!(q.q)];
        row.extend(values.iter().map(|v| json!(v)));
        table.push(row);
    }

    if with_total && !quarters.is_empty() {
        let mut row = vec![json!("Total")];
        row.extend(totals.iter().map(|v| json!(v)));
        table.push(row);
    }
    table
}

pub fn player_stats_table(rows: &[PlayerStatRow], team_label: &str, with_total: bool) -> ExportTable {
    let mut table = ExportTable::new(["Player", "Goals", "Behinds", "Points"]);
    let (mut goals, mut behinds, mut points) = (0i64, 0i64, 0i64);

    for r in rows {
        goals = goals.saturating_add(r.goals);
        behinds = behinds.saturating_add(r.behinds);
        points = points.saturating_add(r.points);
        table.push(vec![json!(r.player_name), json!(r.goals), json!(r.behinds), json!(r.points)]);
    }

    if with_total && !rows.is_empty() {
        table.push(vec![
            json!(format!("Total {}", team_label)),
            json!(goals),
            json!(behinds),
            json!(points),
        ]);
    }
    table
}

pub fn users_table(users: &[UserResponse]) -> ExportTable {
    let mut table = ExportTable::new(["ID", "Email", "Team", "Admin", "Created At"]);
    for u in users {
        table.push(vec![
            json!(u.id),
            json!(u.email),
            json!(u.team_name),
            json!(u.is_admin),
            json!(u.created_at.to_rfc3339()),
        ]);
    }
    table
}

/// `{match, quarters, players}` as JSON, tables with their totals.
pub fn match_bundle(detail: &MatchDetail, team_label: &str) -> Value {
    let summary = &detail.summary;
    json!({
        "match": matches_overview(std::slice::from_ref(summary)).to_json(),
        "quarters": quarters_table(&detail.quarters, &summary.home_club, &summary.away_club, true).to_json(),
        "players": player_stats_table(&detail.player_stats, team_label, true).to_json(),
    })
}
