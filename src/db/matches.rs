use chrono::{NaiveDate, Utc};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqliteExecutor, SqlitePool};

use crate::auth::AccessScope;
use crate::db::helpers::touched;
use crate::models::match_record::{
    MatchDetail, MatchRecord, MatchRow, PlayerStatLine, PlayerStatRow, QuarterLine, QuarterRow,
};
use crate::models::player::PlayerTotals;
use crate::utils::normalize::club_key;

const MATCH_COLUMNS: &str = "m.id, m.season_id, m.date, m.venue, m.home_club, m.away_club, \
     m.total_home_points, m.total_away_points, m.created_by, m.created_at";

/// Optional narrowing of a match listing, on top of the caller's scope.
#[derive(Debug, Clone, Default)]
pub struct MatchFilter {
    pub season: Option<String>,
    pub team: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub player_id: Option<i64>,
}

fn scoped_select(scope: &AccessScope, filter: &MatchFilter) -> QueryBuilder<'static, Sqlite> {
    let mut qb = QueryBuilder::new(format!("SELECT {} FROM matches m WHERE 1 = 1", MATCH_COLUMNS));
    scope.push_match_filter(&mut qb, "m");
    push_filter(&mut qb, filter);
    qb
}

fn push_filter(qb: &mut QueryBuilder<'static, Sqlite>, filter: &MatchFilter) {
    if let Some(season) = &filter.season {
        qb.push(" AND m.season_id = ").push_bind(season.trim().to_string());
    }
    if let Some(team) = &filter.team {
        let key = club_key(team);
        qb.push(" AND (m.home_club_key = ")
            .push_bind(key.clone())
            .push(" OR m.away_club_key = ")
            .push_bind(key)
            .push(")");
    }
    if let Some(from) = filter.from {
        qb.push(" AND m.date >= ").push_bind(from);
    }
    if let Some(to) = filter.to {
        qb.push(" AND m.date <= ").push_bind(to);
    }
    if let Some(player_id) = filter.player_id {
        qb.push(" AND EXISTS (SELECT 1 FROM player_stats ps WHERE ps.match_id = m.id AND ps.player_id = ")
            .push_bind(player_id)
            .push(")");
    }
}

/// Insert a match with its quarters and player lines. Returns the new id.
#[tracing::instrument(name = "Insert match", skip(conn, record), fields(season = %record.season_id))]
pub async fn insert_match(
    conn: &mut SqliteConnection,
    record: &MatchRecord,
    created_by: Option<i64>,
) -> Result<i64, sqlx::Error> {
    let id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO matches (season_id, date, venue, home_club, away_club,
                             home_club_key, away_club_key,
                             total_home_points, total_away_points, created_by, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(&record.season_id)
    .bind(record.date)
    .bind(&record.venue)
    .bind(&record.home_club)
    .bind(&record.away_club)
    .bind(club_key(&record.home_club))
    .bind(club_key(&record.away_club))
    .bind(record.home_points())
    .bind(record.away_points())
    .bind(created_by)
    .bind(Utc::now())
    .fetch_one(&mut *conn)
    .await?;

    insert_quarters(conn, id, &record.quarters).await?;
    insert_player_stats(conn, id, &record.player_stats).await?;

    Ok(id)
}

async fn insert_quarters(
    conn: &mut SqliteConnection,
    match_id: i64,
    quarters: &[QuarterLine],
) -> Result<(), sqlx::Error> {
    for q in quarters {
        sqlx::query(
            r#"
            INSERT INTO quarters (match_id, q, home_goals, home_behinds, home_points,
                                  away_goals, away_behinds, away_points)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(match_id)
        .bind(q.q)
        .bind(q.home_goals)
        .bind(q.home_behinds)
        .bind(q.home_points)
        .bind(q.away_goals)
        .bind(q.away_behinds)
        .bind(q.away_points)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

async fn insert_player_stats(
    conn: &mut SqliteConnection,
    match_id: i64,
    rows: &[PlayerStatLine],
) -> Result<(), sqlx::Error> {
    for row in rows {
        sqlx::query(
            r#"
            INSERT INTO player_stats (match_id, player_id, player_name, goals, behinds, points)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(match_id)
        .bind(row.player_id)
        .bind(&row.player_name)
        .bind(row.goals)
        .bind(row.behinds)
        .bind(row.points)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

pub async fn get_match_row(
    executor: impl SqliteExecutor<'_>,
    match_id: i64,
) -> Result<Option<MatchRow>, sqlx::Error> {
    sqlx::query_as::<_, MatchRow>(&format!(
        "SELECT {} FROM matches m WHERE m.id = ?",
        MATCH_COLUMNS
    ))
    .bind(match_id)
    .fetch_optional(executor)
    .await
}

/// A match with its quarters ordered by number and player lines ordered by name.
pub async fn get_match(pool: &SqlitePool, match_id: i64) -> Result<Option<MatchDetail>, sqlx::Error> {
    let Some(summary) = get_match_row(pool, match_id).await? else {
        return Ok(None);
    };
    let quarters = get_quarters_in_match(pool, match_id).await?;
    let player_stats = get_player_stats_in_match(pool, match_id).await?;

    Ok(Some(MatchDetail {
        summary,
        quarters,
        player_stats,
    }))
}

/// Newest first.
pub async fn list_matches(
    pool: &SqlitePool,
    scope: &AccessScope,
    filter: &MatchFilter,
    limit: i64,
) -> Result<Vec<MatchRow>, sqlx::Error> {
    let mut qb = scoped_select(scope, filter);
    qb.push(" ORDER BY m.date DESC, m.id DESC LIMIT ").push_bind(limit);
    qb.build_query_as::<MatchRow>().fetch_all(pool).await
}

async fn list_unbounded(
    pool: &SqlitePool,
    scope: &AccessScope,
    filter: &MatchFilter,
) -> Result<Vec<MatchRow>, sqlx::Error> {
    let mut qb = scoped_select(scope, filter);
    qb.push(" ORDER BY m.date DESC, m.id DESC");
    qb.build_query_as::<MatchRow>().fetch_all(pool).await
}

pub async fn list_matches_by_season(
    pool: &SqlitePool,
    scope: &AccessScope,
    season_id: &str,
) -> Result<Vec<MatchRow>, sqlx::Error> {
    let filter = MatchFilter {
        season: Some(season_id.to_string()),
        ..Default::default()
    };
    list_unbounded(pool, scope, &filter).await
}

/// Inclusive on both ends, newest first.
pub async fn get_matches_in_date_range(
    pool: &SqlitePool,
    scope: &AccessScope,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<MatchRow>, sqlx::Error> {
    let filter = MatchFilter {
        from: Some(from),
        to: Some(to),
        ..Default::default()
    };
    list_unbounded(pool, scope, &filter).await
}

/// Matches with a stat line linked to the roster player, optionally within a season.
pub async fn get_matches_for_player(
    pool: &SqlitePool,
    scope: &AccessScope,
    player_id: i64,
    season_id: Option<&str>,
) -> Result<Vec<MatchRow>, sqlx::Error> {
    let filter = MatchFilter {
        season: season_id.map(str::to_string),
        player_id: Some(player_id),
        ..Default::default()
    };
    list_unbounded(pool, scope, &filter).await
}

/// Last `limit` matches where `team` played home or away.
pub async fn list_matches_for_team(
    pool: &SqlitePool,
    team: &str,
    limit: i64,
) -> Result<Vec<MatchRow>, sqlx::Error> {
    if team.trim().is_empty() {
        return Ok(Vec::new());
    }
    let filter = MatchFilter {
        team: Some(team.to_string()),
        ..Default::default()
    };
    list_matches(pool, &AccessScope::All, &filter, limit).await
}

/// Distinct season ids, most recent first.
pub async fn list_all_seasons(
    pool: &SqlitePool,
    scope: &AccessScope,
) -> Result<Vec<String>, sqlx::Error> {
    let mut qb = QueryBuilder::<Sqlite>::new("SELECT DISTINCT m.season_id FROM matches m WHERE 1 = 1");
    scope.push_match_filter(&mut qb, "m");
    qb.push(" ORDER BY m.season_id DESC");
    qb.build_query_scalar::<String>().fetch_all(pool).await
}

pub async fn get_latest_match(
    pool: &SqlitePool,
    scope: &AccessScope,
) -> Result<Option<MatchRow>, sqlx::Error> {
    let mut qb = scoped_select(scope, &MatchFilter::default());
    qb.push(" ORDER BY m.date DESC, m.id DESC LIMIT 1");
    qb.build_query_as::<MatchRow>().fetch_optional(pool).await
}

pub async fn get_earliest_match(
    pool: &SqlitePool,
    scope: &AccessScope,
) -> Result<Option<MatchRow>, sqlx::Error> {
    let mut qb = scoped_select(scope, &MatchFilter::default());
    qb.push(" ORDER BY m.date ASC, m.id ASC LIMIT 1");
    qb.build_query_as::<MatchRow>().fetch_optional(pool).await
}

pub async fn count_matches(pool: &SqlitePool, scope: &AccessScope) -> Result<i64, sqlx::Error> {
    let mut qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(m.id) FROM matches m WHERE 1 = 1");
    scope.push_match_filter(&mut qb, "m");
    qb.build_query_scalar::<i64>().fetch_one(pool).await
}

pub async fn count_matches_in_season(
    pool: &SqlitePool,
    scope: &AccessScope,
    season_id: &str,
) -> Result<i64, sqlx::Error> {
    let mut qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(m.id) FROM matches m WHERE 1 = 1");
    scope.push_match_filter(&mut qb, "m");
    qb.push(" AND m.season_id = ").push_bind(season_id.trim().to_string());
    qb.build_query_scalar::<i64>().fetch_one(pool).await
}

/// Goals, behinds and points of a roster player over all matches or one season.
pub async fn get_player_totals(
    executor: impl SqliteExecutor<'_>,
    player_id: i64,
    season_id: Option<&str>,
) -> Result<PlayerTotals, sqlx::Error> {
    let (goals, behinds, points, games) = sqlx::query_as::<_, (i64, i64, i64, i64)>(
        r#"
        SELECT COALESCE(SUM(ps.goals), 0),
               COALESCE(SUM(ps.behinds), 0),
               COALESCE(SUM(ps.points), 0),
               COUNT(DISTINCT ps.match_id)
        FROM player_stats ps
        JOIN matches m ON m.id = ps.match_id
        WHERE ps.player_id = ? AND (? IS NULL OR m.season_id = ?)
        "#,
    )
    .bind(player_id)
    .bind(season_id)
    .bind(season_id)
    .fetch_one(executor)
    .await?;

    Ok(PlayerTotals {
        player_id,
        season_id: season_id.map(str::to_string),
        goals,
        behinds,
        points,
        games,
    })
}

pub async fn get_player_stats_in_match(
    executor: impl SqliteExecutor<'_>,
    match_id: i64,
) -> Result<Vec<PlayerStatRow>, sqlx::Error> {
    sqlx::query_as::<_, PlayerStatRow>(
        r#"
        SELECT id, match_id, player_id, player_name, goals, behinds, points
        FROM player_stats
        WHERE match_id = ?
        ORDER BY player_name ASC, id ASC
        "#,
    )
    .bind(match_id)
    .fetch_all(executor)
    .await
}

pub async fn get_quarters_in_match(
    executor: impl SqliteExecutor<'_>,
    match_id: i64,
) -> Result<Vec<QuarterRow>, sqlx::Error> {
    sqlx::query_as::<_, QuarterRow>(
        r#"
        SELECT id, match_id, q, home_goals, home_behinds, home_points,
               away_goals, away_behinds, away_points
        FROM quarters
        WHERE match_id = ?
        ORDER BY q ASC, id ASC
        "#,
    )
    .bind(match_id)
    .fetch_all(executor)
    .await
}

/// Overwrite the match fields and replace every quarter and player line.
/// Returns false when the match does not exist.
#[tracing::instrument(name = "Update match", skip(conn, record))]
pub async fn update_match(
    conn: &mut SqliteConnection,
    match_id: i64,
    record: &MatchRecord,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE matches
        SET season_id = ?, date = ?, venue = ?, home_club = ?, away_club = ?,
            home_club_key = ?, away_club_key = ?,
            total_home_points = ?, total_away_points = ?
        WHERE id = ?
        "#,
    )
    .bind(&record.season_id)
    .bind(record.date)
    .bind(&record.venue)
    .bind(&record.home_club)
    .bind(&record.away_club)
    .bind(club_key(&record.home_club))
    .bind(club_key(&record.away_club))
    .bind(record.home_points())
    .bind(record.away_points())
    .bind(match_id)
    .execute(&mut *conn)
    .await?;

    if !touched(&result) {
        return Ok(false);
    }

    sqlx::query("DELETE FROM quarters WHERE match_id = ?")
        .bind(match_id)
        .execute(&mut *conn)
        .await?;
    insert_quarters(conn, match_id, &record.quarters).await?;

    replace_player_stats(conn, match_id, &record.player_stats).await?;
    Ok(true)
}

/// Delete-then-insert of a match's player lines. Callers run this inside a
/// transaction so a failed insert leaves the previous lines in place.
pub async fn replace_player_stats(
    conn: &mut SqliteConnection,
    match_id: i64,
    rows: &[PlayerStatLine],
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM player_stats WHERE match_id = ?")
        .bind(match_id)
        .execute(&mut *conn)
        .await?;
    insert_player_stats(conn, match_id, rows).await
}

/// Quarters and player lines go with it (ON DELETE CASCADE).
pub async fn delete_match(
    executor: impl SqliteExecutor<'_>,
    match_id: i64,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM matches WHERE id = ?")
        .bind(match_id)
        .execute(executor)
        .await?;
    Ok(touched(&result))
}

pub async fn delete_all_matches(executor: impl SqliteExecutor<'_>) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM matches").execute(executor).await?;
    Ok(result.rows_affected())
}
