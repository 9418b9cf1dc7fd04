use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::auth::AccessScope;
use crate::models::stats::{round_to, LeaderboardEntry, TeamSeasonSummary};
use crate::utils::normalize::club_key;

#[derive(sqlx::FromRow)]
struct LeaderboardRow {
    player_name: String,
    goals: i64,
    behinds: i64,
    points: i64,
    games: i64,
}

impl From<LeaderboardRow> for LeaderboardEntry {
    fn from(row: LeaderboardRow) -> Self {
        let games = row.games.max(1) as f64;
        let shots = (row.goals + row.behinds).max(1) as f64;
        Self {
            avg_points_per_game: round_to(row.points as f64 / games, 2),
            accuracy_pct: round_to(100.0 * row.goals as f64 / shots, 1),
            player_name: row.player_name,
            goals: row.goals,
            behinds: row.behinds,
            points: row.points,
            games: row.games,
        }
    }
}

/// Per-player totals over the season's visible matches, highest scorer first.
pub async fn season_leaderboard(
    pool: &SqlitePool,
    scope: &AccessScope,
    season_id: &str,
) -> Result<Vec<LeaderboardEntry>, sqlx::Error> {
    let mut qb = QueryBuilder::<Sqlite>::new(
        r#"
        SELECT ps.player_name AS player_name,
               COALESCE(SUM(ps.goals), 0) AS goals,
               COALESCE(SUM(ps.behinds), 0) AS behinds,
               COALESCE(SUM(ps.points), 0) AS points,
               COUNT(DISTINCT ps.match_id) AS games
        FROM player_stats ps
        JOIN matches m ON m.id = ps.match_id
        WHERE m.season_id = "#,
    );
    qb.push_bind(season_id.trim().to_string());
    scope.push_match_filter(&mut qb, "m");
    qb.push(" GROUP BY ps.player_name ORDER BY points DESC, player_name ASC");

    let rows = qb.build_query_as::<LeaderboardRow>().fetch_all(pool).await?;
    Ok(rows.into_iter().map(LeaderboardEntry::from).collect())
}

/// Points scored and conceded by `club` over a season.
pub async fn team_season_summary(
    pool: &SqlitePool,
    season_id: &str,
    club: &str,
) -> Result<TeamSeasonSummary, sqlx::Error> {
    let key = club_key(club);
    let (games, points_for, points_against) = sqlx::query_as::<_, (i64, i64, i64)>(
        r#"
        SELECT COUNT(id),
               COALESCE(SUM(CASE WHEN home_club_key = ?1
                                 THEN total_home_points ELSE total_away_points END), 0),
               COALESCE(SUM(CASE WHEN home_club_key = ?1
                                 THEN total_away_points ELSE total_home_points END), 0)
        FROM matches
        WHERE season_id = ?2
          AND (home_club_key = ?1 OR away_club_key = ?1)
        "#,
    )
    .bind(&key)
    .bind(season_id.trim())
    .fetch_one(pool)
    .await?;

    let average = |total: i64| {
        if games > 0 {
            round_to(total as f64 / games as f64, 2)
        } else {
            0.0
        }
    };

    Ok(TeamSeasonSummary {
        club: club.trim().to_string(),
        season_id: season_id.trim().to_string(),
        games,
        points_for,
        points_against,
        avg_points_for: average(points_for),
        avg_points_against: average(points_against),
        differential: points_for - points_against,
    })
}
