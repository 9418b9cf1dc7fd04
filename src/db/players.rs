use std::collections::BTreeSet;

use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqliteExecutor};

use crate::db::helpers::{like_contains, touched};
use crate::models::player::Player;
use crate::utils::normalize::{club_key, player_key};

/// Add the names missing from `club`'s roster as active players; existing
/// players are left as they are. Returns how many were added.
pub async fn upsert_players(
    conn: &mut SqliteConnection,
    names: &[String],
    club: &str,
) -> Result<u64, sqlx::Error> {
    let clean: BTreeSet<&str> = names
        .iter()
        .map(|n| n.trim())
        .filter(|n| !n.is_empty())
        .collect();

    let mut added = 0;
    for name in clean {
        let result = sqlx::query(
            r#"
            INSERT INTO players (name, name_key, club, club_key, active)
            VALUES (?, ?, ?, ?, 1)
            ON CONFLICT (club_key, name) DO NOTHING
            "#,
        )
        .bind(name)
        .bind(player_key(name))
        .bind(club.trim())
        .bind(club_key(club))
        .execute(&mut *conn)
        .await?;
        added += result.rows_affected();
    }

    if added > 0 {
        tracing::info!("Added {} player(s) to the {} roster", added, club);
    }
    Ok(added)
}

/// Roster ordered by name. `club = None` lists every club.
pub async fn list_players(
    executor: impl SqliteExecutor<'_>,
    club: Option<&str>,
    include_inactive: bool,
) -> Result<Vec<Player>, sqlx::Error> {
    let mut qb = QueryBuilder::<Sqlite>::new("SELECT id, name, club, active FROM players WHERE 1 = 1");
    if let Some(club) = club {
        qb.push(" AND club_key = ").push_bind(club_key(club));
    }
    if !include_inactive {
        qb.push(" AND active = 1");
    }
    qb.push(" ORDER BY name ASC, club ASC");
    qb.build_query_as::<Player>().fetch_all(executor).await
}

pub async fn get_player_by_id(
    executor: impl SqliteExecutor<'_>,
    player_id: i64,
) -> Result<Option<Player>, sqlx::Error> {
    sqlx::query_as::<_, Player>("SELECT id, name, club, active FROM players WHERE id = ?")
        .bind(player_id)
        .fetch_optional(executor)
        .await
}

pub async fn get_player_by_name(
    executor: impl SqliteExecutor<'_>,
    name: &str,
    club: &str,
) -> Result<Option<Player>, sqlx::Error> {
    sqlx::query_as::<_, Player>(
        "SELECT id, name, club, active FROM players WHERE name = ? AND club_key = ?",
    )
    .bind(name.trim())
    .bind(club_key(club))
    .fetch_optional(executor)
    .await
}

async fn set_active(
    executor: impl SqliteExecutor<'_>,
    player_id: i64,
    active: bool,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE players SET active = ? WHERE id = ?")
        .bind(active)
        .bind(player_id)
        .execute(executor)
        .await?;
    Ok(touched(&result))
}

pub async fn deactivate_player(
    executor: impl SqliteExecutor<'_>,
    player_id: i64,
) -> Result<bool, sqlx::Error> {
    set_active(executor, player_id, false).await
}

pub async fn reactivate_player(
    executor: impl SqliteExecutor<'_>,
    player_id: i64,
) -> Result<bool, sqlx::Error> {
    set_active(executor, player_id, true).await
}

/// False when the player does not exist, the name is blank, or another
/// player of the same club already has that name.
pub async fn rename_player(
    executor: impl SqliteExecutor<'_>,
    player_id: i64,
    new_name: &str,
) -> Result<bool, sqlx::Error> {
    let new_name = new_name.trim();
    if new_name.is_empty() {
        return Ok(false);
    }
    let result = sqlx::query("UPDATE players SET name = ?, name_key = ? WHERE id = ?")
        .bind(new_name)
        .bind(player_key(new_name))
        .bind(player_id)
        .execute(executor)
        .await;

    match result {
        Ok(done) => Ok(touched(&done)),
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            tracing::info!("Rename of player {} to {} clashes with an existing player", player_id, new_name);
            Ok(false)
        }
        Err(e) => Err(e),
    }
}

/// Stat lines keep the player's name; their link is cleared (ON DELETE SET NULL).
pub async fn delete_player(
    executor: impl SqliteExecutor<'_>,
    player_id: i64,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM players WHERE id = ?")
        .bind(player_id)
        .execute(executor)
        .await?;
    Ok(touched(&result))
}

pub async fn count_players(
    executor: impl SqliteExecutor<'_>,
    club: &str,
    active_only: bool,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(id) FROM players WHERE club_key = ? AND (? = 0 OR active = 1)",
    )
    .bind(club_key(club))
    .bind(active_only)
    .fetch_one(executor)
    .await
}

/// Active players whose name contains `query`, case-insensitively. The
/// pattern is lower-cased here and matched against `name_key`.
pub async fn search_players(
    executor: impl SqliteExecutor<'_>,
    query: &str,
    club: Option<&str>,
) -> Result<Vec<Player>, sqlx::Error> {
    let query = query.trim();
    if query.is_empty() {
        return Ok(Vec::new());
    }
    let mut qb = QueryBuilder::<Sqlite>::new(
        "SELECT id, name, club, active FROM players WHERE active = 1 AND name_key LIKE ",
    );
    qb.push_bind(like_contains(&player_key(query))).push(" ESCAPE '\\'");
    if let Some(club) = club {
        qb.push(" AND club_key = ").push_bind(club_key(club));
    }
    qb.push(" ORDER BY name ASC");
    qb.build_query_as::<Player>().fetch_all(executor).await
}
