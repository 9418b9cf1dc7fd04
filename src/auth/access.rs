//! Who may see and change which matches and rosters.
//!
//! Admins see everything, a user with a team sees the matches their team
//! played (home or away), a user without a team sees nothing. Both the
//! in-memory check and the SQL filter compare `club_key` forms: the SQL side
//! reads the `*_club_key` columns the repositories write with that function,
//! so listings and single-record checks never disagree.

use sqlx::{QueryBuilder, Sqlite};

use crate::error::AppError;
use crate::utils::normalize::{clean_optional, club_key, same_club};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessScope {
    All,
    Team(String),
    Nothing,
}

impl AccessScope {
    pub fn new(is_admin: bool, team_name: Option<&str>) -> Self {
        if is_admin {
            return AccessScope::All;
        }
        match clean_optional(team_name) {
            Some(team) => AccessScope::Team(team),
            None => AccessScope::Nothing,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, AccessScope::All)
    }

    pub fn team(&self) -> Option<&str> {
        match self {
            AccessScope::Team(team) => Some(team),
            _ => None,
        }
    }

    pub fn permits(&self, home_club: &str, away_club: &str) -> bool {
        match self {
            AccessScope::All => true,
            AccessScope::Team(team) => same_club(team, home_club) || same_club(team, away_club),
            AccessScope::Nothing => false,
        }
    }

    pub fn permits_club(&self, club: &str) -> bool {
        match self {
            AccessScope::All => true,
            AccessScope::Team(team) => same_club(team, club),
            AccessScope::Nothing => false,
        }
    }

    /// Append ` AND <predicate>` on the `alias` match table. The query must
    /// already have a `WHERE` clause.
    pub fn push_match_filter(&self, qb: &mut QueryBuilder<'_, Sqlite>, alias: &str) {
        match self {
            AccessScope::All => {}
            AccessScope::Team(team) => {
                let key = club_key(team);
                qb.push(format!(" AND ({}.home_club_key = ", alias));
                qb.push_bind(key.clone());
                qb.push(format!(" OR {}.away_club_key = ", alias));
                qb.push_bind(key);
                qb.push(")");
            }
            AccessScope::Nothing => {
                qb.push(" AND 1 = 0");
            }
        }
    }

    /// Which club's roster the caller works on. Admins may name any club
    /// (`None` meaning every club); users are pinned to their own team.
    pub fn roster_club(&self, requested: Option<&str>) -> Result<Option<String>, AppError> {
        let requested = clean_optional(requested);
        match self {
            AccessScope::All => Ok(requested),
            AccessScope::Team(team) => match requested {
                Some(club) if !same_club(team, &club) => Err(AppError::Forbidden),
                _ => Ok(Some(team.clone())),
            },
            AccessScope::Nothing => Err(AppError::Forbidden),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_scope_ignores_team() {
        assert_eq!(AccessScope::new(true, Some("Toulouse")), AccessScope::All);
        assert!(AccessScope::All.permits("Paris", "Lyon"));
    }

    #[test]
    fn blank_team_means_nothing() {
        assert_eq!(AccessScope::new(false, Some("  ")), AccessScope::Nothing);
        assert!(!AccessScope::Nothing.permits("Toulouse", "Paris"));
    }

    #[test]
    fn team_scope_matches_either_side_case_insensitively() {
        let scope = AccessScope::new(false, Some("Toulouse"));
        assert!(scope.permits(" toulouse ", "Paris"));
        assert!(scope.permits("Paris", "TOULOUSE"));
        assert!(!scope.permits("Paris", "Lyon"));
    }

    #[test]
    fn roster_club_pins_users_to_their_team() {
        let scope = AccessScope::new(false, Some("Toulouse"));
        assert_eq!(scope.roster_club(None).unwrap(), Some("Toulouse".to_string()));
        assert_eq!(scope.roster_club(Some("toulouse")).unwrap(), Some("Toulouse".to_string()));
        assert!(matches!(scope.roster_club(Some("Paris")), Err(AppError::Forbidden)));
        assert!(matches!(AccessScope::Nothing.roster_club(None), Err(AppError::Forbidden)));
        assert_eq!(AccessScope::All.roster_club(Some(" Paris ")).unwrap(), Some("Paris".to_string()));
    }

    #[test]
    fn sql_filter_binds_normalized_team() {
        let mut qb: QueryBuilder<'_, Sqlite> = QueryBuilder::new("SELECT id FROM matches m WHERE 1 = 1");
        AccessScope::Team(" Toulouse ".to_string()).push_match_filter(&mut qb, "m");
        assert_eq!(
            qb.sql(),
            "SELECT id FROM matches m WHERE 1 = 1 AND (m.home_club_key = ? OR m.away_club_key = ?)"
        );

        let mut qb: QueryBuilder<'_, Sqlite> = QueryBuilder::new("SELECT id FROM matches m WHERE 1 = 1");
        AccessScope::Nothing.push_match_filter(&mut qb, "m");
        assert!(qb.sql().ends_with("AND 1 = 0"));
    }
}
