//! Small helpers shared by the repositories and services.

use sqlx::sqlite::SqliteQueryResult;

use crate::error::{AppError, AppResult};

/// Unwrap an optional record, returning NotFound if None.
///
/// # Example
/// ```ignore
/// let row = require_record(matches::get_match_row(pool, id).await?, "Match")?;
/// ```
pub fn require_record<T>(record: Option<T>, what: &str) -> AppResult<T> {
    record.ok_or_else(|| AppError::not_found(what))
}

/// Whether an UPDATE or DELETE touched anything.
pub fn touched(result: &SqliteQueryResult) -> bool {
    result.rows_affected() > 0
}

/// Escape `%`, `_` and `\` for use in a `LIKE ... ESCAPE '\'` pattern.
pub fn like_contains(query: &str) -> String {
    let escaped = query
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}
