//! Canonical forms for the free-text keys users type in.

/// Emails are stored and compared trimmed and lower-cased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Key used to detect the same player written twice ("Lucas" vs " lucas ").
pub fn player_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Trim, and treat an empty result as absent.
pub fn clean_optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

pub fn club_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Clubs are the tenancy boundary, so a blank name never matches anything.
pub fn same_club(a: &str, b: &str) -> bool {
    let a = club_key(a);
    !a.is_empty() && a == club_key(b)
}
