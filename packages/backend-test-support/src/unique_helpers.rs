//! ULID-based identifiers so tests sharing a database never collide.

use ulid::Ulid;

/// `{prefix}-{ulid}`
///
/// ```
/// use backend_test_support::unique_helpers::unique_str;
///
/// let a = unique_str("evt");
/// assert_ne!(a, unique_str("evt"));
/// assert!(a.starts_with("evt-"));
/// ```
pub fn unique_str(prefix: &str) -> String {
    format!("{prefix}-{}", Ulid::new())
}

/// A player id that passes backend validation.
pub fn unique_player_id() -> String {
    unique_str("player")
}

pub fn unique_event_id() -> String {
    unique_str("evt")
}

pub fn unique_email(prefix: &str) -> String {
    format!("{prefix}-{}@example.test", Ulid::new())
}
