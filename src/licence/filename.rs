//! Download names for generated artifacts.

use chrono::{DateTime, TimeZone};

/// Timestamp layout appended to every artifact name.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Make `name` safe for a filename: strip reserved characters and collapse
/// each whitespace run into one underscore.
pub fn sanitize_component(name: &str, fallback: &str) -> String {
    let cleaned = sanitize_filename::sanitize(name.trim());
    let joined = cleaned.split_whitespace().collect::<Vec<_>>().join("_");

    if joined.is_empty() {
        return fallback.to_string();
    }

    joined
}

/// `{prefix}_{identity}_{timestamp}.{extension}`, e.g.
/// `licence_DUPONT_20250701_093000.pdf`.
pub fn artifact_filename<Tz: TimeZone>(
    prefix: &str,
    identity: &str,
    at: &DateTime<Tz>,
    extension: &str,
) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!(
        "{}_{}_{}.{}",
        sanitize_component(prefix, "document"),
        sanitize_component(identity, "inconnu"),
        at.format(TIMESTAMP_FORMAT),
        extension
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_sanitize_component() {
        assert_eq!(sanitize_component("Ben  Salah", "x"), "Ben_Salah");
        assert_eq!(sanitize_component("  Spaces  ", "x"), "Spaces");
        assert_eq!(sanitize_component("a/b:c", "x"), "abc");
        assert_eq!(sanitize_component("   ", "fallback"), "fallback");
    }

    #[test]
    fn test_artifact_filename() {
        let at = Utc.with_ymd_and_hms(2025, 7, 1, 9, 30, 0).unwrap();
        assert_eq!(
            artifact_filename("licence", "El Amri", &at, "pdf"),
            "licence_El_Amri_20250701_093000.pdf"
        );
    }
}
