//! Merges a [`Record`] with the [`DefaultTable`].
//!
//! Resolution is total: every field yields a display value. A malformed date
//! and an omitted field produce the same output; only [`FieldSource`] tells
//! them apart from the record side.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::sync::Arc;

use super::record::{DefaultTable, Field, FieldKind, Record};

/// Display format for every date rendered on the document.
pub const DISPLAY_DATE_FORMAT: &str = "%d/%m/%Y";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSource {
    Record,
    Default,
}

/// One field after merging record data with defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedField {
    pub field: Field,
    pub value: String,
    pub source: FieldSource,
}

impl ResolvedField {
    pub fn is_default(&self) -> bool {
        self.source == FieldSource::Default
    }
}

/// Fields that fell back to their default during one build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionReport {
    defaulted: Vec<Field>,
}

impl ResolutionReport {
    pub fn record(&mut self, resolved: &ResolvedField) {
        if resolved.is_default() && !self.defaulted.contains(&resolved.field) {
            self.defaulted.push(resolved.field);
        }
    }

    pub fn defaulted(&self) -> &[Field] {
        &self.defaulted
    }

    pub fn is_clean(&self) -> bool {
        self.defaulted.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct FieldResolver {
    defaults: Arc<DefaultTable>,
}

impl FieldResolver {
    pub fn new(defaults: Arc<DefaultTable>) -> Self {
        Self { defaults }
    }

    pub fn defaults(&self) -> &DefaultTable {
        &self.defaults
    }

    pub fn resolve(&self, record: &Record, field: Field) -> ResolvedField {
        let supplied = record
            .get(field)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .and_then(|value| match field.kind() {
                FieldKind::Text => Some(value.to_string()),
                FieldKind::Date => normalize_date(value),
            });

        match supplied {
            Some(value) => ResolvedField {
                field,
                value,
                source: FieldSource::Record,
            },
            None => {
                log::debug!("field '{}' resolved to default", field.key());
                ResolvedField {
                    field,
                    value: self.defaults.get(field).to_string(),
                    source: FieldSource::Default,
                }
            }
        }
    }
}

/// Parse an ISO date (optionally with a time part) into `DD/MM/YYYY`.
///
/// Returns `None` for anything unparsable; callers treat that as absent.
pub fn normalize_date(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|dt| dt.date())
        })?;

    Some(date.format(DISPLAY_DATE_FORMAT).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> FieldResolver {
        FieldResolver::new(Arc::new(DefaultTable::builtin()))
    }

    #[test]
    fn test_normalize_date_variants() {
        assert_eq!(normalize_date("2009-06-01").as_deref(), Some("01/06/2009"));
        assert_eq!(
            normalize_date("2009-06-01T10:30:00Z").as_deref(),
            Some("01/06/2009")
        );
        assert_eq!(
            normalize_date("2009-06-01T10:30:00").as_deref(),
            Some("01/06/2009")
        );
        assert_eq!(normalize_date("not-a-date"), None);
        assert_eq!(normalize_date("2009-13-40"), None);
        assert_eq!(normalize_date("01/06/2009"), None);
    }

    #[test]
    fn test_text_field_passes_through_trimmed() {
        let record = Record::new().with(Field::ClubName, "  Club Africain ");
        let resolved = resolver().resolve(&record, Field::ClubName);
        assert_eq!(resolved.value, "Club Africain");
        assert_eq!(resolved.source, FieldSource::Record);
    }

    #[test]
    fn test_blank_value_uses_default() {
        let record = Record::new().with(Field::Regime, "   ");
        let resolved = resolver().resolve(&record, Field::Regime);
        assert_eq!(resolved.value, "AMATEUR");
        assert!(resolved.is_default());
    }

    #[test]
    fn test_malformed_date_is_indistinguishable_from_missing() {
        let r = resolver();
        let malformed = r.resolve(
            &Record::new().with(Field::DateOfBirth, "not-a-date"),
            Field::DateOfBirth,
        );
        let missing = r.resolve(&Record::new(), Field::DateOfBirth);
        assert_eq!(malformed, missing);
    }

    #[test]
    fn test_report_lists_each_default_once() {
        let r = resolver();
        let mut report = ResolutionReport::default();
        let record = Record::new().with(Field::LastName, "DUPONT");
        for field in [Field::LastName, Field::FirstName, Field::FirstName] {
            report.record(&r.resolve(&record, field));
        }
        assert_eq!(report.defaulted(), &[Field::FirstName]);
    }
}
