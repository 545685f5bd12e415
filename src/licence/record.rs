//! Input record, field catalogue and the default table.
//!
//! A [`Record`] is whatever the caller sends: a loose map of camelCase keys to
//! optional strings. [`Field`] is the closed set of keys the licence document
//! actually renders, and [`DefaultTable`] guarantees a literal for each of them.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use thiserror::Error;
use utoipa::ToSchema;

/// How a field's raw value is interpreted before display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Passed through as literal text.
    Text,
    /// Parsed as an ISO date and rendered as `DD/MM/YYYY`.
    Date,
}

/// Every field the licence document knows how to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    RequestId,
    Season,
    LicenceNumber,
    ClubName,
    ClubCode,
    League,
    Category,
    Regime,
    LastName,
    FirstName,
    DateOfBirth,
    PlaceOfBirth,
    Nationality,
    IdNumber,
    Address,
    ContractType,
    ContractStart,
    ContractEnd,
    SignatureDate,
    MedicalReviewer,
    MedicalExamDate,
    MedicalResult,
    BloodGroup,
}

impl Field {
    pub const ALL: [Field; 23] = [
        Field::RequestId,
        Field::Season,
        Field::LicenceNumber,
        Field::ClubName,
        Field::ClubCode,
        Field::League,
        Field::Category,
        Field::Regime,
        Field::LastName,
        Field::FirstName,
        Field::DateOfBirth,
        Field::PlaceOfBirth,
        Field::Nationality,
        Field::IdNumber,
        Field::Address,
        Field::ContractType,
        Field::ContractStart,
        Field::ContractEnd,
        Field::SignatureDate,
        Field::MedicalReviewer,
        Field::MedicalExamDate,
        Field::MedicalResult,
        Field::BloodGroup,
    ];

    /// JSON key used in records and in the defaults file.
    pub fn key(self) -> &'static str {
        match self {
            Field::RequestId => "requestId",
            Field::Season => "season",
            Field::LicenceNumber => "licenceNumber",
            Field::ClubName => "clubName",
            Field::ClubCode => "clubCode",
            Field::League => "league",
            Field::Category => "category",
            Field::Regime => "regime",
            Field::LastName => "lastName",
            Field::FirstName => "firstName",
            Field::DateOfBirth => "dateOfBirth",
            Field::PlaceOfBirth => "placeOfBirth",
            Field::Nationality => "nationality",
            Field::IdNumber => "idNumber",
            Field::Address => "address",
            Field::ContractType => "contractType",
            Field::ContractStart => "contractStart",
            Field::ContractEnd => "contractEnd",
            Field::SignatureDate => "signatureDate",
            Field::MedicalReviewer => "medicalReviewer",
            Field::MedicalExamDate => "medicalExamDate",
            Field::MedicalResult => "medicalResult",
            Field::BloodGroup => "bloodGroup",
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            Field::DateOfBirth
            | Field::ContractStart
            | Field::ContractEnd
            | Field::SignatureDate
            | Field::MedicalExamDate => FieldKind::Date,
            _ => FieldKind::Text,
        }
    }

    pub fn from_key(key: &str) -> Option<Field> {
        Field::ALL.iter().copied().find(|field| field.key() == key)
    }
}

/// Structured input for one document build.
///
/// Values are kept exactly as received; trimming and date parsing happen in
/// the resolver so that the record itself stays immutable for the whole build.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct Record(HashMap<String, Option<String>>);

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, mostly for tests and fixtures.
    pub fn with(mut self, field: Field, value: impl Into<String>) -> Self {
        self.0.insert(field.key().to_string(), Some(value.into()));
        self
    }

    /// Raw value for `field`, `None` when the key is missing or null.
    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(field.key()).and_then(|value| value.as_deref())
    }

    /// Keys present in the record that do not name any known field.
    pub fn unknown_keys(&self) -> Vec<&str> {
        self.0
            .keys()
            .filter(|key| Field::from_key(key).is_none())
            .map(String::as_str)
            .collect()
    }
}

impl FromIterator<(Field, String)> for Record {
    fn from_iter<I: IntoIterator<Item = (Field, String)>>(iter: I) -> Self {
        Record(
            iter.into_iter()
                .map(|(field, value)| (field.key().to_string(), Some(value)))
                .collect(),
        )
    }
}

#[derive(Debug, Error)]
pub enum DefaultsError {
    #[error("failed to read defaults file: {0}")]
    Io(#[source] std::io::Error),
    #[error("defaults file is not a JSON object of strings: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("defaults file names unknown field '{0}'")]
    UnknownField(String),
    #[error("default for '{0}' must not be empty")]
    EmptyValue(String),
}

/// Fallback literal for every [`Field`].
///
/// Constructed once at startup and shared read-only; every lookup succeeds
/// because the table is always seeded from [`DefaultTable::builtin`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultTable {
    values: BTreeMap<Field, String>,
}

impl DefaultTable {
    /// Placeholder literals used when the integrator supplies nothing.
    pub fn builtin() -> Self {
        let values = Field::ALL
            .iter()
            .map(|&field| {
                let literal = match field {
                    Field::RequestId => "DEM-0000-0000",
                    Field::Season => "2024/2025",
                    Field::LicenceNumber => "LIC-000000",
                    Field::ClubName => "CLUB NON RENSEIGNE",
                    Field::ClubCode => "000",
                    Field::League => "LIGUE REGIONALE",
                    Field::Category => "SENIORS",
                    Field::Regime => "AMATEUR",
                    Field::LastName => "NOM",
                    Field::FirstName => "PRENOM",
                    Field::DateOfBirth => "01/01/2000",
                    Field::PlaceOfBirth => "TUNIS",
                    Field::Nationality => "TUNISIE",
                    Field::IdNumber => "00000000",
                    Field::Address => "NON RENSEIGNEE",
                    Field::ContractType => "LICENCE AMATEUR",
                    Field::ContractStart => "01/07/2024",
                    Field::ContractEnd => "30/06/2025",
                    Field::SignatureDate => "01/07/2024",
                    Field::MedicalReviewer => "MEDECIN AGREE",
                    Field::MedicalExamDate => "01/07/2024",
                    Field::MedicalResult => "APTE",
                    Field::BloodGroup => "NON RENSEIGNE",
                };
                (field, literal.to_string())
            })
            .collect();

        Self { values }
    }

    /// Built-in table with the given entries replaced.
    pub fn with_overrides<I>(overrides: I) -> Result<Self, DefaultsError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut table = Self::builtin();
        for (key, value) in overrides {
            let field = Field::from_key(&key).ok_or_else(|| DefaultsError::UnknownField(key.clone()))?;
            let value = value.trim();
            if value.is_empty() {
                return Err(DefaultsError::EmptyValue(key));
            }
            table.values.insert(field, value.to_string());
        }
        Ok(table)
    }

    /// Load overrides from a JSON object file (`{"clubName": "...", ...}`).
    pub fn from_json_file(path: &Path) -> Result<Self, DefaultsError> {
        let raw = fs::read_to_string(path).map_err(DefaultsError::Io)?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, DefaultsError> {
        let overrides: BTreeMap<String, String> =
            serde_json::from_str(raw).map_err(DefaultsError::Parse)?;
        Self::with_overrides(overrides)
    }

    pub fn get(&self, field: Field) -> &str {
        // Seeded from `builtin`, which covers `Field::ALL`.
        self.values.get(&field).map(String::as_str).unwrap_or_default()
    }

    /// Key → literal view, used by the defaults endpoint.
    pub fn to_map(&self) -> BTreeMap<&'static str, String> {
        self.values
            .iter()
            .map(|(field, value)| (field.key(), value.clone()))
            .collect()
    }
}

impl Default for DefaultTable {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_covers_every_field() {
        let table = DefaultTable::builtin();
        for field in Field::ALL {
            assert!(!table.get(field).is_empty(), "{} has no default", field.key());
        }
    }

    #[test]
    fn test_keys_round_trip() {
        for field in Field::ALL {
            assert_eq!(Field::from_key(field.key()), Some(field));
        }
        assert_eq!(Field::from_key("favouriteColour"), None);
    }

    #[test]
    fn test_overrides_replace_single_entry() {
        let table = DefaultTable::from_json_str(r#"{"clubName": "ESPERANCE"}"#).unwrap();
        assert_eq!(table.get(Field::ClubName), "ESPERANCE");
        assert_eq!(table.get(Field::Nationality), "TUNISIE");
    }

    #[test]
    fn test_overrides_reject_unknown_and_empty() {
        assert!(matches!(
            DefaultTable::from_json_str(r#"{"shoeSize": "42"}"#),
            Err(DefaultsError::UnknownField(_))
        ));
        assert!(matches!(
            DefaultTable::from_json_str(r#"{"regime": "  "}"#),
            Err(DefaultsError::EmptyValue(_))
        ));
        assert!(matches!(
            DefaultTable::from_json_str("[1, 2]"),
            Err(DefaultsError::Parse(_))
        ));
    }

    #[test]
    fn test_record_deserializes_nulls_and_unknown_keys() {
        let record: Record =
            serde_json::from_str(r#"{"lastName": "DUPONT", "firstName": null, "shoe": "42"}"#)
                .unwrap();
        assert_eq!(record.get(Field::LastName), Some("DUPONT"));
        assert_eq!(record.get(Field::FirstName), None);
        assert_eq!(record.unknown_keys(), vec!["shoe"]);
    }
}
