//! Dataset row shapes

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;

/// A record as the remote dataset serves it.
///
/// This is the wire shape: `createdDate` is optional (the demo dataset omits
/// it) and `version` tolerates being serialized as a JSON number, which the
/// demo dataset does for some records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedRow {
    /// Unique record identifier.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Programming language of the record.
    #[serde(default)]
    pub language: String,
    /// Free-text biography.
    #[serde(default)]
    pub bio: String,
    /// Version label, normalized to a string.
    #[serde(default, deserialize_with = "version_as_string")]
    pub version: String,
    /// Creation timestamp, if the dataset carries one.
    #[serde(default)]
    pub created_date: Option<DateTime<Utc>>,
}

/// One row of the editable table.
///
/// `id` is unique across the collection and immutable after creation. `no`
/// is the 1-based display order; the store keeps the `no` values contiguous
/// and matching each row's position at all times.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    /// 1-based display order, derived, never user-edited.
    pub no: u32,
    /// Unique record identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Programming language of the record.
    pub language: String,
    /// Free-text biography.
    pub bio: String,
    /// Version label.
    pub version: String,
    /// Creation timestamp.
    pub created_date: DateTime<Utc>,
}

/// The immutable value a form session produces and the store consumes.
///
/// Everything a [`Row`] holds except the derived `no`, which the store
/// assigns from position.
#[derive(Debug, Clone, PartialEq)]
pub struct RowPayload {
    /// Unique record identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Programming language of the record.
    pub language: String,
    /// Free-text biography.
    pub bio: String,
    /// Version label.
    pub version: String,
    /// Creation timestamp.
    pub created_date: DateTime<Utc>,
}

impl RowPayload {
    /// Builds a row from this payload at the given display order.
    pub fn into_row(self, no: u32) -> Row {
        Row {
            no,
            id: self.id,
            name: self.name,
            language: self.language,
            bio: self.bio,
            version: self.version,
            created_date: self.created_date,
        }
    }
}

fn version_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum VersionRepr {
        Text(String),
        Number(f64),
    }

    Ok(match VersionRepr::deserialize(deserializer)? {
        VersionRepr::Text(text) => text,
        VersionRepr::Number(number) => number.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_row_accepts_numeric_version() {
        let seed: SeedRow = serde_json::from_str(
            r#"{"id":"V59OF92YF627HFY0","name":"Adeel Solangi","language":"Sindhi","bio":"Donec lobortis.","version":6.87}"#,
        )
        .unwrap();
        assert_eq!(seed.version, "6.87");
        assert!(seed.created_date.is_none());
    }

    #[test]
    fn seed_row_accepts_string_version_and_created_date() {
        let seed: SeedRow = serde_json::from_str(
            r#"{"id":"1","name":"Ada","language":"English","bio":"x","version":"10.0.0","createdDate":"2024-05-01T12:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(seed.version, "10.0.0");
        assert!(seed.created_date.is_some());
    }

    #[test]
    fn payload_into_row_carries_every_field() {
        let payload = RowPayload {
            id: "1".into(),
            name: "Ada".into(),
            language: "English".into(),
            bio: "First programmer".into(),
            version: "1.0.0".into(),
            created_date: "2024-05-01T12:00:00Z".parse().unwrap(),
        };
        let row = payload.clone().into_row(3);
        assert_eq!(row.no, 3);
        assert_eq!(row.id, payload.id);
        assert_eq!(row.created_date, payload.created_date);
    }
}
