//! Modal form sessions
//!
//! A [`FormSession`] captures user input for a single row as plain string
//! drafts and, on submit, either produces a complete [`RowPayload`] or the
//! per-field validation errors. It never produces a partially-valid payload
//! and shares no state with the store; the payload is passed by value.

use chrono::DateTime;
use chrono::Utc;

use crate::error::FieldValidationError;
use crate::error::ValidationError;
use crate::model::Row;
use crate::model::RowPayload;
use crate::seed::Clock;

/// Version prefilled into the add form.
const DEFAULT_VERSION: &str = "10.0.0";

/// The fields captured by a form session, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// Record identifier, assigned at session start, never editable.
    Id,
    /// Programming language.
    Language,
    /// Display name.
    Name,
    /// Free-text biography.
    Bio,
    /// Version label.
    Version,
    /// Creation timestamp, RFC 3339.
    CreatedDate,
}

impl Field {
    /// All fields in display order.
    pub const ALL: [Field; 6] = [
        Field::Id,
        Field::Language,
        Field::Name,
        Field::Bio,
        Field::Version,
        Field::CreatedDate,
    ];

    /// Machine name used in validation errors and serialization.
    pub fn name(self) -> &'static str {
        match self {
            Field::Id => "id",
            Field::Language => "language",
            Field::Name => "name",
            Field::Bio => "bio",
            Field::Version => "version",
            Field::CreatedDate => "createdDate",
        }
    }

    /// Human label used by the shell.
    pub fn label(self) -> &'static str {
        match self {
            Field::Id => "ID",
            Field::Language => "Language",
            Field::Name => "Name",
            Field::Bio => "Bio",
            Field::Version => "Version",
            Field::CreatedDate => "Created Date",
        }
    }
}

/// Whether the session creates a new row or edits an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    /// Creating a new row.
    Add,
    /// Editing an existing row.
    Edit,
}

/// A single form-fill-and-submit interaction.
#[derive(Debug, Clone)]
pub struct FormSession {
    mode: FormMode,
    drafts: [String; 6],
}

impl FormSession {
    /// Session for adding a row.
    ///
    /// The id is assigned up front from the clock (epoch milliseconds, the
    /// time-based collision-resistant source), the creation date from the
    /// same instant, and the version gets its default. None of the three is
    /// editable in this mode.
    pub fn add(clock: &dyn Clock) -> Self {
        let now = clock.now();
        let mut session = Self {
            mode: FormMode::Add,
            drafts: Default::default(),
        };
        session.drafts[Field::Id as usize] = now.timestamp_millis().to_string();
        session.drafts[Field::Version as usize] = DEFAULT_VERSION.to_string();
        session.drafts[Field::CreatedDate as usize] = now.to_rfc3339();
        session
    }

    /// Session editing an existing row, prefilled from it.
    pub fn edit(row: &Row) -> Self {
        let mut session = Self {
            mode: FormMode::Edit,
            drafts: Default::default(),
        };
        session.drafts[Field::Id as usize] = row.id.clone();
        session.drafts[Field::Language as usize] = row.language.clone();
        session.drafts[Field::Name as usize] = row.name.clone();
        session.drafts[Field::Bio as usize] = row.bio.clone();
        session.drafts[Field::Version as usize] = row.version.clone();
        session.drafts[Field::CreatedDate as usize] = row.created_date.to_rfc3339();
        session
    }

    /// The session's mode.
    pub fn mode(&self) -> FormMode {
        self.mode
    }

    /// Current draft value of a field.
    pub fn value(&self, field: Field) -> &str {
        &self.drafts[field as usize]
    }

    /// Whether the user may edit this field in this mode.
    ///
    /// Add sessions expose language, name and bio; edit sessions only name
    /// and bio (the language is fixed once created, like the id).
    pub fn is_editable(&self, field: Field) -> bool {
        match self.mode {
            FormMode::Add => matches!(field, Field::Language | Field::Name | Field::Bio),
            FormMode::Edit => matches!(field, Field::Name | Field::Bio),
        }
    }

    /// Sets a draft value.
    ///
    /// Non-editable fields are left unchanged; returns whether the value was
    /// taken.
    pub fn set(&mut self, field: Field, value: impl Into<String>) -> bool {
        if !self.is_editable(field) {
            return false;
        }
        self.drafts[field as usize] = value.into();
        true
    }

    /// Validates every field and produces the payload.
    ///
    /// Every field is required; the creation date must additionally parse as
    /// RFC 3339. On any failure the result carries one message per failed
    /// field and no payload exists.
    pub fn validate(&self) -> Result<RowPayload, ValidationError> {
        let mut errors = Vec::new();
        for field in Field::ALL {
            if self.value(field).trim().is_empty() {
                errors.push(FieldValidationError::new(
                    field.name(),
                    format!("{} is required", field.label()),
                ));
            }
        }

        let date_draft = self.value(Field::CreatedDate);
        let created_date = if date_draft.trim().is_empty() {
            None
        } else {
            match DateTime::parse_from_rfc3339(date_draft) {
                Ok(instant) => Some(instant.with_timezone(&Utc)),
                Err(_) => {
                    errors.push(FieldValidationError::new(
                        Field::CreatedDate.name(),
                        "Created Date must be an RFC 3339 timestamp",
                    ));
                    None
                }
            }
        };

        match created_date {
            Some(created_date) if errors.is_empty() => Ok(RowPayload {
                id: self.value(Field::Id).to_string(),
                name: self.value(Field::Name).to_string(),
                language: self.value(Field::Language).to_string(),
                bio: self.value(Field::Bio).to_string(),
                version: self.value(Field::Version).to_string(),
                created_date,
            }),
            _ => Err(ValidationError::new(errors)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedClock;

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            "2025-06-01T00:00:00Z".parse().unwrap()
        }
    }

    fn sample_row() -> Row {
        Row {
            no: 3,
            id: "42".into(),
            name: "Ada".into(),
            language: "English".into(),
            bio: "First programmer".into(),
            version: "1.0".into(),
            created_date: "2024-05-01T12:00:00Z".parse().unwrap(),
        }
    }

    #[test]
    fn add_session_prefills_id_version_and_date() {
        let session = FormSession::add(&FixedClock);
        let expected_millis: DateTime<Utc> = "2025-06-01T00:00:00Z".parse().unwrap();
        assert_eq!(session.value(Field::Id), expected_millis.timestamp_millis().to_string());
        assert_eq!(session.value(Field::Version), "10.0.0");
        assert!(!session.value(Field::CreatedDate).is_empty());
        assert!(session.value(Field::Name).is_empty());
    }

    #[test]
    fn edit_session_prefills_from_the_row() {
        let session = FormSession::edit(&sample_row());
        assert_eq!(session.mode(), FormMode::Edit);
        assert_eq!(session.value(Field::Id), "42");
        assert_eq!(session.value(Field::Name), "Ada");
        assert_eq!(session.value(Field::Language), "English");
    }

    #[test]
    fn non_editable_fields_reject_changes() {
        let mut session = FormSession::edit(&sample_row());
        assert!(!session.set(Field::Id, "other"));
        assert!(!session.set(Field::Language, "French"));
        assert!(session.set(Field::Name, "Ada L."));
        assert_eq!(session.value(Field::Id), "42");
        assert_eq!(session.value(Field::Name), "Ada L.");
    }

    #[test]
    fn missing_fields_produce_one_error_each() {
        let session = FormSession::add(&FixedClock);
        let error = session.validate().unwrap_err();
        let failed: Vec<&str> = error.errors().iter().map(|e| e.field.as_str()).collect();
        assert_eq!(failed, vec!["language", "name", "bio"]);
        assert_eq!(error.message_for("name"), Some("Name is required"));
    }

    #[test]
    fn complete_add_session_validates_to_a_payload() {
        let mut session = FormSession::add(&FixedClock);
        session.set(Field::Language, "Sindhi");
        session.set(Field::Name, "Adeel Solangi");
        session.set(Field::Bio, "Donec lobortis.");
        let payload = session.validate().unwrap();
        assert_eq!(payload.name, "Adeel Solangi");
        assert_eq!(payload.version, "10.0.0");
        assert_eq!(payload.created_date.to_rfc3339(), "2025-06-01T00:00:00+00:00");
    }

    #[test]
    fn bad_timestamp_is_a_field_error() {
        let mut session = FormSession::edit(&sample_row());
        session.drafts[Field::CreatedDate as usize] = "yesterday".into();
        let error = session.validate().unwrap_err();
        assert!(error.message_for("createdDate").is_some());
    }

    #[test]
    fn whitespace_only_input_does_not_pass_required() {
        let mut session = FormSession::edit(&sample_row());
        session.set(Field::Name, "   ");
        let error = session.validate().unwrap_err();
        assert_eq!(error.errors().len(), 1);
        assert_eq!(error.errors()[0].field, "name");
    }
}
