//! Core record types for roster.
//!
//! This module defines the single managed entity (a student record), its
//! identifier, the fixed group enumeration, and the draft shape the form
//! edits before a record is committed.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

/// Stable identifier of a record, minted by the store on insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(Uuid);

impl RecordId {
    /// Length of the short form shown in tables.
    pub const SHORT_LEN: usize = 8;

    /// Generate a fresh random identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// The first eight hex digits, used as the table's short id column.
    #[must_use]
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..Self::SHORT_LEN].to_string()
    }

    /// Check whether this id starts with the given (case-insensitive) prefix.
    ///
    /// Both the hyphenated and the simple form are accepted.
    #[must_use]
    pub fn matches_prefix(&self, prefix: &str) -> bool {
        let prefix = prefix.to_ascii_lowercase();
        self.0.hyphenated().to_string().starts_with(&prefix)
            || self.0.simple().to_string().starts_with(&prefix)
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for RecordId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The fixed classification attached to every record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Group {
    /// React course.
    React,
    /// Java course.
    Java,
    /// Flutter course.
    Flutter,
    /// Python course.
    Python,
}

impl Group {
    /// Every group, in the order the selectors list them.
    pub const ALL: [Group; 4] = [Group::React, Group::Java, Group::Flutter, Group::Python];

    /// Display name of the group.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::React => "React",
            Self::Java => "Java",
            Self::Flutter => "Flutter",
            Self::Python => "Python",
        }
    }

    /// Older spelling still accepted for the group, if any.
    #[must_use]
    pub fn legacy_name(&self) -> Option<&'static str> {
        match self {
            Self::Python => Some("Phyton"),
            Self::React | Self::Java | Self::Flutter => None,
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Group {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|group| {
                group.as_str().eq_ignore_ascii_case(wanted)
                    || group
                        .legacy_name()
                        .is_some_and(|legacy| legacy.eq_ignore_ascii_case(wanted))
            })
            .ok_or_else(|| Error::UnknownGroup(wanted.to_string()))
    }
}

/// The editable, id-less payload of a record.
///
/// Values of this type have passed draft validation: names are non-empty
/// and trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordFields {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Phone-like contact text, possibly empty.
    pub contact: String,
    /// Whether the student currently works.
    pub does_work: bool,
    /// Course group.
    pub group: Group,
}

/// A committed student record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Identifier assigned on insert; never changes.
    pub id: RecordId,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Phone-like contact text, possibly empty.
    pub contact: String,
    /// Whether the student currently works.
    pub does_work: bool,
    /// Course group.
    pub group: Group,
}

impl Record {
    /// Build a record from an id and validated fields.
    #[must_use]
    pub fn from_fields(id: RecordId, fields: RecordFields) -> Self {
        Self {
            id,
            first_name: fields.first_name,
            last_name: fields.last_name,
            contact: fields.contact,
            does_work: fields.does_work,
            group: fields.group,
        }
    }

    /// Overwrite every field except the id.
    pub fn assign(&mut self, fields: RecordFields) {
        self.first_name = fields.first_name;
        self.last_name = fields.last_name;
        self.contact = fields.contact;
        self.does_work = fields.does_work;
        self.group = fields.group;
    }

    /// Copy out the editable fields.
    #[must_use]
    pub fn fields(&self) -> RecordFields {
        RecordFields {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            contact: self.contact.clone(),
            does_work: self.does_work,
            group: self.group,
        }
    }

    /// "First Last" for messages.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// The in-progress, uncommitted copy of a record held by an open form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordDraft {
    /// Given name as typed.
    pub first_name: String,
    /// Family name as typed.
    pub last_name: String,
    /// Contact text as typed.
    pub contact: String,
    /// Checkbox state.
    pub does_work: bool,
    /// Selected group; `None` is the "Select Group" placeholder.
    pub group: Option<Group>,
}

impl RecordDraft {
    /// Populate a draft from a committed record.
    #[must_use]
    pub fn from_record(record: &Record) -> Self {
        Self {
            first_name: record.first_name.clone(),
            last_name: record.last_name.clone(),
            contact: record.contact.clone(),
            does_work: record.does_work,
            group: Some(record.group),
        }
    }

    /// Check required fields and produce the committed payload.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingField`] naming the first empty required field,
    /// checked in form order: first name, last name, group.
    pub fn validate(&self) -> Result<RecordFields> {
        let first_name = self.first_name.trim();
        if first_name.is_empty() {
            return Err(Error::MissingField {
                field: "First Name",
            });
        }
        let last_name = self.last_name.trim();
        if last_name.is_empty() {
            return Err(Error::MissingField { field: "Last Name" });
        }
        let group = self.group.ok_or(Error::MissingField { field: "Group" })?;

        Ok(RecordFields {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            contact: self.contact.trim().to_string(),
            does_work: self.does_work,
            group,
        })
    }
}
