//! Add/edit form controller.
//!
//! The controller owns exactly one draft at a time and moves between three
//! states:
//!
//! ```text
//!            open_for_add            submit / cancel
//!   Closed ───────────────▶ Adding ─────────────────▶ Closed
//!      │
//!      │     open_for_edit(r)        submit / cancel
//!      └────────────────────▶ Editing(r.id) ────────▶ Closed
//! ```
//!
//! Edits operate on a copy of the record's fields; the store is only touched
//! on submit.

use serde::Serialize;
use tracing::{debug, debug_span, warn};

use crate::error::{Error, Result};
use crate::record::{Group, Record, RecordDraft, RecordId};
use crate::store::RecordStore;

/// Where the form is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", content = "target", rename_all = "snake_case")]
pub enum FormState {
    /// No form is shown.
    #[default]
    Closed,
    /// Creating a new record.
    Adding,
    /// Editing the record with this id.
    Editing(RecordId),
}

impl FormState {
    /// Check if a form is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        !matches!(self, Self::Closed)
    }

    /// Heading shown above an open form.
    #[must_use]
    pub fn title(&self) -> &'static str {
        match self {
            Self::Closed => "Closed",
            Self::Adding => "Add Student",
            Self::Editing(_) => "Edit Student",
        }
    }

    /// Label of the submit button.
    #[must_use]
    pub fn submit_label(&self) -> &'static str {
        match self {
            Self::Editing(_) => "Update Student",
            _ => "Add Student",
        }
    }
}

/// A single typed change to one draft field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate {
    /// Set the first name.
    FirstName(String),
    /// Set the last name.
    LastName(String),
    /// Set the contact text.
    Contact(String),
    /// Tick or untick the "does work" box.
    DoesWork(bool),
    /// Pick a group, or go back to the placeholder with `None`.
    Group(Option<Group>),
}

impl FieldUpdate {
    /// Name of the field this update targets.
    #[must_use]
    pub fn field_name(&self) -> &'static str {
        match self {
            Self::FirstName(_) => "first_name",
            Self::LastName(_) => "last_name",
            Self::Contact(_) => "contact",
            Self::DoesWork(_) => "does_work",
            Self::Group(_) => "group",
        }
    }

    fn apply_to(self, draft: &mut RecordDraft) {
        match self {
            Self::FirstName(value) => draft.first_name = value,
            Self::LastName(value) => draft.last_name = value,
            Self::Contact(value) => draft.contact = value,
            Self::DoesWork(value) => draft.does_work = value,
            Self::Group(value) => draft.group = value,
        }
    }
}

/// What a successful submit did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A new record was appended.
    Created(RecordId),
    /// An existing record was overwritten in place.
    Updated(RecordId),
}

impl SubmitOutcome {
    /// The id of the affected record.
    #[must_use]
    pub fn id(&self) -> RecordId {
        match self {
            Self::Created(id) | Self::Updated(id) => *id,
        }
    }
}

/// Holds the draft and the add/edit state.
#[derive(Debug, Clone, Default)]
pub struct FormController {
    state: FormState,
    draft: RecordDraft,
    submitting: bool,
}

impl FormController {
    /// Create a closed form with an empty draft.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> FormState {
        self.state
    }

    /// Current draft (empty when closed).
    #[must_use]
    pub fn draft(&self) -> &RecordDraft {
        &self.draft
    }

    /// Check if a commit is in progress.
    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Open an empty form for a new record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FormAlreadyOpen`] if a form is already open.
    pub fn open_for_add(&mut self) -> Result<()> {
        self.ensure_closed()?;
        self.state = FormState::Adding;
        self.draft = RecordDraft::default();
        debug!("Form opened for add");
        Ok(())
    }

    /// Open a form pre-filled from `record`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FormAlreadyOpen`] if a form is already open.
    pub fn open_for_edit(&mut self, record: &Record) -> Result<()> {
        self.ensure_closed()?;
        self.state = FormState::Editing(record.id);
        self.draft = RecordDraft::from_record(record);
        debug!(id = %record.id, "Form opened for edit");
        Ok(())
    }

    /// Apply one field change to the draft.
    ///
    /// Returns `false` without touching anything when the form is closed.
    pub fn apply(&mut self, update: FieldUpdate) -> bool {
        if !self.state.is_open() {
            debug!(field = update.field_name(), "Field change ignored, form closed");
            return false;
        }
        debug!(field = update.field_name(), "Draft field changed");
        update.apply_to(&mut self.draft);
        true
    }

    /// Validate the draft and commit it into `store`.
    ///
    /// On success the form closes and the draft is reset. On a validation
    /// failure the form stays open with the draft intact and the store is
    /// not touched.
    ///
    /// # Errors
    ///
    /// - [`Error::FormNotOpen`] when the form is closed.
    /// - [`Error::MissingField`] when a required field is empty.
    /// - [`Error::RecordNotFound`] when the edited record no longer exists;
    ///   the form is closed and the draft dropped.
    pub fn submit(&mut self, store: &mut RecordStore) -> Result<SubmitOutcome> {
        let state = self.state;
        if !state.is_open() {
            return Err(Error::FormNotOpen);
        }
        let fields = self.draft.validate()?;

        let _span = debug_span!("submit", mode = state.title()).entered();
        self.submitting = true;
        let outcome = match state {
            FormState::Adding => Ok(SubmitOutcome::Created(store.add(fields))),
            FormState::Editing(id) => {
                if store.replace(id, fields) {
                    Ok(SubmitOutcome::Updated(id))
                } else {
                    warn!(%id, "Edited record no longer exists, dropping draft");
                    Err(Error::RecordNotFound(id))
                }
            }
            FormState::Closed => Err(Error::FormNotOpen),
        };
        self.submitting = false;
        self.close();
        outcome
    }

    /// Close the form and discard the draft. Does nothing when closed.
    pub fn cancel(&mut self) {
        if self.state.is_open() {
            debug!(mode = self.state.title(), "Form cancelled");
            self.close();
        }
    }

    fn close(&mut self) {
        self.state = FormState::Closed;
        self.draft = RecordDraft::default();
    }

    fn ensure_closed(&self) -> Result<()> {
        if self.state.is_open() {
            return Err(Error::FormAlreadyOpen {
                mode: self.state.title(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordFields;

    fn filled(form: &mut FormController, first: &str, last: &str, group: Group) {
        form.apply(FieldUpdate::FirstName(first.to_string()));
        form.apply(FieldUpdate::LastName(last.to_string()));
        form.apply(FieldUpdate::Group(Some(group)));
    }

    fn seeded_store() -> (RecordStore, RecordId) {
        let mut store = RecordStore::new();
        let id = store.add(RecordFields {
            first_name: "Ali".to_string(),
            last_name: "Vali".to_string(),
            contact: "+998901234567".to_string(),
            does_work: true,
            group: Group::React,
        });
        (store, id)
    }

    #[test]
    fn test_new_form_is_closed() {
        let form = FormController::new();
        assert_eq!(form.state(), FormState::Closed);
        assert_eq!(form.draft(), &RecordDraft::default());
        assert!(!form.is_submitting());
    }

    #[test]
    fn test_form_state_labels() {
        assert_eq!(FormState::Adding.title(), "Add Student");
        assert_eq!(FormState::Adding.submit_label(), "Add Student");
        let editing = FormState::Editing(RecordId::new());
        assert_eq!(editing.title(), "Edit Student");
        assert_eq!(editing.submit_label(), "Update Student");
    }

    #[test]
    fn test_open_for_add_resets_draft() {
        let mut form = FormController::new();
        form.open_for_add().unwrap();
        form.apply(FieldUpdate::FirstName("Ali".to_string()));
        form.cancel();

        form.open_for_add().unwrap();
        assert_eq!(form.state(), FormState::Adding);
        assert_eq!(form.draft(), &RecordDraft::default());
    }

    #[test]
    fn test_open_for_edit_populates_draft() {
        let (store, id) = seeded_store();
        let mut form = FormController::new();
        form.open_for_edit(store.get(id).unwrap()).unwrap();

        assert_eq!(form.state(), FormState::Editing(id));
        assert_eq!(form.draft().first_name, "Ali");
        assert_eq!(form.draft().contact, "+998901234567");
        assert!(form.draft().does_work);
        assert_eq!(form.draft().group, Some(Group::React));
    }

    #[test]
    fn test_open_twice_is_rejected() {
        let mut form = FormController::new();
        form.open_for_add().unwrap();
        let err = form.open_for_add().unwrap_err();
        assert!(matches!(err, Error::FormAlreadyOpen { mode: "Add Student" }));
    }

    #[test]
    fn test_apply_when_closed_is_noop() {
        let mut form = FormController::new();
        assert!(!form.apply(FieldUpdate::FirstName("Ali".to_string())));
        assert_eq!(form.draft(), &RecordDraft::default());
    }

    #[test]
    fn test_apply_each_field() {
        let mut form = FormController::new();
        form.open_for_add().unwrap();
        assert!(form.apply(FieldUpdate::Contact("555".to_string())));
        assert!(form.apply(FieldUpdate::DoesWork(true)));
        assert!(form.apply(FieldUpdate::Group(Some(Group::Java))));
        assert!(form.apply(FieldUpdate::Group(None)));

        let draft = form.draft();
        assert_eq!(draft.contact, "555");
        assert!(draft.does_work);
        assert!(draft.group.is_none());
    }

    #[test]
    fn test_submit_add_creates_record() {
        let mut store = RecordStore::new();
        let mut form = FormController::new();
        form.open_for_add().unwrap();
        filled(&mut form, "Ali", "Vali", Group::React);

        let outcome = form.submit(&mut store).unwrap();
        assert!(matches!(outcome, SubmitOutcome::Created(_)));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(outcome.id()).unwrap().last_name, "Vali");
        assert_eq!(form.state(), FormState::Closed);
        assert_eq!(form.draft(), &RecordDraft::default());
        assert!(!form.is_submitting());
    }

    #[test]
    fn test_submit_edit_replaces_in_place() {
        let (mut store, id) = seeded_store();
        let mut form = FormController::new();
        form.open_for_edit(store.get(id).unwrap()).unwrap();
        form.apply(FieldUpdate::LastName("Karimov".to_string()));

        let outcome = form.submit(&mut store).unwrap();
        assert_eq!(outcome, SubmitOutcome::Updated(id));
        assert_eq!(store.len(), 1);
        let record = store.get(id).unwrap();
        assert_eq!(record.last_name, "Karimov");
        assert_eq!(record.contact, "+998901234567");
    }

    #[test]
    fn test_submit_missing_field_keeps_form_open() {
        let mut store = RecordStore::new();
        let mut form = FormController::new();
        form.open_for_add().unwrap();
        form.apply(FieldUpdate::FirstName("Ali".to_string()));

        let err = form.submit(&mut store).unwrap_err();
        assert!(matches!(err, Error::MissingField { field: "Last Name" }));
        assert_eq!(form.state(), FormState::Adding);
        assert_eq!(form.draft().first_name, "Ali");
        assert!(store.is_empty());
    }

    #[test]
    fn test_submit_when_closed() {
        let mut store = RecordStore::new();
        let mut form = FormController::new();
        assert!(matches!(
            form.submit(&mut store).unwrap_err(),
            Error::FormNotOpen
        ));
    }

    #[test]
    fn test_submit_edit_of_deleted_record() {
        let (mut store, id) = seeded_store();
        let mut form = FormController::new();
        form.open_for_edit(store.get(id).unwrap()).unwrap();
        store.remove(id);

        let err = form.submit(&mut store).unwrap_err();
        assert!(matches!(err, Error::RecordNotFound(missing) if missing == id));
        assert!(store.is_empty());
        assert_eq!(form.state(), FormState::Closed);
    }

    #[test]
    fn test_cancel_discards_draft() {
        let (store, id) = seeded_store();
        let mut form = FormController::new();
        form.open_for_edit(store.get(id).unwrap()).unwrap();
        form.apply(FieldUpdate::FirstName("Changed".to_string()));
        form.cancel();

        assert_eq!(form.state(), FormState::Closed);
        assert_eq!(form.draft(), &RecordDraft::default());
        assert_eq!(store.get(id).unwrap().first_name, "Ali");
    }

    #[test]
    fn test_cancel_when_closed_is_noop() {
        let mut form = FormController::new();
        form.cancel();
        assert_eq!(form.state(), FormState::Closed);
    }

    #[test]
    fn test_form_state_serialization() {
        let json = serde_json::to_string(&FormState::Adding).unwrap();
        assert_eq!(json, r#"{"state":"adding"}"#);
    }
}
