//! The roster session: one owned container for all editor state.
//!
//! [`Roster`] ties together the record store, the form controller, the view
//! filter and a notification sink. Every user event is one method call that
//! runs to completion before the next one; callers hold the session by
//! `&mut` and there is no ambient global state.

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::filter::ViewFilter;
use crate::form::{FieldUpdate, FormController, SubmitOutcome};
use crate::notify::{Notification, NotificationSink, ToastQueue};
use crate::record::{Group, Record, RecordId};
use crate::store::RecordStore;

/// How the user points at a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordRef {
    /// 1-based row number in the currently displayed table.
    Row(usize),
    /// Full id or unique id prefix.
    Id(String),
}

impl RecordRef {
    /// Interpret user text: all digits is a row number, anything else an id
    /// prefix.
    ///
    /// Digit runs with a leading zero are id prefixes, so an all-digit short
    /// id round-trips through [`Roster::resolve`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoSuchRow`] for row `0` and
    /// [`Error::UnknownReference`] for empty input.
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::UnknownReference(String::new()));
        }
        let leading_zero = text.len() > 1 && text.starts_with('0');
        if !leading_zero && text.chars().all(|c| c.is_ascii_digit()) {
            // Long digit runs cannot be rows; treat them as id prefixes.
            if let Ok(row) = text.parse::<usize>() {
                if row == 0 {
                    return Err(Error::NoSuchRow(0));
                }
                return Ok(Self::Row(row));
            }
        }
        Ok(Self::Id(text.to_string()))
    }
}

/// All state of one editing session.
#[derive(Debug)]
pub struct Roster<S = ToastQueue> {
    store: RecordStore,
    form: FormController,
    filter: ViewFilter,
    sink: S,
}

impl Default for Roster<ToastQueue> {
    fn default() -> Self {
        Self::with_sink(ToastQueue::default())
    }
}

impl Roster<ToastQueue> {
    /// Create an empty session with the default notification queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S: NotificationSink> Roster<S> {
    /// Create an empty session delivering notifications to `sink`.
    #[must_use]
    pub fn with_sink(sink: S) -> Self {
        info!("Roster session started");
        Self {
            store: RecordStore::new(),
            form: FormController::new(),
            filter: ViewFilter::new(),
            sink,
        }
    }

    /// Every record in insertion order.
    #[must_use]
    pub fn records(&self) -> &[Record] {
        self.store.list()
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// The form controller.
    #[must_use]
    pub fn form(&self) -> &FormController {
        &self.form
    }

    /// The current view filter.
    #[must_use]
    pub fn filter(&self) -> &ViewFilter {
        &self.filter
    }

    /// The notification sink.
    #[must_use]
    pub fn notifications(&self) -> &S {
        &self.sink
    }

    /// Mutable access to the notification sink.
    pub fn notifications_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Records passing the current filter, in collection order.
    #[must_use]
    pub fn visible(&self) -> Vec<&Record> {
        self.filter.apply(self.store.list())
    }

    /// Open the form for a new record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FormAlreadyOpen`] if a form is already open.
    pub fn open_add(&mut self) -> Result<()> {
        self.form.open_for_add()
    }

    /// Open the form pre-filled from the record with `id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RecordNotFound`] for an unknown id and
    /// [`Error::FormAlreadyOpen`] if a form is already open.
    pub fn open_edit(&mut self, id: RecordId) -> Result<()> {
        let record = self.store.get(id).ok_or(Error::RecordNotFound(id))?;
        self.form.open_for_edit(record)
    }

    /// Apply one field change to the open draft.
    ///
    /// Returns `false` when no form is open; nothing changes in that case.
    pub fn change(&mut self, update: FieldUpdate) -> bool {
        self.form.apply(update)
    }

    /// Commit the open draft.
    ///
    /// # Errors
    ///
    /// Propagates form errors. Validation errors produce no notification; a
    /// vanished edit target produces a warning notification.
    pub fn submit(&mut self) -> Result<SubmitOutcome> {
        match self.form.submit(&mut self.store) {
            Ok(outcome) => {
                let name = self
                    .store
                    .get(outcome.id())
                    .map(Record::full_name)
                    .unwrap_or_default();
                let message = match outcome {
                    SubmitOutcome::Created(_) => format!("Student added: {name}"),
                    SubmitOutcome::Updated(_) => format!("Student updated: {name}"),
                };
                self.sink.notify(Notification::success(message));
                Ok(outcome)
            }
            Err(Error::RecordNotFound(id)) => {
                self.sink.notify(Notification::warning(
                    "Student no longer exists; changes discarded",
                ));
                Err(Error::RecordNotFound(id))
            }
            Err(err) => Err(err),
        }
    }

    /// Close the form and discard the draft.
    pub fn cancel(&mut self) {
        self.form.cancel();
    }

    /// Delete the record with `id`.
    ///
    /// Returns the removed record, or `None` if it was already gone.
    pub fn delete(&mut self, id: RecordId) -> Option<Record> {
        let removed = self.store.remove(id)?;
        self.sink.notify(Notification::success(format!(
            "Student deleted: {}",
            removed.full_name()
        )));
        Some(removed)
    }

    /// Replace the search term.
    pub fn set_search(&mut self, term: impl Into<String>) {
        self.filter.set_search(term);
        debug!(search = %self.filter.search(), "Search term changed");
    }

    /// Replace the group selector; `None` shows all groups.
    pub fn set_group_filter(&mut self, group: Option<Group>) {
        self.filter.set_group(group);
        debug!(group = ?group, "Group filter changed");
    }

    /// Reset search term and group selector.
    pub fn clear_filters(&mut self) {
        self.filter.clear();
        debug!("Filters cleared");
    }

    /// Turn a user reference into a record id.
    ///
    /// Row numbers are resolved against the currently displayed rows. A row
    /// number past the end that is as long as a short id is looked up as an
    /// id prefix instead, since short ids can be all digits.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoSuchRow`], [`Error::UnknownReference`] or
    /// [`Error::AmbiguousReference`].
    pub fn resolve(&self, reference: &RecordRef) -> Result<RecordId> {
        match reference {
            RecordRef::Row(row) => {
                if let Some(record) = self.visible().get(row.wrapping_sub(1)) {
                    return Ok(record.id);
                }
                let digits = row.to_string();
                if digits.len() < RecordId::SHORT_LEN {
                    return Err(Error::NoSuchRow(*row));
                }
                match self.store.find_by_prefix(&digits) {
                    Ok(record) => Ok(record.id),
                    Err(err) if err.is_not_found() => Err(Error::NoSuchRow(*row)),
                    Err(err) => Err(err),
                }
            }
            RecordRef::Id(prefix) => self.store.find_by_prefix(prefix).map(|record| record.id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FormState;
    use crate::notify::NotificationLevel;
    use crate::record::RecordDraft;

    fn add(roster: &mut Roster<Vec<Notification>>, first: &str, last: &str, group: Group) -> RecordId {
        roster.open_add().unwrap();
        roster.change(FieldUpdate::FirstName(first.to_string()));
        roster.change(FieldUpdate::LastName(last.to_string()));
        roster.change(FieldUpdate::Group(Some(group)));
        roster.submit().unwrap().id()
    }

    fn session() -> Roster<Vec<Notification>> {
        Roster::with_sink(Vec::new())
    }

    #[test]
    fn test_record_ref_parse() {
        assert_eq!(RecordRef::parse("3").unwrap(), RecordRef::Row(3));
        assert_eq!(
            RecordRef::parse(" 1a2b ").unwrap(),
            RecordRef::Id("1a2b".to_string())
        );
        assert!(matches!(RecordRef::parse("0"), Err(Error::NoSuchRow(0))));
        assert!(matches!(
            RecordRef::parse("  "),
            Err(Error::UnknownReference(_))
        ));
        let long = "1".repeat(40);
        assert_eq!(RecordRef::parse(&long).unwrap(), RecordRef::Id(long));
        assert_eq!(
            RecordRef::parse("01234567").unwrap(),
            RecordRef::Id("01234567".to_string())
        );
    }

    #[test]
    fn test_add_edit_search_filter_scenario() {
        let mut roster = session();
        let id = add(&mut roster, "Ali", "Vali", Group::React);
        assert_eq!(roster.records().len(), 1);

        roster.open_edit(id).unwrap();
        roster.change(FieldUpdate::LastName("Karimov".to_string()));
        roster.submit().unwrap();
        assert_eq!(roster.records().len(), 1);
        assert_eq!(roster.records()[0].last_name, "Karimov");

        roster.set_search("karim");
        let visible = roster.visible();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, id);

        roster.set_group_filter(Some(Group::Java));
        assert!(roster.visible().is_empty());
    }

    #[test]
    fn test_group_filter_scenario() {
        let mut roster = session();
        let react = add(&mut roster, "Ali", "Vali", Group::React);
        add(&mut roster, "Olim", "Salim", Group::Flutter);

        roster.set_group_filter(Some(Group::React));
        let visible = roster.visible();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, react);
    }

    #[test]
    fn test_notifications_on_add_update_delete() {
        let mut roster = session();
        let id = add(&mut roster, "Ali", "Vali", Group::React);
        roster.open_edit(id).unwrap();
        roster.submit().unwrap();
        roster.delete(id).unwrap();

        let sink = roster.notifications();
        assert_eq!(sink.len(), 3);
        assert!(sink.iter().all(|n| n.level == NotificationLevel::Success));
        assert_eq!(sink[0].message, "Student added: Ali Vali");
        assert_eq!(sink[1].message, "Student updated: Ali Vali");
        assert_eq!(sink[2].message, "Student deleted: Ali Vali");
    }

    #[test]
    fn test_validation_failure_is_silent() {
        let mut roster = session();
        roster.open_add().unwrap();
        roster.change(FieldUpdate::FirstName("Ali".to_string()));

        let err = roster.submit().unwrap_err();
        assert!(err.is_validation());
        assert!(roster.notifications().is_empty());
        assert_eq!(roster.form().state(), FormState::Adding);
    }

    #[test]
    fn test_delete_missing_is_silent_noop() {
        let mut roster = session();
        let id = add(&mut roster, "Ali", "Vali", Group::React);
        roster.delete(id);
        let before = roster.notifications().len();

        assert!(roster.delete(id).is_none());
        assert_eq!(roster.notifications().len(), before);
    }

    #[test]
    fn test_edit_of_deleted_record_warns() {
        let mut roster = session();
        let id = add(&mut roster, "Ali", "Vali", Group::React);
        roster.open_edit(id).unwrap();
        roster.delete(id);

        let err = roster.submit().unwrap_err();
        assert!(matches!(err, Error::RecordNotFound(_)));
        assert!(roster.records().is_empty());
        assert_eq!(roster.form().state(), FormState::Closed);
        let last = roster.notifications().last().unwrap();
        assert_eq!(last.level, NotificationLevel::Warning);
    }

    #[test]
    fn test_open_edit_unknown_id() {
        let mut roster = session();
        let err = roster.open_edit(RecordId::new()).unwrap_err();
        assert!(matches!(err, Error::RecordNotFound(_)));
        assert_eq!(roster.form().state(), FormState::Closed);
    }

    #[test]
    fn test_change_without_form() {
        let mut roster = session();
        assert!(!roster.change(FieldUpdate::DoesWork(true)));
    }

    #[test]
    fn test_cancel_leaves_store_untouched() {
        let mut roster = session();
        let id = add(&mut roster, "Ali", "Vali", Group::React);
        roster.open_edit(id).unwrap();
        roster.change(FieldUpdate::FirstName("Changed".to_string()));
        roster.cancel();

        assert_eq!(roster.records()[0].first_name, "Ali");
        assert_eq!(roster.notifications().len(), 1);
    }

    #[test]
    fn test_resolve_row_uses_visible_rows() {
        let mut roster = session();
        add(&mut roster, "Ali", "Vali", Group::React);
        let olim = add(&mut roster, "Olim", "Salim", Group::Java);

        roster.set_group_filter(Some(Group::Java));
        assert_eq!(roster.resolve(&RecordRef::Row(1)).unwrap(), olim);
        assert!(matches!(
            roster.resolve(&RecordRef::Row(2)),
            Err(Error::NoSuchRow(2))
        ));
    }

    fn insert_digit_id(roster: &mut Roster<Vec<Notification>>, uuid: &str) -> RecordId {
        let id = RecordId::from(uuid::Uuid::parse_str(uuid).unwrap());
        let fields = RecordDraft {
            first_name: "Olim".to_string(),
            last_name: "Salim".to_string(),
            group: Some(Group::Java),
            ..RecordDraft::default()
        }
        .validate()
        .unwrap();
        roster.store.insert_with_id(id, fields);
        id
    }

    #[test]
    fn test_resolve_all_digit_short_id() {
        let mut roster = session();
        add(&mut roster, "Ali", "Vali", Group::React);
        let olim = insert_digit_id(&mut roster, "12345678-9abc-4def-8123-456789abcdef");
        assert_eq!(olim.short(), "12345678");

        let reference = RecordRef::parse(&olim.short()).unwrap();
        assert_eq!(reference, RecordRef::Row(12_345_678));
        assert_eq!(roster.resolve(&reference).unwrap(), olim);
        assert!(matches!(
            roster.resolve(&RecordRef::Row(87_654_321)),
            Err(Error::NoSuchRow(87_654_321))
        ));
    }

    #[test]
    fn test_resolve_digit_short_id_with_leading_zero() {
        let mut roster = session();
        let olim = insert_digit_id(&mut roster, "01234567-9abc-4def-8123-456789abcdef");

        let reference = RecordRef::parse("01234567").unwrap();
        assert_eq!(roster.resolve(&reference).unwrap(), olim);
    }

    #[test]
    fn test_resolve_id_prefix_ignores_filter() {
        let mut roster = session();
        let ali = add(&mut roster, "Ali", "Vali", Group::React);
        roster.set_group_filter(Some(Group::Java));

        let found = roster.resolve(&RecordRef::Id(ali.short())).unwrap();
        assert_eq!(found, ali);
    }

    #[test]
    fn test_clear_filters() {
        let mut roster = session();
        add(&mut roster, "Ali", "Vali", Group::React);
        roster.set_search("zzz");
        roster.set_group_filter(Some(Group::Java));
        assert!(roster.visible().is_empty());

        roster.clear_filters();
        assert_eq!(roster.visible().len(), 1);
    }

    #[test]
    fn test_default_roster_uses_toast_queue() {
        let mut roster = Roster::new();
        roster.open_add().unwrap();
        roster.change(FieldUpdate::FirstName("Ali".to_string()));
        roster.change(FieldUpdate::LastName("Vali".to_string()));
        roster.change(FieldUpdate::Group(Some(Group::React)));
        roster.submit().unwrap();

        assert_eq!(roster.notifications().visible().len(), 1);
        roster.notifications_mut().drain();
        assert!(roster.notifications().is_empty());
    }
}
