//! `roster` - An in-memory student roster editor
//!
//! This library provides the record store, the add/edit form state machine,
//! the search and group view filter, and transient notifications behind the
//! `roster` shell. Nothing is persisted; a session's records live only as
//! long as its [`Roster`].

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod form;
pub mod logging;
pub mod notify;
pub mod record;
pub mod render;
pub mod session;
pub mod store;

pub use config::Config;
pub use error::{Error, Result};
pub use filter::ViewFilter;
pub use form::{FieldUpdate, FormController, FormState, SubmitOutcome};
pub use logging::init_logging;
pub use notify::{Notification, NotificationLevel, NotificationSink, ToastQueue};
pub use record::{Group, Record, RecordDraft, RecordFields, RecordId};
pub use session::{RecordRef, Roster};
pub use store::RecordStore;
