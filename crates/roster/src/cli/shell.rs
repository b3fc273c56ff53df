//! Line-oriented editing shell.
//!
//! Each input line is one user event: it is parsed into an [`Action`] and
//! applied to the [`Roster`] before the next line is read. Errors are printed
//! and the session carries on.

use std::io::{BufRead, Write};

use chrono::Utc;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::form::FieldUpdate;
use crate::record::Group;
use crate::render::{self, OutputFormat};
use crate::session::{RecordRef, Roster};

const HELP: &str = "\
Commands:
  add                    open the form for a new student
  edit <ref>             open the form for an existing student
  set <field> <value>    change a form field
                           fields: first, last, contact, works (yes/no), group (name or none)
  submit                 save the open form
  cancel                 close the form without saving
  delete <ref>           delete a student
  search [term]          filter by text in name, contact or group (no term clears)
  filter <group|all>     show only one group
  clear                  reset search and group filter
  list                   show the table
  form                   show the open form
  notices                show recent notifications
  groups                 list the available groups
  help                   show this help
  quit                   leave the shell

<ref> is a row number from the current table or an id prefix.";

/// One parsed shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Open the add form.
    Add,
    /// Open the edit form for a record.
    Edit(RecordRef),
    /// Change one draft field.
    Set(FieldUpdate),
    /// Commit the draft.
    Submit,
    /// Discard the draft.
    Cancel,
    /// Delete a record.
    Delete(RecordRef),
    /// Replace the search term.
    Search(String),
    /// Replace the group filter; `None` is "All".
    Filter(Option<Group>),
    /// Reset both filters.
    Clear,
    /// Print the visible table.
    List,
    /// Print the open form.
    Form,
    /// Print visible notifications.
    Notices,
    /// Print the group enumeration.
    Groups,
    /// Print help.
    Help,
    /// End the session.
    Quit,
}

impl Action {
    /// Parse one input line.
    ///
    /// Blank lines and lines starting with `#` yield `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownCommand`] or [`Error::InvalidArgument`] for
    /// malformed input, and [`Error::UnknownGroup`] for a bad group name.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let action = match word.to_ascii_lowercase().as_str() {
            "add" | "new" => Self::Add,
            "edit" => Self::Edit(parse_ref("edit", rest)?),
            "set" => Self::Set(parse_field_update(rest)?),
            "submit" | "save" => Self::Submit,
            "cancel" => Self::Cancel,
            "delete" | "del" | "rm" => Self::Delete(parse_ref("delete", rest)?),
            "search" => Self::Search(rest.to_string()),
            "filter" => Self::Filter(parse_group_filter(rest)?),
            "clear" => Self::Clear,
            "list" | "ls" => Self::List,
            "form" => Self::Form,
            "notices" => Self::Notices,
            "groups" => Self::Groups,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            _ => return Err(Error::UnknownCommand(word.to_string())),
        };
        Ok(Some(action))
    }
}

fn parse_ref(command: &'static str, text: &str) -> Result<RecordRef> {
    if text.is_empty() {
        return Err(Error::invalid_argument(
            command,
            "expected a row number or id prefix",
        ));
    }
    RecordRef::parse(text)
}

fn parse_field_update(text: &str) -> Result<FieldUpdate> {
    let (field, value) = match text.split_once(char::is_whitespace) {
        Some((field, value)) => (field, value.trim()),
        None => (text, ""),
    };
    let update = match field.to_ascii_lowercase().as_str() {
        "first" | "first_name" | "firstname" => FieldUpdate::FirstName(value.to_string()),
        "last" | "last_name" | "lastname" => FieldUpdate::LastName(value.to_string()),
        "contact" | "phone" => FieldUpdate::Contact(value.to_string()),
        "works" | "work" | "does_work" | "doeswork" => FieldUpdate::DoesWork(parse_bool(value)?),
        "group" => FieldUpdate::Group(parse_optional_group(value, "none")?),
        "" => {
            return Err(Error::invalid_argument(
                "set",
                "expected a field: first, last, contact, works or group",
            ))
        }
        other => {
            return Err(Error::invalid_argument(
                "set",
                format!("unknown field '{other}'"),
            ))
        }
    };
    Ok(update)
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "yes" | "y" | "true" | "1" | "on" => Ok(true),
        "no" | "n" | "false" | "0" | "off" => Ok(false),
        _ => Err(Error::invalid_argument(
            "set",
            format!("expected yes or no, got '{value}'"),
        )),
    }
}

fn parse_optional_group(value: &str, none_word: &str) -> Result<Option<Group>> {
    if value.is_empty() || value.eq_ignore_ascii_case(none_word) {
        return Ok(None);
    }
    value.parse().map(Some)
}

fn parse_group_filter(value: &str) -> Result<Option<Group>> {
    parse_optional_group(value, "all")
}

/// Whether the shell should keep reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Read the next line.
    Continue,
    /// Stop reading.
    Quit,
}

/// Totals for one [`Shell::run`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Commands executed, including failed ones.
    pub commands: usize,
    /// Commands that ended in an error.
    pub errors: usize,
}

/// An editing session bound to an output format.
#[derive(Debug)]
pub struct Shell {
    roster: Roster,
    format: OutputFormat,
    show_ids: bool,
    prompt: String,
    echo_commands: bool,
}

impl Shell {
    /// Create a shell with an empty roster configured from `config`.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            roster: Roster::with_sink(config.toast_queue()),
            format: config.display.format,
            show_ids: config.display.show_ids,
            prompt: config.shell.prompt.clone(),
            echo_commands: config.shell.echo_commands,
        }
    }

    /// Override the listing format.
    #[must_use]
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Override the id column visibility.
    #[must_use]
    pub fn with_ids(mut self, show_ids: bool) -> Self {
        self.show_ids = show_ids;
        self
    }

    /// The session state.
    #[must_use]
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Read and execute lines until end of input or `quit`.
    ///
    /// When `interactive` is set the prompt is printed before each line;
    /// otherwise lines are echoed if the configuration asks for it.
    ///
    /// # Errors
    ///
    /// Returns an error only when reading input or writing output fails.
    /// Command errors are printed and counted.
    pub fn run(
        &mut self,
        input: impl BufRead,
        out: &mut impl Write,
        interactive: bool,
    ) -> Result<RunSummary> {
        let mut summary = RunSummary::default();
        let mut lines = input.lines();
        loop {
            if interactive {
                write!(out, "{}", self.prompt)?;
                out.flush()?;
            }
            let Some(line) = lines.next().transpose()? else {
                break;
            };
            if !interactive && self.echo_commands && !line.trim().is_empty() {
                writeln!(out, "> {}", line.trim())?;
            }

            match self.execute(&line, out) {
                Ok(None) => continue,
                Ok(Some(flow)) => {
                    summary.commands += 1;
                    if flow == Flow::Quit {
                        break;
                    }
                }
                Err(Error::Io(err)) => return Err(Error::Io(err)),
                Err(err) => {
                    summary.commands += 1;
                    summary.errors += 1;
                    debug!(error = %err, "Command failed");
                    writeln!(out, "error: {err}")?;
                }
            }
        }
        info!(
            commands = summary.commands,
            errors = summary.errors,
            "Roster session ended"
        );
        Ok(summary)
    }

    /// Parse and execute one line.
    ///
    /// Returns `Ok(None)` for blank and comment lines.
    ///
    /// # Errors
    ///
    /// Returns parse errors and any error raised by the action.
    pub fn execute(&mut self, line: &str, out: &mut impl Write) -> Result<Option<Flow>> {
        let Some(action) = Action::parse(line)? else {
            return Ok(None);
        };
        self.apply(action, out).map(Some)
    }

    /// Execute one parsed action.
    ///
    /// # Errors
    ///
    /// Returns any error raised by the action or by writing output.
    pub fn apply(&mut self, action: Action, out: &mut impl Write) -> Result<Flow> {
        debug!(?action, "Executing shell action");
        let started = Utc::now();
        match action {
            Action::Add => {
                self.roster.open_add()?;
                render::write_form(out, self.roster.form())?;
            }
            Action::Edit(reference) => {
                let id = self.roster.resolve(&reference)?;
                self.roster.open_edit(id)?;
                render::write_form(out, self.roster.form())?;
            }
            Action::Set(update) => {
                if !self.roster.change(update) {
                    return Err(Error::FormNotOpen);
                }
            }
            Action::Submit => {
                let result = self.roster.submit();
                self.write_new_notices(out, started)?;
                result?;
                self.write_table(out)?;
            }
            Action::Cancel => {
                if self.roster.form().state().is_open() {
                    self.roster.cancel();
                    writeln!(out, "Form closed; changes discarded.")?;
                } else {
                    writeln!(out, "No form open.")?;
                }
            }
            Action::Delete(reference) => {
                let id = self.roster.resolve(&reference)?;
                self.roster.delete(id);
                self.write_new_notices(out, started)?;
                self.write_table(out)?;
            }
            Action::Search(term) => {
                self.roster.set_search(term);
                self.write_table(out)?;
            }
            Action::Filter(group) => {
                self.roster.set_group_filter(group);
                self.write_table(out)?;
            }
            Action::Clear => {
                self.roster.clear_filters();
                self.write_table(out)?;
            }
            Action::List => self.write_table(out)?,
            Action::Form => render::write_form(out, self.roster.form())?,
            Action::Notices => {
                let visible = self.roster.notifications().visible();
                if visible.is_empty() {
                    writeln!(out, "No recent notifications.")?;
                } else {
                    render::write_notifications(out, visible)?;
                }
            }
            Action::Groups => {
                for group in Group::ALL {
                    writeln!(out, "{group}")?;
                }
            }
            Action::Help => writeln!(out, "{HELP}")?,
            Action::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn write_table(&self, out: &mut impl Write) -> Result<()> {
        let visible = self.roster.visible();
        if self.format != OutputFormat::Json && self.roster.filter().is_active() {
            writeln!(
                out,
                "Showing {} of {} students",
                visible.len(),
                self.roster.store().len()
            )?;
        }
        render::write_records(out, &visible, self.format, self.show_ids)
    }

    fn write_new_notices(
        &self,
        out: &mut impl Write,
        since: chrono::DateTime<Utc>,
    ) -> Result<()> {
        let fresh = self
            .roster
            .notifications()
            .iter()
            .filter(|notification| notification.created_at >= since);
        render::write_notifications(out, fresh)
    }
}
