use crate::errors::JournalError;
use crate::models::{DateKey, Draft, Record};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EditOrigin {
    New,
    Existing { index: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Mode {
    Browsing,
    Viewing { date: DateKey },
    Editing { date: DateKey, origin: EditOrigin },
}

impl Mode {
    pub fn name(&self) -> &'static str {
        match self {
            Mode::Browsing => "browsing",
            Mode::Viewing { .. } => "viewing",
            Mode::Editing { .. } => "editing",
        }
    }
}

/// Browsing / viewing / editing state machine plus the form it edits.
#[derive(Debug, Clone)]
pub struct ModeController {
    mode: Mode,
    selected: Option<DateKey>,
    form: Draft,
}

impl Default for ModeController {
    fn default() -> Self {
        Self {
            mode: Mode::Browsing,
            selected: None,
            form: Draft::default(),
        }
    }
}

impl ModeController {
    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn selected(&self) -> Option<DateKey> {
        self.selected
    }

    pub fn form(&self) -> &Draft {
        &self.form
    }

    pub fn form_mut(&mut self) -> Result<(DateKey, &mut Draft), JournalError> {
        match self.mode {
            Mode::Editing { date, .. } => Ok((date, &mut self.form)),
            other => Err(invalid("change a field", other)),
        }
    }

    /// Picks a day. Days with records open the list; empty days open the form,
    /// prefilled from the day's draft when one exists.
    pub fn select(&mut self, date: DateKey, has_records: bool, draft: Option<&Draft>) {
        self.selected = Some(date);
        if has_records {
            self.mode = Mode::Viewing { date };
        } else {
            self.form = draft.cloned().unwrap_or_default();
            self.mode = Mode::Editing {
                date,
                origin: EditOrigin::New,
            };
        }
    }

    /// Opens a new record. An unsaved draft for the day is resumed.
    pub fn add(&mut self, draft: Option<&Draft>) -> Result<DateKey, JournalError> {
        let date = self.viewing("add")?;
        self.form = draft.cloned().unwrap_or_default();
        self.mode = Mode::Editing {
            date,
            origin: EditOrigin::New,
        };
        Ok(date)
    }

    pub fn edit(&mut self, index: usize, record: &Record) -> Result<DateKey, JournalError> {
        let date = self.viewing("edit")?;
        self.form = Draft::from(record);
        self.mode = Mode::Editing {
            date,
            origin: EditOrigin::Existing { index },
        };
        Ok(date)
    }

    /// Leaves the form after a save or a cancel, handing back its content.
    pub fn finish(&mut self, action: &'static str) -> Result<(DateKey, EditOrigin, Draft), JournalError> {
        match self.mode {
            Mode::Editing { date, origin } => {
                self.mode = Mode::Browsing;
                Ok((date, origin, std::mem::take(&mut self.form)))
            }
            other => Err(invalid(action, other)),
        }
    }

    /// Drops back to browsing once the viewed day has no records left.
    pub fn leave_empty_day(&mut self, date: DateKey) {
        if self.mode == (Mode::Viewing { date }) {
            self.mode = Mode::Browsing;
        }
    }

    pub fn viewing(&self, action: &'static str) -> Result<DateKey, JournalError> {
        match self.mode {
            Mode::Viewing { date } => Ok(date),
            other => Err(invalid(action, other)),
        }
    }
}

fn invalid(action: &'static str, mode: Mode) -> JournalError {
    JournalError::InvalidTransition {
        action,
        mode: mode.name(),
    }
}
