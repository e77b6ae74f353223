use crate::calendar::{MonthView, month_view};
use crate::config::EditPolicy;
use crate::drafts::DraftStore;
use crate::errors::JournalError;
use crate::mode::{EditOrigin, Mode, ModeController};
use crate::models::{Color, DateKey, Draft, FieldRequest, Month, Record};
use crate::records::RecordStore;
use crate::rich_text;
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};

#[derive(Debug, Clone, Serialize)]
pub struct JournalSnapshot {
    pub mode: Mode,
    pub selected: Option<DateKey>,
    pub form: Option<Draft>,
    pub records: Vec<Record>,
    pub calendar: MonthView,
    pub palette: Vec<Color>,
    pub storage_warning: Option<String>,
}

/// The journal state: committed records, drafts and the current screen.
///
/// Every public mutator is one user event. Callers flush drafts with
/// [`Journal::persist`] afterwards.
#[derive(Debug)]
pub struct Journal {
    records: RecordStore,
    drafts: DraftStore,
    controller: ModeController,
    policy: EditPolicy,
}

impl Journal {
    pub fn new(drafts: DraftStore, policy: EditPolicy) -> Self {
        Self {
            records: RecordStore::default(),
            drafts,
            controller: ModeController::default(),
            policy,
        }
    }

    pub fn records(&self) -> &RecordStore {
        &self.records
    }

    pub fn drafts(&self) -> &DraftStore {
        &self.drafts
    }

    pub fn mode(&self) -> Mode {
        self.controller.mode()
    }

    pub fn form(&self) -> &Draft {
        self.controller.form()
    }

    pub fn select_date(&mut self, date: DateKey) -> Mode {
        let has_records = self.records.has_records(date);
        self.controller
            .select(date, has_records, self.drafts.draft(date));
        debug!(%date, mode = self.controller.mode().name(), "date selected");
        self.controller.mode()
    }

    pub fn set_part(&mut self, part: impl Into<String>) -> Result<(), JournalError> {
        let part = part.into();
        self.change_field(|form| form.part = part)
    }

    pub fn set_color(&mut self, color: Color) -> Result<(), JournalError> {
        self.change_field(|form| form.color = color)
    }

    pub fn set_note(&mut self, note: impl Into<String>) -> Result<(), JournalError> {
        let note = note.into();
        self.change_field(|form| form.note = note)
    }

    /// Applies any subset of the three form fields as a single change.
    pub fn apply_fields(&mut self, fields: FieldRequest) -> Result<(), JournalError> {
        let color = fields.color.as_deref().map(Color::parse).transpose()?;
        self.change_field(|form| {
            if let Some(part) = fields.part {
                form.part = part;
            }
            if let Some(color) = color {
                form.color = color;
            }
            if let Some(note) = fields.note {
                form.note = note;
            }
        })
    }

    pub fn insert_image(&mut self, src: &str, cursor: Option<usize>) -> Result<(), JournalError> {
        self.change_field(|form| form.note = rich_text::insert_image(&form.note, src, cursor))
    }

    /// Any field change while editing rewrites the draft for the editing date.
    fn change_field(&mut self, apply: impl FnOnce(&mut Draft)) -> Result<(), JournalError> {
        let (date, form) = self.controller.form_mut()?;
        apply(form);
        let snapshot = form.clone();
        self.drafts.write_draft(date, snapshot);
        Ok(())
    }

    pub fn add(&mut self) -> Result<DateKey, JournalError> {
        let draft = self
            .controller
            .selected()
            .and_then(|date| self.drafts.draft(date));
        self.controller.add(draft)
    }

    pub fn edit(&mut self, index: usize) -> Result<DateKey, JournalError> {
        let date = self.controller.viewing("edit")?;
        let record = self
            .records
            .select_records(date)
            .get(index)
            .cloned()
            .ok_or(JournalError::IndexOutOfRange {
                date,
                index,
                len: self.records.select_records(date).len(),
            })?;
        self.controller.edit(index, &record)?;

        if self.policy == EditPolicy::Reinsert {
            self.records.delete_record(date, index)?;
            // The record now lives only in the form; keep a copy in the slot.
            self.drafts.write_draft(date, Draft::from(&record));
        }
        debug!(%date, index, policy = ?self.policy, "editing record");
        Ok(date)
    }

    pub fn delete(&mut self, index: usize) -> Result<Record, JournalError> {
        let date = self.controller.viewing("delete")?;
        let removed = self.records.delete_record(date, index)?;
        if !self.records.has_records(date) {
            self.controller.leave_empty_day(date);
        }
        info!(%date, index, "record deleted");
        Ok(removed)
    }

    /// Commits the form as a record and clears the date's draft.
    ///
    /// No field is required; an empty label or note is saved as-is.
    pub fn save(&mut self) -> Result<DateKey, JournalError> {
        let (date, origin, form) = self.controller.finish("save")?;
        let mut record = form.into_record();
        record.note = rich_text::sanitize(&record.note);

        match (self.policy, origin) {
            (EditPolicy::InPlace, EditOrigin::Existing { index }) => {
                if let Err(err) = self.records.replace_record(date, index, record.clone()) {
                    debug!(%err, "edited record is gone, appending instead");
                    self.records.append_record(date, record);
                }
            }
            _ => self.records.append_record(date, record),
        }
        self.drafts.clear_draft(date);
        info!(%date, count = self.records.select_records(date).len(), "record saved");
        Ok(date)
    }

    pub fn cancel(&mut self) -> Result<DateKey, JournalError> {
        let (date, origin, _) = self.controller.finish("cancel")?;
        debug!(%date, ?origin, "edit cancelled");
        Ok(date)
    }

    pub async fn persist(&mut self) {
        self.drafts.persist().await;
    }

    pub fn snapshot(&self, today: NaiveDate, month: Option<Month>) -> JournalSnapshot {
        let selected = self.controller.selected();
        let month = month
            .or_else(|| selected.map(|date| Month::containing(date.date())))
            .unwrap_or_else(|| Month::containing(today));
        let form = matches!(self.mode(), Mode::Editing { .. }).then(|| self.form().clone());

        JournalSnapshot {
            mode: self.mode(),
            selected,
            form,
            records: selected
                .map(|date| self.records.select_records(date).to_vec())
                .unwrap_or_default(),
            calendar: month_view(month, today, selected.map(DateKey::date), &self.records),
            palette: Color::palette().collect(),
            storage_warning: self.drafts.warning().map(str::to_string),
        }
    }
}
