use crate::errors::JournalError;
use crate::models::{Color, DateKey, Record};
use std::collections::BTreeMap;

/// Committed records per day. Empty days are dropped from the map.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    days: BTreeMap<DateKey, Vec<Record>>,
}

impl RecordStore {
    pub fn select_records(&self, date: DateKey) -> &[Record] {
        self.days.get(&date).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn has_records(&self, date: DateKey) -> bool {
        !self.select_records(date).is_empty()
    }

    pub fn first_color(&self, date: DateKey) -> Option<Color> {
        self.select_records(date).first().map(|record| record.color)
    }

    pub fn append_record(&mut self, date: DateKey, record: Record) {
        self.days.entry(date).or_default().push(record);
    }

    pub fn replace_record(
        &mut self,
        date: DateKey,
        index: usize,
        record: Record,
    ) -> Result<Record, JournalError> {
        let len = self.select_records(date).len();
        match self.days.get_mut(&date).and_then(|list| list.get_mut(index)) {
            Some(slot) => Ok(std::mem::replace(slot, record)),
            None => Err(JournalError::IndexOutOfRange { date, index, len }),
        }
    }

    pub fn delete_record(&mut self, date: DateKey, index: usize) -> Result<Record, JournalError> {
        let len = self.select_records(date).len();
        if index >= len {
            return Err(JournalError::IndexOutOfRange { date, index, len });
        }

        let Some(list) = self.days.get_mut(&date) else {
            return Err(JournalError::IndexOutOfRange { date, index, len });
        };
        let removed = list.remove(index);
        if list.is_empty() {
            self.days.remove(&date);
        }
        Ok(removed)
    }

    #[cfg(test)]
    pub fn contains_day(&self, date: DateKey) -> bool {
        self.days.contains_key(&date)
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}
