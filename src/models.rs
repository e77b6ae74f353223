use crate::errors::JournalError;
use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr};
use tracing::warn;

pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

pub const PALETTE: [&str; 8] = [
    "#3498db", "#2ecc71", "#f39c12", "#8e44ad", "#16a085", "#d35400", "#34495e", "#7f8c8d",
];

/// Canonical `YYYY-MM-DD` key for every per-day lookup.
///
/// Built from a calendar date rather than an instant, so the key never shifts
/// with the local offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateKey(NaiveDate);

impl DateKey {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn date(self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for DateKey {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_KEY_FORMAT))
    }
}

impl FromStr for DateKey {
    type Err = JournalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s.trim(), DATE_KEY_FORMAT)
            .map(Self)
            .map_err(|_| JournalError::InvalidDateKey(s.to_string()))
    }
}

impl Serialize for DateKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DateKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(&'static str);

impl Color {
    pub fn parse(value: &str) -> Result<Self, JournalError> {
        let wanted = value.trim().to_ascii_lowercase();
        PALETTE
            .into_iter()
            .find(|entry| *entry == wanted)
            .map(Self)
            .ok_or_else(|| JournalError::UnknownColor(value.to_string()))
    }

    pub fn palette() -> impl Iterator<Item = Color> {
        PALETTE.into_iter().map(Self)
    }

    pub fn as_str(self) -> &'static str {
        self.0
    }
}

impl Default for Color {
    fn default() -> Self {
        Self(PALETTE[0])
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.0)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Color::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// One committed journal entry. Its position in the day's list is its identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub part: String,
    pub color: Color,
    pub note: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draft {
    #[serde(default)]
    pub part: String,
    #[serde(default)]
    pub note: String,
    #[serde(default, deserialize_with = "color_or_default")]
    pub color: Color,
}

/// Stored drafts with a colour outside the palette load with the default one.
fn color_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Color, D::Error> {
    let raw = String::deserialize(deserializer)?;
    Ok(Color::parse(&raw).unwrap_or_else(|err| {
        warn!("{err}; using {}", Color::default());
        Color::default()
    }))
}

impl Draft {
    pub fn into_record(self) -> Record {
        Record {
            part: self.part,
            color: self.color,
            note: self.note,
        }
    }
}

impl From<&Record> for Draft {
    fn from(record: &Record) -> Self {
        Self {
            part: record.part.clone(),
            note: record.note.clone(),
            color: record.color,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Month(NaiveDate);

impl Month {
    pub fn containing(date: NaiveDate) -> Self {
        Self(date.with_day(1).unwrap_or(date))
    }

    pub fn first_day(self) -> NaiveDate {
        self.0
    }

    pub fn last_day(self) -> NaiveDate {
        self.next().first_day().pred_opt().unwrap_or(self.0)
    }

    pub fn previous(self) -> Self {
        Self(self.0.checked_sub_months(Months::new(1)).unwrap_or(self.0))
    }

    pub fn next(self) -> Self {
        Self(self.0.checked_add_months(Months::new(1)).unwrap_or(self.0))
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        date.year() == self.0.year() && date.month() == self.0.month()
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m"))
    }
}

impl FromStr for Month {
    type Err = JournalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(&format!("{}-01", s.trim()), DATE_KEY_FORMAT)
            .map(Self)
            .map_err(|_| JournalError::InvalidDateKey(s.to_string()))
    }
}

impl Serialize for Month {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    pub date: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct FieldRequest {
    pub part: Option<String>,
    pub color: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ImageRequest {
    pub src: String,
    pub cursor: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct IndexRequest {
    pub index: usize,
}

#[derive(Debug, Default, Deserialize)]
pub struct MonthQuery {
    pub month: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_key_is_stable_for_equal_dates() {
        let a = DateKey::new(NaiveDate::from_ymd_opt(2024, 6, 10).unwrap());
        let b = DateKey::from(NaiveDate::from_ymd_opt(2024, 6, 10).unwrap());
        assert_eq!(a.to_string(), b.to_string());
        assert_eq!(a.to_string(), "2024-06-10");
        assert_eq!("2024-06-10".parse::<DateKey>().unwrap(), a);
    }

    #[test]
    fn date_key_rejects_other_formats() {
        assert_eq!(
            "10/06/2024".parse::<DateKey>(),
            Err(JournalError::InvalidDateKey("10/06/2024".into()))
        );
        assert!("2024-02-30".parse::<DateKey>().is_err());
    }

    #[test]
    fn color_only_accepts_palette_values() {
        assert_eq!(Color::parse("#3498DB").unwrap().as_str(), "#3498db");
        assert!(matches!(
            Color::parse("red"),
            Err(JournalError::UnknownColor(_))
        ));
        assert_eq!(Color::palette().count(), 8);
        assert_eq!(Color::default().as_str(), PALETTE[0]);
    }

    #[test]
    fn partial_draft_fills_defaults() {
        let draft: Draft = serde_json::from_str(r#"{"part":"Legs"}"#).unwrap();
        assert_eq!(draft.part, "Legs");
        assert_eq!(draft.note, "");
        assert_eq!(draft.color, Color::default());
    }

    #[test]
    fn draft_with_unknown_color_falls_back_to_default() {
        let draft: Draft = serde_json::from_str(r#"{"part":"Legs","color":"red"}"#).unwrap();
        assert_eq!(draft.part, "Legs");
        assert_eq!(draft.color, Color::default());
        assert!(serde_json::from_str::<Color>(r#""red""#).is_err());
    }

    #[test]
    fn month_navigation_crosses_year_boundaries() {
        let month: Month = "2024-12".parse().unwrap();
        assert_eq!(month.next().to_string(), "2025-01");
        assert_eq!(month.previous().to_string(), "2024-11");
        assert_eq!(
            month.last_day(),
            NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()
        );
        assert!(month.contains(NaiveDate::from_ymd_opt(2024, 12, 5).unwrap()));
    }
}
