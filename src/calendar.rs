use crate::models::{Color, DateKey, Month};
use crate::records::RecordStore;
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::Serialize;

pub const WEEK_START: Weekday = Weekday::Sun;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WeekEdge {
    First,
    Last,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextTone {
    Inverse,
    FirstDayAccent,
    LastDayAccent,
    Neutral,
}

impl TextTone {
    pub fn css(self) -> &'static str {
        match self {
            TextTone::Inverse => "#fff",
            TextTone::FirstDayAccent => "red",
            TextTone::LastDayAccent => "#3b82f6",
            TextTone::Neutral => "#333",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayTile {
    pub date: DateKey,
    pub day: u32,
    pub in_month: bool,
    pub today: bool,
    pub selected: bool,
    pub weekend: Option<WeekEdge>,
    pub badge: Option<Color>,
    pub bold: bool,
    pub tone: TextTone,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthView {
    pub month: Month,
    pub previous: Month,
    pub next: Month,
    pub weeks: Vec<Vec<DayTile>>,
}

#[cfg(test)]
impl MonthView {
    pub fn tiles(&self) -> impl Iterator<Item = &DayTile> {
        self.weeks.iter().flatten()
    }

    pub fn tile(&self, date: DateKey) -> Option<&DayTile> {
        self.tiles().find(|tile| tile.date == date)
    }
}

/// Derives the visual state of every day shown for `month`.
///
/// Weeks run Sunday to Saturday and are padded with neighbouring-month days.
pub fn month_view(
    month: Month,
    today: NaiveDate,
    selected: Option<NaiveDate>,
    records: &RecordStore,
) -> MonthView {
    let first = month.first_day();
    let last = month.last_day();
    let lead = i64::from(first.weekday().days_since(WEEK_START));
    let trail = i64::from(6 - last.weekday().days_since(WEEK_START));

    let start = first - Duration::days(lead);
    let end = last + Duration::days(trail);

    let mut weeks = Vec::new();
    let mut week = Vec::with_capacity(7);
    let mut date = start;
    while date <= end {
        week.push(day_tile(date, month, today, selected, records));
        if week.len() == 7 {
            weeks.push(std::mem::replace(&mut week, Vec::with_capacity(7)));
        }
        date += Duration::days(1);
    }

    MonthView {
        month,
        previous: month.previous(),
        next: month.next(),
        weeks,
    }
}

pub fn day_tile(
    date: NaiveDate,
    month: Month,
    today: NaiveDate,
    selected: Option<NaiveDate>,
    records: &RecordStore,
) -> DayTile {
    let key = DateKey::new(date);
    let is_selected = selected == Some(date);
    let weekend = week_edge(date.weekday());
    let badge = records.first_color(key);

    let tone = if is_selected || badge.is_some() {
        TextTone::Inverse
    } else {
        match weekend {
            Some(WeekEdge::First) => TextTone::FirstDayAccent,
            Some(WeekEdge::Last) => TextTone::LastDayAccent,
            None => TextTone::Neutral,
        }
    };

    DayTile {
        date: key,
        day: date.day(),
        in_month: month.contains(date),
        today: date == today && !is_selected,
        selected: is_selected,
        weekend,
        badge,
        bold: badge.is_some() || is_selected,
        tone,
    }
}

fn week_edge(weekday: Weekday) -> Option<WeekEdge> {
    match weekday.days_since(WEEK_START) {
        0 => Some(WeekEdge::First),
        6 => Some(WeekEdge::Last),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Record;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(color: &str) -> Record {
        Record {
            part: "Chest".into(),
            color: Color::parse(color).unwrap(),
            note: String::new(),
        }
    }

    #[test]
    fn month_grid_is_whole_weeks_starting_sunday() {
        let view = month_view(
            Month::containing(ymd(2024, 6, 10)),
            ymd(2024, 6, 1),
            None,
            &RecordStore::default(),
        );
        // June 2024 starts on a Saturday and ends on a Sunday.
        assert_eq!(view.weeks.len(), 6);
        assert!(view.weeks.iter().all(|week| week.len() == 7));
        let first = &view.weeks[0][0];
        assert_eq!(first.date.to_string(), "2024-05-26");
        assert!(!first.in_month);
        assert_eq!(first.weekend, Some(WeekEdge::First));
        assert_eq!(view.tiles().filter(|t| t.in_month).count(), 30);
        assert_eq!(view.previous.to_string(), "2024-05");
        assert_eq!(view.next.to_string(), "2024-07");
    }

    #[test]
    fn today_marker_hides_when_selected() {
        let records = RecordStore::default();
        let today = ymd(2024, 6, 12);
        let month = Month::containing(today);

        let unselected = day_tile(today, month, today, None, &records);
        assert!(unselected.today);
        assert!(!unselected.bold);

        let selected = day_tile(today, month, today, Some(today), &records);
        assert!(!selected.today);
        assert!(selected.bold);
        assert_eq!(selected.tone, TextTone::Inverse);
    }

    #[test]
    fn weekend_edges_get_accent_tones() {
        let records = RecordStore::default();
        let month = Month::containing(ymd(2024, 6, 1));
        let today = ymd(2024, 1, 1);

        let sunday = day_tile(ymd(2024, 6, 9), month, today, None, &records);
        assert_eq!(sunday.weekend, Some(WeekEdge::First));
        assert_eq!(sunday.tone.css(), "red");

        let saturday = day_tile(ymd(2024, 6, 15), month, today, None, &records);
        assert_eq!(saturday.weekend, Some(WeekEdge::Last));
        assert_eq!(saturday.tone, TextTone::LastDayAccent);

        let monday = day_tile(ymd(2024, 6, 10), month, today, None, &records);
        assert_eq!(monday.weekend, None);
        assert_eq!(monday.tone, TextTone::Neutral);
    }

    #[test]
    fn badge_uses_first_record_color() {
        let mut records = RecordStore::default();
        let day = ymd(2024, 6, 9);
        records.append_record(day.into(), record("#2ecc71"));
        records.append_record(day.into(), record("#8e44ad"));

        let tile = day_tile(day, Month::containing(day), ymd(2024, 1, 1), None, &records);
        assert_eq!(tile.badge.unwrap().as_str(), "#2ecc71");
        assert_eq!(tile.tone, TextTone::Inverse);
        assert!(tile.bold);
        // Still a Sunday, whatever the badge says.
        assert_eq!(tile.weekend, Some(WeekEdge::First));
    }
}
