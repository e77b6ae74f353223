use crate::calendar::{DayTile, MonthView, WeekEdge};
use crate::journal::JournalSnapshot;
use crate::mode::{EditOrigin, Mode};
use crate::models::{Color, DateKey, Draft, Record};
use crate::rich_text::{escape_html, sanitize};
use std::fmt::Write;

const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

pub fn render_index(snapshot: &JournalSnapshot) -> String {
    let calendar = &snapshot.calendar;
    INDEX_HTML
        .replace("{{MONTH}}", &calendar.month.first_day().format("%B %Y").to_string())
        .replace("{{PREV}}", &calendar.previous.to_string())
        .replace("{{NEXT}}", &calendar.next.to_string())
        .replace("{{WARNING}}", &render_warning(snapshot.storage_warning.as_deref()))
        .replace("{{CALENDAR}}", &render_calendar(calendar))
        .replace("{{PANEL}}", &render_panel(snapshot))
}

fn render_warning(warning: Option<&str>) -> String {
    match warning {
        Some(text) => format!(r#"<p class="warning" role="alert">{}</p>"#, escape_html(text)),
        None => String::new(),
    }
}

fn render_calendar(view: &MonthView) -> String {
    let mut out = String::from("<table class=\"calendar\"><thead><tr>");
    for label in WEEKDAY_LABELS {
        let _ = write!(out, "<th>{label}</th>");
    }
    out.push_str("</tr></thead><tbody>");
    for week in &view.weeks {
        out.push_str("<tr>");
        for tile in week {
            out.push_str(&render_tile(tile));
        }
        out.push_str("</tr>");
    }
    out.push_str("</tbody></table>");
    out
}

fn render_tile(tile: &DayTile) -> String {
    let mut classes = vec!["tile"];
    if tile.today {
        classes.push("today-tile");
    }
    match tile.weekend {
        Some(WeekEdge::First) => classes.push("sunday"),
        Some(WeekEdge::Last) => classes.push("saturday"),
        None => {}
    }
    if !tile.in_month {
        classes.push("outside");
    }

    let weight = if tile.bold { "bold" } else { "normal" };
    let label = match tile.badge {
        Some(color) => format!(
            r#"<span class="badge" style="background-color: {color}; color: {tone}">{day}</span>"#,
            tone = tile.tone.css(),
            day = tile.day,
        ),
        None => format!(
            r#"<span class="plain" style="color: {tone}; font-weight: {weight}">{day}</span>"#,
            tone = tile.tone.css(),
            day = tile.day,
        ),
    };
    let selected = if tile.selected { " selected" } else { "" };

    format!(
        r#"<td class="{classes}"><form method="post" action="/select"><input type="hidden" name="date" value="{date}"><button type="submit" class="day{selected}" aria-label="{date}">{label}</button></form></td>"#,
        classes = classes.join(" "),
        date = tile.date,
    )
}

fn render_panel(snapshot: &JournalSnapshot) -> String {
    match (snapshot.mode, snapshot.form.as_ref()) {
        (Mode::Viewing { date }, _) => render_records(date, &snapshot.records),
        (Mode::Editing { date, origin }, Some(form)) => {
            render_form(date, origin, form, &snapshot.palette)
        }
        _ => r#"<p class="hint">Pick a day to write or review its training notes.</p>"#.to_string(),
    }
}

fn heading(date: DateKey) -> String {
    date.date().format("%A, %B %-d, %Y").to_string()
}

fn render_records(date: DateKey, records: &[Record]) -> String {
    let mut out = format!(r#"<section class="records"><h2>{}</h2>"#, heading(date));
    for (index, record) in records.iter().enumerate() {
        let _ = write!(
            out,
            r#"<article class="record" style="border-left-color: {color}">
  <p class="part"><strong>{part}</strong></p>
  <div class="note">{note}</div>
  <div class="record-actions">
    <form method="post" action="/edit/{index}"><button type="submit" title="Edit">Edit</button></form>
    <form method="post" action="/delete/{index}"><button type="submit" title="Delete">Delete</button></form>
  </div>
</article>"#,
            color = record.color,
            part = escape_html(&record.part),
            note = sanitize(&record.note),
        );
    }
    out.push_str(
        r#"<form method="post" action="/add"><button type="submit" class="primary" title="Add a record">Add</button></form></section>"#,
    );
    out
}

fn render_form(date: DateKey, origin: EditOrigin, form: &Draft, palette: &[Color]) -> String {
    let title = match origin {
        EditOrigin::New => "New record",
        EditOrigin::Existing { .. } => "Edit record",
    };

    let mut swatches = String::new();
    for color in palette {
        let checked = if *color == form.color { " checked" } else { "" };
        let _ = write!(
            swatches,
            r#"<label class="swatch" style="background-color: {color}"><input type="radio" name="color" value="{color}"{checked}><span class="sr-only">{color}</span></label>"#,
        );
    }

    format!(
        r#"<section class="editor-panel">
  <h2>{heading}</h2>
  <p class="subtitle">{title}</p>
  <form id="record-form" method="post" action="/save">
    <label>
      <strong>Body part</strong>
      <input type="text" id="part" name="part" value="{part}" placeholder="e.g. chest, shoulders" autocomplete="off">
    </label>
    <fieldset class="palette" id="palette">{swatches}</fieldset>
    <div class="note-header">
      <strong>Notes</strong>
      <label class="image-upload">Add photo<input type="file" id="image-upload" accept="image/*"></label>
    </div>
    <p class="warning" id="upload-error" role="alert" hidden></p>
    <div id="editor" class="rich-editor" contenteditable="true">{note}</div>
    <input type="hidden" id="note" name="note" value="{note_value}">
    <div class="form-actions">
      <button type="submit" class="primary" title="Save">Save</button>
    </div>
  </form>
  <form method="post" action="/cancel"><button type="submit" title="Back">Back</button></form>
</section>"#,
        heading = heading(date),
        part = escape_html(&form.part),
        note = sanitize(&form.note),
        note_value = escape_html(&sanitize(&form.note)),
    )
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Training Journal</title>
  <style>
    :root {
      --ink: #2b2a28;
      --accent: #3498db;
      --muted: #6b645d;
      --card: #ffffff;
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      background: #f4f2ee;
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
    }

    .app {
      max-width: 500px;
      margin: 0 auto;
      padding: 2rem 1rem;
    }

    h1 {
      font-size: 2rem;
      text-align: center;
      margin: 0 0 1rem;
    }

    .month-nav {
      display: flex;
      justify-content: space-between;
      align-items: center;
      margin-bottom: 0.5rem;
    }

    .calendar {
      width: 100%;
      border-collapse: collapse;
      background: var(--card);
    }

    .calendar th {
      font-size: 0.8rem;
      color: var(--muted);
      padding: 6px 0;
    }

    .calendar td {
      text-align: center;
      padding: 2px;
    }

    .calendar form {
      margin: 0;
    }

    .day {
      width: 100%;
      border: none;
      background: transparent;
      padding: 6px 0;
      cursor: pointer;
    }

    .day.selected {
      background: #006edc;
      border-radius: 6px;
    }

    .today-tile .day {
      background: #ffff76;
      border-radius: 6px;
    }

    .outside {
      opacity: 0.45;
    }

    .badge {
      width: 28px;
      height: 28px;
      border-radius: 50%;
      display: flex;
      justify-content: center;
      align-items: center;
      margin: 0 auto;
      font-weight: bold;
    }

    .panel {
      margin-top: 2rem;
      min-height: 400px;
    }

    .record {
      border: 1px solid #ccc;
      border-left: 8px solid;
      padding: 1rem;
      margin-bottom: 1rem;
      background: var(--card);
    }

    .record-actions,
    .form-actions,
    .note-header {
      display: flex;
      gap: 0.5rem;
      align-items: center;
      margin-top: 0.5rem;
    }

    .note {
      font-size: 1rem;
      line-height: 1.6;
    }

    .note img,
    .rich-editor img {
      max-width: 100%;
    }

    input[type="text"] {
      width: 100%;
      font-size: 1rem;
      padding: 0.5rem;
    }

    .palette {
      display: flex;
      gap: 0.5rem;
      border: none;
      padding: 0;
      margin: 1rem 0;
    }

    .swatch {
      width: 24px;
      height: 24px;
      border-radius: 50%;
      border: 1px solid #ccc;
      cursor: pointer;
      display: inline-flex;
      align-items: center;
      justify-content: center;
    }

    .swatch input {
      margin: 0;
    }

    .sr-only {
      position: absolute;
      width: 1px;
      height: 1px;
      overflow: hidden;
      clip: rect(0, 0, 0, 0);
    }

    .rich-editor {
      min-height: 160px;
      border: 1px solid #ccc;
      background: var(--card);
      padding: 0.5rem;
      margin-top: 0.5rem;
    }

    .image-upload input {
      display: none;
    }

    .image-upload {
      cursor: pointer;
      color: var(--accent);
    }

    button {
      border: 1px solid #ccc;
      border-radius: 6px;
      background: var(--card);
      padding: 0.4rem 0.9rem;
      cursor: pointer;
    }

    button.primary {
      background: var(--accent);
      border-color: var(--accent);
      color: white;
    }

    .warning {
      background: #fff4e5;
      border: 1px solid #f39c12;
      padding: 0.5rem 0.75rem;
      border-radius: 6px;
    }

    .hint,
    .subtitle {
      color: var(--muted);
    }
  </style>
</head>
<body>
  <main class="app">
    <h1>Training Journal</h1>
    {{WARNING}}
    <nav class="month-nav">
      <a href="/?month={{PREV}}" aria-label="Previous month">&lsaquo;</a>
      <strong>{{MONTH}}</strong>
      <a href="/?month={{NEXT}}" aria-label="Next month">&rsaquo;</a>
    </nav>
    {{CALENDAR}}
    <div class="panel">{{PANEL}}</div>
  </main>

  <script>
    const form = document.getElementById('record-form');

    const sendField = async (fields) => {
      const res = await fetch('/api/field', {
        method: 'POST',
        headers: { 'content-type': 'application/json' },
        body: JSON.stringify(fields)
      });
      if (!res.ok) {
        throw new Error(await res.text());
      }
      return res.json();
    };

    if (form) {
      const partEl = document.getElementById('part');
      const editorEl = document.getElementById('editor');
      const noteEl = document.getElementById('note');
      const paletteEl = document.getElementById('palette');
      const imageEl = document.getElementById('image-upload');
      const uploadErrorEl = document.getElementById('upload-error');

      partEl.addEventListener('input', () => {
        sendField({ part: partEl.value }).catch(console.error);
      });

      editorEl.addEventListener('input', () => {
        noteEl.value = editorEl.innerHTML;
        sendField({ note: editorEl.innerHTML }).catch(console.error);
      });

      paletteEl.addEventListener('change', (event) => {
        sendField({ color: event.target.value }).catch(console.error);
      });

      imageEl.addEventListener('change', () => {
        const file = imageEl.files[0];
        if (!file) {
          return;
        }
        const reader = new FileReader();
        reader.onload = async () => {
          uploadErrorEl.hidden = true;
          const res = await fetch('/api/image', {
            method: 'POST',
            headers: { 'content-type': 'application/json' },
            body: JSON.stringify({ src: reader.result })
          });
          if (res.ok) {
            const state = await res.json();
            editorEl.innerHTML = state.form.note;
            noteEl.value = state.form.note;
          } else {
            const reason = await res.text();
            console.error('image upload failed', res.status, reason);
            uploadErrorEl.textContent = `Photo could not be added (${res.status}). ${reason}`;
            uploadErrorEl.hidden = false;
          }
        };
        reader.readAsDataURL(file);
      });

      form.addEventListener('submit', () => {
        noteEl.value = editorEl.innerHTML;
      });
    }
  </script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EditPolicy;
    use crate::drafts::DraftStore;
    use crate::journal::Journal;
    use chrono::NaiveDate;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()
    }

    #[test]
    fn browsing_page_shows_calendar_and_hint() {
        let journal = Journal::new(DraftStore::in_memory(), EditPolicy::Reinsert);
        let html = render_index(&journal.snapshot(today(), None));
        assert!(html.contains("June 2024"));
        assert!(html.contains(r#"href="/?month=2024-05""#));
        assert!(html.contains(r#"value="2024-06-03""#));
        assert!(html.contains("today-tile"));
        assert!(html.contains("Pick a day"));
        assert!(html.contains("memory only"));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn viewing_page_escapes_labels_and_shows_badge() {
        let mut journal = Journal::new(DraftStore::in_memory(), EditPolicy::Reinsert);
        let day: DateKey = "2024-06-10".parse().unwrap();
        journal.select_date(day);
        journal.set_part("<b>Chest</b>").unwrap();
        journal.set_color(Color::parse("#8e44ad").unwrap()).unwrap();
        journal.set_note("<p>bench</p>").unwrap();
        journal.save().unwrap();
        journal.select_date(day);

        let html = render_index(&journal.snapshot(today(), None));
        assert!(html.contains("&lt;b&gt;Chest&lt;/b&gt;"));
        assert!(html.contains("<p>bench</p>"));
        assert!(html.contains("background-color: #8e44ad"));
        assert!(html.contains(r#"action="/delete/0""#));
        assert!(html.contains("Monday, June 10, 2024"));
    }

    #[test]
    fn editing_page_prefills_the_form() {
        let mut journal = Journal::new(DraftStore::in_memory(), EditPolicy::Reinsert);
        journal.select_date("2024-06-11".parse().unwrap());
        journal.set_part("Legs").unwrap();
        journal
            .set_note("<p>squat</p><script>stealCookies()</script>")
            .unwrap();

        let html = render_index(&journal.snapshot(today(), None));
        assert!(html.contains(r#"value="Legs""#));
        assert!(html.contains(r##"value="#3498db" checked"##));
        assert!(html.contains("<p>squat</p>"));
        assert!(!html.contains("stealCookies"));
        assert!(html.contains("New record"));
        assert!(html.contains(r#"id="upload-error""#));
    }
}
