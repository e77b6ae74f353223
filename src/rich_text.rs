//! The note body is an HTML fragment produced by the browser editor.
//!
//! Drafts keep whatever the editor sent. Committed notes pass through
//! [`sanitize`] before they are stored and rendered back into the page.

use ammonia::Builder;

/// URL schemes an embedded image may use on top of ammonia's defaults.
const IMAGE_SCHEMES: [&str; 2] = ["data", "blob"];

/// Strips scripts, handlers and unknown tags while keeping inline images.
pub fn sanitize(note: &str) -> String {
    Builder::default()
        .add_url_schemes(&IMAGE_SCHEMES)
        .clean(note)
        .to_string()
}

/// Escapes plain text (labels, dates) for use in markup or attributes.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Inserts an image reference at a byte offset in `note`, or appends it.
///
/// The offset is clamped to the note, moved back to a char boundary, and
/// then moved out of any tag or character reference it falls inside.
pub fn insert_image(note: &str, src: &str, cursor: Option<usize>) -> String {
    let tag = format!(r#"<img src="{}">"#, escape_html(src.trim()));
    let at = markup_boundary(note, cursor.unwrap_or(note.len()));

    let mut out = String::with_capacity(note.len() + tag.len());
    out.push_str(&note[..at]);
    out.push_str(&tag);
    out.push_str(&note[at..]);
    out
}

fn markup_boundary(note: &str, cursor: usize) -> usize {
    let mut at = cursor.min(note.len());
    while !note.is_char_boundary(at) {
        at -= 1;
    }

    let before = &note[..at];
    if let Some(open) = before.rfind('<') {
        if before.rfind('>').is_none_or(|close| close < open) {
            at = open;
        }
    }

    let before = &note[..at];
    if let Some(amp) = before.rfind('&') {
        let partial = &before[amp + 1..];
        if partial.chars().all(|c| c.is_ascii_alphanumeric() || c == '#') {
            at = amp;
        }
    }
    at
}
