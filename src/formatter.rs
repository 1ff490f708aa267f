//! Discord message formatting for kill records.
//!
//! Player names are escaped so that markdown characters in a name cannot
//! break the message formatting (or smuggle in formatting of their own).

use crate::extractor::KillRecord;

/// Markdown characters escaped in player names. Backslash must come first
/// so the escapes inserted for the other five are not themselves escaped.
const MARKDOWN_CHARS: [char; 6] = ['\\', '*', '_', '`', '~', '|'];

/// Escapes Discord markdown characters by prefixing each with a backslash.
pub fn sanitize(text: &str) -> String {
    let mut sanitized = String::with_capacity(text.len());
    for ch in text.chars() {
        if MARKDOWN_CHARS.contains(&ch) {
            sanitized.push('\\');
        }
        sanitized.push(ch);
    }
    sanitized
}

/// Formats a kill record as a Discord message. Total: never fails.
///
/// Shape: `**<killer>** killed **<victim>** with <weapon>[ (<N>m)]` where
/// the distance suffix appears only for reported (non-zero) distances,
/// rounded to whole meters.
pub fn format_message(record: &KillRecord) -> String {
    let distance = if record.distance > 0.0 {
        format!(" ({:.0}m)", record.distance)
    } else {
        String::new()
    };

    let weapon = if record.weapon == "Unknown" {
        "unknown weapon"
    } else {
        record.weapon.as_str()
    };

    format!(
        "**{}** killed **{}** with {}{}",
        sanitize(&record.killer),
        sanitize(&record.victim),
        weapon,
        distance
    )
}
