//! Kill event extraction from raw ADM log lines.
//!
//! DayZ writes kill events in two families, one timestamped `HH:MM:SS` with
//! the phrase `killed by Player`, one timestamped `YYYY-MM-DD:HH:MM:SS` with
//! `has been killed by player`. Only player-vs-player kills are extracted;
//! environmental, animal, and suicide deaths never produce a record.
//!
//! # Example
//!
//! ```
//! use dayz_killfeed::extractor::extract;
//!
//! let line = r#"14:32:10 | Player "Bob" (id=A) killed by Player "Alice" (id=B) with AK74 from 123 meters"#;
//! let record = extract(line).unwrap();
//! assert_eq!(record.killer, "Alice");
//! assert_eq!(record.victim, "Bob");
//! ```

use once_cell::sync::Lazy;
use regex::Regex;

/// PvP phrase used by the `HH:MM:SS` log family.
const KILLED_BY_PLAYER: &str = "killed by Player";

/// PvP phrase used by the `YYYY-MM-DD:HH:MM:SS` log family.
const HAS_BEEN_KILLED_BY_PLAYER: &str = "has been killed by player";

/// Ordered kill patterns, first match wins. Within each timestamp family
/// the variant that captures a distance comes before the one that does not.
static KILL_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(
            r#"(\d{2}:\d{2}:\d{2}) \| Player "([^"]+)" .*killed by Player "([^"]+)" .*with (.+?) from ([\d.]+) meters?"#,
        )
        .expect("valid kill pattern"),
        Regex::new(
            r#"(\d{2}:\d{2}:\d{2}) \| Player "([^"]+)" .*killed by Player "([^"]+)" .*with (.+?)(?:\s|$)"#,
        )
        .expect("valid kill pattern"),
        Regex::new(
            r#"(\d{4}-\d{2}-\d{2}:\d{2}:\d{2}:\d{2}) \| Player "([^"]+)" .*has been killed by player "([^"]+)" .*with (.+) from ([\d.]+)m"#,
        )
        .expect("valid kill pattern"),
        Regex::new(
            r#"(\d{4}-\d{2}-\d{2}:\d{2}:\d{2}:\d{2}) \| Player "([^"]+)" .*has been killed by player "([^"]+)" .*with (.+)"#,
        )
        .expect("valid kill pattern"),
    ]
});

/// One parsed player-vs-player kill event.
#[derive(Debug, Clone, PartialEq)]
pub struct KillRecord {
    /// Timestamp in the log's native format.
    pub timestamp: String,

    /// Name of the player who died.
    pub victim: String,

    /// Name of the player who got the kill.
    pub killer: String,

    /// Weapon name, may be the literal `Unknown`.
    pub weapon: String,

    /// Kill distance in meters, 0 when the log did not report one.
    pub distance: f64,

    /// The original log line, kept for diagnostics.
    pub raw_line: String,
}

/// Extracts a kill record from a log line, or `None` for anything that is
/// not a PvP kill.
///
/// A pattern match alone is not enough: the line must also contain one of
/// the two PvP phrases. This guards against a pattern picking up non-PvP
/// text if patterns are loosened later.
pub fn extract(line: &str) -> Option<KillRecord> {
    let caps = KILL_PATTERNS.iter().find_map(|pattern| pattern.captures(line))?;

    if !line.contains(KILLED_BY_PLAYER) && !line.contains(HAS_BEEN_KILLED_BY_PLAYER) {
        return None;
    }

    // A non-numeric distance capture is bad data, not a reason to abort
    // the tail loop. It degrades to 0.
    let distance = caps
        .get(5)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(0.0);

    Some(KillRecord {
        timestamp: caps.get(1)?.as_str().to_string(),
        victim: caps.get(2)?.as_str().to_string(),
        killer: caps.get(3)?.as_str().to_string(),
        weapon: caps.get(4)?.as_str().to_string(),
        distance,
        raw_line: line.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_pvp_kill_with_distance() {
        let line = r#"14:32:10 | Player "Bob" (id=A pos=<1,2,3>) killed by Player "Alice" (id=B pos=<4,5,6>) with AK74 from 123 meters"#;
        let record = extract(line).expect("should match");

        assert_eq!(record.timestamp, "14:32:10");
        assert_eq!(record.victim, "Bob");
        assert_eq!(record.killer, "Alice");
        assert_eq!(record.weapon, "AK74");
        assert_eq!(record.distance, 123.0);
        assert_eq!(record.raw_line, line);
    }

    #[test]
    fn extracts_pvp_kill_without_distance() {
        let line = r#"09:01:55 | Player "Bob" (id=A) killed by Player "Alice" (id=B) with Mosin"#;
        let record = extract(line).expect("should match");

        assert_eq!(record.killer, "Alice");
        assert_eq!(record.weapon, "Mosin");
        assert_eq!(record.distance, 0.0);
    }

    #[test]
    fn extracts_long_timestamp_family() {
        let line = r#"2025-08-12:13:38:51 | Player "Bob" (id=A) has been killed by player "Alice" (id=B) with SVD from 412.7m"#;
        let record = extract(line).expect("should match");

        assert_eq!(record.timestamp, "2025-08-12:13:38:51");
        assert_eq!(record.victim, "Bob");
        assert_eq!(record.killer, "Alice");
        assert_eq!(record.weapon, "SVD");
        assert_eq!(record.distance, 412.7);
    }

    #[test]
    fn ignores_environmental_death() {
        let line = r#"14:32:10 | Player "Bob" (id=A) died. Stats> Water: 10 Energy: 20"#;
        assert!(extract(line).is_none());
    }

    #[test]
    fn ignores_animal_kill() {
        let line = r#"14:32:10 | Player "Bob" (id=A) killed by Animal_UrsusArctos"#;
        assert!(extract(line).is_none());
    }

    #[test]
    fn ignores_suicide() {
        let line = r#"14:32:10 | Player "Bob" (id=A) committed suicide"#;
        assert!(extract(line).is_none());
    }

    #[test]
    fn ignores_unrelated_lines() {
        assert!(extract("").is_none());
        assert!(extract(r#"14:32:10 | Player "Bob" (id=A) is connected"#).is_none());
        assert!(extract("AdminLog started on 2025-08-12 at 13:38:51").is_none());
    }

    #[test]
    fn distance_pattern_wins_over_distanceless() {
        // Both patterns 1 and 2 match; the distance-carrying one is first.
        let line = r#"14:32:10 | Player "Bob" (id=A) killed by Player "Alice" (id=B) with AK74 from 55 meters"#;
        let record = extract(line).expect("should match");
        assert_eq!(record.distance, 55.0);
    }

    #[test]
    fn fractional_distance_is_preserved() {
        let line = r#"14:32:10 | Player "Bob" (id=A) killed by Player "Alice" (id=B) with CR-527 from 88.4 meters"#;
        let record = extract(line).expect("should match");
        assert_eq!(record.distance, 88.4);
    }

    #[test]
    fn quoted_names_with_spaces() {
        let line = r#"14:32:10 | Player "Old Greg" (id=A) killed by Player "The Duke" (id=B) with IZH-43 from 3 meters"#;
        let record = extract(line).expect("should match");
        assert_eq!(record.victim, "Old Greg");
        assert_eq!(record.killer, "The Duke");
    }
}
