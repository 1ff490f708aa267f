//! ADM log file selection.
//!
//! The server either reuses a static `DayZServer_x64.ADM` or stamps the
//! start time into the filename, in one of two conventions:
//!
//! - underscore: `DayZServer_x64_2025_05_24_224940076.ADM` (sub-second
//!   digits after the seconds field)
//! - dash: `DayZServer_x64_2025-08-12_13-38-51.ADM`
//!
//! Timestamped names are ordered by the parsed filename timestamp; the
//! static name falls back to filesystem modification time. The newest file
//! wins.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{error, info, warn};

/// Extension of the admin log files, matched case-sensitively.
const ADM_EXTENSION: &str = ".ADM";

/// The reused filename for servers that do not timestamp their logs.
const STATIC_LOG_NAME: &str = "DayZServer_x64.ADM";

static UNDERSCORE_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^DayZServer_x64_(\d{4})_(\d{2})_(\d{2})_(\d{2})(\d{2})(\d{2})\d+\.ADM$")
        .expect("valid filename pattern")
});

static DASH_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^DayZServer_x64_(\d{4})-(\d{2})-(\d{2})_(\d{2})-(\d{2})-(\d{2})\.ADM$")
        .expect("valid filename pattern")
});

/// Parses the log start time out of a timestamped ADM filename.
///
/// Returns `None` for the static name, foreign filenames, and calendar
/// nonsense like month 13.
pub fn parse_log_timestamp(filename: &str) -> Option<NaiveDateTime> {
    let caps = UNDERSCORE_NAME
        .captures(filename)
        .or_else(|| DASH_NAME.captures(filename))?;

    let field = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u32>().ok());

    NaiveDate::from_ymd_opt(field(1)? as i32, field(2)?, field(3)?)?
        .and_hms_opt(field(4)?, field(5)?, field(6)?)
}

/// Finds the ADM file with the most recent logical timestamp.
///
/// Missing directories and unreadable entries are reported but never fatal;
/// the caller retries on its own schedule.
pub fn find_latest(dir: &Path) -> Option<PathBuf> {
    if !dir.exists() {
        warn!(dir = %dir.display(), "Log directory not found");
        info!("Common DayZ ADM log directories:");
        if cfg!(windows) {
            info!("  - C:\\DayZServer\\profiles");
            info!("  - [DayZ Server Path]\\profiles");
        } else {
            info!("  - /opt/dayzserver/profiles");
            info!("  - /home/steam/dayzserver/profiles");
        }
        return None;
    }

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            error!(dir = %dir.display(), error = %e, "Error reading log directory");
            return None;
        }
    };

    let mut latest: Option<(NaiveDateTime, PathBuf)> = None;

    for entry in entries.flatten() {
        let path = entry.path();
        let Some(filename) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !filename.ends_with(ADM_EXTENSION) {
            continue;
        }

        let timestamp = if filename == STATIC_LOG_NAME {
            match fs::metadata(&path).and_then(|m| m.modified()) {
                Ok(mtime) => Some(DateTime::<Local>::from(mtime).naive_local()),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Failed to stat ADM file");
                    None
                }
            }
        } else {
            parse_log_timestamp(filename)
        };

        let Some(timestamp) = timestamp else {
            continue;
        };

        if latest.as_ref().is_none_or(|(best, _)| timestamp > *best) {
            latest = Some((timestamp, path));
        }
    }

    match latest {
        Some((timestamp, path)) => {
            info!(path = %path.display(), timestamp = %timestamp, "Latest ADM file");
            Some(path)
        }
        None => {
            warn!(dir = %dir.display(), "No ADM files found");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        File::create(&path).expect("create file");
        path
    }

    #[test]
    fn parses_underscore_convention() {
        let ts = parse_log_timestamp("DayZServer_x64_2025_05_24_224940076.ADM")
            .expect("should parse");
        assert_eq!(
            ts,
            NaiveDate::from_ymd_opt(2025, 5, 24)
                .unwrap()
                .and_hms_opt(22, 49, 40)
                .unwrap()
        );
    }

    #[test]
    fn parses_dash_convention() {
        let ts =
            parse_log_timestamp("DayZServer_x64_2025-08-12_13-38-51.ADM").expect("should parse");
        assert_eq!(
            ts,
            NaiveDate::from_ymd_opt(2025, 8, 12)
                .unwrap()
                .and_hms_opt(13, 38, 51)
                .unwrap()
        );
    }

    #[test]
    fn rejects_static_and_foreign_names() {
        assert!(parse_log_timestamp("DayZServer_x64.ADM").is_none());
        assert!(parse_log_timestamp("server_console.log").is_none());
        assert!(parse_log_timestamp("DayZServer_x64_notadate.ADM").is_none());
    }

    #[test]
    fn rejects_impossible_dates() {
        assert!(parse_log_timestamp("DayZServer_x64_2025-13-40_25-61-61.ADM").is_none());
    }

    #[test]
    fn picks_newest_across_conventions() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "DayZServer_x64_2025_05_24_224940076.ADM");
        let newer = touch(dir.path(), "DayZServer_x64_2025-08-12_13-38-51.ADM");

        assert_eq!(find_latest(dir.path()), Some(newer));
    }

    #[test]
    fn skips_unparseable_names() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "DayZServer_x64_garbage.ADM");
        let valid = touch(dir.path(), "DayZServer_x64_2025-08-12_13-38-51.ADM");

        assert_eq!(find_latest(dir.path()), Some(valid));
    }

    #[test]
    fn static_name_uses_modification_time() {
        let dir = TempDir::new().unwrap();
        let mut file = File::create(dir.path().join(STATIC_LOG_NAME)).unwrap();
        writeln!(file, "AdminLog started").unwrap();

        // A freshly written file is newer than a 2020-stamped one.
        touch(dir.path(), "DayZServer_x64_2020-01-01_00-00-00.ADM");

        assert_eq!(
            find_latest(dir.path()),
            Some(dir.path().join(STATIC_LOG_NAME))
        );
    }

    #[test]
    fn ignores_non_adm_files() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "server_console.log");
        touch(dir.path(), "DayZServer_x64.RPT");

        assert_eq!(find_latest(dir.path()), None);
    }

    #[test]
    fn missing_directory_is_not_fatal() {
        assert_eq!(find_latest(Path::new("/nonexistent/profiles")), None);
    }

    #[test]
    fn empty_directory_yields_none() {
        let dir = TempDir::new().unwrap();
        assert_eq!(find_latest(dir.path()), None);
    }
}
