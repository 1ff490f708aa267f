//! Rotation-aware tailing of the active ADM log.
//!
//! The engine cycles through three states:
//!
//! - **selecting**: no current file; ask the selector for the newest ADM
//!   file and start at its end, so pre-existing content is never replayed.
//! - **tailing**: once a second, reopen the file, read everything complete
//!   past the stored byte position, and feed each line through
//!   extract → format → enqueue. Every 30 seconds re-run the selector; a
//!   different result means the server rotated to a new file.
//! - **rotating**: adopt the new file at its current end and go back to
//!   tailing.
//!
//! The file handle is never held across wakes. The DayZ server keeps the
//! log open for appending, and on Windows a long-lived reader can contend
//! with the writer's sharing mode.
//!
//! In-place truncation (size below the stored position) resets the
//! position to zero on the same path. A file that disappears entirely
//! sends the engine back to selecting after a short backoff.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::config::{ERROR_BACKOFF, FILE_CHECK_INTERVAL, SELECT_RETRY_INTERVAL, TAIL_INTERVAL};
use crate::extractor::extract;
use crate::formatter::format_message;
use crate::queue::MessageQueue;
use crate::selector::find_latest;
use crate::shutdown::ShutdownFlag;

/// Tails the newest ADM file in a directory, following rotations.
#[derive(Debug)]
pub struct Tailer {
    logs_dir: PathBuf,
    queue: MessageQueue,

    /// Last fully-read byte offset per file seen this run. Entries are
    /// never removed; the map is bounded by the files of a single run.
    positions: HashMap<PathBuf, u64>,

    /// The file currently being tailed, if any.
    current: Option<PathBuf>,
}

impl Tailer {
    /// Creates a tailer for the given log directory.
    #[must_use]
    pub fn new(logs_dir: PathBuf, queue: MessageQueue) -> Self {
        Self {
            logs_dir,
            queue,
            positions: HashMap::new(),
            current: None,
        }
    }

    /// Runs the engine until shutdown is requested.
    pub async fn run(mut self, shutdown: ShutdownFlag) {
        info!(dir = %self.logs_dir.display(), "Starting ADM file monitoring");

        while !shutdown.is_set() {
            match self.current.clone() {
                Some(path) => self.tail_file(path, &shutdown).await,
                None => {
                    if self.select_target().is_none() {
                        shutdown.sleep(SELECT_RETRY_INTERVAL).await;
                    }
                }
            }
        }

        info!("File monitoring stopped");
    }

    /// Asks the selector for the newest file and adopts it at end-of-file.
    fn select_target(&mut self) -> Option<PathBuf> {
        let latest = find_latest(&self.logs_dir)?;
        self.adopt(latest.clone());
        Some(latest)
    }

    /// Makes `path` the current file, positioned at its current end so
    /// only content written from now on is processed.
    fn adopt(&mut self, path: PathBuf) {
        let size = fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
        info!(
            path = %path.display(),
            position = size,
            "Monitoring file from current end"
        );
        self.positions.insert(path.clone(), size);
        self.current = Some(path);
    }

    /// Tails one file until rotation, an access failure, or shutdown.
    async fn tail_file(&mut self, path: PathBuf, shutdown: &ShutdownFlag) {
        let mut last_file_check = Instant::now();

        while !shutdown.is_set() {
            match self.read_new_lines(&path) {
                Ok(lines) => {
                    for line in &lines {
                        self.process_line(line).await;
                    }
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Could not read file, re-selecting");
                    self.current = None;
                    shutdown.sleep(ERROR_BACKOFF).await;
                    return;
                }
            }

            if last_file_check.elapsed() >= FILE_CHECK_INTERVAL {
                last_file_check = Instant::now();
                if let Some(latest) = find_latest(&self.logs_dir) {
                    if latest != path {
                        info!(
                            from = %path.display(),
                            to = %latest.display(),
                            "Newer ADM file found, switching"
                        );
                        self.adopt(latest);
                        return;
                    }
                }
            }

            shutdown.sleep(TAIL_INTERVAL).await;
        }
    }

    /// Reads all complete lines past the stored position.
    ///
    /// Opens the file fresh, detects in-place truncation (resetting the
    /// position to zero), and advances the position only past lines that
    /// end in a newline. A trailing partial line stays unread until the
    /// writer finishes it.
    fn read_new_lines(&mut self, path: &Path) -> std::io::Result<Vec<String>> {
        let mut file = File::open(path)?;
        let file_size = file.metadata()?.len();

        let last_position = self.positions.get(path).copied().unwrap_or(0);

        let read_position = if file_size < last_position {
            info!(
                path = %path.display(),
                old_pos = last_position,
                new_size = file_size,
                "Log file rotated in place, resetting position"
            );
            0
        } else {
            last_position
        };

        if read_position >= file_size {
            self.positions.insert(path.to_path_buf(), file_size);
            return Ok(Vec::new());
        }

        file.seek(SeekFrom::Start(read_position))?;
        let mut reader = BufReader::new(&file);

        let mut lines = Vec::new();
        let mut consumed = 0u64;

        loop {
            let mut line = String::new();
            let n = reader.read_line(&mut line)?;
            if n == 0 {
                break;
            }
            if !line.ends_with('\n') {
                break;
            }

            consumed += n as u64;
            let trimmed = line.trim_end_matches(['\n', '\r']).to_string();
            if !trimmed.is_empty() {
                lines.push(trimmed);
            }
        }

        // Written back even when no complete line was read, so a
        // truncation reset survives until the writer finishes its line.
        self.positions.insert(path.to_path_buf(), read_position + consumed);

        debug!(
            path = %path.display(),
            lines = lines.len(),
            position = read_position + consumed,
            "Read new lines"
        );

        Ok(lines)
    }

    /// Feeds one line through the extract → format → enqueue pipeline.
    /// Lines that are not PvP kills are dropped silently.
    async fn process_line(&self, line: &str) {
        if let Some(record) = extract(line) {
            debug!(
                killer = %record.killer,
                victim = %record.victim,
                "Kill event extracted"
            );
            self.queue.enqueue(format_message(&record)).await;
        }
    }
}
