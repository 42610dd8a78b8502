//! Rotating log journal
//!
//! Entries are JSON objects appended to date-stamped array files in one
//! directory:
//!
//! - `<prefix>_<YYYYMMDD>.json` - first file of a day
//! - `<prefix>_<YYYYMMDD_HHMMSS>.json` - opened when the current file is full
//! - `<prefix>_<YYYYMMDD_HHMMSS>_<NNN>.json` - a second rotation within the same second
//!
//! Files are ordered by the (day, time, counter) parsed from their names,
//! which is the order they were opened in. The counter is compared as a
//! number, so `_1000` follows `_999`.
//!
//! The journal holds one "current" file. It rebinds when the local date
//! changes and rotates when the current file reaches `max_entries_per_file`;
//! a file that was rotated away from is never appended to again. Choosing
//! the current file is not synchronized: share a journal across threads
//! behind a mutex.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use chrono::{DateTime, Local, NaiveDate, NaiveTime, Utc};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::sequence::SequenceView;
use crate::storage::{backup, StoreError, StoreResult};
use crate::store::StoreConfig;

/// A single log record
pub type LogEntry = Map<String, Value>;

/// Field stamped with epoch nanoseconds when an entry arrives without one
pub const TIMESTAMP_FIELD: &str = "timestamp";

const LOG_EXT: &str = ".json";
const DAY_FORMAT: &str = "%Y%m%d";
const TIME_FORMAT: &str = "%H%M%S";
const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// Construction-time configuration for a journal
#[derive(Clone, Debug)]
pub struct JournalConfig {
    /// Directory holding the log files
    pub directory: PathBuf,
    /// File name prefix
    pub prefix: String,
    /// Entries per file before rotating (at least 1)
    pub max_entries_per_file: usize,
    /// Rotate when the current file is full; otherwise files grow unbounded
    pub auto_rotate: bool,
    /// Back up log files before each append; `clear_old_logs` removes stale
    /// backups along with the logs
    pub backup_files: bool,
    /// Indent width for log files
    pub indent: Option<usize>,
}

impl JournalConfig {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            prefix: "log".to_string(),
            max_entries_per_file: 1000,
            auto_rotate: true,
            backup_files: false,
            indent: Some(2),
        }
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn max_entries_per_file(mut self, max: usize) -> Self {
        self.max_entries_per_file = max.max(1);
        self
    }

    pub fn auto_rotate(mut self, auto_rotate: bool) -> Self {
        self.auto_rotate = auto_rotate;
        self
    }

    pub fn backup_files(mut self, backup_files: bool) -> Self {
        self.backup_files = backup_files;
        self
    }

    pub fn indent(mut self, indent: Option<usize>) -> Self {
        self.indent = indent;
        self
    }
}

/// The file currently receiving entries
#[derive(Debug)]
struct CurrentLog {
    day: NaiveDate,
    view: SequenceView,
}

/// Append-only JSON log partitioned by date and size
#[derive(Debug)]
pub struct LogJournal {
    config: JournalConfig,
    current: Option<CurrentLog>,
}

impl LogJournal {
    /// Open a journal, creating its directory
    ///
    /// No file is touched until the first entry is added.
    pub fn open(config: JournalConfig) -> StoreResult<Self> {
        fs::create_dir_all(&config.directory)
            .map_err(|e| StoreError::from_io(e, config.directory.clone()))?;
        Ok(Self {
            config,
            current: None,
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &JournalConfig {
        &self.config
    }

    /// Path of the file the next entry would go to, if one is bound
    pub fn current_path(&self) -> Option<&Path> {
        self.current.as_ref().map(|c| c.view.store().path())
    }

    /// Append an entry, stamping `timestamp` if missing
    ///
    /// Returns the path of the file the entry was written to.
    pub fn add_log(&mut self, entry: LogEntry) -> StoreResult<PathBuf> {
        self.add_log_at(entry, Local::now())
    }

    pub(crate) fn add_log_at(
        &mut self,
        mut entry: LogEntry,
        now: DateTime<Local>,
    ) -> StoreResult<PathBuf> {
        if !entry.contains_key(TIMESTAMP_FIELD) {
            let nanos = now.timestamp_nanos_opt().unwrap_or_default();
            entry.insert(TIMESTAMP_FIELD.to_string(), Value::from(nanos));
        }

        let view = self.current_for(now)?;
        view.append(Value::Object(entry))?;
        Ok(view.store().path().to_path_buf())
    }

    /// All entries across every log file, oldest file first
    ///
    /// `start` and `end` are inclusive bounds checked against each entry's
    /// `timestamp` (epoch nanoseconds, or an RFC 3339 string); entries without
    /// a readable timestamp are kept. `predicate` then filters what remains.
    pub fn get_logs(
        &self,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
        predicate: Option<&dyn Fn(&Value) -> bool>,
    ) -> StoreResult<Vec<Value>> {
        let start = start.map(clamped_nanos);
        let end = end.map(clamped_nanos);

        let mut logs = Vec::new();
        for path in self.log_files()? {
            debug!("Reading log file {:?}", path);
            logs.extend(self.view_for(path)?.items()?);
        }

        logs.retain(|entry| match entry_nanos(entry) {
            Some(ts) => start.map_or(true, |s| ts >= s) && end.map_or(true, |e| ts <= e),
            None => true,
        });

        if let Some(predicate) = predicate {
            logs.retain(|entry| predicate(entry));
        }

        Ok(logs)
    }

    /// Delete log files last modified more than `days` days ago
    ///
    /// Backups of log files older than the cutoff are removed in the same
    /// pass. Files that fail to delete are skipped. Returns how many log files
    /// were removed.
    pub fn clear_old_logs(&mut self, days: u64) -> StoreResult<usize> {
        let cutoff = SystemTime::now()
            .checked_sub(Duration::from_secs(days.saturating_mul(SECONDS_PER_DAY)))
            .unwrap_or(SystemTime::UNIX_EPOCH);

        let mut deleted = 0;
        for path in self.log_files()? {
            if !modified_before(&path, cutoff) {
                continue;
            }

            match fs::remove_file(&path) {
                Ok(()) => {
                    debug!("Removed old log file {:?}", path);
                    if self.current_path() == Some(path.as_path()) {
                        self.current = None;
                    }
                    deleted += 1;
                }
                Err(e) => warn!("Failed to remove old log file {:?}: {}", path, e),
            }
        }

        for path in self.log_backups()? {
            if !modified_before(&path, cutoff) {
                continue;
            }
            match fs::remove_file(&path) {
                Ok(()) => debug!("Removed old log backup {:?}", path),
                Err(e) => warn!("Failed to remove old log backup {:?}: {}", path, e),
            }
        }

        if deleted > 0 {
            info!("Cleared {} log file(s) older than {} day(s)", deleted, days);
        }
        Ok(deleted)
    }

    /// Every file in the directory matching this journal's naming, in
    /// chronological order
    pub fn log_files(&self) -> StoreResult<Vec<PathBuf>> {
        let entries = fs::read_dir(&self.config.directory)
            .map_err(|e| StoreError::from_io(e, self.config.directory.clone()))?;

        let mut files: Vec<(LogName, PathBuf)> = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                let name = parse_log_name(&self.config.prefix, &entry.file_name().to_string_lossy())?;
                Some((name, entry.path()))
            })
            .collect();

        files.sort();
        Ok(files.into_iter().map(|(_, path)| path).collect())
    }

    /// Backups taken of this journal's log files
    fn log_backups(&self) -> StoreResult<Vec<PathBuf>> {
        let entries = fs::read_dir(&self.config.directory)
            .map_err(|e| StoreError::from_io(e, self.config.directory.clone()))?;

        Ok(entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| is_log_backup(&self.config.prefix, path))
            .collect())
    }

    /// Resolve the file for `now`, rebinding on a new day and rotating when full
    fn current_for(&mut self, now: DateTime<Local>) -> StoreResult<&SequenceView> {
        let today = now.date_naive();

        let needs_bind = self.current.as_ref().map_or(true, |c| c.day != today);
        if needs_bind {
            let path = match self.latest_for(today)? {
                Some(path) => path,
                None => self.daily_path(today),
            };
            if self.current.is_some() {
                info!("Date rolled over, switching log file to {:?}", path);
            }
            self.current = Some(CurrentLog {
                day: today,
                view: self.view_for(path)?,
            });
        }

        if self.config.auto_rotate && self.current_len()? >= self.config.max_entries_per_file {
            self.rotate(now)?;
        }

        self.current
            .as_ref()
            .map(|c| &c.view)
            .ok_or_else(|| StoreError::NotFound {
                path: self.config.directory.clone(),
            })
    }

    /// Bind a fresh time-stamped file for `now`
    fn rotate(&mut self, now: DateTime<Local>) -> StoreResult<()> {
        let day = now.date_naive();
        let current = self.current_path().map(Path::to_path_buf);

        for seq in 0u32.. {
            let path = self.rotated_path(now, seq);
            if Some(&path) == current.as_ref() {
                continue;
            }
            let view = self.view_for(path.clone())?;
            if view.store().exists() && view.len()? >= self.config.max_entries_per_file {
                continue;
            }

            info!("Rotating log file to {:?}", path);
            self.current = Some(CurrentLog { day, view });
            break;
        }
        Ok(())
    }

    fn current_len(&self) -> StoreResult<usize> {
        match &self.current {
            Some(current) => current.view.len(),
            None => Ok(0),
        }
    }

    /// The most recently opened existing file for `day`
    fn latest_for(&self, day: NaiveDate) -> StoreResult<Option<PathBuf>> {
        Ok(self
            .log_files()?
            .into_iter()
            .filter(|path| {
                path.file_name()
                    .and_then(|n| parse_log_name(&self.config.prefix, &n.to_string_lossy()))
                    .map(|name| name.day)
                    == Some(day)
            })
            .last())
    }

    fn daily_path(&self, day: NaiveDate) -> PathBuf {
        self.config
            .directory
            .join(daily_name(&self.config.prefix, day))
    }

    fn rotated_path(&self, at: DateTime<Local>, seq: u32) -> PathBuf {
        self.config
            .directory
            .join(rotated_name(&self.config.prefix, at, seq))
    }

    fn view_for(&self, path: PathBuf) -> StoreResult<SequenceView> {
        SequenceView::open(
            StoreConfig::new(path)
                .auto_create(false)
                .auto_backup(self.config.backup_files)
                .indent(self.config.indent),
        )
    }
}

/// `<prefix>_<YYYYMMDD>.json`
pub fn daily_name(prefix: &str, day: NaiveDate) -> String {
    format!("{}_{}{}", prefix, day.format(DAY_FORMAT), LOG_EXT)
}

/// `<prefix>_<YYYYMMDD_HHMMSS>.json`, with `_<NNN>` appended when `seq > 0`
pub fn rotated_name(prefix: &str, at: DateTime<Local>, seq: u32) -> String {
    let stamp = at.format("%Y%m%d_%H%M%S");
    if seq == 0 {
        format!("{}_{}{}", prefix, stamp, LOG_EXT)
    } else {
        format!("{}_{}_{:03}{}", prefix, stamp, seq, LOG_EXT)
    }
}

/// A parsed journal file name
///
/// Field order makes the derived `Ord` chronological: the daily file (no
/// time) comes first, then rotations by time and counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LogName {
    pub day: NaiveDate,
    pub time: Option<NaiveTime>,
    pub seq: u32,
}

/// Parse a journal file name
///
/// Only the three shapes written by the journal are accepted, so backups and
/// unrelated files sharing the prefix are ignored.
pub fn parse_log_name(prefix: &str, file_name: &str) -> Option<LogName> {
    let rest = file_name.strip_prefix(prefix)?.strip_prefix('_')?;
    let rest = rest.strip_suffix(LOG_EXT)?;

    let day = NaiveDate::parse_from_str(rest.get(..8)?, DAY_FORMAT).ok()?;
    let tail = rest.get(8..)?;
    if tail.is_empty() {
        return Some(LogName {
            day,
            time: None,
            seq: 0,
        });
    }

    let tail = tail.strip_prefix('_')?;
    let time = NaiveTime::parse_from_str(tail.get(..6)?, TIME_FORMAT).ok()?;
    let seq = tail.get(6..)?;
    let seq = match seq.strip_prefix('_') {
        None if seq.is_empty() => 0,
        Some(n) if !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()) => n.parse().ok()?,
        _ => return None,
    };

    Some(LogName {
        day,
        time: Some(time),
        seq,
    })
}

/// `<log file stem>_backup_<stamp>.json` for a file this journal could own
fn is_log_backup(prefix: &str, path: &Path) -> bool {
    let Some(name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
        return false;
    };
    let Some((stem, _)) = name.rsplit_once("_backup_") else {
        return false;
    };

    let log_name = format!("{}{}", stem, LOG_EXT);
    parse_log_name(prefix, &log_name).is_some()
        && backup::is_backup_of(&path.with_file_name(&log_name), &name)
}

/// Epoch nanoseconds, saturating for times outside the representable range
fn clamped_nanos(t: DateTime<Utc>) -> i64 {
    t.timestamp_nanos_opt().unwrap_or(if t.timestamp() < 0 {
        i64::MIN
    } else {
        i64::MAX
    })
}

fn modified_before(path: &Path, cutoff: SystemTime) -> bool {
    match fs::metadata(path).and_then(|m| m.modified()) {
        Ok(modified) => modified < cutoff,
        Err(e) => {
            warn!("Skipping {:?}: {}", path, e);
            false
        }
    }
}

/// Entry timestamp in epoch nanoseconds
fn entry_nanos(entry: &Value) -> Option<i64> {
    match entry.get(TIMESTAMP_FIELD)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .and_then(|t| t.timestamp_nanos_opt()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration as ChronoDuration, TimeZone};
    use serde_json::json;
    use tempfile::TempDir;

    fn entry(value: Value) -> LogEntry {
        value.as_object().cloned().unwrap()
    }

    fn at(h: u32, m: u32, s: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 5, 17, h, m, s).unwrap()
    }

    fn journal(temp_dir: &TempDir, max: usize) -> LogJournal {
        LogJournal::open(
            JournalConfig::new(temp_dir.path().join("logs"))
                .prefix("app")
                .max_entries_per_file(max),
        )
        .unwrap()
    }

    fn count(path: &Path) -> usize {
        let doc: Value = serde_json::from_slice(&fs::read(path).unwrap()).unwrap();
        doc.as_array().unwrap().len()
    }

    #[test]
    fn test_names() {
        let day = NaiveDate::from_ymd_opt(2024, 5, 17).unwrap();
        assert_eq!(daily_name("app", day), "app_20240517.json");
        assert_eq!(rotated_name("app", at(9, 4, 5), 0), "app_20240517_090405.json");
        assert_eq!(rotated_name("app", at(9, 4, 5), 2), "app_20240517_090405_002.json");
    }

    #[test]
    fn test_parse_log_name() {
        let day = NaiveDate::from_ymd_opt(2024, 5, 17);
        let day_of = |name: &str| parse_log_name("app", name).map(|n| n.day);
        assert_eq!(day_of("app_20240517.json"), day);
        assert_eq!(day_of("app_20240517_090405.json"), day);
        assert_eq!(day_of("app_20240517_090405_001.json"), day);
        assert_eq!(
            parse_log_name("app", "app_20240517_090405_1000.json").map(|n| n.seq),
            Some(1000)
        );

        assert_eq!(parse_log_name("app", "app_20240517.txt"), None);
        assert_eq!(parse_log_name("app", "other_20240517.json"), None);
        assert_eq!(parse_log_name("app", "app_notes.json"), None);
        assert_eq!(parse_log_name("app", "app_20240517_backup_20240517_090405.json"), None);
        assert_eq!(parse_log_name("app", "app_20240517_996405.json"), None);
    }

    #[test]
    fn test_open_touches_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let journal = journal(&temp_dir, 10);

        assert!(journal.config().directory.is_dir());
        assert!(journal.current_path().is_none());
        assert!(journal.log_files().unwrap().is_empty());
    }

    #[test]
    fn test_add_log_stamps_timestamp() {
        let temp_dir = TempDir::new().unwrap();
        let mut journal = journal(&temp_dir, 10);
        let now = at(10, 0, 0);

        journal.add_log_at(entry(json!({"msg": "hello"})), now).unwrap();
        journal
            .add_log_at(entry(json!({"msg": "explicit", "timestamp": 42})), now)
            .unwrap();

        let logs = journal.get_logs(None, None, None).unwrap();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0]["timestamp"], json!(now.timestamp_nanos_opt().unwrap()));
        assert_eq!(logs[1]["timestamp"], json!(42));
    }

    #[test]
    fn test_rotation_on_size() {
        let temp_dir = TempDir::new().unwrap();
        let mut journal = journal(&temp_dir, 2);

        let first = journal.add_log_at(entry(json!({"n": 1})), at(10, 0, 0)).unwrap();
        let second = journal.add_log_at(entry(json!({"n": 2})), at(10, 0, 1)).unwrap();
        let third = journal.add_log_at(entry(json!({"n": 3})), at(10, 0, 2)).unwrap();

        assert_eq!(first, second);
        assert_ne!(second, third);
        assert!(first.ends_with("app_20240517.json"));
        assert!(third.ends_with("app_20240517_100002.json"));

        let files = journal.log_files().unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(count(&files[0]), 2);
        assert_eq!(count(&files[1]), 1);
    }

    #[test]
    fn test_rotated_file_never_reused_within_same_second() {
        let temp_dir = TempDir::new().unwrap();
        let mut journal = journal(&temp_dir, 1);
        let now = at(11, 30, 0);

        for n in 0..4 {
            journal.add_log_at(entry(json!({"n": n})), now).unwrap();
        }

        let files = journal.log_files().unwrap();
        assert_eq!(files.len(), 4);
        assert!(files.iter().all(|f| count(f) == 1));
        assert!(files[3].ends_with("app_20240517_113000_002.json"));

        let ns: Vec<Value> = journal
            .get_logs(None, None, None)
            .unwrap()
            .into_iter()
            .map(|e| e["n"].clone())
            .collect();
        assert_eq!(ns, vec![json!(0), json!(1), json!(2), json!(3)]);
    }

    #[test]
    fn test_no_rotation_when_disabled() {
        let temp_dir = TempDir::new().unwrap();
        let mut journal = LogJournal::open(
            JournalConfig::new(temp_dir.path())
                .max_entries_per_file(1)
                .auto_rotate(false),
        )
        .unwrap();

        for n in 0..3 {
            journal.add_log_at(entry(json!({"n": n})), at(8, 0, n)).unwrap();
        }

        let files = journal.log_files().unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(count(&files[0]), 3);
    }

    #[test]
    fn test_date_rollover_rebinds() {
        let temp_dir = TempDir::new().unwrap();
        let mut journal = journal(&temp_dir, 100);
        let late = at(23, 59, 59);
        let early = late + ChronoDuration::seconds(2);

        let before = journal.add_log_at(entry(json!({"n": 1})), late).unwrap();
        let after = journal.add_log_at(entry(json!({"n": 2})), early).unwrap();

        assert!(before.ends_with("app_20240517.json"));
        assert!(after.ends_with("app_20240518.json"));
        assert_eq!(journal.current_path(), Some(after.as_path()));
    }

    #[test]
    fn test_resume_latest_file_for_today() {
        let temp_dir = TempDir::new().unwrap();
        let mut first = journal(&temp_dir, 2);
        for s in 0..3 {
            first.add_log_at(entry(json!({"s": s})), at(9, 0, s)).unwrap();
        }

        // A new journal on the same directory continues the rotated file
        let mut second = journal(&temp_dir, 2);
        let path = second.add_log_at(entry(json!({"s": 9})), at(9, 5, 0)).unwrap();

        assert!(path.ends_with("app_20240517_090002.json"));
        assert_eq!(count(&path), 2);
        assert_eq!(second.log_files().unwrap().len(), 2);
    }

    #[test]
    fn test_get_logs_date_range_and_predicate() {
        let temp_dir = TempDir::new().unwrap();
        let mut journal = journal(&temp_dir, 100);

        for (n, level) in [(1, "info"), (2, "error"), (3, "info"), (4, "error")] {
            let stamped = Utc.with_ymd_and_hms(2024, 5, n, 12, 0, 0).unwrap();
            let e = json!({
                "level": level,
                "timestamp": stamped.timestamp_nanos_opt().unwrap()
            });
            journal.add_log_at(entry(e), at(12, 0, n)).unwrap();
        }
        journal
            .add_log_at(entry(json!({"level": "error", "timestamp": "not a time"})), at(12, 1, 0))
            .unwrap();

        let start = Utc.with_ymd_and_hms(2024, 5, 2, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 5, 3, 23, 59, 59).unwrap();
        let in_range = journal.get_logs(Some(start), Some(end), None).unwrap();
        // Two dated entries plus the one whose timestamp can't be read
        assert_eq!(in_range.len(), 3);

        let errors_only = |e: &Value| e["level"] == "error";
        let errors = journal
            .get_logs(Some(start), Some(end), Some(&errors_only))
            .unwrap();
        assert_eq!(errors.len(), 2);

        let all_errors = journal.get_logs(None, None, Some(&errors_only)).unwrap();
        assert_eq!(all_errors.len(), 3);
    }

    #[test]
    fn test_get_logs_ignores_foreign_files() {
        let temp_dir = TempDir::new().unwrap();
        let mut journal = journal(&temp_dir, 100);
        journal.add_log(entry(json!({"msg": "mine"}))).unwrap();

        let dir = &journal.config().directory;
        fs::write(dir.join("app_notes.json"), "[{\"msg\": \"foreign\"}]").unwrap();
        fs::write(dir.join("other_20240517.json"), "[{\"msg\": \"foreign\"}]").unwrap();

        let logs = journal.get_logs(None, None, None).unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0]["msg"], "mine");
    }

    #[test]
    fn test_clear_old_logs() {
        let temp_dir = TempDir::new().unwrap();
        let mut journal = journal(&temp_dir, 1);
        for s in 0..3 {
            journal.add_log_at(entry(json!({"s": s})), at(7, 0, s)).unwrap();
        }
        let foreign = journal.config().directory.join("keep_me.json");
        fs::write(&foreign, "[]").unwrap();

        // Nothing is a year old yet
        assert_eq!(journal.clear_old_logs(365).unwrap(), 0);

        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(journal.clear_old_logs(0).unwrap(), 3);
        assert!(journal.log_files().unwrap().is_empty());
        assert!(journal.current_path().is_none());
        assert!(foreign.exists());

        // The journal keeps working after its files are gone
        journal.add_log_at(entry(json!({"s": 99})), at(7, 1, 0)).unwrap();
        assert_eq!(journal.log_files().unwrap().len(), 1);
    }

    #[test]
    fn test_get_logs_bounds_beyond_nanosecond_range() {
        let temp_dir = TempDir::new().unwrap();
        let mut journal = journal(&temp_dir, 100);
        journal.add_log_at(entry(json!({"msg": "now"})), at(12, 0, 0)).unwrap();

        let far_future = Utc.with_ymd_and_hms(2300, 1, 1, 0, 0, 0).unwrap();
        let far_past = Utc.with_ymd_and_hms(1600, 1, 1, 0, 0, 0).unwrap();

        assert!(journal.get_logs(Some(far_future), None, None).unwrap().is_empty());
        assert!(journal.get_logs(None, Some(far_past), None).unwrap().is_empty());
        assert_eq!(
            journal
                .get_logs(Some(far_past), Some(far_future), None)
                .unwrap()
                .len(),
            1
        );
    }

    #[test]
    fn test_log_files_order_counter_numerically() {
        let temp_dir = TempDir::new().unwrap();
        let mut journal = journal(&temp_dir, 100);
        let dir = journal.config().directory.clone();
        let now = at(11, 30, 0);

        let daily = dir.join(daily_name("app", now.date_naive()));
        let nine = dir.join(rotated_name("app", now, 999));
        let thousand = dir.join(rotated_name("app", now, 1000));
        for path in [&thousand, &daily, &nine] {
            fs::write(path, "[{\"n\": 0}]").unwrap();
        }

        assert_eq!(journal.log_files().unwrap(), vec![daily, nine, thousand.clone()]);

        // Resuming picks the highest counter, not the last name in byte order
        let path = journal.add_log_at(entry(json!({"n": 1})), at(11, 31, 0)).unwrap();
        assert_eq!(path, thousand);
        assert_eq!(count(&thousand), 2);
    }

    #[test]
    fn test_clear_old_logs_removes_log_backups() {
        let temp_dir = TempDir::new().unwrap();
        let mut journal = LogJournal::open(
            JournalConfig::new(temp_dir.path().join("logs"))
                .prefix("app")
                .backup_files(true),
        )
        .unwrap();
        for s in 0..3 {
            journal.add_log_at(entry(json!({"s": s})), at(6, 0, s)).unwrap();
        }

        let dir = journal.config().directory.clone();
        let foreign = dir.join("notes_backup_20240101_000000.json");
        fs::write(&foreign, "[]").unwrap();
        let backups = |dir: &Path| {
            fs::read_dir(dir)
                .unwrap()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_name().to_string_lossy().starts_with("app_20240517_backup_"))
                .count()
        };
        assert!(backups(&dir) > 0);

        assert_eq!(journal.clear_old_logs(365).unwrap(), 0);
        assert!(backups(&dir) > 0);

        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(journal.clear_old_logs(0).unwrap(), 1);
        assert_eq!(backups(&dir), 0);
        assert!(foreign.exists());
    }

    #[test]
    fn test_entry_nanos() {
        assert_eq!(entry_nanos(&json!({"timestamp": 5})), Some(5));
        assert_eq!(entry_nanos(&json!({"timestamp": 5.9})), Some(5));
        assert_eq!(
            entry_nanos(&json!({"timestamp": "1970-01-01T00:00:01Z"})),
            Some(1_000_000_000)
        );
        assert_eq!(entry_nanos(&json!({"timestamp": true})), None);
        assert_eq!(entry_nanos(&json!({"msg": "no stamp"})), None);
    }
}
