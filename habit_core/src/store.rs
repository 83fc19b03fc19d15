//! Habit log persistence.
//!
//! Entries are appended to a JSONL (JSON Lines) file with file locking
//! to ensure safe concurrent access. Ids are assigned under the same
//! exclusive lock that guards the write, so concurrent writers (threads or
//! processes) never hand out the same id.

use crate::{Error, HabitEntry, NewHabit, Result};
use chrono::{Duration, Local, NaiveDate};
use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::{Path, PathBuf};

/// Habit store trait for appending and querying habit entries
pub trait HabitStore: Send + Sync {
    /// Persist a new entry and return it with its assigned id
    fn append(&self, habit: NewHabit) -> Result<HabitEntry>;

    /// Entries dated on or after `today - window_days`, in insertion order
    fn recent_as_of(&self, window_days: i64, today: NaiveDate) -> Result<Vec<HabitEntry>>;

    /// Same as [`HabitStore::recent_as_of`] using the local calendar date
    fn recent(&self, window_days: i64) -> Result<Vec<HabitEntry>> {
        self.recent_as_of(window_days, Local::now().date_naive())
    }
}

/// JSONL-based habit store with file locking
#[derive(Clone, Debug)]
pub struct JsonlHabitStore {
    path: PathBuf,
}

/// Just enough of a stored line to recover its id
#[derive(Deserialize)]
struct StoredId {
    id: u64,
}

impl JsonlHabitStore {
    /// Create a new store backed by the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ensure the parent directory exists
    fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

impl HabitStore for JsonlHabitStore {
    fn append(&self, habit: NewHabit) -> Result<HabitEntry> {
        self.ensure_parent_dir()?;

        let file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(&self.path)?;

        // Held across the id scan and the write
        file.lock_exclusive()?;

        let mut contents = Vec::new();
        (&file).read_to_end(&mut contents)?;

        // The lock is released when `file` drops on the error path
        let next_id = max_stored_id(&contents).checked_add(1).ok_or_else(|| {
            Error::Storage(io::Error::other(format!(
                "habit id space exhausted in {:?}",
                self.path
            )))
        })?;
        let entry = habit.into_entry(next_id);

        let mut writer = std::io::BufWriter::new(&file);
        // A torn final line must not swallow the new record
        if contents.last().is_some_and(|b| *b != b'\n') {
            tracing::warn!("Habit log {:?} ends mid-line, starting a new line", self.path);
            writer.write_all(b"\n")?;
        }
        let line = serde_json::to_string(&entry)?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        drop(writer);

        file.sync_all()?;
        file.unlock()?;

        tracing::debug!("Appended habit {} ({}) to {:?}", entry.id, entry.name, self.path);
        Ok(entry)
    }

    fn recent_as_of(&self, window_days: i64, today: NaiveDate) -> Result<Vec<HabitEntry>> {
        let cutoff = Duration::try_days(window_days)
            .and_then(|window| today.checked_sub_signed(window))
            .unwrap_or(NaiveDate::MIN);

        let entries: Vec<HabitEntry> = read_entries(&self.path)?
            .into_iter()
            .filter(|entry| entry.date >= cutoff)
            .collect();

        tracing::info!(
            "Loaded {} habit entries since {} ({} day window)",
            entries.len(),
            cutoff,
            window_days
        );
        Ok(entries)
    }
}

/// Highest id among parseable lines, 0 for an empty log
fn max_stored_id(contents: &[u8]) -> u64 {
    contents
        .split(|b| *b == b'\n')
        .filter(|line| !line.iter().all(u8::is_ascii_whitespace))
        .filter_map(|line| serde_json::from_slice::<StoredId>(line).ok())
        .map(|stored| stored.id)
        .max()
        .unwrap_or(0)
}

/// Read all entries from a habit log file
pub fn read_entries(path: &Path) -> Result<Vec<HabitEntry>> {
    read_jsonl(path)
}

/// Read every parseable record from a JSONL file under a shared lock
///
/// Lines that fail to parse are logged and skipped. A missing file reads
/// as empty.
pub(crate) fn read_jsonl<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    file.lock_shared()?;

    // Raw bytes, so a line that is not valid UTF-8 is skipped like any other
    let mut reader = BufReader::new(&file);
    let mut records = Vec::new();
    let mut buf = Vec::new();
    let mut line_num = 0usize;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        line_num += 1;
        if buf.iter().all(u8::is_ascii_whitespace) {
            continue;
        }

        match serde_json::from_slice::<T>(&buf) {
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::warn!("Skipping unreadable line {} of {:?}: {}", line_num, path, e);
            }
        }
    }

    file.unlock()?;
    tracing::debug!("Read {} records from {:?}", records.len(), path);
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    fn new_habit(name: &str, date: NaiveDate) -> NewHabit {
        NewHabit {
            name: name.into(),
            date,
            status: "completed".into(),
            category: "health".into(),
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_append_assigns_sequential_ids() {
        crate::logging::init_test();
        let temp_dir = tempfile::tempdir().unwrap();
        let store = JsonlHabitStore::new(temp_dir.path().join("habits.jsonl"));

        let first = store.append(new_habit("Run", day(2024, 5, 1))).unwrap();
        let second = store.append(new_habit("Read", day(2024, 5, 1))).unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(second.name, "Read");
    }

    #[test]
    fn test_append_creates_parent_dirs() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("a/b/habits.jsonl");
        let store = JsonlHabitStore::new(&path);

        store.append(new_habit("Run", day(2024, 5, 1))).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_recent_window_boundary() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = JsonlHabitStore::new(temp_dir.path().join("habits.jsonl"));
        let today = day(2024, 6, 30);

        store.append(new_habit("exactly_30", day(2024, 5, 31))).unwrap();
        store.append(new_habit("exactly_31", day(2024, 5, 30))).unwrap();
        store.append(new_habit("today", today)).unwrap();

        let names: Vec<_> = store
            .recent_as_of(30, today)
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();

        assert_eq!(names, vec!["exactly_30", "today"]);
    }

    #[test]
    fn test_recent_keeps_insertion_order_and_future_dates() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = JsonlHabitStore::new(temp_dir.path().join("habits.jsonl"));
        let today = day(2024, 6, 30);

        store.append(new_habit("later", day(2025, 1, 1))).unwrap();
        store.append(new_habit("earlier", day(2024, 6, 20))).unwrap();

        let entries = store.recent_as_of(30, today).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "later");
        assert_eq!(entries[1].name, "earlier");
    }

    #[test]
    fn test_read_missing_log() {
        let temp_dir = tempfile::tempdir().unwrap();
        let entries = read_entries(&temp_dir.path().join("nonexistent.jsonl")).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_corrupted_lines_are_skipped() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("habits.jsonl");
        std::fs::write(
            &path,
            "{ invalid json }\n\
             {\"id\":4,\"name\":\"Run\",\"date\":\"2024-05-01\",\"status\":\"completed\",\"category\":\"health\"}\n",
        )
        .unwrap();

        let store = JsonlHabitStore::new(&path);
        let entry = store.append(new_habit("Read", day(2024, 5, 2))).unwrap();
        assert_eq!(entry.id, 5);

        let entries = read_entries(&path).unwrap();
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn test_torn_last_line_does_not_swallow_append() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("habits.jsonl");
        std::fs::write(&path, "{\"id\":1,\"name\":\"Ru").unwrap();

        let store = JsonlHabitStore::new(&path);
        let entry = store.append(new_habit("Read", day(2024, 5, 2))).unwrap();
        assert_eq!(entry.id, 1);

        let entries = read_entries(&path).unwrap();
        assert_eq!(entries, vec![entry]);
    }

    #[test]
    fn test_non_utf8_line_is_skipped() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("habits.jsonl");
        let mut contents = br#"{"id":1,"name":"Run","date":"2024-05-01","status":"completed","category":"health"}"#
            .to_vec();
        contents.push(b'\n');
        contents.extend_from_slice(&[0xff, 0xfe, b'\n']);
        std::fs::write(&path, contents).unwrap();

        let store = JsonlHabitStore::new(&path);
        let entry = store.append(new_habit("Read", day(2024, 5, 2))).unwrap();
        assert_eq!(entry.id, 2);

        let entries = store.recent_as_of(30, day(2024, 5, 2)).unwrap();
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Run", "Read"]);
        assert_eq!(read_entries(&path).unwrap().len(), 2);
    }

    #[test]
    fn test_append_fails_when_id_space_exhausted() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("habits.jsonl");
        let line = format!(
            "{{\"id\":{},\"name\":\"Run\",\"date\":\"2024-05-01\",\"status\":\"completed\",\"category\":\"health\"}}\n",
            u64::MAX
        );
        std::fs::write(&path, &line).unwrap();

        let store = JsonlHabitStore::new(&path);
        let result = store.append(new_habit("Read", day(2024, 5, 2)));
        assert!(matches!(result, Err(Error::Storage(_))));

        // Nothing was written
        assert_eq!(std::fs::read_to_string(&path).unwrap(), line);
    }

    #[test]
    fn test_concurrent_appends_get_unique_ids() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = Arc::new(JsonlHabitStore::new(temp_dir.path().join("habits.jsonl")));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    (0..5)
                        .map(|j| {
                            store
                                .append(new_habit(&format!("t{}-{}", i, j), day(2024, 5, 1)))
                                .unwrap()
                                .id
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let ids: Vec<u64> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        let unique: HashSet<_> = ids.iter().copied().collect();

        assert_eq!(ids.len(), 40);
        assert_eq!(unique.len(), 40);
        assert_eq!(read_entries(store.path()).unwrap().len(), 40);
    }
}
