use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::config::TrackerConfig;
use crate::error::StoreError;
use crate::models::{WorkoutEntry, FIELDNAMES};

/// Append-only CSV file of workout entries. Every call opens and closes the file, no
/// handle is held between operations.
#[derive(Clone, Debug)]
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    pub fn new(config: &TrackerConfig) -> Self {
        RecordStore {
            path: config.log_file.clone(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates the file with its header row if it does not exist yet.
    pub fn ensure_initialized(&self) -> Result<(), StoreError> {
        if self.path.exists() {
            return Ok(());
        }
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
            .map_err(|e| StoreError::io(&self.path, e))?;
        let mut writer = csv::Writer::from_writer(file);
        writer.write_record(FIELDNAMES)?;
        writer.flush().map_err(|e| StoreError::io(&self.path, e))?;
        debug!(path = %self.path.display(), "created workout log");
        Ok(())
    }

    pub fn append(&self, entry: &WorkoutEntry) -> Result<(), StoreError> {
        self.ensure_initialized()?;
        let file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(|e| StoreError::io(&self.path, e))?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer.serialize(entry)?;
        writer.flush().map_err(|e| StoreError::io(&self.path, e))?;
        debug!(exercise = %entry.exercise, date = %entry.date, "appended workout entry");
        Ok(())
    }

    /// Lazily parsed entries in on-disk order. A missing file is `StoreError::NotFound`.
    pub fn read_all(&self) -> Result<Entries, StoreError> {
        let file = File::open(&self.path).map_err(|e| StoreError::io(&self.path, e))?;
        let reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(file);
        debug!(path = %self.path.display(), "scanning workout log");
        Ok(Entries {
            inner: reader.into_deserialize(),
        })
    }
}

pub struct Entries {
    inner: csv::DeserializeRecordsIntoIter<File, WorkoutEntry>,
}

impl Iterator for Entries {
    type Item = Result<WorkoutEntry, StoreError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|row| row.map_err(StoreError::from))
    }
}

/// Drops rows the CSV layer rejects, logging each one.
pub fn skip_unreadable(entries: Entries) -> impl Iterator<Item = WorkoutEntry> {
    entries.filter_map(|row| match row {
        Ok(entry) => Some(entry),
        Err(e) => {
            warn!(error = %e, "skipping unreadable row");
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn temp_store() -> (tempfile::TempDir, RecordStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::new(&TrackerConfig::for_log_file(dir.path().join("logs.csv")));
        (dir, store)
    }

    fn bench(date: &str, weight: &str, reps: &str) -> WorkoutEntry {
        WorkoutEntry {
            date: date.into(),
            category: "Strength".into(),
            exercise: "Bench".into(),
            weight: weight.into(),
            reps: reps.into(),
            ..Default::default()
        }
    }

    fn collect(store: &RecordStore) -> Vec<WorkoutEntry> {
        store.read_all().unwrap().map(|row| row.unwrap()).collect()
    }

    #[test]
    fn initialization_writes_header_once() {
        let (_dir, store) = temp_store();
        store.ensure_initialized().unwrap();
        store.append(&bench("2024-05-01", "100", "5")).unwrap();
        store.ensure_initialized().unwrap();

        let contents = fs::read_to_string(store.path()).unwrap();
        let header = FIELDNAMES.join(",");
        assert!(contents.starts_with(&header));
        assert_eq!(contents.matches(&header).count(), 1);
        assert_eq!(contents.lines().count(), 2);
    }

    #[test]
    fn entries_come_back_in_append_order() {
        let (_dir, store) = temp_store();
        store.ensure_initialized().unwrap();
        let written = vec![
            bench("2024-05-03", "100", "5"),
            bench("2024-05-01", "90", "10"),
            WorkoutEntry {
                date: "2024-05-02".into(),
                category: "Cardio".into(),
                exercise: "Run".into(),
                distance: "3.1".into(),
                time: "28".into(),
                speed: "6.6".into(),
                ..Default::default()
            },
        ];
        for entry in &written {
            store.append(entry).unwrap();
        }

        let reopened = RecordStore::new(&TrackerConfig::for_log_file(store.path()));
        assert_eq!(collect(&reopened), written);
    }

    #[test]
    fn notes_with_commas_and_quotes_survive() {
        let (_dir, store) = temp_store();
        store.ensure_initialized().unwrap();
        let mut entry = bench("2024-05-01", "100", "5");
        entry.notes = "felt heavy, \"grindy\" last rep".into();
        store.append(&entry).unwrap();

        assert_eq!(collect(&store)[0].notes, entry.notes);
    }

    #[test]
    fn every_row_has_nine_fields() {
        let (_dir, store) = temp_store();
        store.append(&bench("2024-05-01", "", "")).unwrap();
        let contents = fs::read_to_string(store.path()).unwrap();
        let row = contents.lines().nth(1).unwrap();
        assert_eq!(row, "2024-05-01,Strength,Bench,,,,,,");
    }

    #[test]
    fn append_recreates_missing_file_with_header() {
        let (_dir, store) = temp_store();
        store.append(&bench("2024-05-01", "100", "5")).unwrap();
        assert_eq!(collect(&store).len(), 1);
    }

    #[test]
    fn missing_file_is_not_found() {
        let (_dir, store) = temp_store();
        assert!(matches!(store.read_all(), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn short_rows_fill_blank_fields() {
        let (_dir, store) = temp_store();
        fs::write(
            store.path(),
            format!("{}\n2024-05-01,Strength,Squat\n", FIELDNAMES.join(",")),
        )
        .unwrap();
        let entries: Vec<_> = skip_unreadable(store.read_all().unwrap()).collect();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].exercise, "Squat");
        assert_eq!(entries[0].weight, "");
    }
}
