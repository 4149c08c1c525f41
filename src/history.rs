//! Bounded, newest-first download history kept in [`Storage`].

use chrono::{DateTime, Local};

use crate::error::Result;
use crate::format::format_timestamp;
use crate::model::HistoryEntry;
use crate::storage::Storage;

/// Storage key holding the JSON array of entries
pub const HISTORY_KEY: &str = "downloadHistory";
/// Entries kept after each write
pub const HISTORY_CAPACITY: usize = 10;
/// Shown when nothing has been downloaded yet
pub const EMPTY_HISTORY_MESSAGE: &str = "No download history yet";

pub struct HistoryStore {
    storage: Box<dyn Storage>,
}

/// One rendered history line
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRow {
    pub filename: String,
    /// "<quality> - <format>"
    pub detail: String,
    /// Relative time, e.g. "5 min ago"
    pub time: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum HistoryView {
    Empty(&'static str),
    Rows(Vec<HistoryRow>),
}

impl HistoryStore {
    pub fn new(storage: impl Storage + 'static) -> Self {
        Self {
            storage: Box::new(storage),
        }
    }

    /// Persisted entries, newest first. A corrupt list reads as empty.
    pub fn entries(&self) -> Result<Vec<HistoryEntry>> {
        let Some(raw) = self.storage.get_item(HISTORY_KEY)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str(&raw) {
            Ok(list) => Ok(list),
            Err(e) => {
                tracing::warn!(error = %e, "discarding unreadable download history");
                Ok(Vec::new())
            }
        }
    }

    /// Prepends `entry`, keeps the newest [`HISTORY_CAPACITY`], persists the list.
    pub fn record(&mut self, entry: HistoryEntry) -> Result<Vec<HistoryEntry>> {
        let mut history = self.entries()?;
        history.insert(0, entry);
        history.truncate(HISTORY_CAPACITY);
        self.storage
            .set_item(HISTORY_KEY, &serde_json::to_string(&history)?)?;
        tracing::debug!(len = history.len(), "download history updated");
        Ok(history)
    }

    /// Display model of the persisted list relative to `now`.
    pub fn render(&self, now: DateTime<Local>) -> Result<HistoryView> {
        let history = self.entries()?;
        if history.is_empty() {
            return Ok(HistoryView::Empty(EMPTY_HISTORY_MESSAGE));
        }
        Ok(HistoryView::Rows(
            history
                .iter()
                .map(|item| HistoryRow {
                    filename: item.filename.clone(),
                    detail: format!("{} - {}", item.quality, item.format),
                    time: format_timestamp(item.timestamp, now),
                })
                .collect(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MediaFormat, Quality};
    use crate::storage::{FileStorage, MemoryStorage};

    fn entry(i: i64) -> HistoryEntry {
        HistoryEntry {
            url: format!("https://youtu.be/{i}"),
            filename: format!("video_{i}.mp4"),
            quality: Quality::P720,
            format: MediaFormat::Mp4,
            timestamp: Local::now().timestamp_millis() - i,
        }
    }

    #[test]
    fn keeps_ten_newest_first() {
        let mut store = HistoryStore::new(MemoryStorage::default());
        for i in 1..=15 {
            store.record(entry(i)).unwrap();
        }
        let list = store.entries().unwrap();
        assert_eq!(list.len(), HISTORY_CAPACITY);
        assert_eq!(list[0].filename, "video_15.mp4");
        assert_eq!(list[9].filename, "video_6.mp4");
    }

    #[test]
    fn empty_render_shows_message() {
        let store = HistoryStore::new(MemoryStorage::default());
        assert_eq!(
            store.render(Local::now()).unwrap(),
            HistoryView::Empty("No download history yet")
        );
    }

    #[test]
    fn render_rows() {
        let mut store = HistoryStore::new(MemoryStorage::default());
        let mut e = entry(0);
        e.format = MediaFormat::Mp3;
        e.filename = "song.mp3".into();
        store.record(e).unwrap();

        let HistoryView::Rows(rows) = store.render(Local::now()).unwrap() else {
            panic!("expected rows");
        };
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].filename, "song.mp3");
        assert_eq!(rows[0].detail, "720p - mp3");
        assert_eq!(rows[0].time, "0 min ago");
    }

    #[test]
    fn corrupt_storage_reads_empty_and_recovers() {
        let mut mem = MemoryStorage::default();
        mem.set_item(HISTORY_KEY, "{not json").unwrap();
        let mut store = HistoryStore::new(mem);
        assert!(store.entries().unwrap().is_empty());

        store.record(entry(1)).unwrap();
        assert_eq!(store.entries().unwrap().len(), 1);
    }

    #[test]
    fn persists_through_file_storage() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = HistoryStore::new(FileStorage::new(dir.path()));
        store.record(entry(1)).unwrap();
        store.record(entry(2)).unwrap();

        let reopened = HistoryStore::new(FileStorage::new(dir.path()));
        let list = reopened.entries().unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].filename, "video_2.mp4");
    }
}
