//! Export pipeline: CSV serialisation of history and analytics, and the
//! `download_blob` primitive every export goes through.
//!
//! Exports are plain [`ExportFile`] values. Where they end up is decided by a
//! [`DownloadSink`] passed to [`download_blob`]: the HTTP layer's
//! `ResponseSink` turns them into attachment responses, the CLI writes them
//! into a directory through [`FsDownloadSink`].

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::models::{DisplayZone, Sample, TimeRange};
use crate::routes::export::{
    analytics_filename, ANALYTICS_HEADER, CSV_CONTENT_TYPE, HISTORY_FILENAME, HISTORY_HEADER,
};
use crate::services::analytics::in_window;
use crate::services::csv::{encode_table, CsvValue};
use crate::services::history::HistoryStore;

/// Error type for export operations.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("I/O error while exporting {filename}: {source}")]
    Io {
        filename: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Chart rendering error: {0}")]
    Render(String),

    #[error("Invalid export filename: {0}")]
    InvalidFilename(String),
}

pub type ExportResult<T> = Result<T, ExportError>;

/// An in-memory file ready to be offered for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

impl ExportFile {
    pub fn new(filename: impl Into<String>, content_type: &'static str, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            content_type,
            bytes,
        }
    }

    /// Content as text. Lossy for binary payloads.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

// =============================================================================
// CSV exports
// =============================================================================

/// Every stored sample, ascending by timestamp.
///
/// Columns: `ts, iso, time, area, occupied, available`.
pub fn history_csv(store: &HistoryStore, zone: &DisplayZone) -> ExportFile {
    let rows = store.sorted_by_timestamp().into_iter().map(|sample| {
        vec![
            CsvValue::from(sample.timestamp),
            CsvValue::from(sample.iso_or_derived()),
            CsvValue::from(sample.time_or_derived(zone)),
            CsvValue::from(sample.area.as_str()),
            CsvValue::from(sample.occupied),
            CsvValue::from(sample.available),
        ]
    });
    let content = encode_table(&HISTORY_HEADER, rows);

    info!("Exported {} history rows", store.len());
    ExportFile::new(HISTORY_FILENAME, CSV_CONTENT_TYPE, content.into_bytes())
}

/// Samples inside `range`, ascending by timestamp, all area tags included.
///
/// Columns: `ts, when, area, occupied, available`.
pub fn analytics_csv(
    store: &HistoryStore,
    range: TimeRange,
    now_ms: i64,
    zone: &DisplayZone,
) -> ExportFile {
    let cutoff = range.cutoff(now_ms);
    let selected: Vec<&Sample> = store
        .sorted_by_timestamp()
        .into_iter()
        .filter(|s| in_window(s, cutoff))
        .collect();
    let row_count = selected.len();

    let rows = selected.into_iter().map(|sample| {
        vec![
            CsvValue::from(sample.timestamp),
            CsvValue::from(zone.format_when(sample.timestamp)),
            CsvValue::from(sample.area.as_str()),
            CsvValue::from(sample.occupied),
            CsvValue::from(sample.available),
        ]
    });
    let content = encode_table(&ANALYTICS_HEADER, rows);

    info!("Exported {} analytics rows for range {}", row_count, range);
    ExportFile::new(analytics_filename(range), CSV_CONTENT_TYPE, content.into_bytes())
}

// =============================================================================
// download_blob
// =============================================================================

/// Destination for downloads.
///
/// A download is: acquire a transient handle for the content, trigger it
/// once, release the handle. `release` is called exactly once per acquired
/// handle, whatever happened in between.
pub trait DownloadSink {
    type Handle;

    fn acquire(&mut self, file: &ExportFile) -> ExportResult<Self::Handle>;

    fn trigger(&mut self, handle: &Self::Handle, file: &ExportFile) -> ExportResult<()>;

    fn release(&mut self, handle: Self::Handle);
}

/// Releases the handle when dropped.
struct TransientHandle<'a, S: DownloadSink> {
    sink: &'a mut S,
    handle: Option<S::Handle>,
}

impl<S: DownloadSink> TransientHandle<'_, S> {
    fn trigger(&mut self, file: &ExportFile) -> ExportResult<()> {
        match self.handle.as_ref() {
            Some(handle) => self.sink.trigger(handle, file),
            None => Ok(()),
        }
    }
}

impl<S: DownloadSink> Drop for TransientHandle<'_, S> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.sink.release(handle);
        }
    }
}

/// Offer `file` through `sink`.
pub fn download_blob<S: DownloadSink>(sink: &mut S, file: &ExportFile) -> ExportResult<()> {
    let handle = sink.acquire(file)?;
    let mut transient = TransientHandle {
        sink,
        handle: Some(handle),
    };
    transient.trigger(file)
}

/// Writes downloads into a directory.
///
/// Content is staged in a hidden `.<name>.partial` file and renamed into
/// place on trigger, so readers never observe half-written exports.
#[derive(Debug, Clone)]
pub struct FsDownloadSink {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl FsDownloadSink {
    /// Create a sink for `dir`, creating the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> ExportResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| ExportError::Io {
            filename: dir.display().to_string(),
            source,
        })?;
        Ok(Self {
            dir,
            written: Vec::new(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Files delivered so far, in order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    fn target(&self, filename: &str) -> ExportResult<PathBuf> {
        let plain = Path::new(filename)
            .file_name()
            .map(|name| name == filename)
            .unwrap_or(false);
        if !plain || filename.starts_with('.') {
            return Err(ExportError::InvalidFilename(filename.to_string()));
        }
        Ok(self.dir.join(filename))
    }
}

impl DownloadSink for FsDownloadSink {
    type Handle = PathBuf;

    fn acquire(&mut self, file: &ExportFile) -> ExportResult<PathBuf> {
        self.target(&file.filename)?;
        let staging = self.dir.join(format!(".{}.partial", file.filename));
        if let Err(source) = fs::write(&staging, &file.bytes) {
            self.release(staging);
            return Err(ExportError::Io {
                filename: file.filename.clone(),
                source,
            });
        }
        debug!("Staged {} bytes at {}", file.bytes.len(), staging.display());
        Ok(staging)
    }

    fn trigger(&mut self, staging: &PathBuf, file: &ExportFile) -> ExportResult<()> {
        let target = self.target(&file.filename)?;
        fs::rename(staging, &target).map_err(|source| ExportError::Io {
            filename: file.filename.clone(),
            source,
        })?;
        info!("Wrote {}", target.display());
        self.written.push(target);
        Ok(())
    }

    fn release(&mut self, staging: PathBuf) {
        if staging.exists() {
            if let Err(e) = fs::remove_file(&staging) {
                warn!("Failed to remove staging file {}: {}", staging.display(), e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_store() -> HistoryStore {
        let mut store = HistoryStore::new();
        store.replace(&vec![
            json!({"area": "B", "occupied": 1, "available": 9, "ts": 2000}),
            json!({"area": "A", "occupied": 3, "available": 7, "ts": 1000, "time": "9:00:00 AM"}),
        ]);
        store
    }

    #[test]
    fn test_history_csv_rows_sorted_and_complete() {
        let file = history_csv(&sample_store(), &DisplayZone::utc());
        assert_eq!(file.filename, "parking-history.csv");
        assert_eq!(file.content_type, CSV_CONTENT_TYPE);

        let text = file.text();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "ts,iso,time,area,occupied,available");
        assert_eq!(lines[1], "1000,1970-01-01T00:00:01.000Z,9:00:00 AM,A,3,7");
        assert_eq!(lines[2], "2000,1970-01-01T00:00:02.000Z,12:00:02 AM,B,1,9");
        assert!(lines.iter().all(|l| l.split(',').count() == 6));
        assert!(!text.ends_with('\n'));
    }

    #[test]
    fn test_history_csv_empty_store_is_header_only() {
        let file = history_csv(&HistoryStore::new(), &DisplayZone::utc());
        assert_eq!(file.text(), "ts,iso,time,area,occupied,available");
    }

    #[test]
    fn test_analytics_csv_filters_by_cutoff() {
        let mut store = HistoryStore::new();
        let now = 100 * crate::models::DAY_MS;
        store.replace(&vec![
            json!({"area": "A", "ts": now - 2 * crate::models::DAY_MS}),
            json!({"area": "X", "ts": now - 10, "occupied": 2, "available": 3}),
            json!({"area": "B", "ts": now - 20}),
        ]);
        let file = analytics_csv(&store, TimeRange::Day, now, &DisplayZone::utc());
        assert_eq!(file.filename, "analytics-24h.csv");

        let text = file.text();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "ts,when,area,occupied,available");
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains(",B,"));
        assert!(lines[2].contains(",X,2,3"));
        // `when` contains a comma, so it is quoted
        assert!(lines[1].contains("\"4/10/1970, 11:59:59 PM\""));
    }

    #[test]
    fn test_analytics_csv_filename_uses_canonical_key() {
        let store = sample_store();
        let file = analytics_csv(&store, TimeRange::from_key("nope"), 0, &DisplayZone::utc());
        assert_eq!(file.filename, "analytics-24h.csv");
        let file = analytics_csv(&store, TimeRange::Month, 0, &DisplayZone::utc());
        assert_eq!(file.filename, "analytics-30d.csv");
    }

    #[derive(Default)]
    struct RecordingSink {
        fail_trigger: bool,
        events: Vec<String>,
    }

    impl DownloadSink for RecordingSink {
        type Handle = String;

        fn acquire(&mut self, file: &ExportFile) -> ExportResult<String> {
            self.events.push(format!("acquire {}", file.filename));
            Ok(format!("blob:{}", file.filename))
        }

        fn trigger(&mut self, handle: &String, _file: &ExportFile) -> ExportResult<()> {
            self.events.push(format!("trigger {}", handle));
            if self.fail_trigger {
                return Err(ExportError::Render("trigger refused".to_string()));
            }
            Ok(())
        }

        fn release(&mut self, handle: String) {
            self.events.push(format!("release {}", handle));
        }
    }

    #[test]
    fn test_download_blob_acquire_trigger_release() {
        let mut sink = RecordingSink::default();
        let file = ExportFile::new("x.csv", CSV_CONTENT_TYPE, b"a".to_vec());
        download_blob(&mut sink, &file).unwrap();
        assert_eq!(
            sink.events,
            vec!["acquire x.csv", "trigger blob:x.csv", "release blob:x.csv"]
        );
    }

    #[test]
    fn test_download_blob_releases_on_failure() {
        let mut sink = RecordingSink {
            fail_trigger: true,
            ..Default::default()
        };
        let file = ExportFile::new("x.csv", CSV_CONTENT_TYPE, b"a".to_vec());
        assert!(download_blob(&mut sink, &file).is_err());
        assert_eq!(sink.events.last().map(String::as_str), Some("release blob:x.csv"));
    }

    #[test]
    fn test_fs_sink_writes_and_cleans_staging() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = FsDownloadSink::new(dir.path().join("out")).unwrap();
        let file = history_csv(&sample_store(), &DisplayZone::utc());

        download_blob(&mut sink, &file).unwrap();

        let target = dir.path().join("out").join("parking-history.csv");
        assert_eq!(std::fs::read(&target).unwrap(), file.bytes);
        assert_eq!(sink.written(), &[target]);
        let leftovers: Vec<_> = std::fs::read_dir(sink.dir())
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.file_name().to_string_lossy().ends_with(".partial"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_fs_sink_failed_staging_reports_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = FsDownloadSink::new(dir.path()).unwrap();
        // A directory in the staging slot makes the write fail
        std::fs::create_dir(dir.path().join(".x.csv.partial")).unwrap();
        let file = ExportFile::new("x.csv", CSV_CONTENT_TYPE, b"a".to_vec());

        let err = download_blob(&mut sink, &file).unwrap_err();
        assert!(matches!(err, ExportError::Io { ref filename, .. } if filename == "x.csv"));
        assert!(!dir.path().join("x.csv").exists());
        assert!(sink.written().is_empty());
    }

    #[test]
    fn test_fs_sink_rejects_path_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = FsDownloadSink::new(dir.path()).unwrap();
        let file = ExportFile::new("../escape.csv", CSV_CONTENT_TYPE, vec![]);
        assert!(matches!(
            download_blob(&mut sink, &file),
            Err(ExportError::InvalidFilename(_))
        ));
        assert!(sink.written().is_empty());
    }
}
