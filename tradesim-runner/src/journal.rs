//! CSV journals for ticks and resolved orders.
//!
//! Both journals create missing parent directories, truncate the file, and
//! write a header at open. Failing to open is fatal; a failed record write is
//! returned as a `JournalError` and the engine keeps going.
//!
//! Tick columns: Time, Price, Volume (time as `HH:MM:SS.mmm` since start)
//! Order columns: Side, Price, Volume, ReplyStatus, ErrorText, PnL

use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;
use tradesim_core::domain::Tick;
use tradesim_core::journal::{JournalError, OrderRecord, OrderSink, TickSink};

pub const TICK_HEADER: [&str; 3] = ["Time", "Price", "Volume"];
pub const ORDER_HEADER: [&str; 6] = ["Side", "Price", "Volume", "ReplyStatus", "ErrorText", "PnL"];

/// A journal could not be opened. Nothing is usable after this.
#[derive(Debug, Error)]
pub enum JournalOpenError {
    #[error("{journal}: error on folder creation for path {}: {source}", path.display())]
    CreateDir {
        journal: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{journal}: error on file open for path {}: {source}", path.display())]
    Open {
        journal: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{journal}: error writing header to {}: {source}", path.display())]
    Header {
        journal: &'static str,
        path: PathBuf,
        source: csv::Error,
    },
}

/// Format elapsed simulation time as `HH:MM:SS.mmm`, truncated to milliseconds.
///
/// Hours keep counting past 24.
pub fn format_elapsed(elapsed: Duration) -> String {
    let ms = elapsed.as_millis();
    let hours = ms / 3_600_000;
    let minutes = (ms / 60_000) % 60;
    let seconds = (ms / 1_000) % 60;
    let millis = ms % 1_000;
    format!("{hours:02}:{minutes:02}:{seconds:02}.{millis:03}")
}

/// Shared CSV plumbing: open with header, write-and-flush per record.
struct CsvJournal {
    name: &'static str,
    path: PathBuf,
    writer: csv::Writer<File>,
}

impl CsvJournal {
    fn open(name: &'static str, path: &Path, header: &[&str]) -> Result<Self, JournalOpenError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| JournalOpenError::CreateDir {
                journal: name,
                path: path.to_path_buf(),
                source,
            })?;
        }

        let file = File::create(path).map_err(|source| JournalOpenError::Open {
            journal: name,
            path: path.to_path_buf(),
            source,
        })?;

        let mut writer = csv::Writer::from_writer(file);
        let header_err = |source| JournalOpenError::Header {
            journal: name,
            path: path.to_path_buf(),
            source,
        };
        writer.write_record(header).map_err(header_err)?;
        writer
            .flush()
            .map_err(|e| header_err(csv::Error::from(e)))?;

        tracing::debug!(journal = name, path = %path.display(), "journal opened");

        Ok(Self {
            name,
            path: path.to_path_buf(),
            writer,
        })
    }

    fn append(&mut self, record: &[String]) -> Result<(), JournalError> {
        self.writer
            .write_record(record)
            .map_err(|e| JournalError::write(self.name, e))?;
        self.writer
            .flush()
            .map_err(|e| JournalError::write(self.name, e))
    }
}

pub struct TickCsvJournal {
    inner: CsvJournal,
}

impl TickCsvJournal {
    pub fn open(path: &Path) -> Result<Self, JournalOpenError> {
        Ok(Self {
            inner: CsvJournal::open("TickJournal", path, &TICK_HEADER)?,
        })
    }

    pub fn path(&self) -> &Path {
        &self.inner.path
    }
}

impl TickSink for TickCsvJournal {
    fn write_tick(&mut self, tick: &Tick) -> Result<(), JournalError> {
        self.inner.append(&[
            format_elapsed(tick.timestamp),
            format!("{:.3}", tick.price),
            format!("{:.3}", tick.volume),
        ])
    }
}

pub struct OrderCsvJournal {
    inner: CsvJournal,
}

impl OrderCsvJournal {
    pub fn open(path: &Path) -> Result<Self, JournalOpenError> {
        Ok(Self {
            inner: CsvJournal::open("OrderJournal", path, &ORDER_HEADER)?,
        })
    }

    pub fn path(&self) -> &Path {
        &self.inner.path
    }
}

impl OrderSink for OrderCsvJournal {
    fn write_order(&mut self, record: &OrderRecord) -> Result<(), JournalError> {
        self.inner.append(&[
            record.side.to_string(),
            format!("{:.3}", record.price),
            format!("{:.3}", record.volume),
            record.status.to_string(),
            record.error_text.clone(),
            format!("{:.3}", record.total_pnl),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tradesim_core::domain::{OrderSide, ReplyStatus};

    fn read_lines(path: &Path) -> Vec<String> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(String::from)
            .collect()
    }

    #[test]
    fn elapsed_formatting() {
        assert_eq!(format_elapsed(Duration::ZERO), "00:00:00.000");
        assert_eq!(format_elapsed(Duration::from_millis(100)), "00:00:00.100");
        assert_eq!(format_elapsed(Duration::from_micros(1_999)), "00:00:00.001");
        assert_eq!(
            format_elapsed(Duration::from_millis(3_723_456)),
            "01:02:03.456"
        );
        assert_eq!(format_elapsed(Duration::from_secs(25 * 3600)), "25:00:00.000");
    }

    #[test]
    fn tick_journal_writes_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ticks.csv");
        let mut journal = TickCsvJournal::open(&path).unwrap();
        assert_eq!(read_lines(&path), vec!["Time,Price,Volume"]);

        journal
            .write_tick(&Tick::new(Duration::from_millis(1_250), 101.23456, 7.0))
            .unwrap();
        assert_eq!(
            read_lines(&path),
            vec!["Time,Price,Volume", "00:00:01.250,101.235,7.000"]
        );
    }

    #[test]
    fn order_journal_writes_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orders.csv");
        let mut journal = OrderCsvJournal::open(&path).unwrap();

        journal
            .write_order(&OrderRecord {
                side: OrderSide::Sell,
                price: 99.5,
                volume: 12.0,
                status: ReplyStatus::Rejected,
                error_text: "Random rejection".into(),
                total_pnl: -3.14159,
            })
            .unwrap();

        assert_eq!(
            read_lines(&path),
            vec![
                "Side,Price,Volume,ReplyStatus,ErrorText,PnL",
                "Sell,99.500,12.000,Rejected,Random rejection,-3.142",
            ]
        );
    }

    #[test]
    fn open_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a").join("b").join("ticks.csv");
        let journal = TickCsvJournal::open(&path).unwrap();
        assert_eq!(journal.path(), path.as_path());
        assert!(path.exists());
    }

    #[test]
    fn open_truncates_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orders.csv");
        std::fs::write(&path, "stale\nrows\n").unwrap();
        OrderCsvJournal::open(&path).unwrap();
        assert_eq!(read_lines(&path).len(), 1);
    }

    #[test]
    fn open_fails_when_parent_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let err = TickCsvJournal::open(&blocker.join("ticks.csv")).err().unwrap();
        assert!(matches!(err, JournalOpenError::CreateDir { .. }));
    }

    #[test]
    fn open_fails_when_path_is_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = OrderCsvJournal::open(dir.path()).err().unwrap();
        assert!(matches!(
            err,
            JournalOpenError::Open { .. } | JournalOpenError::CreateDir { .. }
        ));
    }
}
