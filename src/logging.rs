//! Daily CSV log files plus a stderr echo, behind the `log` facade.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Utc;
use chrono_tz::Tz;
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

use crate::config::LogConfig;

pub struct CsvLogger {
    dir: PathBuf,
    level: LevelFilter,
    timezone: Tz,
    echo: bool,
    write_lock: Mutex<()>,
}

impl CsvLogger {
    pub fn new(config: &LogConfig) -> Self {
        CsvLogger {
            dir: config.dir.clone(),
            level: config.level,
            timezone: config.timezone,
            echo: true,
            write_lock: Mutex::new(()),
        }
    }

    /// Disables the stderr echo, leaving only the CSV file.
    pub fn quiet(mut self) -> Self {
        self.echo = false;
        self
    }

    pub fn file_for_today(&self) -> PathBuf {
        let today = Utc::now().with_timezone(&self.timezone);
        self.dir.join(format!("logs-{}.csv", today.format("%Y-%m-%d")))
    }

    fn append(&self, level: Level, target: &str, message: &str) -> std::io::Result<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        fs::create_dir_all(&self.dir)?;
        let now = Utc::now().with_timezone(&self.timezone);
        let file = OpenOptions::new().append(true).create(true).open(self.file_for_today())?;

        let mut writer = csv::Writer::from_writer(file);
        writer
            .write_record([now.to_rfc3339().as_str(), level.as_str(), target, message])
            .map_err(std::io::Error::other)?;
        writer.flush()
    }
}

impl Log for CsvLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let message = record.args().to_string();
        // stdout is reserved for command output
        if self.echo {
            eprintln!("[{}] {}", record.level(), message);
        }
        if let Err(e) = self.append(record.level(), record.target(), &message) {
            eprintln!("Could not write log file in {}: {}", self.dir.display(), e);
        }
    }

    fn flush(&self) {}
}

/// Installs the CSV logger as the global logger.
pub fn init(config: &LogConfig) -> Result<(), SetLoggerError> {
    log::set_boxed_logger(Box::new(CsvLogger::new(config)))?;
    log::set_max_level(config.level);
    Ok(())
}

/// Reads back the rows of a log file; used by tooling and tests.
pub fn read_rows(path: &Path) -> Result<Vec<Vec<String>>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new().has_headers(false).from_path(path)?;
    reader
        .records()
        .map(|row| row.map(|r| r.iter().map(str::to_string).collect()))
        .collect()
}
