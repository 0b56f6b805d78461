//! Append-only CSV log file
//!
//! One file per run. The header is written only when the file is empty, so
//! reopening an existing log never duplicates it. Every row is flushed as soon
//! as it is written; a power cut loses at most the cycle in progress.

use std::fmt::Display;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use vocmux_core::{CsvHeader, CsvRecord, PORT_COUNT};

use crate::error::AppError;

pub struct CsvLog<const PORTS: usize = PORT_COUNT> {
    writer: BufWriter<File>,
    path: PathBuf,
}

impl<const PORTS: usize> CsvLog<PORTS> {
    /// Open (or create) the log at `path`, creating parent directories.
    pub fn open(path: &Path) -> Result<Self, AppError> {
        let open_error = |e: io::Error| AppError::LogFileUnavailable {
            path: path.display().to_string(),
            kind: e.kind(),
        };

        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(open_error)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(open_error)?;
        let is_empty = file.metadata().map_err(open_error)?.len() == 0;

        let mut log = Self {
            writer: BufWriter::new(file),
            path: path.to_path_buf(),
        };
        if is_empty {
            log.write_line(&CsvHeader::<PORTS>).map_err(open_error)?;
        }
        Ok(log)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one finished record as a line and flush it to disk.
    pub fn append(&mut self, record: &CsvRecord<PORTS>) -> Result<(), AppError> {
        self.write_line(record).map_err(|e| AppError::LogWrite {
            path: self.path.display().to_string(),
            kind: e.kind(),
        })
    }

    fn write_line(&mut self, line: &dyn Display) -> io::Result<()> {
        writeln!(self.writer, "{}", line)?;
        self.writer.flush()
    }
}
