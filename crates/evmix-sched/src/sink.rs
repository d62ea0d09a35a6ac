//! Record sinks
//!
//! A sink consumes stamped records in emission order. Rotation, framing
//! and transport are the sink's business; the scheduler only calls
//! `emit` and, at the end of a session, `finish`.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use evmix_core::{EmittedRecord, MixError, MixResult, RunNumber};

/// Consumer of stamped records
pub trait Sink {
    fn emit(&mut self, record: EmittedRecord) -> MixResult<()>;

    /// Flush and release resources at the end of a session
    fn finish(&mut self) -> MixResult<()> {
        Ok(())
    }
}

impl<S: Sink + ?Sized> Sink for &mut S {
    fn emit(&mut self, record: EmittedRecord) -> MixResult<()> {
        (**self).emit(record)
    }

    fn finish(&mut self) -> MixResult<()> {
        (**self).finish()
    }
}

impl<S: Sink + ?Sized> Sink for Box<S> {
    fn emit(&mut self, record: EmittedRecord) -> MixResult<()> {
        (**self).emit(record)
    }

    fn finish(&mut self) -> MixResult<()> {
        (**self).finish()
    }
}

/// Collects records in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Vec<EmittedRecord>,
    finished: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[EmittedRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<EmittedRecord> {
        self.records
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl Sink for MemorySink {
    fn emit(&mut self, record: EmittedRecord) -> MixResult<()> {
        self.records.push(record);
        Ok(())
    }

    fn finish(&mut self) -> MixResult<()> {
        self.finished = true;
        Ok(())
    }
}

/// JSON-lines file sink, one file per run: `<prefix>_<run>.<ext>`
pub struct RotatingFileSink {
    prefix: String,
    extension: String,
    current: Option<(RunNumber, BufWriter<File>)>,
    written: Vec<PathBuf>,
}

impl RotatingFileSink {
    pub fn new(prefix: impl Into<String>, extension: impl Into<String>) -> Self {
        RotatingFileSink {
            prefix: prefix.into(),
            extension: extension.into(),
            current: None,
            written: Vec::new(),
        }
    }

    /// File name used for `run`
    pub fn path_for(&self, run: RunNumber) -> PathBuf {
        PathBuf::from(format!("{}_{}.{}", self.prefix, run, self.extension))
    }

    /// Files opened so far, in order
    pub fn files(&self) -> &[PathBuf] {
        &self.written
    }

    fn writer_for(&mut self, run: RunNumber) -> MixResult<&mut BufWriter<File>> {
        let rotate = !matches!(&self.current, Some((open_run, _)) if *open_run == run);
        if rotate {
            if let Some((_, mut old)) = self.current.take() {
                old.flush()?;
            }
            let path = self.path_for(run);
            let file = File::create(&path)?;
            debug!(path = %path.display(), run = %run, "opened run output");
            self.written.push(path);
            self.current = Some((run, BufWriter::new(file)));
        }
        match &mut self.current {
            Some((_, writer)) => Ok(writer),
            None => Err(MixError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "run output not open",
            ))),
        }
    }
}

impl Sink for RotatingFileSink {
    fn emit(&mut self, record: EmittedRecord) -> MixResult<()> {
        let writer = self.writer_for(record.run)?;
        serde_json::to_writer(&mut *writer, &record)
            .map_err(|e| MixError::Serialization(e.to_string()))?;
        writer.write_all(b"\n")?;
        Ok(())
    }

    fn finish(&mut self) -> MixResult<()> {
        if let Some((_, mut writer)) = self.current.take() {
            writer.flush()?;
        }
        Ok(())
    }
}

impl Drop for RotatingFileSink {
    fn drop(&mut self) {
        if let Some((_, writer)) = self.current.as_mut() {
            let _ = writer.flush();
        }
    }
}

/// Read back a JSON-lines file written by `RotatingFileSink`
pub fn read_json_lines(path: &Path) -> MixResult<Vec<EmittedRecord>> {
    let text = std::fs::read_to_string(path)?;
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            serde_json::from_str(line).map_err(|e| MixError::Serialization(e.to_string()))
        })
        .collect()
}
