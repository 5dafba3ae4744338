//! # Report Recorder
//!
//! Writes per-frame pad reports as JSON Lines, one record per device per
//! frame:
//!
//! ```text
//! {"timestamp":"2024-05-01T12:00:00.000000Z","frame":42,"device":"pipe1","report":[1,0,127,129,0,0,255,0]}
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use tracing::info;

use crate::error::Result;
use crate::pipes::report::PadReport;

/// One recorded report.
#[derive(Debug, Serialize)]
pub struct ReportRecord<'a> {
    pub timestamp: String,
    pub frame: u64,
    pub device: &'a str,
    pub report: PadReport,
}

impl<'a> ReportRecord<'a> {
    pub fn new(frame: u64, device: &'a str, report: PadReport) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
            frame,
            device,
            report,
        }
    }
}

/// Appending JSONL writer.
pub struct ReportRecorder<W: Write> {
    writer: W,
    records: u64,
}

impl ReportRecorder<BufWriter<File>> {
    /// Open `path` for appending, creating parent directories as needed.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        info!("Recording pad reports to {}", path.display());
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> ReportRecorder<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, records: 0 }
    }

    /// Write one record per device for `frame`.
    pub fn record_frame<'a, I>(&mut self, frame: u64, reports: I) -> Result<()>
    where
        I: IntoIterator<Item = (&'a str, PadReport)>,
    {
        for (device, report) in reports {
            let record = ReportRecord::new(frame, device, report);
            serde_json::to_writer(&mut self.writer, &record)?;
            self.writer.write_all(b"\n")?;
            self.records += 1;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    /// Records written so far.
    pub fn records(&self) -> u64 {
        self.records
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipes::report::Button;
    use tempfile::tempdir;

    #[test]
    fn test_record_frame_jsonl() {
        let mut report = PadReport::new();
        report.set_button(Button::A, true);

        let mut recorder = ReportRecorder::new(Vec::new());
        recorder
            .record_frame(7, [("pipe1", report), ("pipe2", PadReport::new())])
            .unwrap();
        assert_eq!(recorder.records(), 2);

        let output = String::from_utf8(recorder.into_inner()).unwrap();
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["frame"], 7);
        assert_eq!(first["device"], "pipe1");
        assert_eq!(first["report"], serde_json::json!([1, 0, 0, 0, 0, 0, 0, 0]));
        assert!(chrono::DateTime::parse_from_rfc3339(first["timestamp"].as_str().unwrap()).is_ok());
    }

    #[test]
    fn test_open_creates_parent_dirs_and_appends() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("logs").join("reports.jsonl");

        for frame in 0..2 {
            let mut recorder = ReportRecorder::open(&path).unwrap();
            recorder.record_frame(frame, [("pipe1", PadReport::new())]).unwrap();
            recorder.flush().unwrap();
        }

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 2);
    }
}
