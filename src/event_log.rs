// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Grappling Simulation Suite ("The Mat") - Event Log
//
// One CSV row per fired step. The reader accepts anything the writer produced,
// so earlier runs can be aggregated again.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone};

use crate::error::{Result, SimError};
use crate::types::Event;

/// Column order of the log, matching the field order of [`Event`].
pub const HEADER: [&str; 10] = [
    "clock",
    "actor",
    "technique_id",
    "transition",
    "outcome",
    "hold",
    "pos_a",
    "pos_o",
    "score_a",
    "score_o",
];

/// `match_log_YYYYmmdd_HHMMSS.csv`
pub fn log_file_name<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("match_log_{}.csv", at.format("%Y%m%d_%H%M%S"))
}

pub fn write_events<W: io::Write>(writer: W, events: &[Event]) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record(HEADER).map_err(SimError::EventLog)?;
    for event in events {
        wtr.serialize(event).map_err(SimError::EventLog)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write the log to `path`, creating missing parent directories.
pub fn write_to_path(path: &Path, events: &[Event]) -> Result<PathBuf> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let file = fs::File::create(path)?;
    write_events(io::BufWriter::new(file), events)?;
    Ok(path.to_path_buf())
}

pub fn read_events<R: io::Read>(reader: R) -> Result<Vec<Event>> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    rdr.deserialize()
        .collect::<std::result::Result<Vec<Event>, _>>()
        .map_err(SimError::EventLog)
}

pub fn read_path(path: &Path) -> Result<Vec<Event>> {
    read_events(fs::File::open(path)?)
}
