//! Flat-file backup and export writers.
//!
//! # Responsibility
//! - Append one backup row per stored participant.
//! - Render the operator export of the full participant list.
//!
//! # Invariants
//! - The backup file is append-only; its header is written once, when the
//!   file is new or empty.
//! - Fields containing `,`, `"`, CR or LF are quoted with inner quotes doubled.

use crate::model::participant::Participant;
use csv::{Terminator, WriterBuilder};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Header row of the append-only backup file.
pub const BACKUP_HEADER: [&str; 8] = [
    "uid",
    "name",
    "email",
    "phone",
    "college",
    "dept",
    "year",
    "created_at",
];

/// Header row of operator exports.
pub const EXPORT_HEADER: [&str; 8] = [
    "UID",
    "Name",
    "Email",
    "Phone",
    "College",
    "Dept",
    "Year",
    "Created At",
];

#[derive(Debug)]
pub enum ExportError {
    Io { path: PathBuf, source: std::io::Error },
    /// Row encoding failure; `path` is `None` for in-memory renders.
    Csv {
        path: Option<PathBuf>,
        source: csv::Error,
    },
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to write `{}`: {source}", path.display())
            }
            Self::Csv {
                path: Some(path),
                source,
            } => write!(f, "failed to encode rows for `{}`: {source}", path.display()),
            Self::Csv { path: None, source } => write!(f, "failed to encode rows: {source}"),
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Csv { source, .. } => Some(source),
        }
    }
}

/// Appends `participant` to the backup file at `path`.
pub fn append_backup(path: impl AsRef<Path>, participant: &Participant) -> Result<(), ExportError> {
    let path = path.as_ref();
    let io_error = |source: std::io::Error| ExportError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(io_error)?;
    let needs_header = file.metadata().map_err(io_error)?.len() == 0;

    let result = write_rows(
        WriterBuilder::new()
            .terminator(Terminator::CRLF)
            .from_writer(file),
        needs_header.then_some(BACKUP_HEADER),
        std::slice::from_ref(participant),
    );
    if let Err(source) = result {
        error!(
            "event=backup_append module=export status=error uid={} error={}",
            participant.uid, source
        );
        return Err(ExportError::Csv {
            path: Some(path.to_path_buf()),
            source,
        });
    }
    info!(
        "event=backup_append module=export status=ok uid={}",
        participant.uid
    );
    Ok(())
}

/// Renders the export document for `participants`, header first.
pub fn render_export(participants: &[Participant]) -> Result<String, ExportError> {
    let mut buffer = Vec::new();
    write_rows(
        WriterBuilder::new()
            .terminator(Terminator::CRLF)
            .from_writer(&mut buffer),
        Some(EXPORT_HEADER),
        participants,
    )
    .map_err(|source| ExportError::Csv { path: None, source })?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Writes (truncating) an export of `participants` to `path`.
pub fn write_export(path: impl AsRef<Path>, participants: &[Participant]) -> Result<(), ExportError> {
    let path = path.as_ref();
    let writer = WriterBuilder::new()
        .terminator(Terminator::CRLF)
        .from_path(path)
        .map_err(|source| ExportError::Csv {
            path: Some(path.to_path_buf()),
            source,
        })?;
    write_rows(writer, Some(EXPORT_HEADER), participants).map_err(|source| ExportError::Csv {
        path: Some(path.to_path_buf()),
        source,
    })?;
    info!(
        "event=export_write module=export status=ok count={}",
        participants.len()
    );
    Ok(())
}

fn write_rows<W: Write>(
    mut writer: csv::Writer<W>,
    header: Option<[&str; 8]>,
    participants: &[Participant],
) -> csv::Result<()> {
    if let Some(header) = header {
        writer.write_record(header)?;
    }
    for participant in participants {
        writer.write_record(participant.columns())?;
    }
    writer.flush()?;
    Ok(())
}
