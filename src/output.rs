//! Rendering of the received message: file export, field selection, or a
//! full dump.

use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::{ExportFormat, OutputMode};
use crate::errors::{GenericError, SqsSlurpError};
use crate::message::{Message, MessageField};

/// What a call to [`render`] produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    Exported { path: PathBuf },
    Printed { fields: usize },
    Dumped,
}

/// Renders `message` according to `mode`. Console output goes to `out`.
pub fn render<W: Write>(
    message: &Message,
    mode: &OutputMode,
    out: &mut W,
) -> Result<Rendered, SqsSlurpError> {
    match mode {
        OutputMode::Export { format, path } => {
            export(message, *format, path)?;
            Ok(Rendered::Exported { path: path.clone() })
        }
        OutputMode::SelectFields { names } => {
            let fields = print_fields(message, names, out)?;
            Ok(Rendered::Printed { fields })
        }
        OutputMode::Dump => {
            dump(message, out)?;
            Ok(Rendered::Dumped)
        }
    }
}

/// Writes the whole message to `path` in `format`.
///
/// The destination either receives the complete serialized message or is left
/// untouched. Bytes go to a staging file next to `path`, which is renamed into
/// place only after the write has been flushed to disk.
pub fn export(message: &Message, format: ExportFormat, path: &Path) -> Result<(), SqsSlurpError> {
    let bytes = match format {
        ExportFormat::Json => serde_json::to_vec(message).map_err(|e| {
            GenericError::new(format!("failed to serialize message as json: {e}"))
        })?,
    };

    let staging = StagingFile::for_destination(path);
    write_file(staging.path(), &bytes)?;
    staging.commit(path)?;

    info!(path = %path.display(), bytes = bytes.len(), %format, "exported message");
    Ok(())
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<(), SqsSlurpError> {
    let io_error = |e: std::io::Error| {
        SqsSlurpError::from(GenericError::new(format!(
            "failed to write {}: {e}",
            path.display()
        )))
    };

    let mut file = File::create(path).map_err(io_error)?;
    file.write_all(bytes).map_err(io_error)?;
    file.sync_all().map_err(io_error)?;
    Ok(())
}

/// Removes the staging file on drop unless it was committed.
struct StagingFile {
    path: PathBuf,
    committed: bool,
}

impl StagingFile {
    fn for_destination(destination: &Path) -> Self {
        let file_name = destination
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "export".to_string());
        let path = destination.with_file_name(format!(".{file_name}.partial"));
        StagingFile {
            path,
            committed: false,
        }
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn commit(mut self, destination: &Path) -> Result<(), SqsSlurpError> {
        fs::rename(&self.path, destination).map_err(|e| {
            GenericError::new(format!(
                "failed to move export into place at {}: {e}",
                destination.display()
            ))
        })?;
        self.committed = true;
        Ok(())
    }
}

impl Drop for StagingFile {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        if let Err(e) = fs::remove_file(&self.path) {
            if e.kind() != ErrorKind::NotFound {
                warn!(path = %self.path.display(), error = %e, "failed to remove staging file");
            }
        }
    }
}

/// Prints one `Name: value` line per requested field that exists on a message.
///
/// Lines follow the order of `names`. Names that are not message fields are
/// skipped. Returns the number of lines written.
pub fn print_fields<W: Write>(
    message: &Message,
    names: &[String],
    out: &mut W,
) -> Result<usize, SqsSlurpError> {
    let mut printed = 0;
    for name in names {
        let Some(field) = MessageField::from_name(name) else {
            debug!(field = %name, "skipping unknown message field");
            continue;
        };
        writeln!(out, "{}: {}", field.name(), render_value(&field.value(message)))
            .map_err(stdout_error)?;
        printed += 1;
    }
    Ok(printed)
}

/// Writes the whole message as pretty-printed JSON.
pub fn dump<W: Write>(message: &Message, out: &mut W) -> Result<(), SqsSlurpError> {
    let json = serde_json::to_string_pretty(message)
        .map_err(|e| GenericError::new(format!("failed to serialize message: {e}")))?;
    writeln!(out, "{json}").map_err(stdout_error)?;
    Ok(())
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn stdout_error(e: std::io::Error) -> SqsSlurpError {
    GenericError::new(format!("failed to write output: {e}")).into()
}
