//! Type-tagged JSON archives for predictors.
//!
//! An [`Archive`] is an envelope holding a stable type name, a format
//! version and the serialized body. [`write`] and [`read`] convert between
//! an [`Archivable`] value and its envelope.

use std::io::{self, Read, Write};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Newest archive version this crate reads and the one it writes.
pub const ARCHIVE_VERSION: u32 = 1;

/// Errors raised while writing or reading archives.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// Archive was written for a different type.
    #[error("archive holds '{found}', expected '{expected}'")]
    TypeMismatch {
        /// Type the reader asked for.
        expected: &'static str,
        /// Type recorded in the archive.
        found: String,
    },

    /// Archive was written by a newer format version.
    #[error("unsupported archive version {found} (newest supported is {supported})")]
    UnsupportedVersion {
        /// Version recorded in the archive.
        found: u32,
        /// Newest readable version.
        supported: u32,
    },

    /// No reader is registered for the recorded type.
    #[error("unknown predictor type '{0}'")]
    UnknownType(String),

    /// Body or envelope is not valid JSON for the target type.
    #[error("malformed archive: {0}")]
    Json(#[from] serde_json::Error),

    /// Underlying reader or writer failed.
    #[error("archive I/O failed: {0}")]
    Io(#[from] io::Error),
}

/// A value with a stable type name and a serde representation.
pub trait Archivable: Serialize + DeserializeOwned {
    /// Name recorded in archives; must never change once published.
    const TYPE_NAME: &'static str;
}

/// Serialized predictor together with its type tag and format version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Archive {
    /// Stable type name of the archived value.
    #[serde(rename = "type")]
    pub type_name: String,
    /// Format version the archive was written with.
    pub version: u32,
    /// Type-specific payload.
    pub body: serde_json::Value,
}

impl Archive {
    /// Render as pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String, ArchiveError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse an archive from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self, ArchiveError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Write pretty-printed JSON followed by a newline.
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<(), ArchiveError> {
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }

    /// Read an archive from a JSON stream.
    pub fn read_from<R: Read>(reader: R) -> Result<Self, ArchiveError> {
        Ok(serde_json::from_reader(reader)?)
    }

    fn check_version(&self) -> Result<(), ArchiveError> {
        if self.version > ARCHIVE_VERSION {
            return Err(ArchiveError::UnsupportedVersion {
                found: self.version,
                supported: ARCHIVE_VERSION,
            });
        }
        Ok(())
    }
}

/// Archive `value` under its type name.
pub fn write<T: Archivable>(value: &T) -> Result<Archive, ArchiveError> {
    Ok(Archive {
        type_name: T::TYPE_NAME.to_string(),
        version: ARCHIVE_VERSION,
        body: serde_json::to_value(value)?,
    })
}

/// Restore a `T` from an archive written for `T`.
pub fn read<T: Archivable>(archive: &Archive) -> Result<T, ArchiveError> {
    archive.check_version()?;
    if archive.type_name != T::TYPE_NAME {
        return Err(ArchiveError::TypeMismatch {
            expected: T::TYPE_NAME,
            found: archive.type_name.clone(),
        });
    }
    Ok(T::deserialize(&archive.body)?)
}
