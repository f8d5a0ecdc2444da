use chrono::{Local, NaiveDateTime};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime};

use crate::error::{Result, ZipperError};

/// Deflate effort used for the archived entry.
pub const DEFAULT_COMPRESSION_LEVEL: i64 = 9;

/// Permission bits recorded in the entry's Unix attributes.
pub const DEFAULT_UNIX_MODE: u32 = 0o755;

/// Whether an entry of `size` bytes must be written with zip64 fields.
pub(crate) fn needs_zip64(size: u64) -> bool {
    size >= u64::from(u32::MAX)
}

/// The per-entry controls of an archive with a single member: its name,
/// modification time, deflate level and Unix mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryOptions {
    name: String,
    modified: NaiveDateTime,
    level: i64,
    unix_mode: u32,
}

impl EntryOptions {
    /// Options for archiving `source`. The entry is named by the path exactly
    /// as given, directory components included, and stamped with the
    /// current local time.
    pub fn for_source(source: &Path) -> Result<Self> {
        let name = source
            .to_str()
            .ok_or_else(|| ZipperError::EntryName {
                path: source.to_path_buf(),
            })?
            .to_string();

        Ok(Self {
            name,
            modified: Local::now().naive_local(),
            level: DEFAULT_COMPRESSION_LEVEL,
            unix_mode: DEFAULT_UNIX_MODE,
        })
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn with_modified(mut self, modified: NaiveDateTime) -> Self {
        self.modified = modified;
        self
    }

    #[cfg(test)]
    pub(crate) fn with_level(mut self, level: i64) -> Self {
        self.level = level;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn modified(&self) -> NaiveDateTime {
        self.modified
    }

    pub fn level(&self) -> i64 {
        self.level
    }

    pub fn unix_mode(&self) -> u32 {
        self.unix_mode
    }

    /// The modification time in the archive's own date format. Seconds are
    /// kept at the format's two second resolution.
    pub fn timestamp(&self) -> Result<DateTime> {
        DateTime::try_from(self.modified).map_err(|_| ZipperError::Timestamp {
            timestamp: self.modified,
        })
    }

    /// Writer options for an entry holding `size` bytes.
    pub(crate) fn file_options(&self, size: u64) -> Result<SimpleFileOptions> {
        Ok(SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(Some(self.level))
            .last_modified_time(self.timestamp()?)
            .unix_permissions(self.unix_mode)
            .large_file(needs_zip64(size)))
    }
}
