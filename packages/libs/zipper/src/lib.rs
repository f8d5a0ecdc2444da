//! Packs a single file into a deflate-compressed zip archive and removes
//! the original.
//!
//! The archive holds exactly one entry, named by the source path as given,
//! stamped with the local time and marked as a `0755` regular file created
//! on Unix.
use log::{debug, info};
use std::fs::{self, File};
use std::io::{Cursor, Seek, Write};
use std::path::{Path, PathBuf};
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

pub mod entry;
pub mod error;

pub use entry::{EntryOptions, DEFAULT_COMPRESSION_LEVEL, DEFAULT_UNIX_MODE};
pub use error::{Result, ZipperError};

/// Write `source` into a new archive at `archive_path`, then delete `source`.
///
/// The source is read before the archive is created, so a missing source
/// leaves no archive behind. If the removal fails the archive is kept.
pub fn archive_and_remove(archive_path: &Path, source_path: &Path) -> Result<Compressed> {
    Zipper::new(archive_path)
        .zip(source_path)?
        .compress()?
        .remove_source()
}

/// Names the archive to be written.
pub struct Zipper {
    archive: PathBuf,
}

impl Zipper {
    pub fn new(archive: &Path) -> Self {
        Self {
            archive: archive.to_path_buf(),
        }
    }

    /// Bind the file to archive, with the default entry options for it.
    pub fn zip(&self, source: &Path) -> Result<Zip> {
        Ok(Zip {
            archive: self.archive.clone(),
            source: source.to_path_buf(),
            options: EntryOptions::for_source(source)?,
        })
    }
}

/// A source file ready to be written into its archive.
pub struct Zip {
    archive: PathBuf,
    source: PathBuf,
    options: EntryOptions,
}

impl Zip {
    pub fn with_options(mut self, options: EntryOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &EntryOptions {
        &self.options
    }

    /// Create (or truncate) the archive file and write the entry into it.
    /// The source file is left in place.
    pub fn compress(&self) -> Result<Compressed> {
        let data = self.read_source()?;
        let options = self.options.file_options(data.len() as u64)?;

        debug!("creating archive {}", self.archive.display());
        let file = File::create(&self.archive).map_err(|source| ZipperError::Create {
            path: self.archive.clone(),
            source,
        })?;
        self.write_entry(file, options, &data)?;

        info!(
            "archived {} ({} bytes) into {}",
            self.options.name(),
            data.len(),
            self.archive.display()
        );
        Ok(Compressed {
            archive: self.archive.clone(),
            source: self.source.clone(),
            entry_name: self.options.name().to_string(),
            size: data.len() as u64,
            source_removed: false,
        })
    }

    /// The archive bytes, built in memory. Neither the archive path nor the
    /// source file is touched.
    pub fn memory(&self) -> Result<Vec<u8>> {
        let data = self.read_source()?;
        let options = self.options.file_options(data.len() as u64)?;
        let cursor = self.write_entry(Cursor::new(Vec::new()), options, &data)?;
        Ok(cursor.into_inner())
    }

    fn read_source(&self) -> Result<Vec<u8>> {
        debug!("reading {}", self.source.display());
        fs::read(&self.source).map_err(|source| ZipperError::Read {
            path: self.source.clone(),
            source,
        })
    }

    fn write_entry<W: Write + Seek>(
        &self,
        writer: W,
        options: SimpleFileOptions,
        data: &[u8],
    ) -> Result<W> {
        let write_err = |source: ZipError| ZipperError::Write {
            path: self.archive.clone(),
            source,
        };

        let mut zip = ZipWriter::new(writer);
        zip.start_file(self.options.name(), options)
            .map_err(write_err)?;
        zip.write_all(data)
            .map_err(|e| write_err(ZipError::Io(e)))?;
        zip.finish().map_err(write_err)
    }
}

/// An archive that has been written to disk.
#[derive(Debug)]
pub struct Compressed {
    archive: PathBuf,
    source: PathBuf,
    entry_name: String,
    size: u64,
    source_removed: bool,
}

impl Compressed {
    /// Delete the source file. Nothing is rolled back on failure: the
    /// archive stays alongside the original.
    pub fn remove_source(mut self) -> Result<Self> {
        debug!("removing {}", self.source.display());
        fs::remove_file(&self.source).map_err(|source| ZipperError::Remove {
            path: self.source.clone(),
            source,
        })?;
        self.source_removed = true;
        Ok(self)
    }

    pub fn archive(&self) -> &Path {
        &self.archive
    }

    pub fn entry_name(&self) -> &str {
        &self.entry_name
    }

    /// Uncompressed size of the entry in bytes.
    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn source_removed(&self) -> bool {
        self.source_removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zip::ZipArchive;

    fn compressed_size(zip: &Zip) -> u64 {
        let bytes = zip.memory().unwrap();
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let entry = archive.by_index(0).unwrap();
        entry.compressed_size()
    }

    // Word salad with long-range repeats.
    fn log_lines() -> Vec<u8> {
        let words = [
            "weight", "kg", "fat", "water", "bone", "muscle", "bmi", "visceral", "scale",
            "garmin", "fitbit", "zepp", "user", "date", "sync", "ok",
        ];
        let mut state: u32 = 0x2545_f491;
        let mut out = String::new();
        for line in 0..4000 {
            out.push_str(&format!("{line};"));
            for _ in 0..8 {
                state ^= state << 13;
                state ^= state >> 17;
                state ^= state << 5;
                out.push_str(words[(state % words.len() as u32) as usize]);
                out.push(' ');
            }
            out.push('\n');
        }
        out.into_bytes()
    }

    #[test]
    fn default_level_beats_fastest_level() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("scale.log");
        fs::write(&source, log_lines()).unwrap();

        let zip = Zipper::new(&dir.path().join("scale.zip")).zip(&source).unwrap();
        assert_eq!(zip.options().level(), 9);
        let best = compressed_size(&zip);

        let fast_options = zip.options().clone().with_level(1);
        let fastest = compressed_size(&zip.with_options(fast_options));

        assert!(best < fastest, "level 9: {best} bytes, level 1: {fastest} bytes");
    }
}
