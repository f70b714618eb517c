use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use zip::result::ZipError;
use zip::ZipArchive;

use crate::error::Error;

/// File name of the grouped UCD archive inside the data directory.
pub const UCD_ARCHIVE: &str = "ucd.all.grouped.zip";

/// Name of the XML entry inside [`UCD_ARCHIVE`].
pub const UCD_ENTRY: &str = "ucd.all.grouped.xml";

/// An open zip archive. The underlying file handle is released on drop.
pub struct Archive {
    path: PathBuf,
    zip: ZipArchive<BufReader<File>>,
}

impl std::fmt::Debug for Archive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Archive")
            .field("path", &self.path)
            .field("entries", &self.zip.len())
            .finish()
    }
}

impl Archive {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path)
            .map_err(|e| Error::io(format!("open archive {}", path.display()), e))?;
        let zip = ZipArchive::new(BufReader::new(file)).map_err(|e| match Error::from(e) {
            Error::Io { source, .. } => Error::io(format!("read archive {}", path.display()), source),
            other => other,
        })?;
        tracing::debug!(path = %path.display(), entries = zip.len(), "opened archive");
        Ok(Self { path, zip })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Hands the decompressed stream of entry `name` to `f`.
    ///
    /// Returns `Ok(None)` when the archive has no such entry. The entry
    /// stream only lives for the duration of the call.
    pub fn with_entry<T, F>(&mut self, name: &str, f: F) -> Result<Option<T>, Error>
    where
        F: FnOnce(&mut dyn Read) -> Result<T, Error>,
    {
        let mut entry = match self.zip.by_name(name) {
            Ok(entry) => entry,
            Err(ZipError::FileNotFound) => {
                tracing::warn!(
                    archive = %self.path.display(),
                    entry = name,
                    "entry not found in archive"
                );
                return Ok(None);
            }
            Err(e) => {
                return Err(match Error::from(e) {
                    Error::Io { source, .. } => Error::io(format!("open entry {}", name), source),
                    other => other,
                })
            }
        };
        tracing::debug!(entry = name, size = entry.size(), "reading entry");
        f(&mut entry).map(Some)
    }

    /// Reads entry `name` fully into memory.
    pub fn read_entry(&mut self, name: &str) -> Result<Option<Vec<u8>>, Error> {
        self.with_entry(name, |reader| {
            let mut buf = Vec::new();
            reader
                .read_to_end(&mut buf)
                .map_err(|e| Error::io(format!("read entry {}", name), e))?;
            Ok(buf)
        })
    }
}
