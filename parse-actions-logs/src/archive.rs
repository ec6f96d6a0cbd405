//! Reading job logs out of a workflow run archive.
//!
//! An archive downloaded for a workflow run holds one directory per job with
//! that job's step logs inside. The files at the top level repeat the same
//! output, so only members below a directory are read.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use zip::result::ZipError;
use zip::ZipArchive;

/// Upper bound on the buffer reserved up front for a member. The size in the
/// zip header is not trusted beyond this; larger logs grow while reading.
const MAX_PREALLOC: u64 = 16 * 1024 * 1024;

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("Failed to open zip file {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: ZipError,
    },

    #[error("Failed to open zipped file #{index}: {source}")]
    OpenMember {
        index: usize,
        #[source]
        source: ZipError,
    },

    #[error("Failed to read zipped file {name}: {source}")]
    ReadMember {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

pub type ArchiveResult<T> = Result<T, ArchiveError>;

/// One job log read from an archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Path of the member inside the archive, e.g. `build (linux)/3_Run tests.txt`
    pub name: String,
    pub content: Vec<u8>,
}

pub struct ArchiveReader {
    path: PathBuf,
    archive: ZipArchive<File>,
}

impl ArchiveReader {
    pub fn open(path: impl AsRef<Path>) -> ArchiveResult<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|e| ArchiveError::Open {
            path: path.clone(),
            source: ZipError::Io(e),
        })?;
        let archive = ZipArchive::new(file).map_err(|source| ArchiveError::Open {
            path: path.clone(),
            source,
        })?;

        Ok(Self { path, archive })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of members in the archive, including skipped ones
    pub fn len(&self) -> usize {
        self.archive.len()
    }

    pub fn is_empty(&self) -> bool {
        self.archive.len() == 0
    }

    /// Iterate the job logs in archive order.
    ///
    /// A member that cannot be read is reported as an error item and the
    /// iteration carries on with the next one.
    pub fn entries(&mut self) -> Entries<'_> {
        Entries {
            archive: &mut self.archive,
            index: 0,
        }
    }
}

/// Whether a member holds a per-job log
fn is_job_log(name: &str, is_dir: bool) -> bool {
    !is_dir && name.contains('/')
}

pub struct Entries<'a> {
    archive: &'a mut ZipArchive<File>,
    index: usize,
}

impl Entries<'_> {
    fn read(&mut self, index: usize) -> Option<ArchiveResult<LogEntry>> {
        let mut member = match self.archive.by_index(index) {
            Ok(member) => member,
            Err(source) => return Some(Err(ArchiveError::OpenMember { index, source })),
        };

        let name = member.name().to_string();
        if !is_job_log(&name, member.is_dir()) {
            debug!("skipping top level member {}", name);
            return None;
        }

        let mut content = Vec::with_capacity(member.size().min(MAX_PREALLOC) as usize);
        if let Err(source) = member.read_to_end(&mut content) {
            return Some(Err(ArchiveError::ReadMember { name, source }));
        }

        Some(Ok(LogEntry { name, content }))
    }
}

impl Iterator for Entries<'_> {
    type Item = ArchiveResult<LogEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.index < self.archive.len() {
            let index = self.index;
            self.index += 1;
            if let Some(entry) = self.read(index) {
                return Some(entry);
            }
        }
        None
    }
}
