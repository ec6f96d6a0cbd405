use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WriteError {
    #[error("Failed to create output dir {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write output file {}: {source}", path.display())]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type WriteResult<T> = Result<T, WriteError>;

/// Munge a string into something acceptable as a single path component.
///
/// Path separators are swapped for their full width look-alikes so a
/// hierarchical test name like `TestFoo/bar` stays one directory.
pub fn sanitize(s: &str) -> String {
    s.replace('/', "／").replace('\\', "＼")
}

/// File name of the archive without its extension
pub fn archive_stem(archive: &Path) -> String {
    archive
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// A failing module ready to be written out
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureRecord {
    /// Archive the log was read from
    pub archive: PathBuf,
    /// Archive member the excerpt came from
    pub member: String,
    pub module: String,
    /// Test the excerpt is filed under
    pub test: String,
    pub excerpt: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct FailureWriter {
    output_root: PathBuf,
}

impl FailureWriter {
    pub fn new(output_root: impl Into<PathBuf>) -> Self {
        Self {
            output_root: output_root.into(),
        }
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// `<root>/<module>/<test>/<test>-<archive stem>.txt`
    pub fn record_path(&self, record: &FailureRecord) -> PathBuf {
        let file_name = sanitize(&format!(
            "{}-{}.txt",
            record.test,
            archive_stem(&record.archive)
        ));
        self.record_dir(record).join(file_name)
    }

    fn record_dir(&self, record: &FailureRecord) -> PathBuf {
        self.output_root
            .join(sanitize(&record.module))
            .join(sanitize(&record.test))
    }

    /// Write the excerpt, replacing any file left by an earlier run
    pub fn write(&self, record: &FailureRecord) -> WriteResult<PathBuf> {
        let dir = self.record_dir(record);
        fs::create_dir_all(&dir).map_err(|source| WriteError::CreateDir {
            path: dir.clone(),
            source,
        })?;

        let path = self.record_path(record);
        fs::write(&path, &record.excerpt).map_err(|source| WriteError::WriteFile {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}
