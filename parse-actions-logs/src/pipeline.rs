use crate::archive::{ArchiveError, ArchiveReader, LogEntry};
use crate::config::ExtractConfig;
use crate::writer::{FailureRecord, FailureWriter};
use log_parser::{LogParser, ParseError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, error, info, warn};

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Please supply some zip files with logs in")]
    NoArchives,

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Failed to create output dir {}: {source}", path.display())]
    CreateOutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Archive error: {0}")]
    Archive(#[from] ArchiveError),

    #[error("Parser error: {0}")]
    Parser(#[from] ParseError),
}

pub type ExtractResult<T> = Result<T, ExtractError>;

/// Counts for a single archive
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveSummary {
    pub members_scanned: usize,
    pub members_failed: usize,
    pub failures_saved: usize,
    pub write_errors: usize,
    /// Files written for this archive
    pub saved: Vec<PathBuf>,
}

/// Counts accumulated over a whole run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub archives_processed: usize,
    pub archives_failed: usize,
    pub members_scanned: usize,
    pub members_failed: usize,
    pub failures_saved: usize,
    pub write_errors: usize,
}

impl RunSummary {
    pub fn merge(&mut self, archive: &ArchiveSummary) {
        self.archives_processed += 1;
        self.members_scanned += archive.members_scanned;
        self.members_failed += archive.members_failed;
        self.failures_saved += archive.failures_saved;
        self.write_errors += archive.write_errors;
    }

    /// Non fatal errors logged during the run
    pub fn error_count(&self) -> usize {
        self.archives_failed + self.members_failed + self.write_errors
    }
}

/// Runs archives through the parser and writes out every failure found
pub struct Extractor {
    parser: LogParser,
    writer: FailureWriter,
}

impl Extractor {
    /// Validate the configuration and create the output root.
    ///
    /// Both failures are fatal for the run.
    pub fn new(config: &ExtractConfig) -> ExtractResult<Self> {
        config
            .validate()
            .map_err(|message| ExtractError::InvalidConfig { message })?;

        let root = config.output_dir();
        fs::create_dir_all(root).map_err(|source| ExtractError::CreateOutputDir {
            path: root.to_path_buf(),
            source,
        })?;

        Ok(Self {
            parser: LogParser::new()?,
            writer: FailureWriter::new(root),
        })
    }

    pub fn writer(&self) -> &FailureWriter {
        &self.writer
    }

    /// Process every archive in order; an archive that cannot be opened is
    /// logged and skipped.
    pub fn run<P: AsRef<Path>>(&self, archives: &[P]) -> ExtractResult<RunSummary> {
        if archives.is_empty() {
            return Err(ExtractError::NoArchives);
        }

        let mut summary = RunSummary::default();
        for archive in archives {
            let archive = archive.as_ref();
            match self.process_archive(archive) {
                Ok(archive_summary) => summary.merge(&archive_summary),
                Err(e) => {
                    error!("Failed to parse {:?}: {}", archive, e);
                    summary.archives_failed += 1;
                }
            }
        }

        info!(
            "processed {} archives: {} failures saved, {} errors",
            summary.archives_processed,
            summary.failures_saved,
            summary.error_count()
        );
        Ok(summary)
    }

    pub fn process_archive(&self, path: &Path) -> ExtractResult<ArchiveSummary> {
        let mut reader = ArchiveReader::open(path)?;
        let mut summary = ArchiveSummary::default();

        for entry in reader.entries() {
            summary.members_scanned += 1;
            match entry {
                Ok(entry) => self.process_entry(path, entry, &mut summary),
                Err(e) => {
                    warn!("{:?}: {}", path, e);
                    summary.members_failed += 1;
                }
            }
        }

        Ok(summary)
    }

    fn process_entry(&self, archive: &Path, entry: LogEntry, summary: &mut ArchiveSummary) {
        debug!("{:?}: reading {}", archive, entry.name);
        let LogEntry { name, content } = entry;

        for failure in self.parser.module_failures(&content) {
            debug!(
                "{}: {}: failed tests {:?}",
                name,
                failure.module(),
                failure.failed_tests()
            );
            let record = FailureRecord {
                archive: archive.to_path_buf(),
                member: name.clone(),
                module: failure.module().to_string(),
                test: failure.canonical_test().to_string(),
                excerpt: failure.into_excerpt(),
            };

            match self.writer.write(&record) {
                Ok(path) => {
                    info!("saved failure in {:?}", path);
                    summary.failures_saved += 1;
                    summary.saved.push(path);
                }
                Err(e) => {
                    error!("{}", e);
                    summary.write_errors += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_new_creates_output_root() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("nested").join("output");
        let config = ExtractConfig::new().with_output_dir(&root);

        let extractor = Extractor::new(&config).unwrap();
        assert!(root.is_dir());
        assert_eq!(extractor.writer().output_root(), root.as_path());
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = ExtractConfig::new().with_output_dir("");
        let result = Extractor::new(&config);
        assert!(matches!(result, Err(ExtractError::InvalidConfig { .. })));
    }

    #[test]
    fn test_new_fails_when_root_is_a_file() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("output");
        fs::write(&file, b"").unwrap();

        let config = ExtractConfig::new().with_output_dir(&file);
        let result = Extractor::new(&config);
        assert!(matches!(result, Err(ExtractError::CreateOutputDir { .. })));
    }

    #[test]
    fn test_run_requires_archives() {
        let temp = TempDir::new().unwrap();
        let extractor = Extractor::new(&ExtractConfig::new().with_output_dir(temp.path())).unwrap();
        let archives: Vec<PathBuf> = Vec::new();
        assert!(matches!(extractor.run(&archives), Err(ExtractError::NoArchives)));
    }

    #[test]
    fn test_missing_archive_is_counted_not_fatal() {
        let temp = TempDir::new().unwrap();
        let extractor = Extractor::new(&ExtractConfig::new().with_output_dir(temp.path())).unwrap();

        let summary = extractor.run(&[temp.path().join("missing.zip")]).unwrap();
        assert_eq!(summary.archives_failed, 1);
        assert_eq!(summary.archives_processed, 0);
        assert_eq!(summary.error_count(), 1);
    }

    #[test]
    fn test_summary_merge() {
        let mut summary = RunSummary::default();
        summary.merge(&ArchiveSummary {
            members_scanned: 3,
            members_failed: 1,
            failures_saved: 2,
            write_errors: 1,
            saved: Vec::new(),
        });
        summary.merge(&ArchiveSummary {
            members_scanned: 2,
            ..Default::default()
        });

        assert_eq!(summary.archives_processed, 2);
        assert_eq!(summary.members_scanned, 5);
        assert_eq!(summary.failures_saved, 2);
        assert_eq!(summary.error_count(), 2);
    }
}
