pub mod archive;
pub mod config;
pub mod pipeline;
pub mod writer;

pub use archive::{ArchiveError, ArchiveReader, ArchiveResult, Entries, LogEntry};
pub use config::{ExtractConfig, DEFAULT_OUTPUT_DIR};
pub use pipeline::{ArchiveSummary, ExtractError, ExtractResult, Extractor, RunSummary};
pub use writer::{archive_stem, sanitize, FailureRecord, FailureWriter, WriteError, WriteResult};
