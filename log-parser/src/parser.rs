use crate::failure::{leaf_failures, ModuleFailure};
use crate::segment::Segments;
use regex::bytes::{NoExpand, Regex};
use thiserror::Error;
use tracing::debug;

/// Timestamp prefix on every line of an Actions log, e.g.
/// `2020-04-15T12:19:01.5953417Z `
const TIMESTAMP_PATTERN: &str =
    r"(?m-u)^(?:\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(?:\.\d*)?Z )+";

/// Package summary lines printed by `go test`:
///
/// ```text
/// ok  	github.com/rclone/rclone/lib/mmap	0.130s
/// ?   	github.com/rclone/rclone/lib/oauthutil	[no test files]
/// FAIL	github.com/rclone/rclone/lib/pacer	0.813s
/// ```
const MARKER_PATTERN: &str = r"(?m-u)^(ok  |FAIL|\?   )\t([^\t\n]+)\t.*$";

/// Individual test failures, e.g. `    --- FAIL: TestFoo/bar (0.01s)`
const FAILURE_PATTERN: &str = r"(?m-u)^\s*--- FAIL: (Test.*?) \(";

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
}

pub type ParseResult<T> = Result<T, ParseError>;

/// Holds the compiled patterns used to pick apart a job log.
///
/// Build one per process and share it by reference.
#[derive(Debug, Clone)]
pub struct LogParser {
    timestamp: Regex,
    marker: Regex,
    failure: Regex,
}

impl LogParser {
    pub fn new() -> ParseResult<Self> {
        Ok(Self {
            timestamp: Regex::new(TIMESTAMP_PATTERN)?,
            marker: Regex::new(MARKER_PATTERN)?,
            failure: Regex::new(FAILURE_PATTERN)?,
        })
    }

    /// Remove carriage returns and the timestamp prefix of every line.
    ///
    /// Repeated prefixes at the start of a line are removed together, so
    /// normalizing an already normalized log leaves it unchanged.
    pub fn normalize(&self, raw: &[u8]) -> Vec<u8> {
        let stripped: Vec<u8> = raw.iter().copied().filter(|&b| b != b'\r').collect();
        self.timestamp
            .replace_all(&stripped, NoExpand(b""))
            .into_owned()
    }

    /// Split a normalized log into module segments
    pub fn segments<'r, 'h>(&'r self, log: &'h [u8]) -> Segments<'r, 'h> {
        Segments::new(self.marker.captures_iter(log), log)
    }

    /// Names of the deepest failing tests reported in a segment
    pub fn find_failures(&self, segment: &[u8]) -> Vec<String> {
        let names = self
            .failure
            .captures_iter(segment)
            .filter_map(|caps| caps.get(1))
            .map(|name| String::from_utf8_lossy(name.as_bytes()).into_owned())
            .collect();
        leaf_failures(names)
    }

    /// Normalize a raw job log and collect every failing module in it.
    ///
    /// Logs without any `go test` summary lines yield nothing.
    pub fn module_failures(&self, raw: &[u8]) -> Vec<ModuleFailure> {
        let log = self.normalize(raw);
        let mut failures = Vec::new();
        let mut segment_count = 0;

        for segment in self.segments(&log) {
            segment_count += 1;
            if !segment.is_failure() {
                continue;
            }

            let failed_tests = self.find_failures(segment.bytes);
            match ModuleFailure::new(segment.module, failed_tests, segment.bytes.to_vec()) {
                Some(failure) => failures.push(failure),
                None => debug!("FAIL segment without failed tests"),
            }
        }

        if segment_count == 0 {
            debug!("no go tests found in log");
        }
        failures
    }
}
