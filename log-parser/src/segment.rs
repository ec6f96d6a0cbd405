use regex::bytes::CaptureMatches;
use std::ops::Range;

/// Result reported by `go test` on a package summary line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModuleStatus {
    /// `ok` - every test in the package passed
    Ok,
    /// `FAIL` - at least one test in the package failed
    Fail,
    /// `?` - the package has no test files
    NoTests,
}

impl ModuleStatus {
    /// Map the status token of a summary line to a status.
    ///
    /// The token is compared after trimming the column padding go prints.
    pub fn from_marker(token: &[u8]) -> Option<Self> {
        match token.trim_ascii() {
            b"ok" => Some(ModuleStatus::Ok),
            b"FAIL" => Some(ModuleStatus::Fail),
            b"?" => Some(ModuleStatus::NoTests),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleStatus::Ok => "ok",
            ModuleStatus::Fail => "FAIL",
            ModuleStatus::NoTests => "?",
        }
    }
}

impl std::fmt::Display for ModuleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The output belonging to one module, ending with its summary line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleSegment<'h> {
    pub status: ModuleStatus,
    /// Module path printed on the summary line
    pub module: String,
    /// Byte range of the segment in the normalized log
    pub span: Range<usize>,
    pub bytes: &'h [u8],
}

impl ModuleSegment<'_> {
    pub fn is_failure(&self) -> bool {
        self.status == ModuleStatus::Fail
    }
}

/// Lazy iterator over the module segments of a normalized log.
///
/// Each segment starts where the previous summary line ended (the start of
/// the buffer for the first one) and ends at the end of its own summary line.
/// Output following the last summary line belongs to no segment.
pub struct Segments<'r, 'h> {
    markers: CaptureMatches<'r, 'h>,
    haystack: &'h [u8],
    prev: usize,
}

impl<'r, 'h> Segments<'r, 'h> {
    pub(crate) fn new(markers: CaptureMatches<'r, 'h>, haystack: &'h [u8]) -> Self {
        Self {
            markers,
            haystack,
            prev: 0,
        }
    }
}

impl<'h> Iterator for Segments<'_, 'h> {
    type Item = ModuleSegment<'h>;

    fn next(&mut self) -> Option<Self::Item> {
        let caps = self.markers.next()?;
        let line = caps.get(0)?;
        // the marker pattern only admits the three tokens from_marker knows
        let status = ModuleStatus::from_marker(caps.get(1)?.as_bytes())?;
        let module = String::from_utf8_lossy(caps.get(2)?.as_bytes()).into_owned();

        let span = self.prev..line.end();
        self.prev = line.end();

        Some(ModuleSegment {
            status,
            module,
            bytes: &self.haystack[span.clone()],
            span,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_marker() {
        assert_eq!(ModuleStatus::from_marker(b"ok  "), Some(ModuleStatus::Ok));
        assert_eq!(ModuleStatus::from_marker(b"FAIL"), Some(ModuleStatus::Fail));
        assert_eq!(ModuleStatus::from_marker(b"?   "), Some(ModuleStatus::NoTests));
    }

    #[test]
    fn test_status_from_unknown_marker() {
        assert_eq!(ModuleStatus::from_marker(b"PASS"), None);
        assert_eq!(ModuleStatus::from_marker(b"--- FAIL:"), None);
        assert_eq!(ModuleStatus::from_marker(b""), None);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(ModuleStatus::Ok.to_string(), "ok");
        assert_eq!(ModuleStatus::Fail.to_string(), "FAIL");
        assert_eq!(ModuleStatus::NoTests.to_string(), "?");
    }
}
