//! Parsing of Go test output captured in CI job logs.
//!
//! A job log is normalized (carriage returns and timestamp prefixes removed),
//! split into per-module segments at `ok`/`FAIL`/`?` summary lines, and the
//! `FAIL` segments are searched for the names of the tests that failed.

pub mod failure;
pub mod parser;
pub mod segment;

pub use failure::{leaf_failures, ModuleFailure};
pub use parser::{LogParser, ParseError, ParseResult};
pub use segment::{ModuleSegment, ModuleStatus, Segments};

pub mod prelude {
    pub use crate::failure::*;
    pub use crate::parser::*;
    pub use crate::segment::*;
}
