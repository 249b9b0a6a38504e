//! Annotated C fixtures
//!
//! Lines carry a trailing comment stating the expected outcome:
//!
//! ```c
//! buf[99];   // COMPLIANT
//! buf[100];  // NON_COMPLIANT
//! buf[100];  // NON_COMPLIANT[DONT REPORT]   (true violation, must not be reported)
//! ```

use heapbounds_ir::Span;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Path of the heap buffer fixture
pub fn fixture_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/heap_buffer_index.c")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Expectation {
    Compliant,
    NonCompliant,
    DontReport,
}

impl Expectation {
    fn parse(comment: &str) -> Option<Self> {
        let comment = comment.trim();
        if comment.starts_with("NON_COMPLIANT[DONT REPORT]") {
            Some(Expectation::DontReport)
        } else if comment.starts_with("NON_COMPLIANT") {
            Some(Expectation::NonCompliant)
        } else if comment.starts_with("COMPLIANT") {
            Some(Expectation::Compliant)
        } else {
            None
        }
    }
}

/// Fixture source with its per-line expectations (1-based lines)
#[derive(Debug, Clone)]
pub struct AnnotatedSource {
    lines: Vec<String>,
    expectations: BTreeMap<u32, Expectation>,
}

impl AnnotatedSource {
    pub fn load(path: impl AsRef<Path>) -> Self {
        let text = std::fs::read_to_string(path.as_ref())
            .unwrap_or_else(|e| panic!("cannot read {}: {}", path.as_ref().display(), e));
        Self::parse(&text)
    }

    pub fn fixture() -> Self {
        Self::load(fixture_path())
    }

    pub fn parse(text: &str) -> Self {
        let lines: Vec<String> = text.lines().map(str::to_string).collect();
        let expectations = lines
            .iter()
            .enumerate()
            .filter_map(|(i, line)| {
                let comment = &line[line.find("//")? + 2..];
                Expectation::parse(comment).map(|e| (i as u32 + 1, e))
            })
            .collect();
        Self {
            lines,
            expectations,
        }
    }

    pub fn expectation(&self, line: u32) -> Option<Expectation> {
        self.expectations.get(&line).copied()
    }

    pub fn lines_with(&self, expectation: Expectation) -> BTreeSet<u32> {
        self.expectations
            .iter()
            .filter(|(_, e)| **e == expectation)
            .map(|(line, _)| *line)
            .collect()
    }

    /// Span of the first occurrence of `needle` inside C function `function`
    pub fn span_of(&self, function: &str, needle: &str) -> Span {
        let header = format!(" {}(", function);
        let start = self
            .lines
            .iter()
            .position(|l| l.contains(&header))
            .unwrap_or_else(|| panic!("function {} not in fixture", function));

        self.lines
            .iter()
            .enumerate()
            .skip(start)
            .find_map(|(i, l)| {
                l.find(needle).map(|col| {
                    Span::new(
                        i as u32 + 1,
                        col as u32,
                        i as u32 + 1,
                        (col + needle.len()) as u32,
                    )
                })
            })
            .unwrap_or_else(|| panic!("`{}` not found in {}", needle, function))
    }

    pub fn line_of(&self, function: &str, needle: &str) -> u32 {
        self.span_of(function, needle).start_line
    }
}

