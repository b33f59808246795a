//! Presence checks against the student project and the reports they produce
//!
//! Every runner in here turns problems into counted report lines. Nothing in
//! this module returns an error to the caller.

pub mod battery;
pub mod sequence;
pub mod structure;

pub use battery::StepTestRunner;
pub use sequence::{Alignment, SequenceReport, TagSequenceValidator};
pub use structure::StructureValidator;

use regex::Regex;
use serde::Serialize;
use std::fmt::Write as _;

const RULE_WIDTH: usize = 50;

/// Line status. Only `Pass` and `Fail` are counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Pass,
    Fail,
    Info,
    Heading,
}

impl Status {
    pub fn glyph(self) -> Option<&'static str> {
        match self {
            Status::Pass => Some("✓"),
            Status::Fail => Some("✗"),
            Status::Info => Some("·"),
            Status::Heading => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckLine {
    pub status: Status,
    pub message: String,
    #[serde(skip)]
    pub depth: usize,
}

/// Accumulated outcome of one runner invocation
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub header: String,
    pub label: String,
    pub lines: Vec<CheckLine>,
    pub passed: u32,
    pub failed: u32,
    #[serde(skip)]
    on_success: Vec<String>,
    #[serde(skip)]
    on_failure: Vec<String>,
}

impl CheckReport {
    pub fn new(header: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            label: label.into(),
            lines: Vec::new(),
            passed: 0,
            failed: 0,
            on_success: Vec::new(),
            on_failure: Vec::new(),
        }
    }

    pub fn with_banners(mut self, on_success: Vec<String>, on_failure: Vec<String>) -> Self {
        self.on_success = on_success;
        self.on_failure = on_failure;
        self
    }

    pub fn pass(&mut self, message: impl Into<String>) {
        self.push(Status::Pass, message, 1);
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.push(Status::Fail, message, 1);
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(Status::Info, message, 1);
    }

    pub fn heading(&mut self, message: impl Into<String>) {
        self.push(Status::Heading, message, 0);
    }

    /// Records a counted line as pass or fail
    pub fn check(&mut self, ok: bool, pass: impl Into<String>, fail: impl Into<String>) -> bool {
        if ok {
            self.pass(pass);
        } else {
            self.fail(fail);
        }
        ok
    }

    pub fn push(&mut self, status: Status, message: impl Into<String>, depth: usize) {
        match status {
            Status::Pass => self.passed += 1,
            Status::Fail => self.failed += 1,
            Status::Info | Status::Heading => {}
        }
        self.lines.push(CheckLine {
            status,
            message: message.into(),
            depth,
        });
    }

    pub fn total(&self) -> u32 {
        self.passed + self.failed
    }

    /// True iff no hard check failed
    pub fn success(&self) -> bool {
        self.failed == 0
    }

    pub fn exit_code(&self) -> i32 {
        if self.success() {
            0
        } else {
            1
        }
    }

    pub fn messages(&self, status: Status) -> impl Iterator<Item = &str> {
        self.lines
            .iter()
            .filter(move |l| l.status == status)
            .map(|l| l.message.as_str())
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "=== {} ===", self.header);
        for line in &self.lines {
            let indent = "  ".repeat(line.depth);
            match line.status.glyph() {
                Some(glyph) => {
                    let _ = writeln!(out, "{}{} {}", indent, glyph, line.message);
                }
                None => {
                    let _ = writeln!(out, "{}{}", indent, line.message);
                }
            }
        }
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", "=".repeat(RULE_WIDTH));
        let _ = writeln!(
            out,
            "{}: {}/{} passed",
            self.label,
            self.passed,
            self.total()
        );
        let banner = if self.success() {
            &self.on_success
        } else {
            &self.on_failure
        };
        for line in banner {
            let _ = writeln!(out, "{}", line);
        }
        out
    }
}

/// Regex presence test. Patterns are compile-time constants or escaped input,
/// so a pattern that fails to compile simply never matches.
pub(crate) fn matches(pattern: &str, text: &str) -> bool {
    Regex::new(pattern)
        .map(|re| re.is_match(text))
        .unwrap_or(false)
}
