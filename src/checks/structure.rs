//! Project layout validation
//!
//! Confirms the required files are present and minimally shaped, and that no
//! build tooling has crept into what should be a vanilla HTML/CSS/PHP project.
//! Some content checks only become hard failures once the student has moved
//! past the step that introduces them.

use super::battery::{CSS_FILE, HTML_FILE, PHP_FILE};
use super::{CheckReport, Status};
use crate::fs::FileSystem;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Files every project must contain, with a short description
pub const REQUIRED_FILES: &[(&str, &str)] = &[
    (HTML_FILE, "Main HTML form file"),
    (CSS_FILE, "CSS stylesheet"),
    (PHP_FILE, "PHP processing script"),
    ("README.md", "Project documentation"),
];

/// Build tooling artifacts that must not appear
pub const FORBIDDEN_ENTRIES: &[&str] = &[
    "node_modules",
    "vendor",
    ".env",
    "composer.json",
    "package.json",
    "webpack.config.js",
    "gulpfile.js",
];

pub struct StructureValidator<'a> {
    fs: &'a dyn FileSystem,
    root: PathBuf,
    current_step: u32,
}

impl<'a> StructureValidator<'a> {
    pub fn new(fs: &'a dyn FileSystem, root: impl Into<PathBuf>, current_step: u32) -> Self {
        Self {
            fs,
            root: root.into(),
            current_step,
        }
    }

    pub fn run(&self) -> CheckReport {
        let mut report = CheckReport::new("STRUCTURE VALIDATION", "STRUCTURE TESTS").with_banners(
            vec!["✅ Structure validation passed!".to_string()],
            vec!["❌ Structure validation failed. Fix the issues above.".to_string()],
        );

        debug!(root = %self.root.display(), step = self.current_step, "Validating structure");

        self.required_files(&mut report);
        self.readability(&mut report);
        self.forbidden_entries(&mut report);

        report
    }

    fn required_files(&self, report: &mut CheckReport) {
        for (file, description) in REQUIRED_FILES {
            let path = self.root.join(file);
            if !self.fs.exists(&path) {
                top_fail(report, format!("{} missing ({})", file, description));
                continue;
            }
            top_pass(report, format!("{} exists ({})", file, description));

            match *file {
                HTML_FILE => self.validate_html(report, &path),
                CSS_FILE => self.validate_css(report, &path),
                PHP_FILE => self.validate_php(report, &path),
                _ => {}
            }
        }
    }

    fn validate_html(&self, report: &mut CheckReport, path: &Path) {
        let content = self.fs.read_or_empty(path);

        report.check(
            content.contains("<!DOCTYPE html>"),
            "HTML5 doctype found",
            "Missing HTML5 doctype",
        );
        report.check(
            content.contains("<html"),
            "HTML tag found",
            "Missing HTML tag",
        );

        if content.contains("<form") {
            report.pass("Form tag found");
        } else if self.current_step > 1 {
            report.fail("Missing form tag");
        }
    }

    fn validate_css(&self, report: &mut CheckReport, path: &Path) {
        let non_empty = self
            .fs
            .metadata(path)
            .map(|m| !m.is_empty())
            .unwrap_or(false);

        if non_empty {
            report.pass("CSS file is not empty");
        } else if self.current_step > 2 {
            report.fail("CSS file is empty");
        }
    }

    fn validate_php(&self, report: &mut CheckReport, path: &Path) {
        if self.fs.read_or_empty(path).contains("<?php") {
            report.pass("PHP opening tag found");
        } else if self.current_step > 3 {
            report.fail("Missing PHP opening tag");
        }
    }

    fn readability(&self, report: &mut CheckReport) {
        for (file, _) in REQUIRED_FILES {
            let path = self.root.join(file);
            if !self.fs.exists(&path) {
                continue;
            }
            if self.fs.is_readable(&path) {
                top_pass(report, format!("{} is readable", file));
            } else {
                top_fail(report, format!("{} is not readable", file));
            }
        }
    }

    /// Stops at the first absent entry and assumes the rest are absent too
    fn forbidden_entries(&self, report: &mut CheckReport) {
        for entry in FORBIDDEN_ENTRIES {
            if self.fs.exists(&self.root.join(entry)) {
                top_fail(
                    report,
                    format!(
                        "Forbidden file/directory found: {} (vanilla HTML/CSS/PHP only!)",
                        entry
                    ),
                );
            } else {
                top_pass(report, "No forbidden frameworks/tools detected");
                break;
            }
        }
    }
}

fn top_pass(report: &mut CheckReport, message: impl Into<String>) {
    report.push(Status::Pass, message, 0);
}

fn top_fail(report: &mut CheckReport, message: impl Into<String>) {
    report.push(Status::Fail, message, 0);
}
