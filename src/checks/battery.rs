//! Per-step pattern checks
//!
//! Each step has a fixed, hand-written battery. Later steps allow several valid
//! implementation strategies, so some of their checks are advisory: they add a
//! pass line when the pattern is found and never count as a failure otherwise.

use super::{matches, CheckReport};
use crate::fs::FileSystem;
use crate::step::Step;
use crate::tags::TagSource;
use std::path::PathBuf;
use tracing::debug;

pub const HTML_FILE: &str = "index.html";
pub const CSS_FILE: &str = "styles.css";
pub const PHP_FILE: &str = "process.php";

const CLUB_OPTIONS: &[&str] = &[
    "Programming Club",
    "Art Club",
    "Sports Club",
    "Music Club",
    "Drama Club",
];
const MIN_CLUB_OPTIONS: usize = 3;

const CSS_SELECTORS: &[&str] = &["body", "form", "input", "select"];
const CSS_PROPERTIES: &[&str] = &["color", "background", "padding", "margin", "border"];
const MIN_CSS_PROPERTIES: usize = 3;

const PROCESSED_FIELDS: &[&str] = &["name", "email", "club"];

const VALIDATION_FUNCTIONS: &[(&str, &str)] = &[
    ("empty", r"(?i)empty\s*\("),
    ("filter_var", r"(?i)filter_var\s*\("),
    ("strlen", r"(?i)strlen\s*\("),
    ("trim", r"(?i)trim\s*\("),
];

const MIN_ENHANCEMENTS: usize = 2;

enum FieldKind {
    Input(&'static str),
    Select,
}

const FORM_FIELDS: &[(&str, FieldKind)] = &[
    ("name", FieldKind::Input("text")),
    ("email", FieldKind::Input("email")),
    ("club", FieldKind::Select),
    ("submit", FieldKind::Input("submit")),
];

/// Runs the battery for one step against a project directory
pub struct StepTestRunner<'a> {
    fs: &'a dyn FileSystem,
    tags: &'a dyn TagSource,
    root: PathBuf,
}

impl<'a> StepTestRunner<'a> {
    pub fn new(fs: &'a dyn FileSystem, tags: &'a dyn TagSource, root: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            tags,
            root: root.into(),
        }
    }

    pub fn run(&self, step_number: u32) -> CheckReport {
        let mut report = CheckReport::new(
            format!("STEP {} TESTS", step_number),
            format!("STEP {} TESTS", step_number),
        )
        .with_banners(
            vec![
                "✅ All tests passed! Ready to tag and move to next step.".to_string(),
                format!("Run: git tag step-{}", step_number),
            ],
            vec!["❌ Some tests failed. Fix issues before tagging.".to_string()],
        );

        let Some(step) = Step::from_number(step_number) else {
            report.heading(format!("No tests defined for step {}", step_number));
            return report;
        };

        debug!(step = step_number, root = %self.root.display(), "Running step battery");
        report.heading(format!("Testing Step {}: {}", step.number(), step.name()));

        match step {
            Step::BasicForm => self.basic_form(&mut report),
            Step::Styling => self.styling(&mut report),
            Step::FormProcessing => self.form_processing(&mut report),
            Step::Validation => self.validation(&mut report),
            Step::ArrayStorage => self.array_storage(&mut report),
            Step::EnhancedFeatures => self.enhanced_features(&mut report),
        }

        debug!(passed = report.passed, failed = report.failed, "Step battery finished");
        report
    }

    fn path(&self, file: &str) -> PathBuf {
        self.root.join(file)
    }

    /// Contents of a required file, or a recorded failure when it is absent
    fn require(&self, report: &mut CheckReport, file: &str) -> Option<String> {
        let path = self.path(file);
        if !self.fs.exists(&path) {
            report.fail(format!("{} file missing", file));
            return None;
        }
        Some(self.fs.read_or_empty(&path))
    }

    fn read(&self, file: &str) -> String {
        self.fs.read_or_empty(&self.path(file))
    }

    fn basic_form(&self, report: &mut CheckReport) {
        let Some(html) = self.require(report, HTML_FILE) else {
            return;
        };

        if matches(r"<form[^>]*>", &html) {
            report.pass("Form element present");
            report.check(
                matches(r#"<form[^>]*method\s*=\s*["']post["']"#, &html),
                "Form uses POST method",
                "Form should use POST method",
            );
            report.check(
                matches(r#"<form[^>]*action\s*=\s*["'][^"']*["']"#, &html),
                "Form has action attribute",
                "Form missing action attribute",
            );
        } else {
            report.fail("Form element missing");
        }

        for (field, kind) in FORM_FIELDS {
            check_form_field(report, &html, field, kind);
        }

        let found = count_present(&html, CLUB_OPTIONS);
        report.check(
            found >= MIN_CLUB_OPTIONS,
            format!("At least 3 club options available ({} found)", found),
            format!("Need at least 3 club options (found {})", found),
        );
    }

    fn styling(&self, report: &mut CheckReport) {
        if !self.tags.has_tag(&Step::BasicForm.tag()) {
            report.fail("Step 1 must be tagged before working on Step 2");
            return;
        }

        let Some(css) = self.require(report, CSS_FILE) else {
            return;
        };
        let html = self.read(HTML_FILE);

        report.check(
            matches(r#"<link[^>]*href\s*=\s*["'][^"']*styles\.css[^"']*["']"#, &html),
            "CSS stylesheet linked in HTML",
            "styles.css not properly linked in HTML",
        );

        for selector in CSS_SELECTORS {
            report.check(
                matches(&format!(r"{}\s*\{{", regex::escape(selector)), &css),
                format!("CSS rule for '{}' found", selector),
                format!("Missing CSS rule for '{}'", selector),
            );
        }

        let found = CSS_PROPERTIES
            .iter()
            .filter(|p| matches(&format!(r"{}\s*:", regex::escape(p)), &css))
            .count();
        report.check(
            found >= MIN_CSS_PROPERTIES,
            format!("Good CSS styling applied ({} properties used)", found),
            format!("Need more CSS styling (only {} properties found)", found),
        );
    }

    fn form_processing(&self, report: &mut CheckReport) {
        let Some(php) = self.require(report, PHP_FILE) else {
            return;
        };

        report.check(
            php.contains("<?php"),
            "PHP opening tag found",
            "PHP opening tag missing",
        );
        report.check(
            matches(r"\$_POST", &php),
            "$_POST superglobal used",
            "$_POST superglobal not found",
        );

        for field in PROCESSED_FIELDS {
            let pattern = format!(r#"\$_POST\s*\[\s*["']{}["']\s*\]"#, regex::escape(field));
            report.check(
                matches(&pattern, &php),
                format!("Processing {} field", field),
                format!("Not processing {} field", field),
            );
        }

        report.check(
            matches(r"echo|print", &php),
            "PHP output statements found",
            "No PHP output statements found",
        );

        let html = self.read(HTML_FILE);
        report.check(
            matches(r#"<form[^>]*action\s*=\s*["'][^"']*process\.php[^"']*["']"#, &html),
            "Form action points to process.php",
            "Form action should point to process.php",
        );
    }

    fn validation(&self, report: &mut CheckReport) {
        let php = self.read(PHP_FILE);

        for (name, pattern) in VALIDATION_FUNCTIONS {
            advise(report, matches(pattern, &php), format!("Using {} for validation", name));
        }

        report.check(
            matches(r"if\s*\(", &php),
            "Conditional validation logic found",
            "Missing conditional validation logic",
        );
        report.check(
            matches(r"error|Error|invalid|Invalid", &php),
            "Error handling/messages present",
            "Missing error handling/messages",
        );
    }

    fn array_storage(&self, report: &mut CheckReport) {
        let php = self.read(PHP_FILE);

        report.check(
            matches(r"array\s*\(|\[", &php),
            "Array usage found",
            "No array usage found",
        );
        report.check(
            matches(r"foreach\s*\(|for\s*\(", &php),
            "Loop structure found for array processing",
            "Missing loop structure for array processing",
        );
        advise(
            report,
            matches(r"session_start|file_put_contents|file_get_contents", &php),
            "Data persistence mechanism found",
        );
    }

    fn enhanced_features(&self, report: &mut CheckReport) {
        let html = self.read(HTML_FILE);
        let php = self.read(PHP_FILE);

        let features = [
            (
                matches(r"textarea|radio|checkbox", &html),
                "Additional input types used",
            ),
            (matches(r"<script|\.js", &html), "JavaScript enhancement found"),
            (
                matches(r"function\s+\w+|class\s+\w+", &php),
                "Custom functions/classes implemented",
            ),
            (
                matches(r"fopen|file_put_contents|file_get_contents", &php),
                "File operations implemented",
            ),
        ];

        let mut found = 0;
        for (present, message) in features {
            if advise(report, present, message) {
                found += 1;
            }
        }

        report.check(
            found >= MIN_ENHANCEMENTS,
            "Good enhancement features implemented",
            "Need more enhancement features",
        );
    }
}

/// Advisory check: a pass when present, an uncounted note otherwise
fn advise(report: &mut CheckReport, present: bool, message: impl Into<String>) -> bool {
    let message = message.into();
    if present {
        report.pass(message);
    } else {
        report.info(format!("Not found (optional): {}", message));
    }
    present
}

fn check_form_field(report: &mut CheckReport, html: &str, field: &str, kind: &FieldKind) {
    let name_attr = format!(r#"name\s*=\s*["']{}["']"#, regex::escape(field));

    match kind {
        FieldKind::Select => {
            report.check(
                matches(&format!(r"<select[^>]*{}", name_attr), html),
                format!("{} select field present", field),
                format!("{} select field missing", field),
            );
        }
        FieldKind::Input(input_type) => {
            if !matches(&format!(r"<input[^>]*{}", name_attr), html) {
                report.fail(format!("{} input field missing", field));
                return;
            }
            report.pass(format!("{} input field present", field));

            let type_attr = format!(r#"type\s*=\s*["']{}["']"#, regex::escape(input_type));
            let typed = matches(&format!(r"<input[^>]*{}[^>]*{}", type_attr, name_attr), html)
                || matches(&format!(r"<input[^>]*{}[^>]*{}", name_attr, type_attr), html);
            report.check(
                typed,
                format!("{} has correct type ({})", field, input_type),
                format!("{} should have type='{}'", field, input_type),
            );
        }
    }
}

fn count_present(text: &str, needles: &[&str]) -> usize {
    needles.iter().filter(|n| text.contains(*n)).count()
}
