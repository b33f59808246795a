//! Working out which step the student is on from their tags

use crate::progress::{ProgressError, ProgressFile};
use crate::step::{Step, UNKNOWN_STEP_NAME};
use crate::tags::{TagOrder, TagSource};
use regex::Regex;
use serde::Serialize;
use std::num::IntErrorKind;
use tracing::{debug, info};

const STEP_TAG_PATTERN: &str = r"step-(\d+)";

/// Extracts the step number from a tag such as `step-3`.
///
/// Numbers too large for a `u32` saturate to `u32::MAX`.
pub fn parse_step_tag(tag: &str) -> Option<u32> {
    let re = Regex::new(STEP_TAG_PATTERN).ok()?;
    let digits = re.captures(tag)?.get(1)?.as_str();
    match digits.parse::<u32>() {
        Ok(number) => Some(number),
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => Some(u32::MAX),
        Err(_) => None,
    }
}

/// Highest tagged step plus one, clamped into the curriculum.
///
/// With no matching tags the student is on step 1.
pub fn compute_current_step<S: AsRef<str>>(tags: &[S]) -> Step {
    let completed = tags
        .iter()
        .filter_map(|t| parse_step_tag(t.as_ref()))
        .max()
        .unwrap_or(0);

    Step::clamped(completed.saturating_add(1))
}

/// Human-readable step name, `"Unknown Step"` when out of range
pub fn name_for_step(number: u32) -> &'static str {
    Step::from_number(number)
        .map(Step::name)
        .unwrap_or(UNKNOWN_STEP_NAME)
}

/// Outcome of a detection run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Detection {
    pub step: Step,
    pub name: &'static str,
}

impl Detection {
    pub fn new(step: Step) -> Self {
        Self {
            step,
            name: step.name(),
        }
    }

    pub fn summary_line(&self) -> String {
        format!("Current Step: {} - {}", self.step.number(), self.name)
    }

    /// Legacy GitHub Actions `set-output` lines
    pub fn ci_annotations(&self) -> [String; 2] {
        [
            format!("::set-output name=step::{}", self.step.number()),
            format!("::set-output name=step_name::{}", self.name),
        ]
    }
}

pub struct StepDetector<'a> {
    tags: &'a dyn TagSource,
}

impl<'a> StepDetector<'a> {
    pub fn new(tags: &'a dyn TagSource) -> Self {
        Self { tags }
    }

    pub fn current_step(&self) -> Step {
        let tags = self.tags.step_tags(TagOrder::Listed);
        debug!(count = tags.len(), ?tags, "Read step tags");
        compute_current_step(&tags)
    }

    pub fn detect(&self) -> Detection {
        let detection = Detection::new(self.current_step());
        info!(step = detection.step.number(), name = detection.name, "Detected current step");
        detection
    }

    /// Detects and overwrites the progress record for later invocations
    pub fn detect_and_record(&self, progress: &ProgressFile) -> Result<Detection, ProgressError> {
        let detection = self.detect();
        progress.write(detection.step.number())?;
        debug!(path = %progress.path().display(), "Recorded current step");
        Ok(detection)
    }

    pub fn is_step_unlocked(&self, number: u32) -> bool {
        number <= self.current_step().number()
    }
}
