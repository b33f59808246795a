//! Advisory review of the student's `step-N` tag history

use crate::detector::{name_for_step, parse_step_tag};
use crate::step::Step;
use serde::Serialize;
use std::fmt::Write as _;

const FEW_COMMITS: u64 = 3;
const MANY_COMMITS: u64 = 10;

/// How one tag relates to the expected sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TagEntry {
    InOrder { tag: String, step: u32 },
    Skipped { tag: String, step: u32, expected: u32 },
    AlreadyCompleted { tag: String, step: u32 },
}

/// Where the working step sits relative to the tagged steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    OnTrack,
    Revisiting,
    WorkingAhead,
}

impl Alignment {
    pub fn classify(current_step: u32, completed: usize) -> Self {
        let completed = completed as u64;
        let current = u64::from(current_step);
        if current == completed + 1 {
            Alignment::OnTrack
        } else if current <= completed {
            Alignment::Revisiting
        } else {
            Alignment::WorkingAhead
        }
    }

    fn message(self) -> &'static str {
        match self {
            Alignment::OnTrack => "✅ Working on correct next step",
            Alignment::Revisiting => "ℹ️ Working on already completed step (revision?)",
            Alignment::WorkingAhead => {
                "⚠ Working ahead of completed steps - ensure previous steps are tagged"
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SequenceReport {
    pub entries: Vec<TagEntry>,
    pub has_gaps: bool,
    pub completed: usize,
    pub current_step: u32,
    pub alignment: Alignment,
    pub commit_count: u64,
}

impl SequenceReport {
    /// Next step to tag, `None` once the curriculum is done
    pub fn next_step(&self) -> Option<Step> {
        u32::try_from(self.completed + 1)
            .ok()
            .and_then(Step::from_number)
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "=== TAG VALIDATION ===");

        for entry in &self.entries {
            let _ = match entry {
                TagEntry::InOrder { tag, step } => {
                    writeln!(out, "✓ {}: {}", tag, name_for_step(*step))
                }
                TagEntry::Skipped { tag, expected, .. } => writeln!(
                    out,
                    "⚠ {}: Skipped step(s) - should complete step-{} first",
                    tag, expected
                ),
                TagEntry::AlreadyCompleted { tag, step } => writeln!(
                    out,
                    "✓ {}: {} (already completed)",
                    tag,
                    name_for_step(*step)
                ),
            };
        }

        if self.has_gaps {
            let _ = writeln!(out, "⚠ Warning: Step sequence has gaps. Follow sequential order.");
        } else if self.completed > 0 {
            let _ = writeln!(out, "✅ Tag sequence is correct!");
        }

        let _ = writeln!(out, "\nCurrent Status:");
        let _ = writeln!(out, "- Completed steps (tagged): {}", self.completed);
        let _ = writeln!(out, "- Working on step: {}", self.current_step);
        let _ = writeln!(out, "{}", self.alignment.message());

        let _ = writeln!(out, "\n=== GUIDANCE ===");
        if self.completed == 0 {
            let _ = writeln!(
                out,
                "🚀 Starting fresh! Complete Step 1: {}",
                Step::BasicForm.name()
            );
            let _ = writeln!(out, "   When tests pass, run: git tag {}", Step::BasicForm.tag());
        } else if let Some(next) = self.next_step() {
            let _ = writeln!(out, "🎯 Next step: Step {} - {}", next.number(), next.name());
            let _ = writeln!(out, "   When tests pass, run: git tag {}", next.tag());
        } else {
            let _ = writeln!(out, "🎉 All steps completed! Great job!");
            let _ = writeln!(out, "   Consider adding extra features or refining your code.");
        }

        out.push_str(
            "\n📝 Tagging Reminder:\n\
             \x20  - Only tag when ALL tests pass for that step\n\
             \x20  - Tags unlock the next step's requirements\n\
             \x20  - Use: git tag step-X (where X is the step number)\n\
             \x20  - Push tags: git push --tags\n",
        );
        out.push_str(
            "\n🔧 Useful Commands:\n\
             \x20  - Check current tests: stepgate test\n\
             \x20  - View tags: git tag -l 'step-*'\n\
             \x20  - Remove wrong tag: git tag -d step-X\n",
        );

        if self.commit_count < FEW_COMMITS {
            let _ = writeln!(
                out,
                "\n💡 Tip: Commit frequently! More commits = better development practice"
            );
        } else if self.commit_count >= MANY_COMMITS {
            let _ = writeln!(out, "\n👍 Good commit frequency!");
        }

        out
    }
}

/// Walks version-sorted tags and classifies each against the expected next step
pub struct TagSequenceValidator {
    tags: Vec<String>,
    current_step: u32,
    commit_count: u64,
}

impl TagSequenceValidator {
    pub fn new(tags: Vec<String>, current_step: u32) -> Self {
        Self {
            tags,
            current_step,
            commit_count: 0,
        }
    }

    pub fn with_commit_count(mut self, commit_count: u64) -> Self {
        self.commit_count = commit_count;
        self
    }

    pub fn run(&self) -> SequenceReport {
        let mut expected: u32 = 1;
        let mut has_gaps = false;
        let mut entries = Vec::new();

        for tag in &self.tags {
            let Some(step) = parse_step_tag(tag) else {
                continue;
            };
            let tag = tag.clone();

            if step == expected {
                entries.push(TagEntry::InOrder { tag, step });
                expected = expected.saturating_add(1);
            } else if step > expected {
                entries.push(TagEntry::Skipped {
                    tag,
                    step,
                    expected,
                });
                has_gaps = true;
                expected = step.saturating_add(1);
            } else {
                entries.push(TagEntry::AlreadyCompleted { tag, step });
            }
        }

        let completed = self.tags.len();
        SequenceReport {
            entries,
            has_gaps,
            completed,
            current_step: self.current_step,
            alignment: Alignment::classify(self.current_step, completed),
            commit_count: self.commit_count,
        }
    }
}
