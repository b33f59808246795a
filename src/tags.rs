//! Reading `step-N` tags from version control
//!
//! Every query here is best-effort: a missing `git` binary, a directory that is
//! not a repository, or garbage output all collapse to an empty result.

use std::path::PathBuf;
use std::process::Command;
use tracing::debug;

/// Glob passed to `git tag -l`
pub const STEP_TAG_GLOB: &str = "step-*";

/// Order in which tags are returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagOrder {
    /// Whatever order the underlying tool lists them in
    Listed,
    /// `step-2` before `step-10`
    Version,
}

/// Source of step tags and related repository facts
pub trait TagSource {
    /// All tags matching `step-*`
    fn step_tags(&self, order: TagOrder) -> Vec<String>;

    /// Whether a specific tag exists
    fn has_tag(&self, tag: &str) -> bool;

    /// Number of commits reachable from HEAD, 0 when unknown
    fn commit_count(&self) -> u64;
}

/// Shells out to `git` in a working directory
pub struct GitTagSource {
    repo_path: PathBuf,
}

impl GitTagSource {
    pub fn new(repo_path: impl Into<PathBuf>) -> Self {
        Self {
            repo_path: repo_path.into(),
        }
    }

    fn git_lines(&self, args: &[&str]) -> Vec<String> {
        debug!(repo = %self.repo_path.display(), ?args, "Running git");

        let output = match Command::new("git")
            .args(args)
            .current_dir(&self.repo_path)
            .output()
        {
            Ok(output) => output,
            Err(e) => {
                debug!(error = %e, "git unavailable, treating as empty");
                return Vec::new();
            }
        };

        if !output.status.success() {
            debug!(
                status = ?output.status.code(),
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "git exited unsuccessfully, treating as empty"
            );
            return Vec::new();
        }

        match String::from_utf8(output.stdout) {
            Ok(stdout) => stdout
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect(),
            Err(_) => {
                debug!("git output was not UTF-8, treating as empty");
                Vec::new()
            }
        }
    }
}

impl TagSource for GitTagSource {
    fn step_tags(&self, order: TagOrder) -> Vec<String> {
        match order {
            TagOrder::Listed => self.git_lines(&["tag", "-l", STEP_TAG_GLOB]),
            TagOrder::Version => {
                self.git_lines(&["tag", "-l", STEP_TAG_GLOB, "--sort=version:refname"])
            }
        }
    }

    fn has_tag(&self, tag: &str) -> bool {
        !self.git_lines(&["tag", "-l", tag]).is_empty()
    }

    fn commit_count(&self) -> u64 {
        self.git_lines(&["rev-list", "--count", "HEAD"])
            .first()
            .and_then(|l| l.parse().ok())
            .unwrap_or(0)
    }
}

/// Fixed tag list for tests and dry runs
#[derive(Debug, Clone, Default)]
pub struct StaticTagSource {
    tags: Vec<String>,
    commits: u64,
}

impl StaticTagSource {
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tags: tags.into_iter().map(Into::into).collect(),
            commits: 0,
        }
    }

    pub fn with_commits(mut self, commits: u64) -> Self {
        self.commits = commits;
        self
    }
}

impl TagSource for StaticTagSource {
    fn step_tags(&self, order: TagOrder) -> Vec<String> {
        let mut tags = self.tags.clone();
        if order == TagOrder::Version {
            tags.sort_by_key(|t| version_key(t));
        }
        tags
    }

    fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    fn commit_count(&self) -> u64 {
        self.commits
    }
}

/// Approximates `--sort=version:refname` for `step-N` style names
fn version_key(tag: &str) -> (String, u64) {
    let split = tag
        .rfind(|c: char| !c.is_ascii_digit())
        .map(|i| i + 1)
        .unwrap_or(0);
    let (prefix, digits) = tag.split_at(split);
    (prefix.to_string(), digits.parse().unwrap_or(0))
}
