//! Subcommand handlers. Each returns the process exit code.

use anyhow::Result;
use tracing::{debug, error, info, warn};

use crate::checks::{StepTestRunner, StructureValidator, TagSequenceValidator};
use crate::config::StepgateConfig;
use crate::detector::StepDetector;
use crate::fs::RealFileSystem;
use crate::progress::ProgressFile;
use crate::smoke::SmokeClient;
use crate::tags::{GitTagSource, TagOrder, TagSource};

use super::commands::{DetectArgs, SmokeArgs, StructureArgs, TagsArgs, TestArgs};
use super::output::OutputFormatter;

pub fn handle_detect(args: &DetectArgs, config: &StepgateConfig) -> i32 {
    let tags = GitTagSource::new(&config.project_root);
    let detector = StepDetector::new(&tags);
    let progress = ProgressFile::new(&config.progress_file);

    let detection = match detector.detect_and_record(&progress) {
        Ok(detection) => detection,
        Err(e) => {
            warn!("{}; later commands will fall back to step 1", e);
            detector.detect()
        }
    };

    let formatter = OutputFormatter::new(args.format.into());
    emit(formatter.format_detection(&detection, config.ci), 0)
}

pub fn handle_test(args: &TestArgs, config: &StepgateConfig) -> i32 {
    let step = match resolve_test_step(args.step, config) {
        Ok(step) => step,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            return 1;
        }
    };
    info!(step, root = %config.project_root.display(), "Running step checks");

    let fs = RealFileSystem;
    let tags = GitTagSource::new(&config.project_root);
    let report = StepTestRunner::new(&fs, &tags, &config.project_root).run(step);

    let formatter = OutputFormatter::new(args.format.into());
    emit(formatter.format_report(&report), report.exit_code())
}

pub fn handle_structure(args: &StructureArgs, config: &StepgateConfig) -> i32 {
    let step = args
        .step
        .unwrap_or_else(|| ProgressFile::new(&config.progress_file).read_or_default());
    debug!(step, "Validating project structure");

    let fs = RealFileSystem;
    let report = StructureValidator::new(&fs, &config.project_root, step).run();

    let formatter = OutputFormatter::new(args.format.into());
    emit(formatter.format_report(&report), report.exit_code())
}

pub fn handle_tags(args: &TagsArgs, config: &StepgateConfig) -> i32 {
    let source = GitTagSource::new(&config.project_root);
    let current_step = ProgressFile::new(&config.progress_file).read_or_default();

    let report = TagSequenceValidator::new(source.step_tags(TagOrder::Version), current_step)
        .with_commit_count(source.commit_count())
        .run();

    let formatter = OutputFormatter::new(args.format.into());
    // Advisory only: never gates.
    emit(formatter.format_sequence(&report), 0)
}

pub fn handle_smoke(args: &SmokeArgs, config: &StepgateConfig) -> i32 {
    let url = args.url.as_deref().unwrap_or(&config.smoke_url);

    let client = match SmokeClient::new(url) {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to create HTTP client: {:#}", e);
            eprintln!("Error: {:#}", e);
            return 1;
        }
    };
    info!(url = client.url(), "Running smoke scenarios");

    let report = client.run_registration_scenarios();
    let formatter = OutputFormatter::new(args.format.into());
    emit(formatter.format_report(&report), report.exit_code())
}

/// `--step`, then `CURRENT_STEP`, then the progress record
fn resolve_test_step(flag: Option<u32>, config: &StepgateConfig) -> Result<u32> {
    if let Some(step) = flag {
        return Ok(step);
    }
    if let Some(step) = config.step_override()? {
        debug!(step, "Using CURRENT_STEP override");
        return Ok(step);
    }
    Ok(ProgressFile::new(&config.progress_file).read_or_default())
}

fn emit(rendered: Result<String>, exit_code: i32) -> i32 {
    match rendered {
        Ok(text) => {
            println!("{}", text);
            exit_code
        }
        Err(e) => {
            error!("Failed to format output: {:#}", e);
            eprintln!("Error: {:#}", e);
            1
        }
    }
}
