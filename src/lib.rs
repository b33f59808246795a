//! stepgate - step progress gate for a six-step web form curriculum
//!
//! Students build a club registration form in six steps (HTML form, CSS,
//! PHP processing, validation, array storage, enhancements) and mark each
//! finished step with a `step-N` git tag. stepgate reads those tags to work
//! out the current step, runs that step's pattern checks over `index.html`,
//! `styles.css` and `process.php`, and reports pass/fail lines with an exit
//! code suitable for CI gating.
//!
//! # Example Usage
//!
//! ```no_run
//! use stepgate::{GitTagSource, RealFileSystem, StepDetector, StepTestRunner};
//!
//! let tags = GitTagSource::new(".");
//! let detection = StepDetector::new(&tags).detect();
//! println!("{}", detection.summary_line());
//!
//! let fs = RealFileSystem;
//! let report = StepTestRunner::new(&fs, &tags, ".").run(detection.step.number());
//! println!("{}", report.render());
//! std::process::exit(report.exit_code());
//! ```
//!
//! # Project Structure
//!
//! - [`step`]: the six curriculum steps
//! - [`tags`]: `step-N` tag queries behind the [`TagSource`] seam
//! - [`detector`]: current step computation and the progress record
//! - [`checks`]: per-step battery, structure validation, tag sequence review
//! - [`smoke`]: optional HTTP checks against a running endpoint
//! - [`fs`]: filesystem abstraction with a mock for tests

pub mod checks;
pub mod cli;
pub mod config;
pub mod detector;
pub mod fs;
pub mod progress;
pub mod smoke;
pub mod step;
pub mod tags;
pub mod util;

pub use checks::{
    CheckReport, SequenceReport, StepTestRunner, StructureValidator, TagSequenceValidator,
};
pub use config::{ConfigError, StepgateConfig};
pub use detector::{compute_current_step, name_for_step, Detection, StepDetector};
pub use fs::{FileSystem, MockFileSystem, RealFileSystem};
pub use progress::{ProgressError, ProgressFile};
pub use smoke::SmokeClient;
pub use step::Step;
pub use tags::{GitTagSource, StaticTagSource, TagOrder, TagSource};
pub use util::{init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
