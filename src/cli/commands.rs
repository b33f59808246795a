use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Step progress gate for the club registration form curriculum
#[derive(Parser, Debug)]
#[command(
    name = "stepgate",
    about = "Step progress gate for the club registration form curriculum",
    version,
    author,
    long_about = "stepgate works out which curriculum step a student is on from their \
                  step-N git tags, runs that step's pattern checks against index.html, \
                  styles.css and process.php, validates the project layout, and reviews \
                  the tag history."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(
        short = 'C',
        long = "project",
        global = true,
        value_name = "DIR",
        help = "Student project directory (defaults to STEPGATE_PROJECT_ROOT or .)"
    )]
    pub project: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        value_name = "FILE",
        help = "Progress record path (defaults to STEPGATE_PROGRESS_FILE or /tmp/current_step.txt)"
    )]
    pub progress_file: Option<PathBuf>,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - only log errors"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Detect the current step from step-N tags",
        long_about = "Computes the current step as the highest tagged step plus one (capped \
                      at 6) and records it in the progress file for later commands.\n\n\
                      Examples:\n  \
                      stepgate detect\n  \
                      GITHUB_ACTIONS=true stepgate detect"
    )]
    Detect(DetectArgs),

    #[command(
        about = "Run the pattern checks for a step",
        long_about = "Runs the fixed battery of checks for one step. The step comes from \
                      --step, then CURRENT_STEP, then the progress file.\n\n\
                      Examples:\n  \
                      stepgate test\n  \
                      stepgate test --step 3\n  \
                      CURRENT_STEP=2 stepgate test --format json"
    )]
    Test(TestArgs),

    #[command(about = "Validate required files and forbidden tooling")]
    Structure(StructureArgs),

    #[command(about = "Review the step tag sequence and print guidance")]
    Tags(TagsArgs),

    #[command(
        about = "POST sample registrations to a running endpoint",
        long_about = "Submits an empty and a valid registration to a locally served endpoint \
                      and checks the responses.\n\n\
                      Examples:\n  \
                      stepgate smoke\n  \
                      stepgate smoke --url http://localhost:8000/process.php"
    )]
    Smoke(SmokeArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct DetectArgs {
    #[arg(short = 'f', long, value_enum, default_value = "human", help = "Output format")]
    pub format: OutputFormatArg,
}

#[derive(Parser, Debug, Clone)]
pub struct TestArgs {
    #[arg(short = 's', long, value_name = "N", help = "Step whose checks to run")]
    pub step: Option<u32>,

    #[arg(short = 'f', long, value_enum, default_value = "human", help = "Output format")]
    pub format: OutputFormatArg,
}

#[derive(Parser, Debug, Clone)]
pub struct StructureArgs {
    #[arg(
        short = 's',
        long,
        value_name = "N",
        help = "Current step used to gate content checks (defaults to the progress file)"
    )]
    pub step: Option<u32>,

    #[arg(short = 'f', long, value_enum, default_value = "human", help = "Output format")]
    pub format: OutputFormatArg,
}

#[derive(Parser, Debug, Clone)]
pub struct TagsArgs {
    #[arg(short = 'f', long, value_enum, default_value = "human", help = "Output format")]
    pub format: OutputFormatArg,
}

#[derive(Parser, Debug, Clone)]
pub struct SmokeArgs {
    #[arg(long, value_name = "URL", help = "Registration endpoint to POST to")]
    pub url: Option<String>,

    #[arg(short = 'f', long, value_enum, default_value = "human", help = "Output format")]
    pub format: OutputFormatArg,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}
