use stepgate::cli::commands::{CliArgs, Commands};
use stepgate::cli::handlers::{
    handle_detect, handle_smoke, handle_structure, handle_tags, handle_test,
};
use stepgate::config::StepgateConfig;
use stepgate::util::logging::{init_logging, parse_level, LoggingConfig};
use stepgate::VERSION;

use clap::Parser;
use tracing::{debug, error, Level};

fn main() {
    let args = CliArgs::parse();
    let config = config_from_args(&args);
    init_logging_from_args(&args, &config);

    debug!("stepgate v{} starting", VERSION);
    debug!("Arguments: {:?}", args);

    if let Err(e) = config.validate() {
        error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
    debug!("{}", config);

    let exit_code = match &args.command {
        Commands::Detect(detect_args) => handle_detect(detect_args, &config),
        Commands::Test(test_args) => handle_test(test_args, &config),
        Commands::Structure(structure_args) => handle_structure(structure_args, &config),
        Commands::Tags(tags_args) => handle_tags(tags_args, &config),
        Commands::Smoke(smoke_args) => handle_smoke(smoke_args, &config),
    };

    std::process::exit(exit_code);
}

fn config_from_args(args: &CliArgs) -> StepgateConfig {
    let mut config = StepgateConfig::from_env();

    if let Some(project) = &args.project {
        config.project_root = project.clone();
    }
    if let Some(progress_file) = &args.progress_file {
        config.progress_file = progress_file.clone();
    }
    if let Some(level) = &args.log_level {
        config.log_level = level.to_lowercase();
    }

    config
}

fn init_logging_from_args(args: &CliArgs, config: &StepgateConfig) {
    let level = if args.log_level.is_some() {
        parse_level(&config.log_level)
    } else if args.verbose {
        Level::DEBUG
    } else if args.quiet {
        Level::ERROR
    } else {
        parse_level(&config.log_level)
    };

    init_logging(LoggingConfig::for_run(level, config.ci));
}
