use std::fs;
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use log::{debug, error, info, warn};
use thiserror::Error;

use qml_moodle::batch::{convert_directory, convert_file, derived_path};
use qml_moodle::{
    read_any, ConversionError, ConversionSettings, Direction, FilePolicy, QuestionPolicy,
    SettingsError,
};

mod cli;

#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Conversion(#[from] ConversionError),
    #[error("Cannot print questions: {0}")]
    Json(#[from] serde_json::Error),
}

/// Settings file first, then command line overrides
fn load_settings(args: &cli::Cli) -> Result<ConversionSettings, SettingsError> {
    let mut settings = match &args.config {
        Some(path) => {
            debug!("Loading settings from {}", path.display());
            ConversionSettings::from_yaml_file(path)?
        }
        None => ConversionSettings::default(),
    };

    if let Some(strategy) = args.id_strategy {
        settings.id_strategy = strategy.into();
    }
    if args.skip_invalid_questions {
        settings.question_policy = QuestionPolicy::Skip;
    }
    if args.fail_fast {
        settings.file_policy = FilePolicy::Abort;
    }
    Ok(settings)
}

fn convert_one(
    direction: Direction,
    input: &Path,
    output: Option<&Path>,
    settings: &ConversionSettings,
) -> bool {
    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| derived_path(direction, input));

    match convert_file(direction, input, &output, settings) {
        Ok(_) => true,
        Err(err) => {
            // A failed file is reported, not propagated
            error!("Error during conversion: {}", err);
            false
        }
    }
}

/// Returns whether every file converted
fn run(args: cli::Cli) -> Result<bool, AppError> {
    let settings = load_settings(&args)?;

    match args.command {
        cli::Command::ToQml { input, output } => {
            Ok(convert_one(Direction::ToQml, &input, output.as_deref(), &settings))
        }
        cli::Command::ToMoodle { input, output } => {
            Ok(convert_one(Direction::ToMoodle, &input, output.as_deref(), &settings))
        }
        cli::Command::Batch { dir, direction } => {
            let report = convert_directory(&dir, direction.into(), &settings)?;
            info!(
                "{} file(s) converted, {} failed",
                report.converted.len(),
                report.failed.len()
            );
            for failed in &report.failed {
                warn!("Not converted: {}", failed.input.display());
            }
            Ok(report.is_success())
        }
        cli::Command::Inspect { input } => {
            let xml = fs::read_to_string(&input).map_err(|e| ConversionError::Io {
                path: input.clone(),
                source: e,
            })?;
            let (dialect, bank) = read_any(&xml, &settings)?;
            info!("{} is a {} document", input.display(), dialect);
            println!("{}", serde_json::to_string_pretty(&bank)?);
            Ok(true)
        }
    }
}

fn main() -> ExitCode {
    let args = cli::Cli::parse();

    // RUST_LOG wins over the verbosity flag
    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match run(args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}
