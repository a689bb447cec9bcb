use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use qml_moodle::{Direction, IdStrategy};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
    /// YAML settings file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
    /// How QML identifiers are made up (overrides the settings file)
    #[arg(long, value_enum, global = true)]
    pub id_strategy: Option<IdStrategyArg>,
    /// Drop questions that cannot be converted instead of failing the file
    #[arg(long, global = true)]
    pub skip_invalid_questions: bool,
    /// Stop a batch at the first file that fails
    #[arg(long, global = true)]
    pub fail_fast: bool,
    /// Debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Convert a Moodle quiz export to QML
    ToQml {
        input: PathBuf,
        /// Defaults to the input path with `.qml` appended
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Convert a QML file to a Moodle quiz export
    ToMoodle {
        input: PathBuf,
        /// Defaults to the input path with `.xml` appended
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Convert every source file of a directory
    Batch {
        #[arg(default_value = ".")]
        dir: PathBuf,
        #[arg(short, long, value_enum, default_value = "to-moodle")]
        direction: DirectionArg,
    },
    /// Print the questions of a Moodle or QML file as JSON
    Inspect { input: PathBuf },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum DirectionArg {
    ToMoodle,
    ToQml,
}

impl From<DirectionArg> for Direction {
    fn from(value: DirectionArg) -> Self {
        match value {
            DirectionArg::ToMoodle => Direction::ToMoodle,
            DirectionArg::ToQml => Direction::ToQml,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum IdStrategyArg {
    Digest,
    Counter,
}

impl From<IdStrategyArg> for IdStrategy {
    fn from(value: IdStrategyArg) -> Self {
        match value {
            IdStrategyArg::Digest => IdStrategy::Digest,
            IdStrategyArg::Counter => IdStrategy::Counter,
        }
    }
}
