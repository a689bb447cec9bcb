//! File and directory conversion
//!
//! A file is converted completely in memory before anything is written, so a
//! failed conversion never leaves a partial output file behind. Directory
//! batches pick up every source file of the direction's extension and write
//! `<original-name>.<target-extension>` next to it.

use std::fs;
use std::path::{Path, PathBuf};

use log::{error, info};

use crate::convert::convert;
use crate::errors::{ConversionError, Result};
use crate::types::{ConversionSettings, ConversionWarning, Direction, FilePolicy};

/// Output path for a source path: the target extension is appended
///
/// `bank.qml` becomes `bank.qml.xml` when converting to Moodle.
pub fn derived_path(direction: Direction, input: &Path) -> PathBuf {
    let mut name = input.as_os_str().to_os_string();
    name.push(".");
    name.push(direction.target_extension());
    PathBuf::from(name)
}

/// Whether a batch in `direction` treats `path` as a source document
pub fn is_source(direction: Direction, path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| ext == direction.source_extension())
}

/// Convert one file; the output is written only if conversion succeeds
pub fn convert_file(
    direction: Direction,
    input: &Path,
    output: &Path,
    settings: &ConversionSettings,
) -> Result<Vec<ConversionWarning>> {
    let source = fs::read_to_string(input).map_err(|e| ConversionError::io(input, e))?;
    let converted = convert(direction, &source, settings)?;
    fs::write(output, converted.xml).map_err(|e| ConversionError::io(output, e))?;

    info!(
        "Successfully converted {} to {} ({} warning(s))",
        input.display(),
        output.display(),
        converted.warnings.len()
    );
    Ok(converted.warnings)
}

/// A file converted by a batch
#[derive(Debug)]
pub struct ConvertedFile {
    pub input: PathBuf,
    pub output: PathBuf,
    pub warnings: Vec<ConversionWarning>,
}

/// A file a batch failed to convert
#[derive(Debug)]
pub struct FailedFile {
    pub input: PathBuf,
    pub error: ConversionError,
}

/// Per-file outcome of a directory batch
#[derive(Debug, Default)]
pub struct BatchReport {
    pub converted: Vec<ConvertedFile>,
    pub failed: Vec<FailedFile>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Convert every source file of `dir`, in file name order
///
/// Under [`FilePolicy::Continue`] failures are logged and collected in the
/// report; under [`FilePolicy::Abort`] the first failure ends the batch.
pub fn convert_directory(
    dir: &Path,
    direction: Direction,
    settings: &ConversionSettings,
) -> Result<BatchReport> {
    let entries = fs::read_dir(dir).map_err(|e| ConversionError::io(dir, e))?;

    let mut sources = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| ConversionError::io(dir, e))?.path();
        if path.is_file() && is_source(direction, &path) {
            sources.push(path);
        }
    }
    sources.sort();

    info!(
        "Converting {} {} file(s) in {}",
        sources.len(),
        direction.source(),
        dir.display()
    );

    let mut report = BatchReport::default();
    for input in sources {
        let output = derived_path(direction, &input);
        match convert_file(direction, &input, &output, settings) {
            Ok(warnings) => report.converted.push(ConvertedFile {
                input,
                output,
                warnings,
            }),
            Err(err) => {
                error!("Error during conversion of {}: {}", input.display(), err);
                if settings.file_policy == FilePolicy::Abort {
                    return Err(err);
                }
                report.failed.push(FailedFile { input, error: err });
            }
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_path_appends_extension() {
        assert_eq!(
            derived_path(Direction::ToMoodle, Path::new("dir/bank.qml")),
            PathBuf::from("dir/bank.qml.xml")
        );
        assert_eq!(
            derived_path(Direction::ToQml, Path::new("quiz.xml")),
            PathBuf::from("quiz.xml.qml")
        );
    }

    #[test]
    fn test_is_source() {
        assert!(is_source(Direction::ToMoodle, Path::new("bank.qml")));
        assert!(!is_source(Direction::ToMoodle, Path::new("quiz.xml")));
        assert!(!is_source(Direction::ToMoodle, Path::new("bank.qml.xml")));
        assert!(!is_source(Direction::ToMoodle, Path::new("qml")));
        assert!(is_source(Direction::ToQml, Path::new("quiz.xml")));
        assert!(!is_source(Direction::ToQml, Path::new("quiz.xml.qml")));
    }
}
