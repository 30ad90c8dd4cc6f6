//! Run the analysis over files and collect the outcome of a batch.

use std::{fs, path::{Path, PathBuf}};
use crate::{
    error::Error,
    files::go_files,
    parser,
    report::plain_line,
    syntax::LineIndex,
    unused::{Settings, UnusedParam},
};

/// Diagnostics of one analyzed file
#[derive(Debug, Clone)]
pub struct FileReport {
    pub path: PathBuf,
    pub content: String,
    pub results: Vec<UnusedParam>,
}

/// Result of checking a batch of paths
#[derive(Debug, Default)]
pub struct Outcome {
    pub reports: Vec<FileReport>,
    pub errors: Vec<Error>,
    pub set_exit_status: bool,
}

impl Outcome {
    /// The diagnostic lines of all files, in order
    pub fn messages(&self) -> Vec<String> {
        self.reports.iter()
            .flat_map(|report| {
                let file = report.path.display().to_string();
                report.results.iter()
                    .map(move |result| plain_line(&file, result))
            })
            .collect()
    }

    pub fn has_results(&self) -> bool {
        self.reports.iter().any(|report| !report.results.is_empty())
    }

    /// Whether the run should signal failure for its findings
    pub fn exit_with_status(&self) -> bool {
        self.set_exit_status && self.has_results()
    }
}

/// Analyze `content` as if read from `path`
pub fn check_source(path: &Path, content: String, settings: &Settings) -> Result<FileReport, Error> {
    let ast = parser::parse(&content);
    if let Some(error) = ast.errors().first() {
        for error in ast.errors() {
            tracing::debug!("{}: {}", path.display(), error);
        }
        return Err(Error::Parse {
            path: path.to_path_buf(),
            line: LineIndex::new(&content).line(error.range.start()),
            message: error.message.clone(),
        });
    }

    let results = settings.find_unused_params(&ast.node());
    tracing::debug!("{}: {} unused", path.display(), results.len());
    Ok(FileReport {
        path: path.to_path_buf(),
        content,
        results,
    })
}

pub fn check_file(path: &Path, settings: &Settings) -> Result<FileReport, Error> {
    let content = fs::read_to_string(path)
        .map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
    check_source(path, content, settings)
}

/// Check every Go file below `paths`. A file that fails to read or parse
/// is recorded and skipped.
pub fn check_unused_params<P: AsRef<Path>>(
    paths: impl IntoIterator<Item = P>,
    settings: &Settings,
    hidden: bool,
) -> Outcome {
    let mut outcome = Outcome {
        set_exit_status: settings.set_exit_status,
        ..Outcome::default()
    };
    for file in go_files(paths, settings, hidden) {
        match file.and_then(|path| check_file(&path, settings)) {
            Ok(report) => outcome.reports.push(report),
            Err(err) => {
                tracing::error!("{}", err);
                outcome.errors.push(err);
            }
        }
    }
    outcome
}
