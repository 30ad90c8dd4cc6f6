use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};
use crate::{error::Error, unused::Settings};

/// Go sources below `paths`, in a stable order
///
/// Paths naming a file are taken as given. Directories are searched
/// recursively for `*.go` files.
pub fn go_files<P: AsRef<Path>>(
    paths: impl IntoIterator<Item = P>,
    settings: &Settings,
    hidden: bool,
) -> Vec<Result<PathBuf, Error>> {
    let mut files = Vec::new();
    for path in paths {
        let path = path.as_ref();
        if !path.is_dir() {
            files.push(Ok(path.to_path_buf()));
            continue;
        }

        let walker = WalkDir::new(path)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| hidden || entry.depth() == 0 || !is_hidden(entry));
        for entry in walker {
            match entry {
                Ok(entry) if entry.file_type().is_file() && is_go_source(entry.path(), settings) =>
                    files.push(Ok(entry.into_path())),
                Ok(_) => {}
                Err(err) => files.push(Err(Error::Walk(err))),
            }
        }
    }
    files
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name()
        .to_str()
        .map_or(false, |name| name.starts_with('.'))
}

fn is_go_source(path: &Path, settings: &Settings) -> bool {
    let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
        return false;
    };
    name.ends_with(".go")
        && (settings.include_tests || !name.ends_with("_test.go"))
}

#[cfg(test)]
mod tests {
    use std::fs;
    use super::*;

    fn names(files: Vec<Result<PathBuf, Error>>) -> Vec<String> {
        files.into_iter()
            .map(|file| file.unwrap().file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn sorted_go_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.go"), "package b\n").unwrap();
        fs::write(dir.path().join("a.go"), "package a\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        let files = go_files([dir.path()], &Settings::default(), false);
        assert_eq!(names(files), vec!["a.go", "b.go"]);
    }

    #[test]
    fn tests_excluded() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.go"), "package a\n").unwrap();
        fs::write(dir.path().join("a_test.go"), "package a\n").unwrap();
        let settings = Settings {
            include_tests: false,
            ..Settings::default()
        };
        let files = go_files([dir.path()], &settings, false);
        assert_eq!(names(files), vec!["a.go"]);
    }

    #[test]
    fn hidden_skipped() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();
        fs::write(dir.path().join(".git").join("x.go"), "package x\n").unwrap();
        fs::write(dir.path().join("a.go"), "package a\n").unwrap();
        let files = go_files([dir.path()], &Settings::default(), false);
        assert_eq!(names(files), vec!["a.go"]);
        let files = go_files([dir.path()], &Settings::default(), true);
        assert_eq!(names(files), vec!["x.go", "a.go"]);
    }
}
