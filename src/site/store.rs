//! Markdown entries on disk.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

/// Filesystem errors for entry directories.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("directory does not exist: {}", .0.display())]
    DirNotFound(PathBuf),

    #[error("{} is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("cannot access directory {}: {source}", .dir.display())]
    Stat {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot read directory {}: {source}", .dir.display())]
    ReadDir {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot write {}: {source} (check permissions on {})", .path.display(), .dir.display())]
    Write {
        path: PathBuf,
        dir: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("file does not exist: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StoreError {
    /// Whether the error means "nothing there" rather than a failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::DirNotFound(_) | Self::FileNotFound(_))
    }
}

/// Write `contents` as `{dir}/{filename}`, replacing any existing file.
///
/// New files are created `0644` on Unix.
pub fn write_entry(dir: &Path, filename: &str, contents: &str) -> Result<PathBuf, StoreError> {
    let path = dir.join(filename);
    let to_error = |source| StoreError::Write {
        path: path.clone(),
        dir: dir.to_path_buf(),
        source,
    };

    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o644);
    }

    let mut file = options.open(&path).map_err(to_error)?;
    file.write_all(contents.as_bytes()).map_err(to_error)?;

    debug!(path = %path.display(), bytes = contents.len(), "Entry written");

    Ok(path)
}

/// Names of the `.md` files directly inside `dir`.
///
/// Extension match is case-insensitive; subdirectories are skipped.
/// Order follows the filesystem.
pub fn list_markdown(dir: &Path) -> Result<Vec<String>, StoreError> {
    let metadata = fs::metadata(dir).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            StoreError::DirNotFound(dir.to_path_buf())
        } else {
            StoreError::Stat {
                dir: dir.to_path_buf(),
                source,
            }
        }
    })?;

    if !metadata.is_dir() {
        return Err(StoreError::NotADirectory(dir.to_path_buf()));
    }

    let read_dir_error = |source| StoreError::ReadDir {
        dir: dir.to_path_buf(),
        source,
    };

    let mut names = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_dir_error)? {
        let entry = entry.map_err(read_dir_error)?;
        if entry.file_type().map_err(read_dir_error)?.is_dir() {
            continue;
        }

        let name = entry.file_name().to_string_lossy().into_owned();
        if has_markdown_ext(&name) {
            names.push(name);
        }
    }

    Ok(names)
}

/// Read `{dir}/{filename}` as UTF-8 text.
pub fn read_entry(dir: &Path, filename: &str) -> Result<String, StoreError> {
    let path = dir.join(filename);

    match fs::read_to_string(&path) {
        Ok(contents) => Ok(contents),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(StoreError::FileNotFound(path)),
        Err(source) => Err(StoreError::Read { path, source }),
    }
}

/// Suffix from the last `.`, compared case-insensitively to `.md`.
fn has_markdown_ext(name: &str) -> bool {
    name.rfind('.')
        .map(|i| name[i..].eq_ignore_ascii_case(".md"))
        .unwrap_or(false)
}
