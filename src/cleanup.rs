//! The cleanup pass.
//!
//! Removes generated files and directories that do not apply to the chosen
//! configuration, then applies renames. Every target is handled on its own: a
//! failure is reported for that target and the pass moves on to the next one.
//! Nothing here returns an error to the caller.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::debug;

use crate::config::Rename;
use crate::paths;
use crate::status;

/// Why a single target could not be handled.
#[derive(Debug)]
pub enum CleanupError {
    NotFound(io::Error),
    PermissionDenied(io::Error),
    /// The target is locked or in use by another process
    Busy(io::Error),
    /// The target resolves outside the directory the pass is confined to
    OutsideRoot(PathBuf),
    /// The target string could not be turned into a path
    InvalidTarget(String),
    Other(io::Error),
}

impl From<io::Error> for CleanupError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => CleanupError::NotFound(err),
            io::ErrorKind::PermissionDenied => CleanupError::PermissionDenied(err),
            io::ErrorKind::ResourceBusy => CleanupError::Busy(err),
            _ => CleanupError::Other(err),
        }
    }
}

impl From<crate::error::Error> for CleanupError {
    fn from(err: crate::error::Error) -> Self {
        match err {
            crate::error::Error::IoError(e) => e.into(),
            other => CleanupError::InvalidTarget(other.to_string()),
        }
    }
}

impl fmt::Display for CleanupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CleanupError::NotFound(e) => write!(f, "not found ({})", e),
            CleanupError::PermissionDenied(e) => write!(f, "permission denied ({})", e),
            CleanupError::Busy(e) => write!(f, "resource busy ({})", e),
            CleanupError::OutsideRoot(root) => {
                write!(f, "refusing to touch a path outside {}", root.display())
            }
            CleanupError::InvalidTarget(msg) => write!(f, "{}", msg),
            CleanupError::Other(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CleanupError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File,
}

/// Result of handling one target.
#[derive(Debug)]
pub enum Outcome {
    Removed { path: PathBuf, kind: EntryKind },
    Renamed { from: PathBuf, to: PathBuf },
    /// Rename source absent; nothing to do
    Skipped { path: PathBuf },
    Failed { target: String, error: CleanupError },
}

/// Ordered outcomes of a cleanup pass.
#[derive(Debug, Default)]
pub struct CleanupReport {
    pub outcomes: Vec<Outcome>,
}

impl CleanupReport {
    pub fn removed(&self) -> impl Iterator<Item = (&Path, EntryKind)> {
        self.outcomes.iter().filter_map(|o| match o {
            Outcome::Removed { path, kind } => Some((path.as_path(), *kind)),
            _ => None,
        })
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &CleanupError)> {
        self.outcomes.iter().filter_map(|o| match o {
            Outcome::Failed { target, error } => Some((target.as_str(), error)),
            _ => None,
        })
    }

    pub fn is_clean(&self) -> bool {
        self.failures().next().is_none()
    }
}

/// Settings for a cleanup pass.
#[derive(Debug, Clone)]
pub struct CleanupOptions {
    /// Directory relative targets are resolved against
    pub base_dir: PathBuf,
    /// Refuse targets that do not resolve strictly inside `base_dir`
    pub contain: bool,
    /// Print a line for each successful removal or rename
    pub verbose: bool,
}

impl CleanupOptions {
    pub fn new<P: Into<PathBuf>>(base_dir: P) -> Self {
        Self { base_dir: base_dir.into(), contain: false, verbose: false }
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn contain(mut self, contain: bool) -> Self {
        self.contain = contain;
        self
    }

    fn root(&self) -> Option<PathBuf> {
        if self.contain {
            paths::resolve(".", &self.base_dir).ok()
        } else {
            None
        }
    }
}

fn check_root(path: &Path, root: Option<&Path>) -> Result<(), CleanupError> {
    match root {
        Some(root) if !paths::is_inside(path, root) => {
            Err(CleanupError::OutsideRoot(root.to_path_buf()))
        }
        _ => Ok(()),
    }
}

/// Removes a resolved path: a directory with everything beneath it, or a
/// single file. A symlink is removed as a link.
pub fn remove_path(path: &Path) -> Result<EntryKind, CleanupError> {
    let file_type = fs::symlink_metadata(path)?.file_type();
    if file_type.is_symlink() {
        remove_link(path)?;
        Ok(EntryKind::File)
    } else if file_type.is_dir() {
        fs::remove_dir_all(path)?;
        Ok(EntryKind::Directory)
    } else {
        fs::remove_file(path)?;
        Ok(EntryKind::File)
    }
}

#[cfg(not(windows))]
fn remove_link(path: &Path) -> io::Result<()> {
    fs::remove_file(path)
}

/// Directory symlinks on Windows need `remove_dir`; the first error wins.
#[cfg(windows)]
fn remove_link(path: &Path) -> io::Result<()> {
    fs::remove_file(path).or_else(|err| fs::remove_dir(path).map_err(|_| err))
}

fn report_removed(path: &Path, kind: EntryKind, verbose: bool) {
    debug!("Removed {:?}: {}", kind, path.display());
    if verbose {
        let label = match kind {
            EntryKind::Directory => "Directory deleted",
            EntryKind::File => "File deleted",
        };
        status::success(format!("{}: {}", label, path.display()));
    }
}

fn report_failed(target: &str, error: &CleanupError) {
    debug!("Failed to handle {}: {:?}", target, error);
    status::error(format!("Failed to delete {}: {}", target, error));
}

fn remove_resolved(
    path: PathBuf,
    root: Option<&Path>,
    verbose: bool,
    report: &mut CleanupReport,
) {
    match check_root(&path, root).and_then(|_| remove_path(&path)) {
        Ok(kind) => {
            report_removed(&path, kind, verbose);
            report.outcomes.push(Outcome::Removed { path, kind });
        }
        Err(error) => {
            let target = path.display().to_string();
            report_failed(&target, &error);
            report.outcomes.push(Outcome::Failed { target, error });
        }
    }
}

/// Removes every target in order and reports what happened to each one.
///
/// Targets may be relative (to `options.base_dir`), start with `~`, or be glob
/// patterns. A pattern that matches nothing is not an error.
pub fn remove_files_and_folders<S: AsRef<str>>(
    targets: &[S],
    options: &CleanupOptions,
) -> CleanupReport {
    let root = options.root();
    let mut report = CleanupReport::default();

    for target in targets {
        let target = target.as_ref();
        if paths::is_glob(target) {
            match paths::expand_glob(target, &options.base_dir) {
                Ok(expansion) => {
                    if expansion.matches.is_empty() && expansion.errors.is_empty() {
                        debug!("Pattern {} matched nothing", target);
                    }
                    for (path, err) in expansion.errors {
                        let target = path.display().to_string();
                        let error = CleanupError::from(err);
                        report_failed(&target, &error);
                        report.outcomes.push(Outcome::Failed { target, error });
                    }
                    for path in expansion.matches {
                        remove_resolved(path, root.as_deref(), options.verbose, &mut report);
                    }
                }
                Err(e) => {
                    let error = CleanupError::from(e);
                    report_failed(target, &error);
                    report.outcomes.push(Outcome::Failed { target: target.to_string(), error });
                }
            }
            continue;
        }

        match paths::resolve(target, &options.base_dir) {
            Ok(path) => remove_resolved(path, root.as_deref(), options.verbose, &mut report),
            Err(e) => {
                let error = CleanupError::from(e);
                report_failed(target, &error);
                report.outcomes.push(Outcome::Failed { target: target.to_string(), error });
            }
        }
    }

    report
}

fn rename_one(rename: &Rename, root: Option<&Path>, base: &Path) -> Result<Outcome, CleanupError> {
    let from = paths::resolve(&rename.from, base)?;
    if fs::symlink_metadata(&from).is_err() {
        return Ok(Outcome::Skipped { path: from });
    }
    let to = paths::resolve(&rename.to, base)?;
    check_root(&from, root)?;
    check_root(&to, root)?;
    fs::rename(&from, &to)?;
    Ok(Outcome::Renamed { from, to })
}

/// Applies renames in order. A missing source is skipped quietly, any other
/// failure is reported for that rename only.
pub fn apply_renames(renames: &[Rename], options: &CleanupOptions) -> CleanupReport {
    let root = options.root();
    let mut report = CleanupReport::default();

    for rename in renames {
        match rename_one(rename, root.as_deref(), &options.base_dir) {
            Ok(Outcome::Renamed { from, to }) => {
                debug!("Renamed {} to {}", from.display(), to.display());
                if options.verbose {
                    status::success(format!("Renamed: {} -> {}", from.display(), to.display()));
                }
                report.outcomes.push(Outcome::Renamed { from, to });
            }
            Ok(outcome) => {
                debug!("Nothing to rename for {}", rename.from);
                report.outcomes.push(outcome);
            }
            Err(error) => {
                debug!("Failed to rename {}: {:?}", rename.from, error);
                status::error(format!("Failed to rename {}: {}", rename.from, error));
                report.outcomes.push(Outcome::Failed { target: rename.from.clone(), error });
            }
        }
    }

    report
}
