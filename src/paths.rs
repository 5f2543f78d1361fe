//! Target path resolution.
//!
//! Turns the path strings produced by the rules into absolute filesystem
//! locations: `~` is expanded to the home directory, relative paths are joined
//! onto the base directory, and symlinks in parent components are resolved.
//! A symlink in the final component is kept as-is so that removing the target
//! removes the link, never what it points to.
//!
//! Strings containing glob metacharacters are expanded by walking the
//! directory tree under their literal prefix.

use std::io;
use std::path::{Component, Path, PathBuf};

use globset::GlobBuilder;
use log::debug;
use walkdir::WalkDir;

use crate::error::{Error, Result};

const GLOB_CHARS: [char; 4] = ['*', '?', '[', '{'];

/// Returns true if `path` should be treated as a glob pattern.
pub fn is_glob(path: &str) -> bool {
    path.contains(GLOB_CHARS)
}

/// Expands a leading `~` or `~/` to the user's home directory.
///
/// `~user` forms are left untouched, as is everything when no home directory
/// can be determined.
pub fn expand_home(path: &str) -> PathBuf {
    let rest = if path == "~" {
        Some("")
    } else {
        path.strip_prefix("~/").or_else(|| path.strip_prefix("~\\"))
    };
    match (rest, dirs::home_dir()) {
        (Some(rest), Some(home)) if rest.is_empty() => home,
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

/// Removes `.` and `..` components without touching the filesystem.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            // `..` at the root stays at the root
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => normalized.push(".."),
            },
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Makes `path` absolute against `base`, which itself is made absolute against
/// the current directory.
pub fn absolutize(path: &Path, base: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let base = if base.is_absolute() {
        base.to_path_buf()
    } else {
        std::env::current_dir().map_err(Error::IoError)?.join(base)
    };
    Ok(base.join(path))
}

fn is_symlink(path: &Path) -> bool {
    std::fs::symlink_metadata(path).map(|m| m.file_type().is_symlink()).unwrap_or(false)
}

/// Canonicalizes the parent of `path` and re-attaches the final component.
fn canonicalize_parent(path: &Path) -> Option<PathBuf> {
    let name = path.file_name()?;
    let parent = std::fs::canonicalize(path.parent()?).ok()?;
    Some(parent.join(name))
}

/// Canonicalizes an absolute path, keeping a final symlink component unresolved.
///
/// When the path does not exist, its parent is canonicalized instead; failing
/// that, the path is only normalized lexically.
pub fn canonicalize_target(path: &Path) -> PathBuf {
    if is_symlink(path) {
        return canonicalize_parent(path).unwrap_or_else(|| normalize_lexically(path));
    }
    match std::fs::canonicalize(path) {
        Ok(resolved) => resolved,
        Err(e) => {
            debug!("Cannot canonicalize {}: {}", path.display(), e);
            let normalized = normalize_lexically(path);
            canonicalize_parent(&normalized).unwrap_or(normalized)
        }
    }
}

/// Resolves a single target string to its absolute, canonical location.
pub fn resolve<P: AsRef<Path>>(target: &str, base: P) -> Result<PathBuf> {
    if target.trim().is_empty() {
        return Err(Error::PathError("empty target path".to_string()));
    }
    let expanded = expand_home(target);
    let absolute = absolutize(&expanded, base.as_ref())?;
    Ok(canonicalize_target(&absolute))
}

/// Longest leading run of components without glob metacharacters.
fn literal_prefix(pattern: &Path) -> PathBuf {
    let mut prefix = PathBuf::new();
    for component in pattern.components() {
        if is_glob(&component.as_os_str().to_string_lossy()) {
            break;
        }
        prefix.push(component.as_os_str());
    }
    prefix
}

/// Entries a glob target expanded to, plus the entries that could not be read
/// while walking.
#[derive(Debug, Default)]
pub struct GlobExpansion {
    pub matches: Vec<PathBuf>,
    pub errors: Vec<(PathBuf, io::Error)>,
}

/// Splits an absolute pattern into the part shared with `base`, which is taken
/// literally, and the remainder, which is glob syntax.
fn split_at_base(pattern: &Path, base: &Path) -> (PathBuf, PathBuf) {
    let mut anchor = PathBuf::new();
    let mut pattern_components = pattern.components();
    let mut base_components = base.components();
    loop {
        let rest = pattern_components.clone();
        match (pattern_components.next(), base_components.next()) {
            (Some(p), Some(b)) if p == b => anchor.push(p.as_os_str()),
            _ => return (anchor, rest.as_path().to_path_buf()),
        }
    }
}

/// Expands a glob target to the existing entries it matches, in walk order.
///
/// Components the pattern shares with `base` are matched literally, so glob
/// characters in the output directory's own name never widen the match.
/// Matching directories are not descended into, so a pattern like `build/**`
/// yields `build/a` but not `build/a/b` as well. Entries that cannot be read
/// are collected in `errors` and the walk goes on.
pub fn expand_glob<P: AsRef<Path>>(pattern: &str, base: P) -> Result<GlobExpansion> {
    let base = normalize_lexically(&absolutize(base.as_ref(), Path::new("."))?);
    let expanded = expand_home(pattern);
    let absolute = normalize_lexically(&absolutize(&expanded, &base)?);
    let (anchor, relative) = split_at_base(&absolute, &base);

    let relative_str = relative
        .to_str()
        .ok_or_else(|| Error::PathError(format!("non UTF-8 pattern: {}", relative.display())))?;

    let mut expansion = GlobExpansion::default();
    if !is_glob(relative_str) {
        // Every glob character sat in the shared part; what is left is a plain path.
        let path = anchor.join(&relative);
        if std::fs::symlink_metadata(&path).is_ok() {
            expansion.matches.push(canonicalize_target(&path));
        }
        return Ok(expansion);
    }

    let matcher = GlobBuilder::new(relative_str)
        .literal_separator(true)
        .build()
        .map_err(|e| Error::PathError(format!("invalid pattern '{}': {}", pattern, e)))?
        .compile_matcher();

    let root = anchor.join(literal_prefix(&relative));
    debug!("Expanding pattern {} under {}", relative_str, root.display());
    if !root.is_dir() {
        return Ok(expansion);
    }

    let mut walker = WalkDir::new(&root).min_depth(1).sort_by_file_name().into_iter();
    while let Some(entry) = walker.next() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| root.clone());
                debug!("Cannot read {} while expanding {}: {}", path.display(), pattern, e);
                expansion.errors.push((path, io::Error::from(e)));
                continue;
            }
        };
        let Ok(candidate) = entry.path().strip_prefix(&anchor) else {
            continue;
        };
        if matcher.is_match(candidate) {
            if entry.file_type().is_dir() {
                walker.skip_current_dir();
            }
            expansion.matches.push(canonicalize_target(entry.path()));
        }
    }
    Ok(expansion)
}

/// Returns true if `path` lies strictly inside `root`.
pub fn is_inside(path: &Path, root: &Path) -> bool {
    path != root && path.starts_with(root)
}
