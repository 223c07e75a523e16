//! Best-effort path canonicalization.
//!
//! `std::fs::canonicalize` insists that the whole path exists, but several
//! guarded operations name paths that do not exist yet: the destination of
//! a move, a subvolume about to be created. Resolution here walks the path
//! one component at a time. Components that exist have their symlinks
//! resolved; once a component is missing, the remainder is kept literally,
//! with `..` still collapsing against the already-resolved prefix. The
//! prefix is symlink-free by construction, so that collapse is safe.

use std::collections::VecDeque;
use std::ffi::OsString;
use std::io;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

/// Upper bound on symlink hops before resolution gives up, mirroring the
/// kernel's ELOOP limit.
const MAX_SYMLINK_HOPS: u32 = 40;

enum Step {
    Parent,
    Normal(OsString),
}

/// Splits a path into its root (prefix and/or root directory, if any) and
/// the remaining lexical steps. `.` components are dropped here.
fn split_steps(path: &Path) -> (Option<PathBuf>, Vec<Step>) {
    let mut root: Option<PathBuf> = None;
    let mut steps = Vec::new();
    for component in path.components() {
        match component {
            Component::Prefix(prefix) => {
                root.get_or_insert_default().push(prefix.as_os_str());
            }
            Component::RootDir => {
                root.get_or_insert_default()
                    .push(std::path::MAIN_SEPARATOR_STR);
            }
            Component::CurDir => {}
            Component::ParentDir => steps.push(Step::Parent),
            Component::Normal(name) => steps.push(Step::Normal(name.to_os_string())),
        }
    }
    (root, steps)
}

/// Resolves `path` to an absolute, symlink-free form without requiring it
/// to exist. Relative paths are interpreted against the current directory.
///
/// Missing components (`NotFound`, or `NotADirectory` when the resolved
/// prefix turns out to be a plain file) are kept literally; any other I/O
/// error aborts the resolution so callers fail closed.
pub fn resolve_path(path: &Path) -> io::Result<PathBuf> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };

    let (root, steps) = split_steps(&absolute);
    let mut resolved =
        root.unwrap_or_else(|| PathBuf::from(std::path::MAIN_SEPARATOR_STR));
    let mut queue: VecDeque<Step> = steps.into();
    let mut hops = 0u32;

    while let Some(step) = queue.pop_front() {
        match step {
            // `..` above the root stays at the root, as realpath does.
            Step::Parent => {
                resolved.pop();
            }
            Step::Normal(name) => {
                resolved.push(&name);
                match std::fs::symlink_metadata(&resolved) {
                    Ok(metadata) if metadata.file_type().is_symlink() => {
                        hops += 1;
                        if hops > MAX_SYMLINK_HOPS {
                            return Err(io::Error::new(
                                io::ErrorKind::FilesystemLoop,
                                format!(
                                    "too many levels of symbolic links resolving {}",
                                    resolved.display()
                                ),
                            ));
                        }
                        let target = std::fs::read_link(&resolved)?;
                        resolved.pop();
                        let (target_root, target_steps) = split_steps(&target);
                        if let Some(target_root) = target_root {
                            resolved = target_root;
                        }
                        for step in target_steps.into_iter().rev() {
                            queue.push_front(step);
                        }
                    }
                    Ok(_) => {}
                    Err(error)
                        if matches!(
                            error.kind(),
                            io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
                        ) => {}
                    Err(error) => return Err(error),
                }
            }
        }
    }

    Ok(resolved)
}
