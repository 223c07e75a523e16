//! The guarded operations and their containment rules.

use std::ffi::OsString;
use std::path::Path;
use std::path::PathBuf;

use tracing::debug;

use crate::authorization::Authorization;
use crate::authorization::PathCheckMode;
use crate::error::Result;

/// A filesystem-management operation requested by the invoking user.
///
/// Each variant pairs its caller-supplied paths with a containment rule in
/// [`GuardedCommand::path_checks`], so the whole security-relevant mapping
/// is auditable in one place instead of scattered across handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardedCommand {
    /// `mv <source> <destination>`
    Move {
        source: PathBuf,
        destination: PathBuf,
    },
    /// `btrfs subvolume create <target>`
    SubvolumeCreate { target: PathBuf },
    /// `btrfs subvolume delete <target>...`
    SubvolumeDelete { targets: Vec<PathBuf> },
    /// `btrfs subvolume show <target>`
    SubvolumeShow { target: PathBuf },
    /// `btrfs subvolume list -o <path>`
    SubvolumeList { path: PathBuf },
    /// `btrfs receive --chroot <target>`
    Receive { target: PathBuf },
    /// `btrfs version`
    Version,
}

impl GuardedCommand {
    /// Every caller-supplied path in this command and the rule it must
    /// satisfy. Operations that mutate the node at a path (move, create,
    /// delete) must stay strictly beneath the allowed root; operations
    /// that inspect or receive into a subtree may also name the root.
    fn path_checks(&self) -> Vec<(&Path, PathCheckMode)> {
        match self {
            Self::Move {
                source,
                destination,
            } => vec![
                (source.as_path(), PathCheckMode::DescendantOnly),
                (destination.as_path(), PathCheckMode::DescendantOnly),
            ],
            Self::SubvolumeCreate { target } => {
                vec![(target.as_path(), PathCheckMode::DescendantOnly)]
            }
            Self::SubvolumeDelete { targets } => targets
                .iter()
                .map(|target| (target.as_path(), PathCheckMode::DescendantOnly))
                .collect(),
            Self::SubvolumeShow { target } => {
                vec![(target.as_path(), PathCheckMode::ExactOrDescendant)]
            }
            Self::SubvolumeList { path } => {
                vec![(path.as_path(), PathCheckMode::ExactOrDescendant)]
            }
            Self::Receive { target } => {
                vec![(target.as_path(), PathCheckMode::ExactOrDescendant)]
            }
            Self::Version => Vec::new(),
        }
    }

    /// Validates every candidate path against `auth` and only then builds
    /// the privileged argv. A single failing path fails the whole request
    /// and nothing is emitted; a multi-target delete is all-or-nothing.
    ///
    /// The argv carries the caller's original path spellings. Canonical
    /// forms exist only for the containment comparison; the privileged
    /// tool re-resolves at execution time, which leaves the usual
    /// check-to-use window open. That window cannot be closed from a
    /// process that exits before the tool runs.
    pub fn validated_argv(&self, auth: &Authorization) -> Result<Vec<OsString>> {
        for (path, mode) in self.path_checks() {
            auth.assert_path_allowed(path, mode)?;
        }
        let argv = self.argv();
        debug!(?argv, "all paths in bounds");
        Ok(argv)
    }

    fn argv(&self) -> Vec<OsString> {
        match self {
            Self::Move {
                source,
                destination,
            } => vec![
                OsString::from("mv"),
                source.clone().into_os_string(),
                destination.clone().into_os_string(),
            ],
            Self::SubvolumeCreate { target } => vec![
                OsString::from("btrfs"),
                OsString::from("subvolume"),
                OsString::from("create"),
                target.clone().into_os_string(),
            ],
            Self::SubvolumeDelete { targets } => {
                let mut argv = vec![
                    OsString::from("btrfs"),
                    OsString::from("subvolume"),
                    OsString::from("delete"),
                ];
                argv.extend(targets.iter().map(|target| target.clone().into_os_string()));
                argv
            }
            Self::SubvolumeShow { target } => vec![
                OsString::from("btrfs"),
                OsString::from("subvolume"),
                OsString::from("show"),
                target.clone().into_os_string(),
            ],
            Self::SubvolumeList { path } => vec![
                OsString::from("btrfs"),
                OsString::from("subvolume"),
                OsString::from("list"),
                OsString::from("-o"),
                path.clone().into_os_string(),
            ],
            Self::Receive { target } => vec![
                OsString::from("btrfs"),
                OsString::from("receive"),
                OsString::from("--chroot"),
                target.clone().into_os_string(),
            ],
            Self::Version => vec![OsString::from("btrfs"), OsString::from("version")],
        }
    }
}
