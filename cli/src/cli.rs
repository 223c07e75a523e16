//! The command-line surface.
//!
//! Parsing here is deliberately dumb plumbing: it only turns argv into a
//! [`GuardedCommand`]. All path validation lives behind that type.

use std::path::PathBuf;

use clap::Parser;
use subguard_core::GuardedCommand;

/// Sudo guard for btrfs backup management.
///
/// Validates every path argument against the invoking user's allowed root
/// and, only if all of them pass, replaces itself with the privileged
/// command.
#[derive(Debug, Parser)]
#[clap(name = "subguard", version)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: RootCommand,
}

#[derive(Debug, clap::Subcommand)]
pub enum RootCommand {
    /// Rename a path within the allowed root.
    Mv {
        source: PathBuf,
        destination: PathBuf,
    },

    /// Btrfs subvolume and stream operations.
    #[clap(subcommand)]
    Btrfs(BtrfsCommand),
}

#[derive(Debug, clap::Subcommand)]
pub enum BtrfsCommand {
    /// Manage subvolumes beneath the allowed root.
    #[clap(subcommand, visible_alias = "sub")]
    Subvolume(SubvolumeCommand),

    /// Receive a subvolume stream into the allowed root.
    Receive {
        /// Confine the received stream to the target. Accepted for
        /// compatibility with btrfs-receive; the guard always confines.
        #[clap(short = 'C', long = "chroot")]
        _chroot: bool,

        target: PathBuf,
    },

    /// Print the btrfs-progs version.
    Version,
}

#[derive(Debug, clap::Subcommand)]
pub enum SubvolumeCommand {
    /// Create a new subvolume.
    Create { target: PathBuf },

    /// Delete one or more subvolumes.
    #[clap(visible_alias = "del")]
    Delete {
        #[clap(required = true, num_args = 1..)]
        targets: Vec<PathBuf>,
    },

    /// Show details of a subvolume.
    Show { target: PathBuf },

    /// List the subvolumes directly below a path.
    List {
        #[clap(short = 'o', value_name = "PATH")]
        path: PathBuf,
    },
}

impl RootCommand {
    pub fn into_guarded(self) -> GuardedCommand {
        match self {
            Self::Mv {
                source,
                destination,
            } => GuardedCommand::Move {
                source,
                destination,
            },
            Self::Btrfs(BtrfsCommand::Subvolume(SubvolumeCommand::Create { target })) => {
                GuardedCommand::SubvolumeCreate { target }
            }
            Self::Btrfs(BtrfsCommand::Subvolume(SubvolumeCommand::Delete { targets })) => {
                GuardedCommand::SubvolumeDelete { targets }
            }
            Self::Btrfs(BtrfsCommand::Subvolume(SubvolumeCommand::Show { target })) => {
                GuardedCommand::SubvolumeShow { target }
            }
            Self::Btrfs(BtrfsCommand::Subvolume(SubvolumeCommand::List { path })) => {
                GuardedCommand::SubvolumeList { path }
            }
            Self::Btrfs(BtrfsCommand::Receive { target, .. }) => {
                GuardedCommand::Receive { target }
            }
            Self::Btrfs(BtrfsCommand::Version) => GuardedCommand::Version,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(args: &[&str]) -> GuardedCommand {
        Cli::try_parse_from(args)
            .expect("parse args")
            .command
            .into_guarded()
    }

    #[test]
    fn parses_mv() {
        assert_eq!(
            parse(&["subguard", "mv", "/data/a", "/data/b"]),
            GuardedCommand::Move {
                source: PathBuf::from("/data/a"),
                destination: PathBuf::from("/data/b"),
            }
        );
    }

    #[test]
    fn parses_subvolume_create() {
        assert_eq!(
            parse(&["subguard", "btrfs", "subvolume", "create", "/data/new"]),
            GuardedCommand::SubvolumeCreate {
                target: PathBuf::from("/data/new"),
            }
        );
    }

    #[test]
    fn parses_subvolume_delete_with_multiple_targets() {
        assert_eq!(
            parse(&["subguard", "btrfs", "subvolume", "delete", "/data/a", "/data/b"]),
            GuardedCommand::SubvolumeDelete {
                targets: vec![PathBuf::from("/data/a"), PathBuf::from("/data/b")],
            }
        );
    }

    #[test]
    fn accepts_the_sub_and_del_aliases() {
        assert_eq!(
            parse(&["subguard", "btrfs", "sub", "del", "/data/a"]),
            GuardedCommand::SubvolumeDelete {
                targets: vec![PathBuf::from("/data/a")],
            }
        );
    }

    #[test]
    fn parses_subvolume_show() {
        assert_eq!(
            parse(&["subguard", "btrfs", "subvolume", "show", "/data"]),
            GuardedCommand::SubvolumeShow {
                target: PathBuf::from("/data"),
            }
        );
    }

    #[test]
    fn parses_subvolume_list_with_dash_o() {
        assert_eq!(
            parse(&["subguard", "btrfs", "subvolume", "list", "-o", "/data"]),
            GuardedCommand::SubvolumeList {
                path: PathBuf::from("/data"),
            }
        );
    }

    #[test]
    fn parses_receive_with_and_without_the_chroot_flag() {
        let expected = GuardedCommand::Receive {
            target: PathBuf::from("/data"),
        };
        assert_eq!(parse(&["subguard", "btrfs", "receive", "/data"]), expected);
        assert_eq!(
            parse(&["subguard", "btrfs", "receive", "-C", "/data"]),
            expected
        );
    }

    #[test]
    fn parses_version() {
        assert_eq!(
            parse(&["subguard", "btrfs", "version"]),
            GuardedCommand::Version
        );
    }

    #[test]
    fn rejects_a_bare_invocation() {
        assert!(Cli::try_parse_from(["subguard"]).is_err());
    }

    #[test]
    fn rejects_delete_without_targets() {
        assert!(Cli::try_parse_from(["subguard", "btrfs", "subvolume", "delete"]).is_err());
    }

    #[test]
    fn rejects_list_without_dash_o() {
        assert!(Cli::try_parse_from(["subguard", "btrfs", "subvolume", "list"]).is_err());
    }

    #[test]
    fn rejects_mv_with_a_single_path() {
        assert!(Cli::try_parse_from(["subguard", "mv", "/data/a"]).is_err());
    }
}
