//! The trust boundary for one guarded invocation.

use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use tracing::debug;
use tracing::warn;

use crate::canonicalize::resolve_path;
use crate::config::GuardConfig;
use crate::error::GuardError;
use crate::error::Result;
use crate::identity::InvokingUser;

/// How a candidate path may relate to the allowed root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathCheckMode {
    /// The path may be the allowed root itself or anything beneath it.
    /// Used by operations that inspect or operate within a subtree.
    ExactOrDescendant,
    /// The path must be strictly beneath the allowed root. Used by
    /// operations that create, move or delete the node at the path, so the
    /// root itself can never be the direct target of a mutation.
    DescendantOnly,
}

/// Holds the invoking user's grant for the lifetime of the process.
///
/// The allowed root is captured in canonical form at construction, and
/// every candidate path is canonicalized with the same rules before the
/// component-wise comparison. Comparing anything other than two
/// canonicalized paths is the classic bypass (`..` segments, symlinks,
/// string-prefix confusion between `/data/backup` and `/data/backup2`).
#[derive(Debug, Clone)]
pub struct Authorization {
    user: InvokingUser,
    allowed_root: PathBuf,
}

impl Authorization {
    /// Looks up `user` in the table and captures their allowed root.
    /// A user without an entry is refused before any path is inspected.
    pub fn new(config: &GuardConfig, user: InvokingUser) -> Result<Self> {
        let Some(grant) = config.grant_for(user.name()) else {
            warn!(user = user.name(), "user has no grant");
            return Err(GuardError::NotAuthorized {
                user: user.name().to_owned(),
            });
        };
        let allowed_root =
            resolve_path(&grant.allowed_path).map_err(|source| GuardError::ResolvePath {
                path: grant.allowed_path.clone(),
                source,
            })?;
        debug!(user = user.name(), root = %allowed_root.display(), "grant loaded");
        Ok(Self { user, allowed_root })
    }

    pub fn user(&self) -> &InvokingUser {
        &self.user
    }

    pub fn allowed_root(&self) -> &Path {
        &self.allowed_root
    }

    /// Whether `path` canonicalizes to somewhere inside the allowed root
    /// under `mode`. Has no side effects; resolution errors propagate so
    /// callers fail closed.
    pub fn path_allowed(&self, path: &Path, mode: PathCheckMode) -> Result<bool> {
        let resolved = resolve_path(path).map_err(|source| GuardError::ResolvePath {
            path: path.to_path_buf(),
            source,
        })?;

        let root: Vec<Component> = self.allowed_root.components().collect();
        let candidate: Vec<Component> = resolved.components().collect();

        if candidate.len() < root.len() || candidate[..root.len()] != root[..] {
            return Ok(false);
        }
        if mode == PathCheckMode::DescendantOnly && candidate.len() == root.len() {
            return Ok(false);
        }
        Ok(true)
    }

    /// The single enforcement point: every candidate path of every guarded
    /// operation is routed through here before any argv is constructed.
    pub fn assert_path_allowed(&self, path: &Path, mode: PathCheckMode) -> Result<()> {
        if self.path_allowed(path, mode)? {
            Ok(())
        } else {
            warn!(
                user = self.user.name(),
                path = %path.display(),
                root = %self.allowed_root.display(),
                "denied out-of-root path"
            );
            Err(GuardError::PathDenied {
                path: path.to_path_buf(),
            })
        }
    }
}
