//! Resolution of the real user behind a sudo invocation.

use crate::error::GuardError;
use crate::error::Result;

/// Environment variable sudo sets to the name of the invoking user.
pub const SUDO_USER_ENV: &str = "SUDO_USER";

/// The real (pre-elevation) user on whose behalf the guard is running.
/// This is the identity that is looked up in the configuration, not the
/// elevated user the process runs as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvokingUser {
    name: String,
}

impl InvokingUser {
    /// Resolves the invoking user from the sudo execution environment.
    ///
    /// The guard refuses to run unless the effective uid is root and
    /// `SUDO_USER` names the original caller; anything else means it was
    /// not started through sudo and there is no identity to authorize.
    #[cfg(unix)]
    pub fn from_sudo_env() -> Result<Self> {
        // SAFETY: geteuid cannot fail and takes no arguments.
        let euid = unsafe { libc::geteuid() };
        if euid != 0 {
            return Err(GuardError::NotElevated);
        }
        match std::env::var(SUDO_USER_ENV) {
            Ok(name) if !name.is_empty() => Ok(Self { name }),
            _ => Err(GuardError::MissingInvokingUser),
        }
    }

    /// Builds an identity from a known user name. Intended for wiring and
    /// tests; real invocations go through [`InvokingUser::from_sudo_env`].
    pub fn from_name(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn name_round_trips() {
        let user = InvokingUser::from_name("backup");
        assert_eq!(user.name(), "backup");
    }
}
