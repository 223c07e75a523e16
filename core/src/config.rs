//! The admin-maintained access table.

use std::collections::BTreeMap;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::error::GuardError;
use crate::error::Result;

/// Where the access table lives. The file is written by the administrator
/// out of band and must not be writable by any user listed in it; there is
/// deliberately no flag or environment variable to point the guard at a
/// different file, since the caller controls both.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/subguard.toml";

/// One user's grant: the single directory subtree they may manage.
///
/// ```toml
/// [backup]
/// allowed_path = "/srv/backups/backup"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserGrant {
    pub allowed_path: PathBuf,
}

/// The full user -> grant table, keyed by invoking user name.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct GuardConfig {
    users: BTreeMap<String, UserGrant>,
}

impl GuardConfig {
    /// Reads and parses the table. A missing or unreadable file is an
    /// error, not an empty table: the guard fails closed rather than
    /// continuing with nobody authorized and a confusing denial later.
    pub fn load(path: &Path) -> Result<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|source| GuardError::ReadConfig {
                path: path.to_path_buf(),
                source,
            })?;
        Self::parse(&contents).map_err(|source| GuardError::ParseConfig {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(contents: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    pub fn grant_for(&self, user: &str) -> Option<&UserGrant> {
        self.users.get(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn parses_one_table_per_user() {
        let config = GuardConfig::parse(
            r#"
            [backup]
            allowed_path = "/srv/backups/backup"

            [mirror]
            allowed_path = "/srv/mirror"
            "#,
        )
        .expect("parse config");

        assert_eq!(
            config.grant_for("backup"),
            Some(&UserGrant {
                allowed_path: PathBuf::from("/srv/backups/backup"),
            })
        );
        assert_eq!(
            config.grant_for("mirror"),
            Some(&UserGrant {
                allowed_path: PathBuf::from("/srv/mirror"),
            })
        );
        assert_eq!(config.grant_for("intruder"), None);
    }

    #[test]
    fn rejects_unknown_keys_in_a_grant() {
        let result = GuardConfig::parse(
            r#"
            [backup]
            allowed_path = "/srv/backups"
            extra_root = "/"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn load_maps_a_missing_file_to_read_config() {
        let dir = tempdir().expect("create temp dir");
        let missing = dir.path().join("subguard.toml");

        match GuardConfig::load(&missing) {
            Err(GuardError::ReadConfig { path, .. }) => assert_eq!(path, missing),
            other => panic!("expected ReadConfig, got {other:?}"),
        }
    }

    #[test]
    fn load_maps_bad_syntax_to_parse_config() {
        let dir = tempdir().expect("create temp dir");
        let path = dir.path().join("subguard.toml");
        std::fs::write(&path, "not = [valid").expect("write config");

        match GuardConfig::load(&path) {
            Err(GuardError::ParseConfig { path: seen, .. }) => assert_eq!(seen, path),
            other => panic!("expected ParseConfig, got {other:?}"),
        }
    }
}
