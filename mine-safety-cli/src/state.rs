//! Session state: the logged-in role
//!
//! The only thing kept between runs is a single role name in
//! `<state_dir>/role`. Logging out deletes the file.

use anyhow::{Context, Result};
use mine_safety_core::Role;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const ROLE_FILE: &str = "role";

/// File-backed store for the current role
#[derive(Debug, Clone)]
pub struct RoleStore {
    path: PathBuf,
}

impl RoleStore {
    pub fn new(state_dir: &Path) -> Self {
        Self {
            path: state_dir.join(ROLE_FILE),
        }
    }

    /// Current role, or `None` when nobody is logged in
    pub fn load(&self) -> Result<Option<Role>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read role file: {:?}", self.path))
            }
        };

        if content.trim().is_empty() {
            return Ok(None);
        }

        let role = content
            .parse::<Role>()
            .with_context(|| format!("Corrupt role file: {:?}", self.path))?;
        Ok(Some(role))
    }

    pub fn save(&self, role: Role) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create state directory: {:?}", dir))?;
        }
        fs::write(&self.path, format!("{}\n", role))
            .with_context(|| format!("Failed to write role file: {:?}", self.path))?;
        log::debug!("Stored role {} in {:?}", role, self.path);
        Ok(())
    }

    /// Forget the role; returns false if nobody was logged in
    pub fn clear(&self) -> Result<bool> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e).with_context(|| format!("Failed to remove role file: {:?}", self.path)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_store_lifecycle() {
        let dir = tempfile::tempdir().unwrap();
        let store = RoleStore::new(&dir.path().join("nested"));

        assert_eq!(store.load().unwrap(), None);
        store.save(Role::Supervisor).unwrap();
        assert_eq!(store.load().unwrap(), Some(Role::Supervisor));

        store.save(Role::Regulator).unwrap();
        assert_eq!(store.load().unwrap(), Some(Role::Regulator));

        assert!(store.clear().unwrap());
        assert!(!store.clear().unwrap());
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_legacy_role_name_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let store = RoleStore::new(dir.path());
        fs::write(store.path(), "dgms").unwrap();
        assert_eq!(store.load().unwrap(), Some(Role::Regulator));
    }

    #[test]
    fn test_corrupt_role_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = RoleStore::new(dir.path());
        fs::write(store.path(), "admin\n").unwrap();
        assert!(store.load().is_err());
    }
}
