//! Atomic installation of rendered configuration.
//!
//! # Responsibilities
//! - Write rendered text to a fresh, uniquely named scratch file
//! - Publish it onto the live path with a single rename
//!
//! A reader of the live path sees either the previous complete file or the
//! new complete file. When any step fails the previous file is untouched and
//! the scratch file is removed on a best-effort basis.

use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::{Builder, NamedTempFile};
use thiserror::Error;
use crate::config::HaproxyConfig;

/// Why a configuration could not be installed.
#[derive(Debug, Error)]
pub enum InstallError {
    #[error("couldn't create scratch file in {}: {source}", .dir.display())]
    CreateScratch {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("couldn't write scratch file {}: {source}", .path.display())]
    WriteScratch {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("couldn't write {}: {source}", .target.display())]
    Publish {
        target: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Writes configuration to a scratch file and renames it into place.
#[derive(Debug, Clone)]
pub struct ConfigInstaller {
    target: PathBuf,
    scratch_dir: PathBuf,
}

impl ConfigInstaller {
    pub fn new(target: impl Into<PathBuf>, scratch_dir: impl Into<PathBuf>) -> Self {
        Self {
            target: target.into(),
            scratch_dir: scratch_dir.into(),
        }
    }

    pub fn from_config(config: &HaproxyConfig) -> Self {
        Self::new(config.config_path.clone(), config.effective_scratch_dir())
    }

    /// Live configuration path.
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Make `contents` the new content of the target path.
    pub fn install(&self, contents: &str) -> Result<(), InstallError> {
        let scratch = self.write_scratch(contents)?;

        // Dropping the PersistError drops the scratch file, which removes it.
        scratch.persist(&self.target).map_err(|e| InstallError::Publish {
            target: self.target.clone(),
            source: e.error,
        })?;

        tracing::info!(path = %self.target.display(), "Written new {}", self.target.display());
        Ok(())
    }

    fn write_scratch(&self, contents: &str) -> Result<NamedTempFile, InstallError> {
        let mut scratch = Builder::new()
            .prefix("haproxy.cfg")
            .tempfile_in(&self.scratch_dir)
            .map_err(|source| InstallError::CreateScratch {
                dir: self.scratch_dir.clone(),
                source,
            })?;

        let path = scratch.path().to_path_buf();
        let write_err = |source: std::io::Error| InstallError::WriteScratch {
            path: path.clone(),
            source,
        };

        scratch.write_all(contents.as_bytes()).map_err(&write_err)?;
        scratch.as_file().sync_all().map_err(&write_err)?;

        // NamedTempFile is created 0600; HAProxy may run as another user.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            scratch
                .as_file()
                .set_permissions(std::fs::Permissions::from_mode(0o644))
                .map_err(&write_err)?;
        }

        tracing::debug!(path = %path.display(), bytes = contents.len(), "Scratch config written");
        Ok(scratch)
    }
}
