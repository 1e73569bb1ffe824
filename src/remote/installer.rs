//! Installation of a task's declared external requirements.
//!
//! The production installer shells out to cargo, preferring the binstall
//! backend when its executable is available and passing `--locked` when the
//! project carries a lockfile.

use indexmap::IndexMap;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::config::InstallPolicy;
use crate::error::{Error, Result};
use crate::logger::{debug, info, warn};

pub trait Installer {
    /// Install the given package -> version mapping, returning once the
    /// backend completes.
    fn install(&self, requires: &IndexMap<String, String>) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Backend {
    Binstall,
    Install,
}

pub struct CargoInstaller {
    policy: InstallPolicy,
    project_root: PathBuf,
}

impl CargoInstaller {
    pub fn new(policy: InstallPolicy, project_root: &Path) -> Self {
        Self {
            policy,
            project_root: project_root.to_path_buf(),
        }
    }

    fn backend(&self) -> Backend {
        if which::which("cargo-binstall").is_ok() {
            Backend::Binstall
        } else {
            Backend::Install
        }
    }

    fn locked(&self) -> bool {
        self.project_root.join("Cargo.lock").is_file()
    }
}

impl Installer for CargoInstaller {
    fn install(&self, requires: &IndexMap<String, String>) -> Result<()> {
        if requires.is_empty() {
            return Ok(());
        }

        let backend = self.backend();
        let mut args: Vec<String> = match backend {
            Backend::Binstall => vec!["binstall".to_string(), "-y".to_string()],
            Backend::Install => vec!["install".to_string()],
        };
        if self.locked() {
            args.push("--locked".to_string());
        }
        for (package, version) in requires {
            args.push(format!("{}@{}", package, version));
        }

        info!("installing requirements via cargo {:?}: {:?}", backend, args);
        let status = Command::new("cargo").args(&args).status()?;

        if status.success() {
            debug!("install completed successfully");
            return Ok(());
        }
        match self.policy {
            InstallPolicy::FailOnError => Err(Error::Install(format!(
                "cargo exited with {}",
                status
            ))),
            InstallPolicy::Ignore => {
                warn!("install exited with {}, continuing per policy", status);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_requirements_never_spawn_a_process() {
        // Would fail on machines without cargo if a process were spawned.
        let installer = CargoInstaller::new(InstallPolicy::FailOnError, Path::new("/nonexistent"));
        installer.install(&IndexMap::new()).expect("no-op install");
    }

    #[test]
    fn locked_reflects_lockfile_presence() {
        let dir = tempfile::tempdir().expect("tempdir");
        let installer = CargoInstaller::new(InstallPolicy::FailOnError, dir.path());
        assert!(!installer.locked());
        std::fs::write(dir.path().join("Cargo.lock"), "").expect("write lockfile");
        assert!(installer.locked());
    }
}
