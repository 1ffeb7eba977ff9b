//! Shared test utilities for crewfit crates.
//!
//! Env-var guards for tests that touch process-global state, and a
//! temporary home directory laid out like `~/.crewfit`.

use std::path::{Path, PathBuf};
use std::sync::{LazyLock, Mutex, MutexGuard};

/// Serialize tests that mutate process-global state (env vars, HOME).
///
/// Acquire this guard at the start of any test that modifies environment
/// variables to prevent race conditions between parallel tests.
pub fn env_guard() -> MutexGuard<'static, ()> {
    static TEST_SERIAL: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));
    TEST_SERIAL.lock().unwrap_or_else(|e| e.into_inner())
}

/// RAII guard for environment variables - restores original value on drop.
pub struct EnvVarGuard {
    key: &'static str,
    previous: Option<String>,
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        if let Some(v) = &self.previous {
            std::env::set_var(self.key, v);
        } else {
            std::env::remove_var(self.key);
        }
    }
}

/// Set an environment variable and return a guard that restores the original on drop.
///
/// # Example
/// ```
/// let _guard = crewfit_test_utils::set_env_var("MY_VAR", Some("value"));
/// // MY_VAR is set to "value" until _guard drops
/// ```
pub fn set_env_var(key: &'static str, value: Option<&str>) -> EnvVarGuard {
    let previous = std::env::var(key).ok();
    if let Some(val) = value {
        std::env::set_var(key, val);
    } else {
        std::env::remove_var(key);
    }
    EnvVarGuard { key, previous }
}

/// Temporary home directory with `.crewfit/` created.
///
/// The tempdir is removed when the fixture drops.
pub struct TestFixture {
    pub tempdir: tempfile::TempDir,
    /// `$HOME/.crewfit` in the temp environment.
    pub crewfit_dir: PathBuf,
}

impl TestFixture {
    /// Does NOT set HOME; use [`TestFixture::home_guard`] for that.
    pub fn new() -> std::io::Result<Self> {
        let tempdir = tempfile::tempdir()?;
        let crewfit_dir = tempdir.path().join(".crewfit");
        std::fs::create_dir_all(&crewfit_dir)?;
        Ok(Self {
            tempdir,
            crewfit_dir,
        })
    }

    pub fn home_path(&self) -> &Path {
        self.tempdir.path()
    }

    /// Create an RAII guard that sets HOME to this fixture's temp directory.
    pub fn home_guard(&self) -> EnvVarGuard {
        set_env_var("HOME", Some(&self.home_path().to_string_lossy()))
    }

    /// Write `~/.crewfit/config.toml` and return its path.
    pub fn write_config(&self, content: &str) -> std::io::Result<PathBuf> {
        let path = self.crewfit_dir.join("config.toml");
        std::fs::write(&path, content)?;
        Ok(path)
    }

    /// Write a taxonomy TOML file next to the config.
    pub fn write_taxonomy(&self, name: &str, content: &str) -> std::io::Result<PathBuf> {
        let path = self.crewfit_dir.join(name);
        std::fs::write(&path, content)?;
        Ok(path)
    }

    /// Write an arbitrary file (e.g. a request JSON) under the temp home.
    pub fn write_file(&self, name: &str, content: &str) -> std::io::Result<PathBuf> {
        let path = self.home_path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, content)?;
        Ok(path)
    }
}
