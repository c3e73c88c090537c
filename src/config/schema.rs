//! Configuration schema definitions for lazytest.
//!
//! This module defines all configuration types that can be deserialized from
//! a `lazytest.toml` file. Every field has a default matching the conventional
//! Maven project layout, so an empty file (or no file at all) is a valid
//! configuration.
//!
//! # Schema Overview
//!
//! ```text
//! Config (root)
//! ├── ProjectConfig          - Base directory, classpath lists, source directories
//! ├── RunnerConfig           - Entry points and extra JVM options
//! └── toolchains             - Map of toolchain type to ToolchainConfig
//!     └── jdk                - JDK used to locate the `java` executable
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::toolchain::{JDK_TOOLCHAIN, JdkToolchain};

/// Root configuration structure for lazytest.
///
/// # TOML Structure
///
/// ```toml
/// [project]
/// base_dir = "."
/// compile_classpath = ["target/classes", "lib/clojure.jar"]
/// test_classpath = ["lib/lazytest.jar"]
///
/// [runner]
/// jvm_args = ["-Xmx1g"]
///
/// [toolchains.jdk]
/// home = "~/.sdkman/candidates/java/current"
/// ```
///
/// # Example
///
/// ```
/// use lazytest_runner::config::Config;
///
/// let config: Config = toml::from_str(r#"
///     [project]
///     compile_classpath = ["lib/a.jar"]
/// "#).unwrap();
/// assert_eq!(config.runner.run_main, "lazytest.main");
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    /// Project layout and classpath inputs.
    #[serde(default)]
    pub project: ProjectConfig,

    /// Runner entry points and JVM options.
    #[serde(default)]
    pub runner: RunnerConfig,

    /// Toolchains keyed by type. Only `jdk` is consulted.
    #[serde(default)]
    pub toolchains: BTreeMap<String, ToolchainConfig>,
}

impl Config {
    /// Builds the JDK toolchain from `[toolchains.jdk]`, if one is configured.
    pub fn jdk_toolchain(&self) -> Option<JdkToolchain> {
        self.toolchains
            .get(JDK_TOOLCHAIN)
            .map(|tc| JdkToolchain::new(tc.home.clone()))
    }

    /// Checks the invariants serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.runner.run_main.trim().is_empty() {
            return Err(ConfigError::EmptyEntryPoint("run_main"));
        }
        if self.runner.watch_main.trim().is_empty() {
            return Err(ConfigError::EmptyEntryPoint("watch_main"));
        }
        for (kind, tc) in &self.toolchains {
            if tc.home.as_os_str().is_empty() {
                return Err(ConfigError::MissingToolchainHome(kind.clone()));
            }
        }
        Ok(())
    }

    /// Expands `~` and environment variables in path-valued settings.
    pub fn expand_paths(&mut self) -> Result<(), ConfigError> {
        self.project.base_dir = expand(&self.project.base_dir)?;
        for tc in self.toolchains.values_mut() {
            tc.home = expand(&tc.home)?;
        }
        Ok(())
    }
}

fn expand(path: &Path) -> Result<PathBuf, ConfigError> {
    let raw = path.to_string_lossy();
    match shellexpand::full(raw.as_ref()) {
        Ok(expanded) => Ok(PathBuf::from(expanded.into_owned())),
        Err(e) => Err(ConfigError::Expansion {
            path: path.display().to_string(),
            message: e.to_string(),
        }),
    }
}

/// Errors raised when a configuration is well-formed TOML but unusable.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("runner.{0} must not be empty")]
    EmptyEntryPoint(&'static str),

    #[error("toolchain '{0}' has no home directory")]
    MissingToolchainHome(String),

    #[error("failed to expand '{path}': {message}")]
    Expansion { path: String, message: String },
}

/// Project layout: the inputs the classpath and source sets are built from.
///
/// # Defaults
///
/// | Field | Default |
/// |-------|---------|
/// | `base_dir` | `.` |
/// | `compile_classpath` | empty |
/// | `test_classpath` | empty |
/// | `test_output_dir` | `target/test-classes` |
/// | `source_dirs` | `["src/main/clojure"]` |
/// | `test_source_dirs` | `["src/test/clojure"]` |
/// | `test_source_dir` | `src/test/java` |
/// | `generated_source_dir` | `target/generated-sources` |
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProjectConfig {
    /// Project root. The runner is started in this directory and relative
    /// directories below are resolved against it.
    #[serde(default = "default_base_dir")]
    pub base_dir: PathBuf,

    /// Compile classpath entries, in order.
    #[serde(default)]
    pub compile_classpath: Vec<String>,

    /// Test classpath entries, in order.
    #[serde(default)]
    pub test_classpath: Vec<String>,

    /// Directory for test output files.
    #[serde(default = "default_test_output_dir")]
    pub test_output_dir: PathBuf,

    /// Main source directories. Passed through exactly as written.
    #[serde(default = "default_source_dirs")]
    pub source_dirs: Vec<String>,

    /// Test source directories. Passed through exactly as written.
    #[serde(default = "default_test_source_dirs")]
    pub test_source_dirs: Vec<String>,

    /// Default test-source directory. Always made absolute.
    #[serde(default = "default_test_source_dir")]
    pub test_source_dir: PathBuf,

    /// Generated-source directory. Always made absolute.
    #[serde(default = "default_generated_source_dir")]
    pub generated_source_dir: PathBuf,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            base_dir: default_base_dir(),
            compile_classpath: Vec::new(),
            test_classpath: Vec::new(),
            test_output_dir: default_test_output_dir(),
            source_dirs: default_source_dirs(),
            test_source_dirs: default_test_source_dirs(),
            test_source_dir: default_test_source_dir(),
            generated_source_dir: default_generated_source_dir(),
        }
    }
}

impl ProjectConfig {
    /// Absolute form of `base_dir`.
    ///
    /// Relative base directories are resolved against the process's current
    /// directory. Falls back to the path as given if that cannot be read.
    pub fn absolute_base_dir(&self) -> PathBuf {
        std::path::absolute(&self.base_dir).unwrap_or_else(|_| self.base_dir.clone())
    }

    /// Absolute form of `path`, resolving relative paths against `base_dir`.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.absolute_base_dir().join(path)
        }
    }
}

fn default_base_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_test_output_dir() -> PathBuf {
    PathBuf::from("target/test-classes")
}

fn default_source_dirs() -> Vec<String> {
    vec!["src/main/clojure".to_string()]
}

fn default_test_source_dirs() -> Vec<String> {
    vec!["src/test/clojure".to_string()]
}

fn default_test_source_dir() -> PathBuf {
    PathBuf::from("src/test/java")
}

fn default_generated_source_dir() -> PathBuf {
    PathBuf::from("target/generated-sources")
}

/// Runner entry points and JVM options.
///
/// # Example
///
/// ```toml
/// [runner]
/// run_main = "lazytest.main"
/// watch_main = "lazytest.watch"
/// jvm_args = ["-Xmx1g", "-Dclojure.compiler.direct-linking=true"]
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RunnerConfig {
    /// Main class for a single run.
    ///
    /// Default: `lazytest.main`
    #[serde(default = "default_run_main")]
    pub run_main: String,

    /// Main class for watch mode.
    ///
    /// Default: `lazytest.watch`
    #[serde(default = "default_watch_main")]
    pub watch_main: String,

    /// Extra options placed between the executable and `-cp`.
    #[serde(default)]
    pub jvm_args: Vec<String>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            run_main: default_run_main(),
            watch_main: default_watch_main(),
            jvm_args: Vec::new(),
        }
    }
}

fn default_run_main() -> String {
    "lazytest.main".to_string()
}

fn default_watch_main() -> String {
    "lazytest.watch".to_string()
}

/// A toolchain installation.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ToolchainConfig {
    /// Installation root; tools are looked up under `home/bin`.
    pub home: PathBuf,
}
