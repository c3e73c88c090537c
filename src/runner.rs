//! Entry points: run the suite once, or start the watcher.
//!
//! Both entry points follow the same path and differ only in the main class:
//!
//! ```text
//! Config ──► resolve java ──► build command ──► spawn + wait ──► exit code ──► outcome
//! ```
//!
//! # Example
//!
//! ```no_run
//! use lazytest_runner::{Config, Lazytest};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let lazytest = Lazytest::new(Config::default());
//!     lazytest.run_once().await?;
//!     Ok(())
//! }
//! ```

use tracing::{debug, info};

use crate::config::Config;
use crate::launcher::{InheritedSpawner, LaunchCommand, ProcessSpawner, Target, build_command};
use crate::outcome::{RunError, RunOutcome, exit_code};
use crate::toolchain::{Toolchain, ToolchainError, resolve_java_executable};

/// Errors returned by the entry points.
#[derive(Debug, thiserror::Error)]
pub enum LazytestError {
    #[error(transparent)]
    Toolchain(#[from] ToolchainError),

    #[error(transparent)]
    Run(#[from] RunError),
}

/// Launches the Lazytest runner for one project configuration.
pub struct Lazytest<S = InheritedSpawner> {
    config: Config,
    spawner: S,
}

impl Lazytest<InheritedSpawner> {
    /// Creates a launcher that runs the child with inherited stdio.
    pub fn new(config: Config) -> Self {
        Self::with_spawner(config, InheritedSpawner)
    }
}

impl<S: ProcessSpawner> Lazytest<S> {
    pub fn with_spawner(config: Config, spawner: S) -> Self {
        Self { config, spawner }
    }

    /// Resolves the executable and assembles the command for `target`.
    ///
    /// Nothing is spawned.
    pub fn command(&self, target: Target) -> Result<LaunchCommand, ToolchainError> {
        let toolchain = self.config.jdk_toolchain();
        let executable =
            resolve_java_executable(toolchain.as_ref().map(|tc| tc as &dyn Toolchain))?;
        Ok(build_command(&self.config, target, &executable))
    }

    /// Runs the test suite once.
    pub async fn run_once(&self) -> Result<(), LazytestError> {
        self.launch(Target::Run).await
    }

    /// Starts the runner in watch mode. Returns when the watcher exits.
    pub async fn watch(&self) -> Result<(), LazytestError> {
        self.launch(Target::Watch).await
    }

    /// Runs `target` to completion and maps its exit status.
    pub async fn launch(&self, target: Target) -> Result<(), LazytestError> {
        let cmd = self.command(target)?;

        info!("Launching lazytest: {}", cmd.to_shell_string());
        let code = exit_code(self.spawner.spawn_and_wait(&cmd).await);
        debug!("Lazytest exited with status {}", code);

        RunOutcome::from_exit_code(code).into_result()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::process::ExitStatus;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::config::ToolchainConfig;

    /// Records the command and answers with a canned result.
    struct FakeSpawner {
        result: fn() -> std::io::Result<ExitStatus>,
        seen: Mutex<Vec<LaunchCommand>>,
    }

    impl FakeSpawner {
        fn new(result: fn() -> std::io::Result<ExitStatus>) -> Self {
            Self {
                result,
                seen: Mutex::new(Vec::new()),
            }
        }

        fn commands(&self) -> Vec<LaunchCommand> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ProcessSpawner for FakeSpawner {
        async fn spawn_and_wait(&self, cmd: &LaunchCommand) -> std::io::Result<ExitStatus> {
            self.seen.lock().unwrap().push(cmd.clone());
            (self.result)()
        }
    }

    #[cfg(unix)]
    fn exited(code: i32) -> ExitStatus {
        use std::os::unix::process::ExitStatusExt;
        ExitStatus::from_raw(code << 8)
    }

    fn spawn_error() -> std::io::Result<ExitStatus> {
        Err(std::io::Error::new(std::io::ErrorKind::NotFound, "java"))
    }

    fn config_with_base(base: &str) -> Config {
        let mut config = Config::default();
        config.project.base_dir = PathBuf::from(base);
        config
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_once_success() {
        let lazytest =
            Lazytest::with_spawner(config_with_base("/proj"), FakeSpawner::new(|| Ok(exited(0))));

        lazytest.run_once().await.unwrap();

        let commands = lazytest.spawner.commands();
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].program, "java");
        assert!(commands[0].args.contains(&"lazytest.main".to_string()));
        assert_eq!(commands[0].working_dir, PathBuf::from("/proj"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_watch_uses_watch_entry_point() {
        let lazytest =
            Lazytest::with_spawner(config_with_base("/proj"), FakeSpawner::new(|| Ok(exited(0))));

        lazytest.watch().await.unwrap();

        let commands = lazytest.spawner.commands();
        assert!(commands[0].args.contains(&"lazytest.watch".to_string()));
        assert!(!commands[0].args.contains(&"lazytest.main".to_string()));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_nonzero_exit_is_generic_failure() {
        let lazytest =
            Lazytest::with_spawner(config_with_base("/proj"), FakeSpawner::new(|| Ok(exited(2))));

        let err = lazytest.run_once().await.unwrap_err();
        assert!(matches!(err, LazytestError::Run(RunError::Failed)));
        assert_eq!(err.to_string(), "Lazytest failed.");
    }

    #[tokio::test]
    async fn test_spawn_failure_is_generic_failure() {
        let lazytest =
            Lazytest::with_spawner(config_with_base("/proj"), FakeSpawner::new(spawn_error));

        let err = lazytest.run_once().await.unwrap_err();
        assert!(matches!(err, LazytestError::Run(RunError::Failed)));
    }

    #[tokio::test]
    async fn test_unresolvable_toolchain_never_spawns() {
        let mut config = config_with_base("/proj");
        config.toolchains.insert(
            "jdk".to_string(),
            ToolchainConfig {
                home: PathBuf::from("/nonexistent/jdk"),
            },
        );
        let lazytest = Lazytest::with_spawner(config, FakeSpawner::new(spawn_error));

        let err = lazytest.run_once().await.unwrap_err();
        assert!(matches!(err, LazytestError::Toolchain(_)));
        assert!(err.to_string().contains("/nonexistent/jdk"));
        assert!(lazytest.spawner.commands().is_empty());
    }

    /// Writes `home/bin/java` as a shell script and returns the JDK home.
    #[cfg(unix)]
    fn fake_jdk(script: &str) -> tempfile::TempDir {
        use std::os::unix::fs::PermissionsExt;

        let home = tempfile::tempdir().unwrap();
        let bin = home.path().join("bin");
        std::fs::create_dir(&bin).unwrap();
        let java = bin.join("java");
        std::fs::write(&java, format!("#!/bin/sh\n{}\n", script)).unwrap();
        std::fs::set_permissions(&java, std::fs::Permissions::from_mode(0o755)).unwrap();
        home
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_toolchain_java_runs_in_base_dir() {
        let project = tempfile::tempdir().unwrap();
        let jdk = fake_jdk(r#"pwd > launched.txt; printf '%s\n' "$@" >> launched.txt"#);

        let mut config = config_with_base(&project.path().to_string_lossy());
        config.toolchains.insert(
            "jdk".to_string(),
            ToolchainConfig {
                home: jdk.path().to_path_buf(),
            },
        );

        Lazytest::new(config).run_once().await.unwrap();

        let launched = std::fs::read_to_string(project.path().join("launched.txt")).unwrap();
        let lines: Vec<&str> = launched.lines().collect();
        let cwd = std::fs::canonicalize(project.path()).unwrap();
        assert_eq!(std::fs::canonicalize(lines[0]).unwrap(), cwd);
        assert_eq!(lines[1], "-cp");
        assert_eq!(lines[3], "lazytest.main");
        assert_eq!(lines[4], "src/main/clojure");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_toolchain_java_failure_status() {
        let jdk = fake_jdk("exit 2");
        let project = tempfile::tempdir().unwrap();

        let mut config = config_with_base(&project.path().to_string_lossy());
        config.toolchains.insert(
            "jdk".to_string(),
            ToolchainConfig {
                home: jdk.path().to_path_buf(),
            },
        );

        let err = Lazytest::new(config).watch().await.unwrap_err();
        assert!(matches!(err, LazytestError::Run(RunError::Failed)));
    }
}
