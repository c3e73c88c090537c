//! Process launcher for the Lazytest runner.
//!
//! The runner is started as a single child process:
//!
//! ```text
//! <java> [jvm_args...] -cp <classpath> <entry-point> <source-dir>...
//! ```
//!
//! The child inherits the environment and all three standard streams, so
//! watch mode can read from the operator's terminal. It runs in the project's
//! base directory, and the launcher waits for it to exit.

use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};

use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use crate::classpath::{classpath_elements, join_classpath, source_directories};
use crate::config::Config;

/// Which runner entry point to start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Target {
    /// Run the suite once.
    Run,
    /// Re-run tests when sources change.
    Watch,
}

impl Target {
    /// Entry-point class for this target.
    pub fn main_class(self, config: &Config) -> &str {
        match self {
            Target::Run => &config.runner.run_main,
            Target::Watch => &config.runner.watch_main,
        }
    }
}

/// A fully assembled runner invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LaunchCommand {
    /// Executable to start.
    pub program: String,
    /// Arguments, in order.
    pub args: Vec<String>,
    /// Directory the child starts in.
    pub working_dir: PathBuf,
}

impl LaunchCommand {
    /// The full command line, program first.
    pub fn argv(&self) -> Vec<&str> {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect()
    }

    /// Shell-quoted rendering for logs and display.
    pub fn to_shell_string(&self) -> String {
        shell_words::join(self.argv())
    }
}

/// Builds the runner command line for `target`.
///
/// `executable` comes from toolchain resolution. Classpath and source
/// directories are aggregated fresh from `config`.
pub fn build_command(config: &Config, target: Target, executable: &str) -> LaunchCommand {
    let classpath = classpath_elements(&config.project);
    let dirs = source_directories(&config.project);
    let main_class = target.main_class(config);

    let mut args = config.runner.jvm_args.clone();
    args.push("-cp".to_string());
    args.push(join_classpath(&classpath));

    debug!("Java executable: {}", executable);
    debug!("Command-line arguments: {:?}", args);
    debug!("Main class: {}", main_class);
    debug!("Source directories: {:?}", dirs);

    args.push(main_class.to_string());
    args.extend(dirs);

    LaunchCommand {
        program: executable.to_string(),
        args,
        working_dir: config.project.absolute_base_dir(),
    }
}

/// Starts a [`LaunchCommand`] and waits for it to finish.
#[async_trait]
pub trait ProcessSpawner: Send + Sync {
    /// Runs the command to completion.
    ///
    /// An `Err` means the process could not be started or waited on.
    async fn spawn_and_wait(&self, cmd: &LaunchCommand) -> std::io::Result<ExitStatus>;
}

/// Spawns the runner with the parent's environment and standard streams.
#[derive(Debug, Default, Clone, Copy)]
pub struct InheritedSpawner;

#[async_trait]
impl ProcessSpawner for InheritedSpawner {
    async fn spawn_and_wait(&self, cmd: &LaunchCommand) -> std::io::Result<ExitStatus> {
        let mut process = tokio::process::Command::new(&cmd.program);
        process
            .args(&cmd.args)
            .current_dir(&cmd.working_dir)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            // Killed and reaped if this future is dropped before exit.
            .kill_on_drop(true);

        let mut child = process.spawn()?;
        debug!("Spawned runner pid={:?}", child.id());

        child.wait().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classpath::PATH_SEPARATOR;

    #[cfg(unix)]
    fn scenario_config() -> Config {
        let mut config = Config::default();
        config.project.base_dir = PathBuf::from("/proj");
        config.project.compile_classpath = vec!["lib/a.jar".to_string()];
        config.project.test_classpath = vec!["lib/test.jar".to_string()];
        config.project.test_source_dir = PathBuf::from("/proj/target/test-classes");
        config.project.generated_source_dir = PathBuf::from("/proj/target/generated-sources");
        config
    }

    #[cfg(unix)]
    #[test]
    fn test_command_shape_run() {
        let cmd = build_command(&scenario_config(), Target::Run, "java");
        let sep = PATH_SEPARATOR;

        assert_eq!(cmd.program, "java");
        assert_eq!(
            cmd.args,
            vec![
                "-cp".to_string(),
                format!(
                    "lib/a.jar{sep}lib/test.jar{sep}src/main/clojure{sep}src/test/clojure{sep}\
                     /proj/target/test-classes{sep}/proj/target/generated-sources{sep}"
                ),
                "lazytest.main".to_string(),
                "src/main/clojure".to_string(),
                "src/test/clojure".to_string(),
                "/proj/target/test-classes".to_string(),
                "/proj/target/generated-sources".to_string(),
            ]
        );
        assert_eq!(cmd.working_dir, PathBuf::from("/proj"));
    }

    #[cfg(unix)]
    #[test]
    fn test_command_watch_entry_point() {
        let cmd = build_command(&scenario_config(), Target::Watch, "java");
        assert_eq!(cmd.args[2], "lazytest.watch");
    }

    #[cfg(unix)]
    #[test]
    fn test_first_token_is_executable() {
        let cmd = build_command(&scenario_config(), Target::Run, "/opt/jdk/bin/java");
        assert_eq!(cmd.argv()[0], "/opt/jdk/bin/java");
    }

    #[cfg(unix)]
    #[test]
    fn test_jvm_args_precede_classpath() {
        let mut config = scenario_config();
        config.runner.jvm_args = vec!["-Xmx1g".to_string()];

        let cmd = build_command(&config, Target::Run, "java");
        assert_eq!(cmd.args[0], "-Xmx1g");
        assert_eq!(cmd.args[1], "-cp");
        assert_eq!(cmd.args[3], "lazytest.main");
    }

    #[test]
    fn test_shell_string_quotes_spaces() {
        let cmd = LaunchCommand {
            program: "/opt/my jdk/bin/java".to_string(),
            args: vec!["-cp".to_string(), "a.jar".to_string()],
            working_dir: PathBuf::from("/proj"),
        };
        assert_eq!(cmd.to_shell_string(), "'/opt/my jdk/bin/java' -cp a.jar");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_inherited_spawner_reports_exit_status() {
        let cmd = LaunchCommand {
            program: "sh".to_string(),
            args: vec!["-c".to_string(), "exit 3".to_string()],
            working_dir: std::env::temp_dir(),
        };

        let status = InheritedSpawner.spawn_and_wait(&cmd).await.unwrap();
        assert_eq!(status.code(), Some(3));
    }

    #[tokio::test]
    async fn test_inherited_spawner_missing_executable() {
        let cmd = LaunchCommand {
            program: "/nonexistent/bin/java".to_string(),
            args: vec![],
            working_dir: std::env::temp_dir(),
        };

        assert!(InheritedSpawner.spawn_and_wait(&cmd).await.is_err());
    }
}
