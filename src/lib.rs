//! lazytest-runner: launch the Lazytest runner for a JVM project.
//!
//! This crate starts the external Lazytest process with the project's
//! classpath and source directories, either once or in watch mode, and turns
//! its exit status into success or failure.
//!
//! # Architecture
//!
//! The main components are:
//!
//! - **Config**: Project layout, entry points and toolchains from `lazytest.toml`
//! - **Toolchain**: Locate the `java` executable
//! - **Classpath**: Build the deduplicated classpath and source-directory sets
//! - **Launcher**: Assemble the command line and spawn it with inherited stdio
//! - **Outcome**: Map the exit status to pass/fail
//! - **Runner**: The `run_once` and `watch` entry points tying it together
//!
//! # Example
//!
//! ```no_run
//! use lazytest_runner::config::load_config;
//! use lazytest_runner::Lazytest;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = load_config(std::path::Path::new("lazytest.toml"))?;
//!     Lazytest::new(config).watch().await?;
//!     Ok(())
//! }
//! ```

pub mod classpath;
pub mod config;
pub mod launcher;
pub mod outcome;
pub mod runner;
pub mod toolchain;

// Re-export commonly used types
pub use config::{Config, load_config};
pub use launcher::{InheritedSpawner, LaunchCommand, ProcessSpawner, Target};
pub use outcome::{RunError, RunOutcome};
pub use runner::{Lazytest, LazytestError};
pub use toolchain::{JdkToolchain, Toolchain, ToolchainError};
