//! Toolchain resolution: which `java` executable launches the runner.
//!
//! A toolchain is an installation that can locate named tools. When a JDK
//! toolchain is configured the runner must come from it, and a toolchain
//! that cannot produce `java` is a configuration error. With no toolchain
//! the bare executable name is used and the operating system searches
//! `PATH`.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::info;

/// Key of the JDK entry in `[toolchains]`.
pub const JDK_TOOLCHAIN: &str = "jdk";

/// Executable used when no toolchain is configured.
pub const DEFAULT_JAVA: &str = "java";

/// Errors that can occur while resolving a tool from a toolchain.
#[derive(Debug, thiserror::Error)]
pub enum ToolchainError {
    #[error("Failed to find '{tool}' executable for toolchain: {toolchain}")]
    ToolNotFound { tool: String, toolchain: String },
}

/// An installation that can locate tools by name.
pub trait Toolchain: fmt::Display + Send + Sync {
    /// Toolchain type, e.g. `jdk`.
    fn kind(&self) -> &str;

    /// Path to the named tool, or `None` if this toolchain does not ship it.
    fn find_tool(&self, name: &str) -> Option<PathBuf>;
}

/// A JDK installed under `home`, with executables in `home/bin`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JdkToolchain {
    home: PathBuf,
}

impl JdkToolchain {
    pub fn new(home: impl Into<PathBuf>) -> Self {
        Self { home: home.into() }
    }

    pub fn home(&self) -> &Path {
        &self.home
    }
}

impl fmt::Display for JdkToolchain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "JDK[{}]", self.home.display())
    }
}

impl Toolchain for JdkToolchain {
    fn kind(&self) -> &str {
        JDK_TOOLCHAIN
    }

    fn find_tool(&self, name: &str) -> Option<PathBuf> {
        let file = if cfg!(windows) {
            format!("{}.exe", name)
        } else {
            name.to_string()
        };
        let path = self.home.join("bin").join(file);
        path.is_file().then_some(path)
    }
}

/// Resolves the `java` executable to launch.
///
/// # Errors
///
/// Returns [`ToolchainError::ToolNotFound`] if a toolchain is given but does
/// not contain `java`. Resolution is attempted once.
pub fn resolve_java_executable(
    toolchain: Option<&dyn Toolchain>,
) -> Result<String, ToolchainError> {
    let Some(tc) = toolchain else {
        return Ok(DEFAULT_JAVA.to_string());
    };

    info!("Toolchain used by lazytest: {} ({})", tc, tc.kind());
    match tc.find_tool(DEFAULT_JAVA) {
        Some(path) => Ok(path.to_string_lossy().into_owned()),
        None => Err(ToolchainError::ToolNotFound {
            tool: DEFAULT_JAVA.to_string(),
            toolchain: tc.to_string(),
        }),
    }
}
