//! Configuration loading and schema definitions for lazytest.
//!
//! Configuration comes from a TOML file (conventionally `lazytest.toml` in
//! the project root). It replaces the values a build host would otherwise
//! inject: project directories, classpath lists, and the JDK toolchain.

pub mod schema;

pub use schema::*;

use std::path::Path;

use anyhow::{Context, Result};

/// Loads lazytest configuration from a TOML file.
///
/// Path-valued settings have `~` and `$VAR` references expanded, and the
/// result is validated before it is returned.
///
/// # Errors
///
/// Returns an error if:
/// - The file cannot be read (e.g., doesn't exist or permission denied)
/// - The file contains invalid TOML syntax
/// - The configuration doesn't match the expected schema or fails validation
///
/// # Example
///
/// ```no_run
/// use lazytest_runner::config::load_config;
/// use std::path::Path;
///
/// let config = load_config(Path::new("lazytest.toml"))?;
/// println!("Base dir: {}", config.project.base_dir.display());
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    load_config_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Loads lazytest configuration from a TOML string.
///
/// # Example
///
/// ```
/// use lazytest_runner::config::load_config_str;
///
/// let config = load_config_str(r#"
///     [project]
///     test_classpath = ["lib/test.jar"]
/// "#)?;
///
/// assert_eq!(config.project.test_classpath, vec!["lib/test.jar"]);
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn load_config_str(content: &str) -> Result<Config> {
    let mut config: Config = toml::from_str(content).context("Failed to parse config")?;

    config.expand_paths()?;
    config.validate()?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_config_from_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("lazytest.toml");
        std::fs::write(
            &path,
            r#"
            [project]
            base_dir = "/proj"
            compile_classpath = ["lib/a.jar"]
            "#,
        )?;

        let config = load_config(&path)?;

        assert_eq!(config.project.base_dir, std::path::PathBuf::from("/proj"));
        assert_eq!(config.project.compile_classpath, vec!["lib/a.jar"]);
        Ok(())
    }

    #[test]
    fn test_load_config_missing_file() {
        let err = load_config(Path::new("/nonexistent/lazytest.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_load_config_str_rejects_unknown_type() {
        let result = load_config_str(
            r#"
            [project]
            source_dirs = "src"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_str_validates() {
        let result = load_config_str(
            r#"
            [runner]
            run_main = ""
            "#,
        );
        assert!(result.is_err());
    }
}
