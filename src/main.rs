//! lazytest CLI - launch the Lazytest runner once or in watch mode.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use lazytest_runner::config::{self, Config, ToolchainConfig};
use lazytest_runner::{Lazytest, Target};

const DEFAULT_CONFIG: &str = "lazytest.toml";

#[derive(Parser)]
#[command(name = "lazytest")]
#[command(about = "Launch the Lazytest runner against a project", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path [default: lazytest.toml, optional]
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the test suite once
    Run,

    /// Run tests whenever source files change
    Watch,

    /// Print the command line that would be executed
    Show {
        /// Entry point to show
        #[arg(short, long, value_enum, default_value_t = Target::Run)]
        target: Target,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },

    /// Validate configuration file
    Validate,

    /// Initialize a new configuration file
    Init {
        /// JDK home to record under [toolchains.jdk]
        #[arg(long)]
        jdk_home: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging; RUST_LOG wins over --verbose when set.
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Run => launch(cli.config.as_deref(), Target::Run).await,
        Commands::Watch => launch(cli.config.as_deref(), Target::Watch).await,
        Commands::Show { target, format } => show_command(cli.config.as_deref(), target, format),
        Commands::Validate => validate_config(cli.config.as_deref()),
        Commands::Init { jdk_home } => init_config(cli.config.as_deref(), jdk_home.as_deref()),
    }
}

/// Loads the configuration, falling back to defaults when the default file
/// is absent. An explicitly named file must exist.
fn load(config_path: Option<&Path>) -> Result<Config> {
    match config_path {
        Some(path) => config::load_config(path),
        None => {
            let path = Path::new(DEFAULT_CONFIG);
            if path.exists() {
                config::load_config(path)
            } else {
                info!("No {} found, using defaults", DEFAULT_CONFIG);
                Ok(Config::default())
            }
        }
    }
}

async fn launch(config_path: Option<&Path>, target: Target) -> Result<()> {
    let config = load(config_path)?;
    let lazytest = Lazytest::new(config);

    match target {
        Target::Run => lazytest.run_once().await?,
        Target::Watch => lazytest.watch().await?,
    }

    Ok(())
}

fn show_command(config_path: Option<&Path>, target: Target, format: Format) -> Result<()> {
    let config = load(config_path)?;
    let cmd = Lazytest::new(config).command(target)?;

    match format {
        Format::Json => {
            let json = serde_json::to_string_pretty(&cmd)?;
            println!("{}", json);
        }
        Format::Text => {
            println!("# in {}", cmd.working_dir.display());
            println!("{}", cmd.to_shell_string());
        }
    }

    Ok(())
}

fn validate_config(config_path: Option<&Path>) -> Result<()> {
    match load(config_path) {
        Ok(config) => {
            println!("Configuration is valid!");
            println!();
            println!("Settings:");
            println!("  Base dir: {}", config.project.base_dir.display());
            println!(
                "  Classpath entries: {} compile, {} test",
                config.project.compile_classpath.len(),
                config.project.test_classpath.len()
            );
            println!("  Source dirs: {}", config.project.source_dirs.join(", "));
            println!(
                "  Test source dirs: {}",
                config.project.test_source_dirs.join(", ")
            );
            println!("  Run entry point: {}", config.runner.run_main);
            println!("  Watch entry point: {}", config.runner.watch_main);

            let java = match config.jdk_toolchain() {
                Some(tc) => tc.to_string(),
                None => "java (from PATH)".to_string(),
            };
            println!("  Java: {}", java);

            Ok(())
        }
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn init_config(config_path: Option<&Path>, jdk_home: Option<&Path>) -> Result<()> {
    let toolchain = match jdk_home {
        Some(home) => {
            let section = toml::to_string(&ToolchainConfig {
                home: home.to_path_buf(),
            })
            .with_context(|| format!("Failed to encode JDK home {}", home.display()))?;
            format!("\n[toolchains.jdk]\n{}", section)
        }
        None => r#"
# [toolchains.jdk]
# home = "~/.sdkman/candidates/java/current"
"#
        .to_string(),
    };

    let content = format!(
        r#"# lazytest configuration file

[project]
base_dir = "."
compile_classpath = ["target/classes"]
test_classpath = ["target/test-classes"]
source_dirs = ["src/main/clojure"]
test_source_dirs = ["src/test/clojure"]
test_source_dir = "src/test/java"
generated_source_dir = "target/generated-sources"

[runner]
run_main = "lazytest.main"
watch_main = "lazytest.watch"
jvm_args = []
{}"#,
        toolchain
    );

    let path = config_path.unwrap_or(Path::new(DEFAULT_CONFIG));
    if path.exists() {
        eprintln!(
            "{} already exists. Remove it first or edit manually.",
            path.display()
        );
        std::process::exit(1);
    }

    std::fs::write(path, content)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Created {}", path.display());
    println!();
    println!("Edit the configuration as needed, then run:");
    println!("  lazytest run");

    Ok(())
}
