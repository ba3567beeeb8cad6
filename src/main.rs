//! kubify - Docker Compose to Kubernetes converter
//!
//! This is the main CLI entry point for kubify.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use kubify::compose::{ComposeParser, ComposeProject};
use kubify::config::{DEFAULT_NAMESPACE, DEFAULT_OUTPUT_DIR};
use kubify::{ConvertConfig, Orchestrator, OutputFormat};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// kubify - Docker Compose to Kubernetes converter
#[derive(Parser)]
#[command(name = "kubify")]
#[command(author = "Evoker Industries")]
#[command(version)]
#[command(about = "Convert Docker Compose projects into Kubernetes manifests", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a ReplicationController and a Service for every compose service
    Convert {
        #[command(flatten)]
        input: InputArgs,
        /// Directory the manifests are written to
        #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
        output_dir: PathBuf,
        /// Namespace of the generated resources
        #[arg(short, long, env = "KUBIFY_NAMESPACE", default_value = DEFAULT_NAMESPACE)]
        namespace: String,
        /// Write JSON instead of YAML
        #[arg(long)]
        json: bool,
    },

    /// Print the services as they will be translated
    Config {
        #[command(flatten)]
        input: InputArgs,
    },
}

#[derive(clap::Args)]
struct InputArgs {
    /// Compose file
    #[arg(short, long)]
    file: Option<PathBuf>,
    /// Rancher compose file
    #[arg(short, long)]
    rancher_file: Option<PathBuf>,
}

impl InputArgs {
    fn load(self) -> Result<ComposeProject> {
        let working_dir = std::env::current_dir()?;
        let compose_file = self.file.unwrap_or_else(|| {
            ComposeParser::find_compose_file(&working_dir)
                .unwrap_or_else(|| working_dir.join("docker-compose.yml"))
        });
        let rancher_file = self.rancher_file.or_else(|| {
            ComposeParser::find_rancher_file(compose_file.parent().unwrap_or(Path::new(".")))
        });

        let env: HashMap<String, String> = std::env::vars().collect();
        ComposeParser::load_project(&compose_file, rancher_file.as_deref(), &env).with_context(
            || format!("Failed to parse the compose project from {}", compose_file.display()),
        )
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the written paths
    let filter = if cli.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Convert {
            input,
            output_dir,
            namespace,
            json,
        } => {
            let project = input.load()?;
            let format = if json {
                OutputFormat::Json
            } else {
                OutputFormat::Yaml
            };
            let config = ConvertConfig::new(output_dir)
                .namespace(&namespace)
                .format(format);

            Orchestrator::new(&config).run_project(&project)?;
        }

        Commands::Config { input } => {
            let project = input.load()?;
            print!("{}", serde_yaml::to_string(&project.services)?);
        }
    }

    Ok(())
}
