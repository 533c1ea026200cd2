//! ForgeCards CLI - Bridge interface for the host renderer
//!
//! Commands: schema, defaults, validate, render
//! Outputs JSON to stdout, logs to stderr
//! Returns non-zero when nothing can be rendered

use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use forgecards_core::{
    default_variables, Agent, PostTemplate, RenderConfig,
};

#[derive(Parser)]
#[command(name = "forgecards-cli")]
#[command(about = "ForgeCards CLI - Post Card Template")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to a JSON render config
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the variables schema
    Schema,

    /// Print the default variables
    Defaults,

    /// Validate variables
    Validate {
        /// JSON payload (variables object)
        #[arg(short, long)]
        payload: String,
    },

    /// Render the post card layout
    Render {
        /// JSON payload (variables object)
        #[arg(short, long)]
        payload: String,

        /// JSON agent context, passed through untouched
        #[arg(short, long)]
        agent: Option<String>,
    },
}

fn print_json(value: &impl serde::Serialize) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(s) => {
            println!("{}", s);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Failed to serialize output: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn failure(error: impl std::fmt::Display, code: u8) -> ExitCode {
    let output = serde_json::json!({
        "success": false,
        "error": error.to_string(),
    });
    println!("{}", output);
    ExitCode::from(code)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match RenderConfig::load(path) {
            Ok(c) => c,
            Err(e) => return failure(e, 1),
        },
        None => RenderConfig::default(),
    };

    let template = match PostTemplate::from_config(&config) {
        Ok(t) => t,
        Err(e) => return failure(e, 1),
    };

    match cli.command {
        Commands::Schema => print_json(&template.schema().document()),

        Commands::Defaults => print_json(&default_variables()),

        Commands::Validate { payload } => {
            let variables: Value = match serde_json::from_str(&payload) {
                Ok(v) => v,
                Err(e) => return failure(format!("Invalid payload: {}", e), 1),
            };

            let result = template.check(&variables);
            let code = print_json(&result);
            if result.valid {
                code
            } else {
                ExitCode::from(2)  // Validation failure
            }
        }

        Commands::Render { payload, agent } => {
            let variables: Value = match serde_json::from_str(&payload) {
                Ok(v) => v,
                Err(e) => return failure(format!("Invalid payload: {}", e), 1),
            };
            let agent = match agent.as_deref().map(serde_json::from_str::<Value>) {
                None => Agent::default(),
                Some(Ok(v)) => Agent::new(v),
                Some(Err(e)) => return failure(format!("Invalid agent: {}", e), 1),
            };

            match template.render_manifest(&agent, &variables) {
                Ok(manifest) => print_json(&serde_json::json!({
                    "success": true,
                    "manifest": manifest,
                })),
                Err(e) => failure(e, 2),  // Nothing rendered
            }
        }
    }
}
