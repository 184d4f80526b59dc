//! GameForge CLI - bridge interface for automation
//!
//! Commands: genres, validate, generate
//! Outputs JSON to stdout
//! Returns non-zero on rejection

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use gameforge_core::{GameGenerator, GameSpec, GenreCatalog, PipelineError};

#[derive(Parser)]
#[command(name = "gameforge-cli")]
#[command(about = "GameForge CLI - Game Scaffold Compiler")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List supported genres and their required detail fields
    Genres,

    /// Validate a game specification
    Validate {
        /// JSON payload (GameSpec)
        #[arg(short, long)]
        payload: Option<String>,

        /// Path to a JSON specification file
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Generate a game scaffold
    Generate {
        /// JSON payload (GameSpec)
        #[arg(short, long)]
        payload: Option<String>,

        /// Path to a JSON specification file
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Bearer credential for the remote content service
        #[arg(short, long)]
        credential: Option<String>,
    },
}

fn read_spec(payload: Option<String>, file: Option<PathBuf>) -> Result<GameSpec, String> {
    match (payload, file) {
        (Some(payload), _) => {
            GameSpec::from_json(&payload).map_err(|e| format!("Invalid payload: {e}"))
        }
        (None, Some(path)) => {
            GameSpec::load_from_path(&path).map_err(|e| e.to_string())
        }
        (None, None) => Err("Provide --payload or --file".to_string()),
    }
}

fn main() -> ExitCode {
    // Logs go to stderr so stdout stays machine-readable.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Genres => {
            let catalog = GenreCatalog::builtin();
            let genres: Vec<_> = catalog
                .genres()
                .iter()
                .map(|schema| {
                    serde_json::json!({
                        "genre": schema.genre,
                        "required_fields": schema.fields,
                    })
                })
                .collect();

            println!("{}", serde_json::to_string_pretty(&genres).unwrap());
            ExitCode::SUCCESS
        }

        Commands::Validate { payload, file } => {
            let spec = match read_spec(payload, file) {
                Ok(spec) => spec,
                Err(e) => {
                    println!(r#"{{"valid": false, "error": {}}}"#, json_str(&e));
                    return ExitCode::FAILURE;
                }
            };

            let generator = GameGenerator::new(GenreCatalog::builtin());
            match generator.validate(&spec) {
                Ok(report) => {
                    println!("{}", serde_json::to_string_pretty(&report).unwrap());
                    if report.valid {
                        ExitCode::SUCCESS
                    } else {
                        ExitCode::from(2) // Validation failure
                    }
                }
                Err(e) => {
                    println!(r#"{{"valid": false, "error": {}}}"#, json_str(&e.to_string()));
                    ExitCode::FAILURE
                }
            }
        }

        Commands::Generate {
            payload,
            file,
            credential,
        } => {
            let spec = match read_spec(payload, file) {
                Ok(spec) => spec,
                Err(e) => {
                    println!(r#"{{"success": false, "error": {}}}"#, json_str(&e));
                    return ExitCode::FAILURE;
                }
            };

            let catalog = GenreCatalog::builtin();
            let mut generator = match credential {
                Some(credential) => GameGenerator::with_credential(catalog, &credential),
                None => GameGenerator::new(catalog),
            };

            match generator.create_game(&spec) {
                Ok(artifact) => {
                    let output = serde_json::json!({
                        "success": true,
                        "authenticated": generator.is_authenticated(),
                        "artifact": artifact,
                    });
                    println!("{}", serde_json::to_string_pretty(&output).unwrap());
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    let output = serde_json::json!({
                        "success": false,
                        "error": e.to_string(),
                        "violations": violations_json(&e),
                    });
                    println!("{}", serde_json::to_string(&output).unwrap());
                    ExitCode::from(2) // Rejected specification
                }
            }
        }
    }
}

fn json_str(s: &str) -> String {
    serde_json::Value::String(s.to_string()).to_string()
}

fn violations_json(error: &PipelineError) -> serde_json::Value {
    match error {
        PipelineError::ValidationFailed { report } => {
            serde_json::to_value(&report.violations).unwrap_or(serde_json::Value::Null)
        }
        _ => serde_json::Value::Null,
    }
}
