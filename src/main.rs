// HerdImport - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. config.toml loading (platform default or --config override)
// 3. Logging initialisation (debug mode support)
// 4. Dispatch to the import or template command

use herdimport::app::import::{self as import_app, ExportTargets, InputSource};
use herdimport::app::report;
use herdimport::core::model::ImportMode;
use herdimport::core::template;
use herdimport::platform::config::{self, AppConfig, PlatformPaths};
use herdimport::util;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// HerdImport - Livestock record importer
#[derive(Parser, Debug)]
#[command(name = "herdimport", version, about)]
struct Cli {
    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug", global = true)]
    debug: bool,

    /// Path to config.toml (defaults to the platform config directory).
    #[arg(short = 'c', long = "config", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Import pasted rows from a file, or from stdin with `-`.
    Import {
        /// Input file path, or `-` for stdin.
        input: String,

        /// Import mode: excel, csv or manual (default from config).
        #[arg(short = 'm', long = "mode")]
        mode: Option<ImportMode>,

        /// Reference date for ages and two-digit years (YYYY-MM-DD).
        #[arg(long = "today")]
        today: Option<NaiveDate>,

        /// Write imported records to this CSV file.
        #[arg(long = "records-csv")]
        records_csv: Option<PathBuf>,

        /// Write row errors to this CSV file.
        #[arg(long = "errors-csv")]
        errors_csv: Option<PathBuf>,

        /// Write the full summary to this JSON file.
        #[arg(long = "json")]
        json: Option<PathBuf>,
    },

    /// Print or save the example input for a mode.
    Template {
        /// Import mode: excel, csv or manual.
        #[arg(short = 'm', long = "mode")]
        mode: ImportMode,

        /// Write to this file instead of stdout. A directory gets the
        /// default template file name.
        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PlatformPaths::resolve().config_file());
    let (app_config, config_warnings) = config::load_config(&config_path);

    // Initialise logging subsystem
    util::logging::init(
        cli.debug,
        app_config.log_level.as_deref(),
        app_config.log_file.as_deref(),
    );

    tracing::info!(
        version = util::constants::APP_VERSION,
        debug = cli.debug,
        config = %config_path.display(),
        "HerdImport starting"
    );

    for warning in &config_warnings {
        tracing::warn!(warning = %warning, "Config warning");
    }

    let code = match cli.command {
        Command::Import {
            input,
            mode,
            today,
            records_csv,
            errors_csv,
            json,
        } => {
            let targets = ExportTargets {
                records_csv,
                errors_csv,
                summary_json: json,
            };
            run_import_command(&app_config, &input, mode, today, &targets)
        }
        Command::Template { mode, output } => run_template_command(mode, output),
    };

    std::process::exit(code);
}

fn run_import_command(
    app_config: &AppConfig,
    input: &str,
    mode: Option<ImportMode>,
    today: Option<NaiveDate>,
    targets: &ExportTargets,
) -> i32 {
    let source = InputSource::from_arg(input);
    let options = import_app::resolve_options(app_config, mode, today);

    let summary = match import_app::run_import(&source, &options) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Import failed");
            eprintln!("Error: {e}");
            return import_app::EXIT_FAILURE;
        }
    };

    print!("{}", report::render_report(&summary, &source.describe()));

    if !targets.is_empty() {
        if let Err(e) = import_app::write_exports(&summary, targets, app_config.pretty_json) {
            tracing::error!(error = %e, "Export failed");
            eprintln!("Error: {e}");
            return import_app::EXIT_FAILURE;
        }
    }

    import_app::exit_code(&summary)
}

fn run_template_command(mode: ImportMode, output: Option<PathBuf>) -> i32 {
    let text = template::template_for(mode);

    let Some(path) = output else {
        print!("{text}");
        return import_app::EXIT_OK;
    };

    let path = if path.is_dir() {
        path.join(template::template_file_name(mode))
    } else {
        path
    };

    match std::fs::write(&path, text) {
        Ok(()) => {
            tracing::info!(path = %path.display(), mode = %mode, "Template written");
            println!("{}", path.display());
            import_app::EXIT_OK
        }
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "Failed to write template");
            eprintln!("Error: cannot write {}: {e}", path.display());
            import_app::EXIT_FAILURE
        }
    }
}
