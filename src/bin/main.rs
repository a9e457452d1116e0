//! semview CLI - Compile semantic models to SQL views
//!
//! Usage:
//!   semview compile [model.yml] [--config <path>] [--out <dir>] [--dialect <dialect>]
//!   semview validate <model.yml>
//!   semview list <model.yml>
//!
//! Examples:
//!   semview compile semantic/model.contract.yml --out output/sql
//!   semview compile semantic/model.contract.yml --stdout --dialect postgres
//!   semview list semantic/model.contract.yml

use clap::{Parser, Subcommand, ValueEnum};
use semview::compile::compile_model;
use semview::config::{LoggingSettings, Settings};
use semview::emit::ArtifactWriter;
use semview::model::loader::load_document;
use semview::model::ModelDocument;
use semview::sql::Dialect;
use semview::{logging, lowering, validation};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "semview")]
#[command(about = "semview - Compile a semantic model into deterministic SQL views")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile every fact of a model to SQL
    Compile {
        /// Path to the model file (defaults to `[compile] model` from config)
        model: Option<PathBuf>,

        /// Path to a semview.toml config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output directory for artifacts
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// SQL dialect used for identifier quoting
        #[arg(short, long)]
        dialect: Option<DialectArg>,

        /// Skip structural validation
        #[arg(long)]
        no_validate: bool,

        /// Print SQL to stdout instead of writing files
        #[arg(long)]
        stdout: bool,

        /// Compile facts in parallel
        #[arg(long)]
        parallel: bool,
    },

    /// Validate a model without generating SQL
    Validate {
        /// Path to the model file
        model: PathBuf,
    },

    /// List facts and dimensions in a model
    List {
        /// Path to the model file
        model: PathBuf,
    },
}

#[derive(Clone, ValueEnum)]
enum DialectArg {
    Generic,
    Postgres,
    Duckdb,
    Mysql,
    Tsql,
}

impl From<DialectArg> for Dialect {
    fn from(arg: DialectArg) -> Self {
        match arg {
            DialectArg::Generic => Dialect::Generic,
            DialectArg::Postgres => Dialect::Postgres,
            DialectArg::Duckdb => Dialect::DuckDb,
            DialectArg::Mysql => Dialect::MySql,
            DialectArg::Tsql => Dialect::TSql,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Compile {
            model,
            config,
            out,
            dialect,
            no_validate,
            stdout,
            parallel,
        } => {
            let settings = match load_settings(config.as_deref()) {
                Ok(s) => s,
                Err(code) => return code,
            };
            init_logging(&settings.logging);
            cmd_compile(
                settings,
                CompileArgs {
                    model,
                    out,
                    dialect,
                    no_validate,
                    stdout,
                    parallel,
                },
            )
        }
        Commands::Validate { model } => {
            init_logging(&LoggingSettings::default());
            cmd_validate(&model)
        }
        Commands::List { model } => cmd_list(&model),
    }
}

struct CompileArgs {
    model: Option<PathBuf>,
    out: Option<PathBuf>,
    dialect: Option<DialectArg>,
    no_validate: bool,
    stdout: bool,
    parallel: bool,
}

fn load_settings(path: Option<&Path>) -> Result<Settings, ExitCode> {
    let result = match path {
        Some(path) => Settings::from_file(path),
        None => Settings::load(),
    };
    result.map_err(|e| {
        eprintln!("Configuration error: {}", e);
        ExitCode::FAILURE
    })
}

fn init_logging(settings: &LoggingSettings) {
    if let Err(e) = logging::init(settings) {
        eprintln!("Warning: {}", e);
    }
}

fn load(path: &Path) -> Option<ModelDocument> {
    match load_document(path) {
        Ok(document) => Some(document),
        Err(e) => {
            eprintln!("Error loading model '{}': {}", path.display(), e);
            None
        }
    }
}

fn report_validation(document: &ModelDocument) -> bool {
    match validation::validate(document) {
        Ok(()) => true,
        Err(errors) => {
            eprintln!("Validation failed:");
            for error in &errors {
                eprintln!("  {}", error);
            }
            false
        }
    }
}

fn cmd_compile(mut settings: Settings, args: CompileArgs) -> ExitCode {
    // CLI flags override config values
    if let Some(dialect) = args.dialect {
        settings.compile.dialect = dialect.into();
    }
    if args.parallel {
        settings.compile.parallel = true;
    }
    if args.no_validate {
        settings.compile.validate = false;
    }

    let model_path = match args.model {
        Some(path) => path,
        None => match settings.compile.model_path() {
            Ok(path) => path,
            Err(e) => {
                eprintln!("Configuration error: {}", e);
                return ExitCode::FAILURE;
            }
        },
    };

    let Some(document) = load(&model_path) else {
        return ExitCode::FAILURE;
    };

    if settings.compile.validate && !report_validation(&document) {
        return ExitCode::FAILURE;
    }

    let model = match lowering::lower(&document) {
        Ok(model) => Arc::new(model),
        Err(e) => {
            eprintln!("Lowering error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let report = compile_model(model, settings.compile_options());

    for failure in &report.failures {
        eprintln!("Compilation error: {}", failure);
    }

    if args.stdout {
        for compiled in &report.compiled {
            println!("-- {}", compiled.name);
            println!("{}", compiled.sql);
            println!();
        }
    } else {
        let out_dir = match args.out {
            Some(dir) => dir,
            None => match settings.compile.output_path() {
                Ok(dir) => dir,
                Err(e) => {
                    eprintln!("Configuration error: {}", e);
                    return ExitCode::FAILURE;
                }
            },
        };

        let writer = ArtifactWriter::new(out_dir)
            .with_dialect(settings.compile.dialect)
            .with_options(settings.emit.clone());

        match writer.write(&report) {
            Ok(manifest) => {
                for artifact in &manifest.artifacts {
                    eprintln!("  wrote {}", writer.out_dir().join(&artifact.path).display());
                }
            }
            Err(e) => {
                eprintln!("Emit error: {}", e);
                return ExitCode::FAILURE;
            }
        }
    }

    if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn cmd_validate(path: &Path) -> ExitCode {
    let Some(document) = load(path) else {
        return ExitCode::FAILURE;
    };

    if report_validation(&document) {
        println!("Model is valid: {}", path.display());
        println!(
            "  {} facts, {} dimensions",
            document.facts.len(),
            document.dimensions.len()
        );
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn cmd_list(path: &Path) -> ExitCode {
    let Some(document) = load(path) else {
        return ExitCode::FAILURE;
    };

    println!("File: {}", path.display());
    println!();

    if !document.facts.is_empty() {
        println!("Facts:");
        for (name, fact) in &document.facts {
            println!(
                "  {} (grain: {}; foreign keys: {}; measures: {})",
                name,
                fact.grain.join(", "),
                fact.foreign_keys.join(", "),
                fact.measures.join(", ")
            );
        }
        println!();
    }

    if !document.dimensions.is_empty() {
        println!("Dimensions:");
        for (name, dimension) in &document.dimensions {
            println!(
                "  {} (key: {})",
                name,
                dimension.key.as_deref().unwrap_or("<none>")
            );
        }
    }

    ExitCode::SUCCESS
}
