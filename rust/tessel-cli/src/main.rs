//! Tessel CLI: literal inspection, desugaring dumps and package-part queries.

use clap::{Parser as ClapParser, Subcommand};
use std::path::PathBuf;
use tessel_cli::commands::{self, CliError, DesugarRequest, Report};
use tessel_cli::config::{ConfigError, TesselConfig};
use tracing_subscriber::EnvFilter;

fn red(s: &str) -> String {
    format!("\x1b[31m{}\x1b[0m", s)
}
fn gray(s: &str) -> String {
    format!("\x1b[90m{}\x1b[0m", s)
}

#[derive(ClapParser)]
#[command(name = "tessel", version, about = "Tessel compiler front-end tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert one literal and print its constant or diagnostic
    Literal {
        /// Syntax kind: int, float, char, bool, null (or the full kind name)
        kind: String,
        /// Literal text exactly as written in source
        text: String,
        /// Print the constant and diagnostics as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the tree a desugaring produces
    Desugar {
        #[command(subcommand)]
        form: DesugarForm,
        /// Print the tree as JSON
        #[arg(long, global = true)]
        json: bool,
    },
    /// List the compiled parts of a package through the incremental caches
    Parts {
        /// Dotted package name, e.g. com.foo
        package: String,
        /// Config file (default: nearest tessel.toml)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum DesugarForm {
    /// `lhs ?: rhs`
    Elvis { lhs: String, rhs: String },
    /// `x++` or, with --prefix, `++x`
    Inc {
        operand: Option<String>,
        #[arg(long)]
        prefix: bool,
    },
    /// `x--` or, with --prefix, `--x`
    Dec {
        operand: Option<String>,
        #[arg(long)]
        prefix: bool,
    },
}

impl From<DesugarForm> for DesugarRequest {
    fn from(form: DesugarForm) -> Self {
        match form {
            DesugarForm::Elvis { lhs, rhs } => DesugarRequest::Elvis { lhs, rhs },
            DesugarForm::Inc { operand, prefix } => {
                DesugarRequest::Update { operand, increment: true, prefix }
            }
            DesugarForm::Dec { operand, prefix } => {
                DesugarRequest::Update { operand, increment: false, prefix }
            }
        }
    }
}

fn main() {
    let filter = EnvFilter::try_from_env("TESSEL_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Literal { kind, text, json } => {
            print_report(commands::literal(&kind, &text, json), "<literal>")
        }
        Commands::Desugar { form, json } => {
            print_report(commands::desugar(&form.into(), json), "<desugar>")
        }
        Commands::Parts { package, config } => cmd_parts(&package, config),
    }
}

fn print_report(result: Result<Report, CliError>, filename: &str) {
    match result {
        Ok(report) => {
            print!("{}", report.output);
            if !report.output.ends_with('\n') {
                println!();
            }
            if report.failed {
                std::process::exit(1);
            }
        }
        Err(e) => fail(e, filename),
    }
}

fn cmd_parts(package: &str, config: Option<PathBuf>) {
    let loaded = match config {
        Some(path) => TesselConfig::load_from(&path).map(|cfg| (path, cfg)),
        None => std::env::current_dir()
            .map_err(|source| ConfigError::Io { path: PathBuf::from("."), source })
            .and_then(|dir| TesselConfig::discover(&dir)),
    };
    let (path, cfg) = match loaded {
        Ok(found) => found,
        Err(e) => fail(e.into(), "tessel.toml"),
    };

    match commands::package_parts(&path, &cfg, package) {
        Ok(parts) if parts.is_empty() => println!("{}", gray("(no parts)")),
        Ok(parts) => {
            for part in parts {
                println!("{}", part);
            }
        }
        Err(e) => fail(e, &path.display().to_string()),
    }
}

fn fail(error: CliError, filename: &str) -> ! {
    match error {
        CliError::Compile(e) => eprint!("{}", tessel_compiler::format_error(&e, filename)),
        other => eprintln!("{} {}", red("error:"), other),
    }
    std::process::exit(1);
}
