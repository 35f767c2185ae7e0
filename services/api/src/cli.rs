use crate::server;
use clap::{Args, Parser, Subcommand};
use screener_builder::domain::Benefit;
use screener_builder::error::AppError;
use screener_builder::library::LibraryCatalog;
use screener_builder::schema::extract_unique_input_paths;
use serde_json::json;
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Screener Builder",
    about = "Author, publish and inspect eligibility screeners",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Print the form inputs required by a JSON array of benefits
    FormPaths(FormPathsArgs),
    /// Summarize a library check catalog file
    Library(LibraryArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Override the configured library catalog file
    #[arg(long)]
    pub(crate) library: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct FormPathsArgs {
    /// File holding a JSON array of benefits with embedded check configs
    benefits: PathBuf,
}

#[derive(Args, Debug)]
struct LibraryArgs {
    /// Catalog file holding a JSON array of eligibility checks
    catalog: PathBuf,
    /// Only list checks from this module
    #[arg(long)]
    module: Option<String>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::FormPaths(args) => print_form_paths(args),
        Command::Library(args) => print_library(args),
    }
}

fn print_form_paths(args: FormPathsArgs) -> Result<(), AppError> {
    let raw = fs::read(&args.benefits)?;
    let benefits: Vec<Benefit> = serde_json::from_slice(&raw).map_err(|err| {
        AppError::InvalidRequest(format!(
            "{} is not a JSON array of benefits: {err}",
            args.benefits.display()
        ))
    })?;

    let paths = extract_unique_input_paths(&benefits);
    println!("{}", json!({ "paths": paths }));
    Ok(())
}

fn print_library(args: LibraryArgs) -> Result<(), AppError> {
    let catalog = LibraryCatalog::from_path(&args.catalog)?;
    let checks: Vec<_> = match args.module.as_deref() {
        Some(module) => catalog.by_module(module).collect(),
        None => catalog.all().iter().collect(),
    };

    println!("{} library checks", checks.len());
    for check in checks {
        println!(
            "  {:<32} {:<16} v{}",
            check.id, check.module, check.version
        );
    }
    Ok(())
}
