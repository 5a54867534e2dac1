use std::fs;
use std::path::PathBuf;

use chrono::{Datelike, Local};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use veckomeny::{Registry, Upload};

#[derive(Debug, Parser)]
#[clap(name = "veckomeny", about = "Import weekly kitchen menus from mixed-format uploads")]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Import a menu document and print the normalized weeks
    Import(Import),
    /// List registered importers and their availability
    Probe,
}

#[derive(Debug, Args)]
struct Import {
    /// File to import
    file: PathBuf,

    /// MIME type reported by the uploader
    #[clap(short, long)]
    mime: Option<String>,

    /// Year used for documents that only carry week numbers
    #[clap(short, long)]
    year: Option<i32>,

    /// Use the strict line grammar for word-processor files
    #[clap(short, long)]
    strict: bool,

    /// Emit the result as JSON
    #[clap(short, long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init()
        .map_err(|err| anyhow::anyhow!("fail to init tracing subscriber: {}", err))?;

    match Cli::parse().command {
        Command::Import(args) => run_import(args),
        Command::Probe => run_probe(),
    }
}

fn run_import(args: Import) -> anyhow::Result<()> {
    let bytes = fs::read(&args.file)?;
    let filename = args
        .file
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default();
    // the one place the wall clock is consulted
    let year = args.year.unwrap_or_else(|| Local::now().year());

    let registry = Registry::standard(year, args.strict)?;
    let upload = Upload::new(&bytes, filename, args.mime.as_deref());
    let result = registry.import(&upload);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    for warning in &result.warnings {
        println!("{} {}", "warning:".yellow(), warning);
    }
    for error in &result.errors {
        println!("{} {}", "error:".red(), error);
    }
    for week in &result.weeks {
        let header = format!("week {} ({})", week.week, week.year);
        println!("{}", header.as_str().purple());
        for item in &week.items {
            let category = item.category.as_deref().unwrap_or("-");
            println!(
                "  {} {}/{} [{}] {}",
                item.day.short_code().green(),
                item.meal,
                item.variant,
                category.italic(),
                item.dish_name
            );
        }
        println!();
    }
    Ok(())
}

fn run_probe() -> anyhow::Result<()> {
    let registry = Registry::standard(Local::now().year(), false)?;
    for parser in registry.parsers() {
        let status = if parser.available() {
            "available".green()
        } else {
            "unavailable".red()
        };
        println!("{} {}", parser.name().purple(), status);
    }
    Ok(())
}
