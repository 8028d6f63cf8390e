use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use epu_domain::Project;
use epu_pipeline::{export_rows, ingest_upload, to_csv_text, CsvPipeline, ProjectMetadata};
use epu_store::MemoryRepository;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "epu")]
#[command(about = "Schedule CSV ingestion for operational shutdown projects", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors (stdout is reserved for output)
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest a schedule CSV and print the import report as JSON
    Import(ImportArgs),

    /// Render a project JSON file back to the legacy CSV format
    Export(ExportArgs),
}

#[derive(Args)]
struct ImportArgs {
    /// Schedule export to ingest
    file: PathBuf,

    /// Project name
    #[arg(long)]
    name: Option<String>,

    /// Team assigned to the project and every imported activity
    #[arg(long)]
    team: Option<String>,

    /// Project description
    #[arg(long)]
    description: Option<String>,

    /// Extra project tag (repeatable)
    #[arg(long)]
    tag: Vec<String>,

    /// Write the JSON report here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Consume the input file instead of staging a copy
    #[arg(long)]
    consume: bool,
}

#[derive(Args)]
struct ExportArgs {
    /// Project JSON (or a full import report) produced by `epu import`
    file: PathBuf,

    /// Write the CSV here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    match cli.command {
        Commands::Import(args) => run_import(args),
        Commands::Export(args) => run_export(args),
    }
}

fn run_import(args: ImportArgs) -> Result<()> {
    // Ingestion deletes its input, so unless the caller opted in we hand it
    // a staged copy and leave the original alone.
    let upload = if args.consume {
        args.file.clone()
    } else {
        stage_upload(&args.file)?
    };

    let metadata = ProjectMetadata {
        name: args.name,
        description: args.description,
        default_team: args.team,
        tags: args.tag,
        ..Default::default()
    };

    let repository = MemoryRepository::new();
    let report = ingest_upload(&CsvPipeline::new(), &upload, &metadata, &repository)
        .with_context(|| format!("failed to import {}", args.file.display()))?;

    let json = serde_json::to_string_pretty(&report)?;
    emit(args.output.as_deref(), &json)
}

fn run_export(args: ExportArgs) -> Result<()> {
    let text = fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let value: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("{} is not valid JSON", args.file.display()))?;

    // Accept the bare project or the whole import report.
    let project_value = match value.get("project") {
        Some(inner) => inner.clone(),
        None => value,
    };
    let project: Project = serde_json::from_value(project_value)
        .with_context(|| format!("{} does not contain a project", args.file.display()))?;

    let csv = to_csv_text(&export_rows(&project));
    emit(args.output.as_deref(), &csv)
}

fn stage_upload(source: &Path) -> Result<PathBuf> {
    let staged = tempfile::Builder::new()
        .prefix("epu-upload-")
        .suffix(".csv")
        .tempfile()
        .context("failed to create staging file")?;
    fs::copy(source, staged.path())
        .with_context(|| format!("failed to stage {}", source.display()))?;
    let path = staged.into_temp_path().keep()?;
    Ok(path)
}

fn emit(output: Option<&Path>, content: &str) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
        }
        None => {
            println!("{content}");
            Ok(())
        }
    }
}
