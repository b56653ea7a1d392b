//! postmerge CLI
//!
//! Command-line tool for pairing post URL files with caption files and
//! exporting the merged table.

use clap::{Parser, Subcommand};
use postmerge_core::{
    default_file_name, extract_identifier, extract_post_urls, render_html, render_text,
    scan_directory, ExportFormat, ExportOptions, MergeStats, Session,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "postmerge")]
#[command(about = "Merge post URL and caption files into one table", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the text files found in a directory and their identifiers
    Scan {
        /// Directory to scan
        #[arg(short, long)]
        dir: PathBuf,
    },

    /// Merge URL and caption files and print the table
    Show {
        /// Directory holding URL files
        #[arg(short, long)]
        urls: PathBuf,

        /// Directory holding caption files
        #[arg(short, long)]
        captions: PathBuf,

        /// Maximum number of rows to display
        #[arg(short, long)]
        limit: Option<usize>,

        /// Print an HTML table instead of plain text
        #[arg(long)]
        html: bool,
    },

    /// Merge URL and caption files and export the table
    Export {
        /// Directory holding URL files
        #[arg(short, long)]
        urls: PathBuf,

        /// Directory holding caption files
        #[arg(short, long)]
        captions: PathBuf,

        /// Output file or directory (defaults to a dated file name in the current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format (xlsx, csv or json)
        #[arg(long, default_value = "xlsx")]
        format: String,

        /// Export options file (JSON)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Write a URL file for every post metadata file (*.json, *.json.xz) in a directory
    ExtractUrls {
        /// Directory holding the metadata files
        #[arg(short, long)]
        dir: PathBuf,

        /// Directory for the URL files (defaults to the metadata directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write an export options file with the default settings
    CreateConfig {
        /// Output path for the options file
        #[arg(short, long)]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli.command).await {
        if e.is_notice() {
            eprintln!("Warning: {}", e);
            std::process::exit(2);
        }
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

async fn run(command: Commands) -> postmerge_core::Result<()> {
    match command {
        Commands::Scan { dir } => cmd_scan(&dir),
        Commands::Show {
            urls,
            captions,
            limit,
            html,
        } => cmd_show(&urls, &captions, limit, html).await,
        Commands::Export {
            urls,
            captions,
            output,
            format,
            config,
        } => cmd_export(&urls, &captions, output, &format, config).await,
        Commands::ExtractUrls { dir, output } => cmd_extract_urls(&dir, output.as_deref()),
        Commands::CreateConfig { output } => cmd_create_config(&output),
    }
}

fn cmd_scan(dir: &Path) -> postmerge_core::Result<()> {
    let result = scan_directory(dir)?;

    println!("Scanned {}", result.root.display());
    println!("Found {} text files", result.file_count());
    println!();

    for file in &result.files {
        println!("  {}\t{}", extract_identifier(&file.name), file.name);
    }

    Ok(())
}

/// Scan both directories and run a merge over them
async fn process_dirs(urls: &Path, captions: &Path) -> postmerge_core::Result<Session> {
    let url_files = scan_directory(urls)?.into_files();
    let caption_files = scan_directory(captions)?.into_files();

    let mut session = Session::new();
    session.select_urls(url_files);
    session.select_captions(caption_files);
    session.process().await?;

    Ok(session)
}

async fn cmd_show(
    urls: &Path,
    captions: &Path,
    limit: Option<usize>,
    html: bool,
) -> postmerge_core::Result<()> {
    let session = process_dirs(urls, captions).await?;
    let Some(table) = session.table() else {
        return Ok(());
    };

    if html {
        print!("{}", render_html(table));
        return Ok(());
    }

    let stats = MergeStats::of(table);
    println!(
        "Posts ({} rows: {} matched, {} without caption, {} without URL)",
        table.row_count(),
        stats.matched,
        stats.url_only,
        stats.caption_only
    );
    println!();
    print!("{}", render_text(table, limit));

    Ok(())
}

async fn cmd_export(
    urls: &Path,
    captions: &Path,
    output: Option<PathBuf>,
    format: &str,
    config: Option<PathBuf>,
) -> postmerge_core::Result<()> {
    let format: ExportFormat = format.parse()?;
    let options = match config {
        Some(path) => ExportOptions::load(path)?,
        None => ExportOptions::default(),
    };

    let session = process_dirs(urls, captions).await?;
    let path = resolve_output(output, &options, format);
    tracing::debug!(path = %path.display(), ?format, "resolved export path");
    session.export(&path, format, &options)?;

    let rows = session.table().map(|t| t.row_count()).unwrap_or_default();
    println!("Exported {} rows to {}", rows, path.display());

    Ok(())
}

/// Pick the export path: an explicit file, or a dated file name inside the
/// given directory (or the current one)
fn resolve_output(output: Option<PathBuf>, options: &ExportOptions, format: ExportFormat) -> PathBuf {
    let file_name = default_file_name(options, format);
    match output {
        Some(path) if path.is_dir() => path.join(file_name),
        Some(path) => path,
        None => PathBuf::from(file_name),
    }
}

fn cmd_extract_urls(dir: &Path, output: Option<&Path>) -> postmerge_core::Result<()> {
    let out_dir = output.unwrap_or(dir);
    let result = extract_post_urls(dir, out_dir)?;

    println!(
        "Wrote {} URL files to {} ({} metadata files skipped)",
        result.url_count(),
        out_dir.display(),
        result.skipped
    );

    Ok(())
}

fn cmd_create_config(output: &Path) -> postmerge_core::Result<()> {
    ExportOptions::default().save(output)?;
    println!("Created export options file: {}", output.display());
    println!();
    println!("Edit the file to change sheet name, file prefix or column widths, then run:");
    println!(
        "  postmerge export --urls <dir> --captions <dir> --config {}",
        output.display()
    );

    Ok(())
}
