//! fstree - in-memory directory trees with line counting and collision-free renaming.
//!
//! Usage:
//!   fstree tree [PATH]          Build a tree and print it
//!   fstree lines [PATH]         Count lines of text files
//!   fstree next-name NAME       Print the next free name in the name-N.ext sequence
//!   fstree export [PATH]        Export the tree to JSON
//!   fstree --help               Show help

mod local;

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Args, Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Context, Result, bail};
use tracing_subscriber::EnvFilter;

use fstree_analyze::{LINES_META_KEY, LineConfig, LineCounter};
use fstree_core::{BuildConfig, Entry, FetchErrorPolicy};
use fstree_ops::{next_unique_name, unique_name, validate_filename};
use fstree_scan::{BuildOutput, DirectoryHandle, TreeBuilder};

use crate::local::LocalDir;

/// Environment variable holding the log filter.
const LOG_ENV: &str = "FSTREE_LOG";

#[derive(Parser)]
#[command(
    name = "fstree",
    version,
    about = "In-memory directory trees with line counting and collision-free renaming"
)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build a tree and print it
    Tree {
        #[command(flatten)]
        build: BuildArgs,

        /// Maximum depth to display
        #[arg(short, long)]
        depth: Option<u32>,

        /// Number of entries to show per directory
        #[arg(short = 'n', long, default_value = "50")]
        top: usize,
    },

    /// Count lines of text files
    Lines {
        #[command(flatten)]
        build: BuildArgs,

        /// Also count files classified as binary
        #[arg(long)]
        include_binary: bool,

        /// Skip files larger than this (e.g., "1MB")
        #[arg(long)]
        max_size: Option<String>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Print the next free name in the name-N.ext sequence
    NextName {
        /// Current file name
        name: String,

        /// Directory to check for collisions (pure successor if omitted)
        #[arg(long = "in")]
        dir: Option<PathBuf>,
    },

    /// Export the tree to JSON
    Export {
        #[command(flatten)]
        build: BuildArgs,

        /// Annotate files with line counts before exporting
        #[arg(long)]
        lines: bool,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Options shared by every command that builds a tree.
#[derive(Args)]
struct BuildArgs {
    /// Root directory (defaults to current directory)
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Glob patterns to leave out of the tree
    #[arg(short, long = "ignore")]
    ignore: Vec<String>,

    /// Leave out hidden entries
    #[arg(long)]
    no_hidden: bool,

    /// Keep unreadable files as placeholders instead of failing
    #[arg(long)]
    keep_going: bool,

    /// Maximum in-flight operations per directory
    #[arg(long, default_value = "16")]
    concurrency: usize,
}

impl BuildArgs {
    fn config(&self) -> Result<BuildConfig> {
        let policy = if self.keep_going {
            FetchErrorPolicy::Placeholder
        } else {
            FetchErrorPolicy::Abort
        };
        BuildConfig::builder()
            .ignore_patterns(self.ignore.clone())
            .include_hidden(!self.no_hidden)
            .max_concurrency(self.concurrency)
            .on_fetch_error(policy)
            .build()
            .context("Invalid build options")
    }
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Tree { build, depth, top } => {
            run_tree(&build, depth, top).await?;
        }
        Command::Lines {
            build,
            include_binary,
            max_size,
            format,
        } => {
            let max_size = max_size.as_deref().map(parse_size).transpose()?;
            run_lines(&build, include_binary, max_size, format).await?;
        }
        Command::NextName { name, dir } => {
            run_next_name(&name, dir.as_deref()).await?;
        }
        Command::Export {
            build,
            lines,
            output,
        } => {
            run_export(&build, lines, output).await?;
        }
    }

    Ok(())
}

/// Install the stderr log subscriber.
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Build a tree for the given options.
async fn build(args: &BuildArgs) -> Result<BuildOutput> {
    let dir = LocalDir::open(&args.path)
        .with_context(|| format!("Invalid path: {}", args.path.display()))?;

    eprintln!("Reading {}...", args.path.display());

    let root: Arc<dyn DirectoryHandle> = Arc::new(dir);
    let output = TreeBuilder::with_config(args.config()?)
        .build(root)
        .await
        .context("Tree build failed")?;

    for warning in &output.warnings {
        eprintln!("warning: {}: {}", warning.path, warning.message);
    }
    Ok(output)
}

/// Build a tree and print it.
async fn run_tree(args: &BuildArgs, max_depth: Option<u32>, top_n: usize) -> Result<()> {
    let output = build(args).await?;

    println!();
    println!("{}", "─".repeat(60));
    println!(
        " {} - {}",
        args.path.display(),
        format_size(output.stats.total_size)
    );
    println!(
        " {} files, {} directories",
        output.stats.total_files, output.stats.total_dirs
    );
    println!(" Built in {:.2}s", output.duration.as_secs_f64());
    println!("{}", "─".repeat(60));
    println!();

    print_entry(&output.root, 0, max_depth.unwrap_or(u32::MAX), top_n);

    if output.has_warnings() {
        println!();
        println!("{} warning(s) during build", output.warnings.len());
    }

    Ok(())
}

/// Count lines of every text file in the tree.
async fn run_lines(
    args: &BuildArgs,
    include_binary: bool,
    max_size: Option<u64>,
    format: OutputFormat,
) -> Result<()> {
    let mut root = build(args).await?.root;

    let config = LineConfig::builder()
        .skip_binary(!include_binary)
        .max_file_size(max_size)
        .max_concurrency(args.concurrency)
        .build()
        .context("Invalid line count options")?;
    let report = LineCounter::with_config(config).annotate(&mut root).await;

    match format {
        OutputFormat::Text => {
            for file in root.files() {
                if let Some(lines) = file.get_meta(LINES_META_KEY).and_then(|v| v.as_u64()) {
                    println!("{lines:>10}  {}", file.path());
                }
            }
            println!("{}", "─".repeat(60));
            println!(
                "{:>10}  total ({} files counted, {} skipped, {} failed)",
                report.total_lines, report.files_counted, report.files_skipped, report.files_failed
            );
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}

/// Print the successor of a name, optionally avoiding a directory's contents.
async fn run_next_name(name: &str, dir: Option<&Path>) -> Result<()> {
    validate_filename(name)?;

    let next = match dir {
        None => next_unique_name(name),
        Some(dir) => {
            let dir = LocalDir::open(dir)
                .with_context(|| format!("Invalid directory: {}", dir.display()))?;
            let children = dir.entries().await.context("Failed to list directory")?;
            let taken: HashSet<&str> = children.iter().map(|child| child.name()).collect();
            unique_name(&next_unique_name(name), |candidate| {
                taken.contains(candidate)
            })?
        }
    };

    println!("{next}");
    Ok(())
}

/// Export the tree to JSON.
async fn run_export(args: &BuildArgs, lines: bool, output: Option<PathBuf>) -> Result<()> {
    let mut root = build(args).await?.root;
    if lines {
        LineCounter::new().annotate(&mut root).await;
    }

    let json = serde_json::to_string_pretty(&root)?;

    match output {
        Some(output_path) => {
            std::fs::write(&output_path, json)?;
            eprintln!("Exported to {}", output_path.display());
        }
        None => {
            println!("{json}");
        }
    }

    Ok(())
}

/// Print an entry and its children in enumeration order.
fn print_entry(entry: &Entry, depth: u32, max_depth: u32, top_n: usize) {
    let indent = "  ".repeat(depth as usize);
    let name = if depth == 0 { "." } else { entry.name() };

    let detail = match entry.children() {
        Ok(children) => format!("{} entries", children.len()),
        Err(_) if entry.is_unreadable() => "unreadable".to_string(),
        Err(_) => format_size(entry.size()),
    };

    println!(
        "{}{}{:<40} {:>12}",
        indent,
        if entry.is_directory() { "▼ " } else { "  " },
        truncate(&format!("{}{}", name, if entry.is_directory() { "/" } else { "" }), 40),
        detail
    );

    if let Ok(children) = entry.children() {
        if depth >= max_depth {
            return;
        }
        for child in children.iter().take(top_n) {
            print_entry(child, depth + 1, max_depth, top_n);
        }

        let remaining = children.len().saturating_sub(top_n);
        if remaining > 0 {
            let indent = "  ".repeat((depth + 1) as usize);
            println!("{indent}  ... and {remaining} more");
        }
    }
}

/// Format size in human-readable form.
fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}

/// Truncate a string to at most `max_len` characters.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len - 1).collect();
        format!("{kept}…")
    }
}

/// Parse a size string (e.g., "1KB", "10MB", "1GB").
fn parse_size(s: &str) -> Result<u64> {
    let s = s.trim().to_uppercase();
    let digits = s.trim_end_matches(|c: char| !c.is_ascii_digit() && c != '.');
    let unit = &s[digits.len()..];

    let multiplier: u64 = match unit {
        "" | "B" => 1,
        "K" | "KB" => 1024,
        "M" | "MB" => 1024 * 1024,
        "G" | "GB" => 1024 * 1024 * 1024,
        other => bail!("Unknown size unit: {other}"),
    };
    let num: f64 = digits
        .parse()
        .with_context(|| format!("Invalid size: {s}"))?;

    Ok((num * multiplier as f64) as u64)
}
