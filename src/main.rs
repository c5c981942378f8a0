//! hashwalk - Record size, modification time and content hash of every file in a tree.
//!
//! Usage:
//!   hashwalk process [PATH]    Process a tree and print one line per entry
//!   hashwalk hash FILE         Print the digest of a single file
//!   hashwalk list [PATH]       Print the enumerated paths only
//!   hashwalk --help            Show help

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Context, Result, eyre};
use tracing_subscriber::EnvFilter;

use hashwalk_scan::{
    FileLister, FileProcessor, FileRecord, HashAlgorithm, ProcessReport, ProcessorConfig,
    compute_hash,
};

#[derive(Parser)]
#[command(
    name = "hashwalk",
    version,
    about = "Record size, mtime and content hash for every file in a tree",
    long_about = "hashwalk enumerates a directory, stats every entry once and hashes its \
                  content. Entries that vanish or cannot be read are reported, not fatal."
)]
struct Cli {
    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Process a tree and print one record per entry
    Process {
        /// Path to process
        #[arg(default_value = ".")]
        path: PathBuf,

        #[command(flatten)]
        walk: WalkArgs,

        /// Digest algorithm (sha256, blake3, md5)
        #[arg(short, long, default_value_t = HashAlgorithm::Sha256)]
        algorithm: HashAlgorithm,

        /// Process entries on all cores
        #[arg(short, long)]
        parallel: bool,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the digest of a single file
    Hash {
        /// File to hash
        path: PathBuf,

        /// Digest algorithm (sha256, blake3, md5)
        #[arg(short, long, default_value_t = HashAlgorithm::Sha256)]
        algorithm: HashAlgorithm,
    },

    /// Print enumerated paths without hashing
    List {
        /// Path to list
        #[arg(default_value = ".")]
        path: PathBuf,

        #[command(flatten)]
        walk: WalkArgs,
    },
}

/// Options shared by every command that walks a tree.
#[derive(clap::Args)]
struct WalkArgs {
    /// Include directories alongside files
    #[arg(short = 'd', long)]
    include_dirs: bool,

    /// Only keep files with this extension (repeatable)
    #[arg(short = 'e', long = "ext")]
    extensions: Vec<String>,

    /// Skip entries whose name matches this glob (repeatable)
    #[arg(short = 'x', long = "exclude")]
    exclude: Vec<String>,

    /// Maximum depth to descend
    #[arg(long)]
    max_depth: Option<u32>,

    /// Skip hidden files and directories
    #[arg(long)]
    no_hidden: bool,

    /// Follow symbolic links
    #[arg(short = 'L', long)]
    follow_symlinks: bool,
}

impl WalkArgs {
    fn into_config(
        self,
        root: PathBuf,
        algorithm: HashAlgorithm,
        parallel: bool,
    ) -> Result<ProcessorConfig> {
        ProcessorConfig::builder()
            .root(root)
            .include_dirs(self.include_dirs)
            .algorithm(algorithm)
            .extensions(self.extensions)
            .exclude_patterns(self.exclude)
            .max_depth(self.max_depth)
            .include_hidden(!self.no_hidden)
            .follow_symlinks(self.follow_symlinks)
            .parallel(parallel)
            .build()
            .map_err(|e| eyre!("Invalid configuration: {e}"))
    }
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Process {
            path,
            walk,
            algorithm,
            parallel,
            format,
            output,
        } => {
            let config = walk.into_config(path, algorithm, parallel)?;
            run_process(config, format, output)?;
        }
        Command::Hash { path, algorithm } => {
            run_hash(&path, algorithm)?;
        }
        Command::List { path, walk } => {
            let config = walk.into_config(path, HashAlgorithm::default(), false)?;
            run_list(config)?;
        }
    }

    Ok(())
}

/// Install the stderr log subscriber.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "warn,hashwalk={default_level},hashwalk_scan={default_level}"
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Process a tree and write the report.
fn run_process(config: ProcessorConfig, format: OutputFormat, output: Option<PathBuf>) -> Result<()> {
    tracing::info!(root = %config.root.display(), algorithm = %config.algorithm, "processing");

    let processor = FileProcessor::new(config);
    let report = processor.run().context("Processing failed")?;

    let rendered = match format {
        OutputFormat::Text => render_text(&report),
        OutputFormat::Json => serde_json::to_string_pretty(&report)?,
    };

    match output {
        Some(output_path) => {
            std::fs::write(&output_path, rendered)
                .with_context(|| format!("Cannot write {}", output_path.display()))?;
            eprintln!("Report written to {}", output_path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
        }
    }

    Ok(())
}

/// Hash a single file.
fn run_hash(path: &Path, algorithm: HashAlgorithm) -> Result<()> {
    match compute_hash(path, algorithm).context("Hashing failed")? {
        Some(hash) => println!("{hash}  {}", path.display()),
        None => return Err(eyre!("{} is not a regular file", path.display())),
    }
    Ok(())
}

/// Print enumerated paths.
fn run_list(config: ProcessorConfig) -> Result<()> {
    let mut list = FileLister::new(config).list().context("Listing failed")?;
    let mut stdout = std::io::stdout().lock();

    for path in list.by_ref() {
        writeln!(stdout, "{}", path.display())?;
    }

    let skipped = list.warnings().len();
    if skipped > 0 {
        eprintln!("{skipped} unreadable entr{} skipped", if skipped == 1 { "y" } else { "ies" });
    }

    Ok(())
}

/// Render a report as aligned text lines followed by a summary.
fn render_text(report: &ProcessReport) -> String {
    let mut out = String::new();
    let width = report.algorithm.hex_len();

    for record in &report.records {
        out.push_str(&render_record(record, &report.root, width));
        out.push('\n');
    }

    let stats = &report.stats;
    out.push('\n');
    out.push_str(&"─".repeat(60));
    out.push('\n');
    out.push_str(&format!(
        " {} entries ({} files, {} directories), {}\n",
        stats.total_entries,
        stats.files,
        stats.dirs,
        format_size(stats.total_size)
    ));
    out.push_str(&format!(
        " {} hashed with {}, {} degraded\n",
        stats.hashed, report.algorithm, stats.degraded
    ));
    if let Some((path, size)) = &stats.largest_file {
        out.push_str(&format!(
            " Largest: {} ({})\n",
            display_path(path, &report.root),
            format_size(*size)
        ));
    }
    out.push_str(&format!(
        " Processed in {:.2}s\n",
        report.duration.as_secs_f64()
    ));

    out
}

fn render_record(record: &FileRecord, root: &Path, hash_width: usize) -> String {
    let hash = match (&record.content_hash, record.is_dir()) {
        (Some(hash), _) => hash.to_string(),
        (None, true) => format!("{:<hash_width$}", "<dir>"),
        (None, false) => format!("{:<hash_width$}", "-"),
    };
    let size = record
        .size
        .map(format_size)
        .unwrap_or_else(|| "-".to_string());
    let modified = record
        .modified
        .map(|m| m.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string());

    let mut line = format!(
        "{hash}  {size:>10}  {modified:<19}  {}",
        display_path(&record.path, root)
    );
    if let Some(issue) = &record.issue {
        line.push_str(&format!("  [{:?}: {}]", issue.kind, issue.message));
    }
    line
}

/// Show paths relative to the processed root where possible.
fn display_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .ok()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(path)
        .display()
        .to_string()
}

/// Format size in human-readable form.
fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}
