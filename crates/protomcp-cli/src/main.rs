//! protomcp - Inspect compiled protobuf descriptor sets
//!
//! This tool reads serialized `FileDescriptorSet`s (as written by
//! `protoc --descriptor_set_out` or `buf build -o`) and lists, looks up or
//! counts the definitions they contain.

mod inspect;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use prost::Message;
use prost_types::{FileDescriptorProto, FileDescriptorSet};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, trace, warn, Level};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

/// File extensions picked up when walking a directory
const DESCRIPTOR_SET_EXTENSIONS: [&str; 3] = ["pb", "binpb", "desc"];

/// Inspect compiled protobuf descriptor sets
#[derive(Parser, Debug)]
#[command(name = "protomcp")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(flatten)]
    input: InputMode,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct InputMode {
    /// Path to a serialized FileDescriptorSet
    #[arg(short, long, env = "PROTOMCP_DESCRIPTOR_SET")]
    file: Option<PathBuf>,

    /// Directory to search for descriptor sets (*.pb, *.binpb, *.desc)
    #[arg(short, long)]
    directory: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every file, message, field, enum, service and method
    List,
    /// Look up a definition by dotted path (e.g. `User`, `User.id`, `UserService.GetUser`)
    Find {
        /// Dotted path, optionally package-qualified
        path: String,
    },
    /// Count definitions
    Stats,
}

/// Loaded descriptor files, deduplicated by file name
#[derive(Default)]
struct FileRegistry {
    files: Vec<FileDescriptorProto>,
    /// Maps file name -> index into `files`
    seen: HashMap<String, usize>,
    stats: RegistryStats,
}

#[derive(Default)]
struct RegistryStats {
    total_found: usize,
    duplicates_skipped: usize,
    conflicts_skipped: usize,
}

impl FileRegistry {
    fn new() -> Self {
        Self::default()
    }

    /// Adds a file unless one with the same name is already registered.
    ///
    /// The first occurrence wins; a later file with the same name but
    /// different content is reported and skipped.
    fn register(&mut self, file: FileDescriptorProto, source: &Path) -> bool {
        self.stats.total_found += 1;

        if let Some(&index) = self.seen.get(file.name()) {
            if self.files[index] == file {
                trace!("Skipping duplicate: {} (from {})", file.name(), source.display());
                self.stats.duplicates_skipped += 1;
            } else {
                warn!(
                    "Skipping conflicting definition of {} from {} (content differs)",
                    file.name(),
                    source.display()
                );
                self.stats.conflicts_skipped += 1;
            }
            return false;
        }

        self.seen.insert(file.name().to_string(), self.files.len());
        self.files.push(file);
        true
    }

    fn print_summary(&self) {
        info!(
            "Summary: {} found, {} duplicates skipped, {} conflicts skipped, {} loaded",
            self.stats.total_found,
            self.stats.duplicates_skipped,
            self.stats.conflicts_skipped,
            self.files.len()
        );
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_target(false)
        .init();

    let files = load_input(&cli.input)?;
    print!("{}", run(&cli.command, &files)?);

    Ok(())
}

/// Executes a command over the loaded files and returns its output
fn run(command: &Command, files: &[FileDescriptorProto]) -> Result<String> {
    match command {
        Command::List => Ok(inspect::list(files)),
        Command::Find { path } => {
            let found = inspect::find(files, path);
            if found.is_empty() {
                bail!("No definition found for {}", path);
            }
            debug!("{} match(es) for {}", found.len(), path);
            Ok(found.iter().map(inspect::describe).collect())
        }
        Command::Stats => Ok(inspect::Stats::collect(files).to_string()),
    }
}

/// Loads every file from the selected input
fn load_input(input: &InputMode) -> Result<Vec<FileDescriptorProto>> {
    let mut registry = FileRegistry::new();

    if let Some(ref file) = input.file {
        if !file.is_file() {
            bail!("Input path is not a file: {}", file.display());
        }
        load_descriptor_set(file, &mut registry)?;
    } else if let Some(ref directory) = input.directory {
        let sets = find_descriptor_sets(directory)?;
        if sets.is_empty() {
            bail!("No descriptor sets found in {}", directory.display());
        }
        for path in &sets {
            // Log error but continue with other files
            if let Err(e) = load_descriptor_set(path, &mut registry) {
                warn!("Error loading {}: {:#}", path.display(), e);
            }
        }
        info!("Processed {} descriptor sets", sets.len());
    } else {
        bail!("Either --file or --directory must be specified")
    }

    registry.print_summary();
    Ok(registry.files)
}

/// Decodes one descriptor set and registers its files
fn load_descriptor_set(path: &Path, registry: &mut FileRegistry) -> Result<()> {
    trace!("Reading {}", path.display());
    let data =
        fs::read(path).with_context(|| format!("Failed to read input file: {}", path.display()))?;

    let set = FileDescriptorSet::decode(data.as_slice())
        .with_context(|| format!("Failed to decode descriptor set: {}", path.display()))?;

    debug!("Decoded {} file(s) from {}", set.file.len(), path.display());
    for file in set.file {
        registry.register(file, path);
    }
    Ok(())
}

/// Walks a directory for descriptor set files, in file name order
fn find_descriptor_sets(directory: &Path) -> Result<Vec<PathBuf>> {
    if !directory.exists() {
        bail!("Directory does not exist: {}", directory.display());
    }
    if !directory.is_dir() {
        bail!("Path is not a directory: {}", directory.display());
    }

    info!("Scanning directory: {}", directory.display());

    let mut sets = Vec::new();
    for entry in WalkDir::new(directory)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        // Skip hidden files
        if path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.starts_with('.'))
            .unwrap_or(false)
        {
            continue;
        }

        if !is_descriptor_set(path) {
            trace!("Skipping {}", path.display());
            continue;
        }
        sets.push(path.to_path_buf());
    }

    Ok(sets)
}

fn is_descriptor_set(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| DESCRIPTOR_SET_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}
