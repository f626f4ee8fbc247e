use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use awd::{Limits, WriteOptions, Writer};
use awd_tools::{decode_file_json, format_decode_pretty, inspect_file, sample_scene, InspectReport};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "awd-tools", version, about = "awd inspection and sample tools")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Inspect file structure and block sizes.
    Inspect {
        /// Path to a file, or a directory of files.
        path: PathBuf,
        /// Optional glob filter when inspecting a directory.
        #[arg(long)]
        glob: Option<String>,
        /// Sort inspected files.
        #[arg(long, value_enum)]
        sort: Option<InspectSort>,
        /// Limit the number of inspected files (after sorting).
        #[arg(long)]
        limit: Option<usize>,
        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
        format: OutputFormat,
    },
    /// Decode every block into structured output.
    Decode {
        file: PathBuf,
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
    /// Write a sample scene.
    Sample {
        /// Destination path.
        out: PathBuf,
        /// Writer options as JSON, e.g. `{"wide_floats": true}`.
        #[arg(long)]
        options: Option<PathBuf>,
        /// Frames in the sample UV animation.
        #[arg(long, default_value_t = 8)]
        frames: u16,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum InspectSort {
    Size,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Json,
    Pretty,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::WARN.into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Inspect {
            path,
            glob,
            sort,
            limit,
            format,
        } => {
            let limits = Limits::default();
            if path.is_dir() {
                let mut entries = collect_entries(&path, glob.as_deref())?;
                if let Some(InspectSort::Size) = sort {
                    sort_by_size(&mut entries);
                }
                entries.truncate(limit.unwrap_or(usize::MAX));
                for entry in entries {
                    let bytes = fs::read(&entry.path)
                        .with_context(|| format!("read file {}", entry.path.display()))?;
                    let report = inspect_file(&bytes, &limits)?;
                    println!("== {} ({} bytes) ==", entry.path.display(), entry.size);
                    print_report(&report, format)?;
                }
            } else {
                let bytes =
                    fs::read(&path).with_context(|| format!("read file {}", path.display()))?;
                let report = inspect_file(&bytes, &limits)?;
                print_report(&report, format)?;
            }
        }
        Command::Decode { file, format } => {
            let bytes = fs::read(&file).with_context(|| format!("read file {}", file.display()))?;
            let output = decode_file_json(&bytes, &Limits::default())?;
            match format {
                OutputFormat::Json => {
                    let json = serde_json::to_string_pretty(&output).context("serialize json")?;
                    println!("{json}");
                }
                OutputFormat::Pretty => print!("{}", format_decode_pretty(&output)),
            }
        }
        Command::Sample {
            out,
            options,
            frames,
        } => {
            let options = options
                .as_deref()
                .map(load_options)
                .transpose()
                .context("load writer options")?
                .unwrap_or_default();
            let registry = sample_scene(frames)?;
            let file = fs::File::create(&out)
                .with_context(|| format!("create {}", out.display()))?;
            let written = Writer::new(options).write_to(&registry, file)?;
            info!(path = %out.display(), bytes = written, "wrote sample");
            println!("wrote {} ({written} bytes)", out.display());
        }
    }
    Ok(())
}

fn load_options(path: &Path) -> Result<WriteOptions> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read options {}", path.display()))?;
    serde_json::from_str(&contents).context("parse options json")
}

struct FileEntry {
    path: PathBuf,
    size: u64,
}

/// Lists files in `dir` matching `pattern` (default `*`).
fn collect_entries(dir: &Path, pattern: Option<&str>) -> Result<Vec<FileEntry>> {
    let query = dir.join(pattern.unwrap_or("*"));
    let query = query
        .to_str()
        .with_context(|| format!("non-utf8 path {}", query.display()))?;

    let mut entries = Vec::new();
    for path in glob::glob(query).context("invalid glob pattern")? {
        let path = path?;
        let meta = fs::metadata(&path).with_context(|| format!("stat {}", path.display()))?;
        if meta.is_file() {
            entries.push(FileEntry {
                path,
                size: meta.len(),
            });
        }
    }
    Ok(entries)
}

/// Largest first, ties by path.
fn sort_by_size(entries: &mut [FileEntry]) {
    entries.sort_by(|a, b| b.size.cmp(&a.size).then_with(|| a.path.cmp(&b.path)));
}

fn print_report(report: &InspectReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(report).context("serialize json")?;
            println!("{json}");
        }
        OutputFormat::Pretty => {
            let header = report.header;
            println!(
                "version: {}.{} wide_floats: {} compression: {}",
                header.version.0, header.version.1, header.wide_floats, header.compression
            );
            println!("body_len: {} bytes", header.body_len);
            println!("blocks:");
            for block in &report.blocks {
                println!(
                    "  #{} {}: flags 0x{:02x} ({} bytes)",
                    block.id, block.block_type, block.flags, block.body_len
                );
            }
        }
    }
    Ok(())
}
