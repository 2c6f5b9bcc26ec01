//! SYSDIFF command-line interface.
//!
//! This is the main entry point for the sysdiff CLI tool. It uses clap for
//! argument parsing and wires together the library modules to compare two
//! system description files scope by scope.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use sysdiff::{
    compare_scope, format_comparison, Filter, OutputFormat, OutputOptions, SystemDescription,
};
use std::path::PathBuf;
use std::process;

/// SYSDIFF - Semantic diff for system descriptions
///
/// Compares two configuration snapshots (packages, users, files, ...) and
/// reports what exists only on one side, ignoring formatting and ordering.
#[derive(Parser)]
#[command(name = "sysdiff")]
#[command(version)]
#[command(about = "Semantic diff for system descriptions", long_about = None)]
struct Cli {
    /// First description file to compare
    #[arg(value_name = "FILE1")]
    file1: PathBuf,

    /// Second description file to compare
    #[arg(value_name = "FILE2")]
    file2: PathBuf,

    /// Compare only these scopes (default: every scope present in either file)
    #[arg(short, long, value_name = "SCOPE")]
    scope: Vec<String>,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value = "terminal")]
    format: OutputFormatArg,

    /// Also show entries common to both descriptions
    #[arg(long)]
    show_common: bool,

    /// Pair updated entries by this attribute and show before/after values
    #[arg(long, value_name = "ATTRIBUTE")]
    pair_by: Option<String>,

    /// Exclude entries by filter definition, e.g.
    /// "/unmanaged_files/files/name=/var/log/*"
    #[arg(short = 'x', long, value_name = "DEFINITION")]
    exclude: Vec<String>,

    /// Maximum length for displayed values
    #[arg(long, default_value = "80")]
    max_value_length: usize,

    /// Verbose output (show progress)
    #[arg(short, long)]
    verbose: bool,
}

/// Output format argument for clap
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum OutputFormatArg {
    /// Colored terminal output
    Terminal,
    /// JSON representation
    Json,
    /// Plain text (no colors)
    Plain,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Terminal => OutputFormat::Terminal,
            OutputFormatArg::Json => OutputFormat::Json,
            OutputFormatArg::Plain => OutputFormat::Plain,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    match run(cli) {
        Ok(exit_code) => process::exit(exit_code),
        Err(err) => {
            eprintln!("Error: {:#}", err);
            process::exit(2);
        }
    }
}

fn run(cli: Cli) -> Result<i32> {
    if cli.verbose {
        eprintln!("Loading {}...", cli.file1.display());
    }

    let a = SystemDescription::load(&cli.file1)
        .with_context(|| format!("Failed to load first description: {}", cli.file1.display()))?;

    if cli.verbose {
        eprintln!("Loading {}...", cli.file2.display());
    }

    let b = SystemDescription::load(&cli.file2)
        .with_context(|| format!("Failed to load second description: {}", cli.file2.display()))?;

    let mut filter = Filter::new();
    for definition in &cli.exclude {
        filter
            .add_definition(definition)
            .with_context(|| format!("Invalid --exclude definition: {}", definition))?;
    }

    let scopes = if cli.scope.is_empty() {
        scope_union(&a, &b)
    } else {
        cli.scope.clone()
    };

    let options = OutputOptions {
        show_common: cli.show_common,
        pair_by: cli.pair_by.clone(),
        max_value_length: cli.max_value_length,
    };
    let format: OutputFormat = cli.format.into();
    let active_filter = if filter.is_empty() {
        None
    } else {
        Some(&filter)
    };

    let mut has_differences = false;
    for scope in &scopes {
        let comparison = compare_scope(&a, &b, scope)
            .with_context(|| format!("Failed to compare scope '{}'", scope))?;
        has_differences |= comparison.has_differences();

        let output = format_comparison(&comparison, &format, &options, active_filter)
            .context("Failed to format comparison output")?;
        println!("{}", output);
    }

    if has_differences {
        Ok(1)
    } else {
        Ok(0)
    }
}

/// Scopes of both descriptions, first file's order first.
fn scope_union(a: &SystemDescription, b: &SystemDescription) -> Vec<String> {
    let mut scopes: Vec<String> = a.scope_names().map(String::from).collect();
    for scope in b.scope_names() {
        if !scopes.iter().any(|existing| existing == scope) {
            scopes.push(scope.to_string());
        }
    }
    scopes
}
