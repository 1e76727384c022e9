//! Docgroup CLI - Test Group Linter
//!
//! Lints the `@group` docblock of JavaScript/TypeScript test files.

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use docgroup::config::{ColorMode, Config, OutputFormat};
use docgroup::discover::collect_files;
use docgroup::engine::Engine;
use docgroup::fixer::Fixer;
use docgroup::output::formatter_for;
use docgroup::rules::all_rules;
use docgroup::{LintRule, Severity};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "docgroup",
    version,
    about = "Test group linter",
    long_about = "Validates the @group tags in the leading docblock of JavaScript test files."
)]
struct Cli {
    /// Files, directories or glob patterns to lint (default: current directory)
    files: Vec<String>,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<Format>,

    /// Number of parallel jobs (0 = auto)
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Disable specific rules (comma-separated)
    #[arg(long, value_delimiter = ',')]
    disable: Option<Vec<String>>,

    /// Manifest property holding the allowed groups
    #[arg(long)]
    property_name: Option<String>,

    /// JSON manifest holding the allowed groups (default: package.json)
    #[arg(long)]
    groups_file: Option<PathBuf>,

    /// Auto-fix issues where possible (dry-run by default, use with --write to apply)
    #[arg(long)]
    fix: bool,

    /// Write fixes to files (requires --fix)
    #[arg(long, requires = "fix")]
    write: bool,

    /// Show diff of changes instead of applying fixes
    #[arg(long)]
    diff: bool,

    /// List available rules and exit
    #[arg(long)]
    list_rules: bool,

    /// Lint every file given, not only test files
    #[arg(long)]
    all_files: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
    Compact,
}

impl From<Format> for OutputFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Text => OutputFormat::Text,
            Format::Json => OutputFormat::Json,
            Format::Compact => OutputFormat::Compact,
        }
    }
}

/// Print a rule in a consistent format
fn print_rule(rule: &dyn LintRule, enabled: bool) {
    let meta = rule.meta();
    let severity = match meta.severity {
        Severity::Error => "error".red(),
        Severity::Warning => "warning".yellow(),
        Severity::Info => "info".blue(),
    };
    let fixable = if meta.fixable { " [fixable]".green() } else { "".normal() };
    let disabled = if enabled { "".normal() } else { " [disabled]".dimmed() };

    println!(
        "    {} [{}] ({}){}{}",
        meta.id.cyan(),
        severity,
        meta.category,
        fixable,
        disabled
    );
    println!("      {}", meta.description);
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if cli.verbose { "debug" } else { "warn" }),
    )
    .init();

    // Load configuration
    let mut config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => Config::load_default().unwrap_or_else(|e| {
            log::warn!("ignoring configuration: {}", e);
            Config::default()
        }),
    };

    config.merge_cli(
        cli.format.map(OutputFormat::from),
        cli.verbose.then_some(true),
        cli.jobs,
        cli.disable.clone(),
        cli.property_name.clone(),
        cli.groups_file.clone(),
    );

    let colored = !cli.no_color && config.output.color != ColorMode::Never;
    if !colored {
        colored::control::set_override(false);
    } else if config.output.color == ColorMode::Always {
        colored::control::set_override(true);
    }

    if cli.list_rules {
        println!("{}", "Available rules:".bold());
        for rule in all_rules() {
            let enabled = config.is_rule_enabled(rule.id());
            print_rule(rule.as_ref(), enabled);
        }
        return Ok(());
    }

    let mut engine = Engine::new(config.clone()).context("invalid file patterns")?;
    if cli.all_files {
        engine = engine.with_all_files().context("invalid file patterns")?;
    }

    let patterns = if cli.files.is_empty() {
        vec![".".to_string()]
    } else {
        cli.files.clone()
    };
    let files = collect_files(&patterns)?;

    if files.is_empty() {
        bail!("no files found to lint");
    }
    log::debug!("collected {} candidate file(s)", files.len());

    let result = engine.lint(&files);

    if cli.fix || cli.diff {
        let dry_run = !cli.write;
        let mut fixer = Fixer::new(dry_run);
        if cli.diff {
            fixer = fixer.with_diff_mode();
        }

        fixer.collect_from_diagnostics(&result.diagnostics);

        if fixer.pending_count() > 0 {
            let fix_result = fixer.apply_all();

            if cli.diff {
                println!("{}", fixer.format_diffs(&fix_result));
            } else if dry_run {
                eprint!("{}", fixer.format_fixes());
                eprintln!(
                    "{}: {} fixes available",
                    "dry-run".cyan(),
                    fixer.pending_count()
                );
                eprintln!("Use --write to apply fixes");
            } else {
                eprintln!(
                    "Applied {} fixes to {} files",
                    fix_result.fixes_applied, fix_result.files_modified
                );
                if fix_result.fixes_failed > 0 {
                    eprintln!(
                        "{}: {} fixes failed",
                        "warning".yellow(),
                        fix_result.fixes_failed
                    );
                    for error in &fix_result.errors {
                        eprintln!("  {}", error);
                    }
                }
            }

            if fix_result.fixes_skipped > 0 {
                eprintln!(
                    "{}: {} fixes skipped, run again to apply them",
                    "note".blue(),
                    fix_result.fixes_skipped
                );
            }
        } else if cli.verbose {
            eprintln!("No auto-fixes available");
        }
    }

    let formatter = formatter_for(config.output.format, colored);
    print!("{}", formatter.format(&result));

    std::process::exit(result.exit_code());
}
