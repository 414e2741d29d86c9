use std::{
    env, fs,
    io::{self, Read, Write},
    path::{Path, PathBuf},
    process::ExitCode,
};

use anyhow::{Context, bail};
use clap::Parser;
use mdreflow::{
    BreakMode, FormatOptions, ListSpacing,
    config::{discover, load_config},
    format_markdown, rewrite,
};
use rayon::prelude::*;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    version,
    about = "Rewrap Markdown paragraphs and normalise list spacing and typography"
)]
struct Cli {
    /// Rewrite files in place
    #[arg(short = 'i', long = "in-place", requires = "files")]
    in_place: bool,
    /// Do not keep a `.orig` copy when rewriting in place
    #[arg(long)]
    nobackup: bool,
    /// Write the result to PATH instead of stdout (single input only)
    #[arg(short, long, value_name = "PATH", conflicts_with_all = ["in_place", "auto"])]
    output: Option<PathBuf>,
    /// Read settings from PATH instead of searching for a config file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Log pipeline stages to stderr
    #[arg(short, long)]
    verbose: bool,
    /// Semantic breaks, smart quotes and ellipses, rewriting files in place
    /// without a backup
    #[arg(long)]
    auto: bool,
    #[command(flatten)]
    opts: FormatOpts,
    /// Markdown files to format; stdin is read when none are given
    files: Vec<PathBuf>,
}

#[derive(clap::Args)]
#[expect(
    clippy::struct_excessive_bools,
    reason = "CLI exposes independent switches"
)]
struct FormatOpts {
    /// Target line width; 0 disables wrapping
    #[arg(short, long, value_name = "N")]
    width: Option<usize>,
    /// Break lines at sentence boundaries
    #[arg(short, long)]
    semantic: bool,
    /// Convert straight quotes to curly quotes
    #[arg(long)]
    smartquotes: bool,
    /// Replace "..." with the ellipsis character
    #[arg(long)]
    ellipses: bool,
    /// Blank lines between list items
    #[arg(long, value_enum, value_name = "POLICY")]
    list_spacing: Option<ListSpacing>,
    /// In semantic mode, join lines shorter than N with the next sentence
    #[arg(long, value_name = "N")]
    min_line_len: Option<usize>,
    /// Treat input as plain text paragraphs rather than Markdown
    #[arg(short, long)]
    plaintext: bool,
}

impl FormatOpts {
    /// Overlay explicitly given flags onto `options`.
    fn apply(&self, auto: bool, options: &mut FormatOptions) {
        if let Some(width) = self.width {
            options.width = width;
        }
        if self.semantic || auto {
            options.break_mode = BreakMode::Semantic;
        }
        if self.smartquotes || auto {
            options.smart_quotes = true;
        }
        if self.ellipses || auto {
            options.ellipses = true;
        }
        if let Some(spacing) = self.list_spacing {
            options.list_spacing = spacing;
        }
        if let Some(min) = self.min_line_len {
            options.min_line_len = min;
        }
        if self.plaintext {
            options.plaintext = true;
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Built-in defaults, then the config file, then command-line flags.
fn resolve_options(cli: &Cli) -> anyhow::Result<FormatOptions> {
    let file_config = match &cli.config {
        Some(path) => Some(load_config(path)?),
        None => {
            let cwd = env::current_dir().context("failed to read working directory")?;
            discover(&cwd)?
        }
    };
    let mut options = FormatOptions::default();
    if let Some(config) = &file_config {
        config.apply(&mut options);
    }
    cli.opts.apply(cli.auto, &mut options);
    debug!(?options, "resolved options");
    Ok(options)
}

/// Format one file, returning the text to print or `None` when the file was
/// rewritten in place.
fn format_path(
    path: &Path,
    options: &FormatOptions,
    in_place: bool,
    backup: bool,
) -> anyhow::Result<Option<String>> {
    if in_place {
        rewrite(path, options, backup)?;
        return Ok(None);
    }
    let text = fs::read_to_string(path)?;
    Ok(Some(format_markdown(&text, options)?))
}

fn emit(output: Option<&Path>, text: &str) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            stdout.flush()?;
            Ok(())
        }
    }
}

/// Entry point for the `mdreflow` command.
///
/// # Examples
///
/// ```sh
/// # Wrap to 72 columns and print
/// mdreflow --width 72 notes.md
///
/// # One sentence per line, curly quotes, rewriting in place
/// mdreflow --auto docs/*.md
///
/// # Filter standard input
/// cat notes.md | mdreflow --semantic
/// ```
fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.output.is_some() && cli.files.len() > 1 {
        bail!("--output accepts a single input file");
    }
    let options = resolve_options(&cli)?;

    if cli.files.is_empty() {
        let mut input = String::new();
        io::stdin()
            .read_to_string(&mut input)
            .context("failed to read stdin")?;
        let formatted = format_markdown(&input, &options)?;
        emit(cli.output.as_deref(), &formatted)?;
        return Ok(ExitCode::SUCCESS);
    }

    let in_place = cli.in_place || cli.auto;
    let backup = !cli.nobackup && !cli.auto;
    let results: Vec<anyhow::Result<Option<String>>> = cli
        .files
        .par_iter()
        .map(|path| format_path(path, &options, in_place, backup))
        .collect();

    let mut failed = false;
    for (path, result) in cli.files.iter().zip(results) {
        match result {
            Ok(Some(text)) => emit(cli.output.as_deref(), &text)?,
            Ok(None) => {}
            Err(err) => {
                eprintln!("mdreflow: {}: {err:#}", path.display());
                failed = true;
            }
        }
    }
    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
