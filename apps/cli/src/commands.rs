//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use nfdocs_core::{BuildReport, ProgressReporter, ScanOptions, extract_tree, run_build};
use nfdocs_document::renderer_for;
use nfdocs_shared::{
    AppConfig, BuildConfig, DefinitionKind, Diagnostic, Layout, OutputFormat, init_config,
    load_config, load_config_from,
};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// nfdocs: API documentation for Nextflow pipelines.
#[derive(Parser)]
#[command(
    name = "nfdocs",
    version,
    about = "Build API documentation from `///` annotations in Nextflow sources.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to use instead of ~/.nfdocs/nfdocs.toml.
    #[arg(long, global = true, env = "NFDOCS_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Annotation options shared by `build` and `check`.
#[derive(clap::Args, Debug, Clone, Default)]
pub(crate) struct ScanArgs {
    /// Annotation line prefix (default "/// ").
    #[arg(long)]
    pub prefix: Option<String>,

    /// Source file extension to scan (default "nf").
    #[arg(long)]
    pub extension: Option<String>,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Extract annotations and render the API document.
    Build {
        /// Source file or directory.
        path: PathBuf,

        /// Output markup: rst, markdown, or json.
        #[arg(short, long)]
        format: Option<OutputFormat>,

        /// Parameter layout: table or list.
        #[arg(short, long)]
        layout: Option<Layout>,

        /// Write the document here instead of stdout.
        #[arg(short, long)]
        out: Option<PathBuf>,

        #[command(flatten)]
        scan: ScanArgs,

        /// Extract files in parallel.
        #[arg(long)]
        parallel: bool,

        /// Exit non-zero when any error diagnostic was raised.
        #[arg(long)]
        strict: bool,
    },

    /// Extract annotations and report what was found, without rendering.
    Check {
        /// Source file or directory.
        path: PathBuf,

        #[command(flatten)]
        scan: ScanArgs,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "nfdocs=info",
        1 => "nfdocs=debug",
        _ => "nfdocs=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    // Logs go to stderr so a document written to stdout stays clean.
    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config;
    match cli.command {
        Command::Build {
            path,
            format,
            layout,
            out,
            scan,
            parallel,
            strict,
        } => {
            let mut config = build_config(config_path.as_deref(), &scan)?;
            if let Some(format) = format {
                config.format = format;
            }
            if let Some(layout) = layout {
                config.layout = layout;
            }
            config.parallel |= parallel;
            cmd_build(&path, &config, out.as_deref(), strict)
        }
        Command::Check { path, scan } => {
            let config = build_config(config_path.as_deref(), &scan)?;
            cmd_check(&path, &config)
        }
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(config_path.as_deref()),
        },
    }
}

/// Config file (explicit path or user default), then scan flags on top.
fn build_config(config_path: Option<&Path>, scan: &ScanArgs) -> Result<BuildConfig> {
    let app = resolve_app_config(config_path)?;
    let mut config = BuildConfig::from(&app);
    if let Some(prefix) = &scan.prefix {
        config.prefix = prefix.clone();
    }
    if let Some(extension) = &scan.extension {
        config.extension = extension.trim_start_matches('.').to_string();
    }
    config.validate()?;
    Ok(config)
}

fn resolve_app_config(config_path: Option<&Path>) -> Result<AppConfig> {
    let config = match config_path {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };
    Ok(config)
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_build(path: &Path, config: &BuildConfig, out: Option<&Path>, strict: bool) -> Result<()> {
    info!(
        path = %path.display(),
        format = %config.format,
        layout = %config.layout,
        "building documentation"
    );

    let reporter = CliProgress::new();
    let report = run_build(path, config, &reporter)?;

    let renderer = renderer_for(config.format);
    let text = renderer.render(&report.nodes)?;

    match out {
        Some(out) => {
            std::fs::write(out, &text)
                .wrap_err_with(|| format!("failed to write {}", out.display()))?;
            info!(out = %out.display(), renderer = renderer.name(), "document written");
        }
        None => print!("{text}"),
    }

    print_diagnostics(&report.diagnostics);
    eprintln!(
        "{} file(s) scanned, {} definition(s) rendered, {} diagnostic(s)",
        report.files_scanned,
        report.definitions_rendered,
        report.diagnostics.len()
    );

    if strict && report.has_errors() {
        return Err(eyre!(
            "build produced {} error diagnostic(s)",
            error_count(&report.diagnostics)
        ));
    }
    Ok(())
}

fn cmd_check(path: &Path, config: &BuildConfig) -> Result<()> {
    let options = ScanOptions::from(config);
    let reporter = CliProgress::new();
    let extraction = extract_tree(path, &options, config.parallel, &reporter)?;
    reporter.finish();

    for kind in DefinitionKind::ALL {
        let definitions: Vec<_> = extraction.groups.of_kind(kind).collect();
        if definitions.is_empty() {
            continue;
        }
        println!("{} ({})", kind.label(definitions.len()), definitions.len());
        for definition in definitions {
            println!(
                "  {:<32} {}:{}",
                definition.name,
                definition.file.display(),
                definition.lines
            );
        }
    }

    print_diagnostics(&extraction.diagnostics);
    eprintln!(
        "{} file(s) scanned, {} definition(s) found, {} diagnostic(s)",
        extraction.files_scanned,
        extraction.groups.len(),
        extraction.diagnostics.len()
    );

    let errors = error_count(&extraction.diagnostics);
    if errors > 0 {
        return Err(eyre!("check found {errors} error diagnostic(s)"));
    }
    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(config_path: Option<&Path>) -> Result<()> {
    let config = resolve_app_config(config_path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

fn print_diagnostics(diagnostics: &[Diagnostic]) {
    for diagnostic in diagnostics {
        eprintln!("{diagnostic}");
    }
}

fn error_count(diagnostics: &[Diagnostic]) -> usize {
    diagnostics.iter().filter(|d| d.is_error()).count()
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(style);
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }

    fn finish(&self) {
        self.spinner.finish_and_clear();
    }
}

// Error paths return through `?` before `done` runs; the spinner must not
// keep ticking over the error report.
impl Drop for CliProgress {
    fn drop(&mut self) {
        if !self.spinner.is_finished() {
            self.finish();
        }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn file_scanned(&self, path: &Path, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Scanned [{current}/{total}] {}", path.display()));
    }

    fn done(&self, _report: &BuildReport) {
        self.finish();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_build_flags() {
        let cli = Cli::try_parse_from([
            "nfdocs", "-vv", "build", "pipeline/", "--format", "md", "--layout", "list",
            "--prefix", "//! ", "--parallel", "--strict",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        let Command::Build {
            path,
            format,
            layout,
            scan,
            parallel,
            strict,
            out,
        } = cli.command
        else {
            panic!("expected build");
        };
        assert_eq!(path, PathBuf::from("pipeline/"));
        assert_eq!(format, Some(OutputFormat::Markdown));
        assert_eq!(layout, Some(Layout::List));
        assert_eq!(scan.prefix.as_deref(), Some("//! "));
        assert!(parallel && strict);
        assert!(out.is_none());
    }

    #[test]
    fn rejects_unknown_format() {
        assert!(Cli::try_parse_from(["nfdocs", "build", ".", "--format", "html"]).is_err());
    }

    #[test]
    fn spinner_is_cleared_when_build_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing");

        let reporter = CliProgress::new();
        let spinner = reporter.spinner.clone();
        assert!(run_build(&missing, &BuildConfig::default(), &reporter).is_err());
        assert!(!spinner.is_finished());
        drop(reporter);
        assert!(spinner.is_finished());

        assert!(cmd_build(&missing, &BuildConfig::default(), None, false).is_err());
        assert!(cmd_check(&missing, &BuildConfig::default()).is_err());
    }

    #[test]
    fn flags_override_config_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nfdocs.toml");
        std::fs::write(&path, "[annotations]\nprefix = \"## \"\nextension = \"groovy\"\n").unwrap();

        let from_file = build_config(Some(&path), &ScanArgs::default()).unwrap();
        assert_eq!(from_file.prefix, "## ");
        assert_eq!(from_file.extension, "groovy");

        let scan = ScanArgs {
            prefix: None,
            extension: Some(".nf".into()),
        };
        let merged = build_config(Some(&path), &scan).unwrap();
        assert_eq!(merged.prefix, "## ");
        assert_eq!(merged.extension, "nf");
    }
}
