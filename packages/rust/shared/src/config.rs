//! Application configuration for nfdocs.
//!
//! User config lives at `~/.nfdocs/nfdocs.toml`.
//! CLI flags override config file values, which override defaults.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{NfDocsError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "nfdocs.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".nfdocs";

// ---------------------------------------------------------------------------
// Config structs (matching nfdocs.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Annotation convention.
    #[serde(default)]
    pub annotations: AnnotationsConfig,

    /// Rendering options.
    #[serde(default)]
    pub output: OutputConfig,

    /// Source scanning options.
    #[serde(default)]
    pub scan: ScanConfig,
}

/// `[annotations]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotationsConfig {
    /// Line prefix marking documentation comments.
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// File extension of pipeline sources (without the dot).
    #[serde(default = "default_extension")]
    pub extension: String,
}

impl Default for AnnotationsConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            extension: default_extension(),
        }
    }
}

fn default_prefix() -> String {
    "/// ".into()
}
fn default_extension() -> String {
    "nf".into()
}

/// `[output]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Output markup.
    #[serde(default)]
    pub format: OutputFormat,

    /// How parameter structures are laid out.
    #[serde(default)]
    pub layout: Layout,
}

/// `[scan]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Extract source files on a thread pool.
    #[serde(default)]
    pub parallel: bool,
}

// ---------------------------------------------------------------------------
// Enumerated options
// ---------------------------------------------------------------------------

/// Target markup for the rendered document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Rst,
    Markdown,
    Json,
}

impl FromStr for OutputFormat {
    type Err = NfDocsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "rst" | "restructuredtext" => Ok(Self::Rst),
            "md" | "markdown" => Ok(Self::Markdown),
            "json" => Ok(Self::Json),
            other => Err(NfDocsError::config(format!(
                "unknown output format '{other}': expected 'rst', 'markdown', or 'json'"
            ))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Rst => "rst",
            Self::Markdown => "markdown",
            Self::Json => "json",
        })
    }
}

/// Layout strategy for input/output parameters. One strategy is used for the
/// whole document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// Two-column table: label cell + description or nested table.
    #[default]
    Table,
    /// Bulleted list with nested sub-lists.
    List,
}

impl FromStr for Layout {
    type Err = NfDocsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "list" => Ok(Self::List),
            other => Err(NfDocsError::config(format!(
                "unknown layout '{other}': expected 'table' or 'list'"
            ))),
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Table => "table",
            Self::List => "list",
        })
    }
}

// ---------------------------------------------------------------------------
// Build config (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime build configuration, merged from config file + CLI flags.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Annotation line prefix.
    pub prefix: String,
    /// Source file extension.
    pub extension: String,
    /// Output markup.
    pub format: OutputFormat,
    /// Parameter layout.
    pub layout: Layout,
    /// Extract files in parallel.
    pub parallel: bool,
}

impl From<&AppConfig> for BuildConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            prefix: config.annotations.prefix.clone(),
            extension: config.annotations.extension.clone(),
            format: config.output.format,
            layout: config.output.layout,
            parallel: config.scan.parallel,
        }
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl BuildConfig {
    /// Reject settings the scanner cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.prefix.trim().is_empty() {
            return Err(NfDocsError::config("annotation prefix must not be blank"));
        }
        if self.extension.is_empty() {
            return Err(NfDocsError::config("source extension must not be empty"));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.nfdocs/`).
pub fn config_dir() -> Result<PathBuf> {
    let home =
        dirs::home_dir().ok_or_else(|| NfDocsError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.nfdocs/nfdocs.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| NfDocsError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| NfDocsError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| NfDocsError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| NfDocsError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| NfDocsError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
