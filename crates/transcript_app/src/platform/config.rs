use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{anyhow, Context};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use transcript_engine::PageSelectors;
use transcript_logging::LogDestination;

pub(crate) const DEFAULT_CONFIG_FILE: &str = "transcript.ron";

/// Settings read from a RON file. Every field may be omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct AppConfig {
    pub output_dir: PathBuf,
    pub log_destination: LogDestination,
    pub log_level: String,
    pub log_file: PathBuf,
    /// Program followed by its arguments; the Markdown is written to its stdin.
    pub clipboard_command: Vec<String>,
    pub selectors: PageSelectors,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            log_destination: LogDestination::default(),
            log_level: "warn".to_string(),
            log_file: PathBuf::from("transcript.log"),
            clipboard_command: default_clipboard_command(),
            selectors: PageSelectors::default(),
        }
    }
}

impl AppConfig {
    pub fn level_filter(&self) -> anyhow::Result<LevelFilter> {
        LevelFilter::from_str(self.log_level.trim())
            .map_err(|_| anyhow!("unknown log level {:?}", self.log_level))
    }
}

fn default_clipboard_command() -> Vec<String> {
    let command: &[&str] = if cfg!(target_os = "windows") {
        &["clip"]
    } else if cfg!(target_os = "macos") {
        &["pbcopy"]
    } else {
        &["xclip", "-selection", "clipboard"]
    };
    command.iter().map(|part| part.to_string()).collect()
}

/// Load `explicit`, or `./transcript.ron` when no path is given. Only the
/// implicit file may be absent.
pub(crate) fn load_config(explicit: Option<&Path>) -> anyhow::Result<AppConfig> {
    match explicit {
        Some(path) => read_config(path, true),
        None => read_config(Path::new(DEFAULT_CONFIG_FILE), false),
    }
}

fn read_config(path: &Path, required: bool) -> anyhow::Result<AppConfig> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound && !required => {
            return Ok(AppConfig::default());
        }
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read config {}", path.display()))
        }
    };
    let config: AppConfig = ron::from_str(&content)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    config.level_filter()?;
    config
        .selectors
        .compile()
        .with_context(|| format!("invalid selectors in {}", path.display()))?;
    Ok(config)
}
