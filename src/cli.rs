//! CLI argument parsing.
//!
//! Flags only override fields of [`PipelineConfig`]; the pipeline itself never
//! looks at them.
use crate::config::{DuplicatePolicies, DuplicatePolicy, PipelineConfig};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "esoui-tables",
    version,
    about = "Generate ESOUI constant lookup tables from the API text documentation",
    after_help = "Outputs:\n  request table  DumpVars payload asking the game client for live ordinals\n  lookup module  ordinal -> constant name tables with <label>_get_string accessors\n\nExamples:\n  esoui-tables --download-live\n  esoui-tables --doc api.txt --dump DumpVars.lua --json\n  esoui-tables --config esoui-tables.json --on-duplicate fail"
)]
pub struct RootArgs {
    /// Download the latest live API text documentation before processing
    #[arg(short = 'd', long)]
    pub download_live: bool,

    /// Logging level (overridden by RUST_LOG when set)
    #[arg(short = 'l', long, value_name = "LEVEL", value_enum, default_value_t = LogLevel::Debug)]
    pub logging_level: LogLevel,

    /// JSON config file; omitted fields use built-in defaults
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// API text documentation path (download destination with --download-live)
    #[arg(long, value_name = "PATH")]
    pub doc: Option<PathBuf>,

    /// Documentation download URL
    #[arg(long, value_name = "URL")]
    pub url: Option<String>,

    /// DumpVars saved-variables file holding live ordinals
    #[arg(long, value_name = "PATH")]
    pub dump: Option<PathBuf>,

    /// Output path for the request table
    #[arg(long, value_name = "PATH")]
    pub request_out: Option<PathBuf>,

    /// Output path for the lookup module
    #[arg(long, value_name = "PATH")]
    pub lookup_out: Option<PathBuf>,

    /// Policy for every kind of duplicate (labels, dump entries, constants)
    #[arg(long, value_name = "POLICY", value_enum)]
    pub on_duplicate: Option<DuplicatePolicy>,

    /// Print the run summary as JSON on stdout
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_filter(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl RootArgs {
    /// Layer command-line overrides onto `config`.
    pub fn apply_overrides(&self, config: &mut PipelineConfig) {
        if let Some(doc) = &self.doc {
            config.doc_path = doc.clone();
        }
        if let Some(url) = &self.url {
            config.doc_url = url.clone();
        }
        if let Some(dump) = &self.dump {
            config.dump_path = dump.clone();
        }
        if let Some(path) = &self.request_out {
            config.request_out = path.clone();
        }
        if let Some(path) = &self.lookup_out {
            config.lookup_out = path.clone();
        }
        if let Some(policy) = self.on_duplicate {
            config.duplicates = DuplicatePolicies::all(policy);
        }
    }
}
