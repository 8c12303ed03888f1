//! Pipeline configuration.
//!
//! Every path, URL, and format marker the pipeline touches lives here so a run
//! is fully described by one value. Files are JSON; omitted fields fall back to
//! the defaults for the live ESOUI documentation.
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_DOC_URL: &str =
    "https://www.esoui.com/forums/attachment.php?attachmentid=1427&d=1635778433";
pub const DEFAULT_DOC_PATH: &str = "_temp/esoui_api_txt_documentation_live.txt";
pub const DEFAULT_DUMP_PATH: &str = "../../SavedVariables/DumpVars.lua";
pub const DEFAULT_REQUEST_OUT: &str = "../DumpVars/DumpVars_constants.lua";
pub const DEFAULT_LOOKUP_OUT: &str = "esoui_constants_live.lua";

/// How a detected duplicate is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Log a warning and keep going with the source behavior.
    #[default]
    Warn,
    /// Abort the run.
    Fail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DuplicatePolicies {
    /// Two category headers with the same label.
    pub label: DuplicatePolicy,
    /// Two dump entries with the same name; `warn` keeps the last one.
    pub ordinal: DuplicatePolicy,
    /// One constant name listed under two categories.
    pub constant: DuplicatePolicy,
}

impl DuplicatePolicies {
    pub fn all(policy: DuplicatePolicy) -> Self {
        Self {
            label: policy,
            ordinal: policy,
            constant: policy,
        }
    }
}

/// Line markers recognized in the API text documentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DocumentMarkers {
    pub start: String,
    pub end: String,
    pub global_subheader: String,
    pub header_prefix: String,
    pub bullet_prefix: String,
}

impl Default for DocumentMarkers {
    fn default() -> Self {
        Self {
            start: "h2. Global Variables".to_string(),
            end: "h2. Game API".to_string(),
            global_subheader: "h5. Global".to_string(),
            header_prefix: "h5. ".to_string(),
            bullet_prefix: "* ".to_string(),
        }
    }
}

/// Shape of the saved-variables dump written by the game client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DumpFormat {
    /// Spaces preceding the `{` that opens the constants table.
    pub table_indent: usize,
}

impl Default for DumpFormat {
    fn default() -> Self {
        Self { table_indent: 20 }
    }
}

impl DumpFormat {
    pub fn open_marker(&self) -> String {
        format!("{}{{", " ".repeat(self.table_indent))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    pub doc_url: String,
    pub doc_path: PathBuf,
    pub dump_path: PathBuf,
    pub request_out: PathBuf,
    pub lookup_out: PathBuf,
    /// Global table the request artifact stores its payload under.
    pub namespace: String,
    pub request_field: String,
    pub markers: DocumentMarkers,
    pub dump: DumpFormat,
    pub duplicates: DuplicatePolicies,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            doc_url: DEFAULT_DOC_URL.to_string(),
            doc_path: PathBuf::from(DEFAULT_DOC_PATH),
            dump_path: PathBuf::from(DEFAULT_DUMP_PATH),
            request_out: PathBuf::from(DEFAULT_REQUEST_OUT),
            lookup_out: PathBuf::from(DEFAULT_LOOKUP_OUT),
            namespace: "DumpVars".to_string(),
            request_field: "constantsToDump".to_string(),
            markers: DocumentMarkers::default(),
            dump: DumpFormat::default(),
            duplicates: DuplicatePolicies::default(),
        }
    }
}

/// Load a config file, filling omitted fields with defaults.
pub fn load_config(path: &Path) -> Result<PipelineConfig> {
    let bytes = fs::read(path).with_context(|| format!("read config {}", path.display()))?;
    let config: PipelineConfig = serde_json::from_slice(&bytes)
        .with_context(|| format!("parse config JSON {}", path.display()))?;
    Ok(config)
}

/// Reject configs the scanner or emitter cannot work with.
pub fn validate_config(config: &PipelineConfig) -> Result<()> {
    let markers = &config.markers;
    for (label, value) in [
        ("markers.start", &markers.start),
        ("markers.end", &markers.end),
        ("markers.header_prefix", &markers.header_prefix),
        ("markers.bullet_prefix", &markers.bullet_prefix),
    ] {
        if value.is_empty() {
            return Err(anyhow!("{label} must be non-empty"));
        }
    }
    if !is_lua_identifier(&config.namespace) {
        return Err(anyhow!(
            "namespace must be a Lua identifier (got {:?})",
            config.namespace
        ));
    }
    if !is_lua_identifier(&config.request_field) {
        return Err(anyhow!(
            "request_field must be a Lua identifier (got {:?})",
            config.request_field
        ));
    }
    if config.request_out == config.lookup_out {
        return Err(anyhow!(
            "request_out and lookup_out must differ (both {})",
            config.request_out.display()
        ));
    }
    Ok(())
}

pub(crate) fn is_lua_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first.is_ascii_alphabetic() || first == '_') {
        return false;
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
