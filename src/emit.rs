//! Lua artifact rendering.
//!
//! Two artifacts come out of a run: the request table the DumpVars add-on
//! evaluates in game to report live ordinals, and the lookup module mapping
//! those ordinals back to constant names. Rendering is pure; writing happens in
//! [`crate::output`].
use crate::config::PipelineConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::model::{constant_count, Category, OrdinalMap};
use std::collections::BTreeMap;
use std::path::PathBuf;

const REQUEST_EOL: &str = "\r\n";
const TABLE_SUFFIX: &str = "_STRINGS";
const ACCESSOR_SUFFIX: &str = "_get_string";

/// Rendered artifact text and where it belongs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedArtifact {
    pub path: PathBuf,
    pub text: String,
}

pub struct ArtifactEmitter<'a> {
    config: &'a PipelineConfig,
}

impl<'a> ArtifactEmitter<'a> {
    pub fn new(config: &'a PipelineConfig) -> Self {
        Self { config }
    }

    /// Render the request table: every constant mapped to itself, in document
    /// order, with no separator after the last entry.
    pub fn request_table(&self, categories: &[Category]) -> GeneratedArtifact {
        let namespace = &self.config.namespace;
        let mut text = String::new();
        text.push_str(&format!(
            "if {namespace} == nil then {namespace} = {{}} end{REQUEST_EOL}{REQUEST_EOL}"
        ));
        text.push_str(&format!(
            "        {namespace}.{} = {{{REQUEST_EOL}",
            self.config.request_field
        ));

        let total = constant_count(categories);
        let names = categories
            .iter()
            .flat_map(|category| category.constants.iter())
            .map(|entry| entry.name.as_str());
        for (idx, name) in names.enumerate() {
            let separator = if idx + 1 == total { "" } else { "," };
            text.push_str(&format!("[\"{name}\"] = {name}{separator}{REQUEST_EOL}"));
        }
        text.push_str(&format!("}}{REQUEST_EOL}"));

        GeneratedArtifact {
            path: self.config.request_out.clone(),
            text,
        }
    }

    /// Render the lookup module. Every constant must resolve in `ordinals`;
    /// nothing is returned unless all of them do.
    pub fn lookup_module(
        &self,
        categories: &[Category],
        ordinals: &OrdinalMap,
    ) -> PipelineResult<GeneratedArtifact> {
        let mut text = String::new();
        for category in categories {
            self.render_category(&mut text, category, ordinals)?;
        }
        Ok(GeneratedArtifact {
            path: self.config.lookup_out.clone(),
            text,
        })
    }

    fn render_category(
        &self,
        out: &mut String,
        category: &Category,
        ordinals: &OrdinalMap,
    ) -> PipelineResult<()> {
        let table = format!("{}{TABLE_SUFFIX}", category.label.to_uppercase());
        let mut keys: BTreeMap<u64, &str> = BTreeMap::new();

        out.push_str(&format!("local {table} = {{\n"));
        for entry in &category.constants {
            let ordinal = ordinals.get(&entry.name).copied().ok_or_else(|| {
                PipelineError::UnresolvedConstant {
                    name: entry.name.clone(),
                    category: category.label.clone(),
                    doc: self.config.doc_path.clone(),
                    dump: self.config.dump_path.clone(),
                }
            })?;
            if let Some(shadowed) = keys.insert(ordinal, entry.name.as_str()) {
                tracing::warn!(
                    table = %table,
                    ordinal,
                    shadowed,
                    name = %entry.name,
                    position = entry.position,
                    "ordinal repeated within a category; later entry wins at runtime"
                );
            }
            out.push_str(&format!("    [{ordinal}] = \"{}\",\n", entry.name));
        }
        out.push_str("}\n");
        out.push_str(&format!(
            "function {}{ACCESSOR_SUFFIX}(value)\n",
            category.label
        ));
        out.push_str(&format!("    return {table}[value] or tostring(value)\n"));
        out.push_str("end\n\n");
        Ok(())
    }
}
