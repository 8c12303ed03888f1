//! Extraction of live ordinals from the DumpVars saved-variables file.
//!
//! The game client writes the evaluated request table back as a nested Lua
//! table. Only the innermost table (found by its indentation) is read, one
//! `["NAME"] = NUMBER,` entry per line.
use crate::config::{DumpFormat, DuplicatePolicy};
use crate::error::{PipelineError, PipelineResult};
use crate::model::OrdinalMap;
use std::path::Path;

pub struct OrdinalMapLoader {
    open_marker: String,
    on_duplicate: DuplicatePolicy,
}

impl OrdinalMapLoader {
    pub fn new(format: &DumpFormat, on_duplicate: DuplicatePolicy) -> Self {
        Self {
            open_marker: format.open_marker(),
            on_duplicate,
        }
    }

    pub fn load(&self, path: &Path, content: &str) -> PipelineResult<OrdinalMap> {
        let mut lines = content.lines().enumerate();

        if !lines.any(|(_, line)| line.contains(self.open_marker.as_str())) {
            return Err(PipelineError::malformed(
                path,
                format!("table open marker {:?} not found", self.open_marker),
            ));
        }

        let mut ordinals = OrdinalMap::new();
        for (idx, line) in lines {
            let line_number = idx + 1;
            if line.contains('}') {
                tracing::debug!(entries = ordinals.len(), "ordinal table loaded");
                return Ok(ordinals);
            }
            let Some((name, value)) = parse_entry(path, line, line_number)? else {
                continue;
            };
            if let Some(previous) = ordinals.insert(name.clone(), value) {
                self.note_duplicate(path, &name, line_number, previous, value)?;
            }
        }

        Err(PipelineError::malformed(
            path,
            "table close marker \"}\" not found",
        ))
    }

    fn note_duplicate(
        &self,
        path: &Path,
        name: &str,
        line: usize,
        previous: u64,
        value: u64,
    ) -> PipelineResult<()> {
        match self.on_duplicate {
            DuplicatePolicy::Fail => Err(PipelineError::DuplicateOrdinal {
                path: path.to_path_buf(),
                name: name.to_string(),
                line,
                previous,
                value,
            }),
            DuplicatePolicy::Warn => {
                tracing::warn!(name, line, previous, value, "duplicate ordinal entry, last wins");
                Ok(())
            }
        }
    }
}

/// Parse one `["NAME"] = NUMBER,` line. Blank lines yield `None`.
fn parse_entry(path: &Path, line: &str, line_number: usize) -> PipelineResult<Option<(String, u64)>> {
    let compact: String = line.chars().filter(|c| !c.is_whitespace()).collect();
    let compact = compact.trim_end_matches(',');
    if compact.is_empty() {
        return Ok(None);
    }

    let Some((raw_name, raw_value)) = compact.split_once('=') else {
        return Err(PipelineError::malformed(
            path,
            format!("line {line_number}: expected `[\"NAME\"] = NUMBER`, got {line:?}"),
        ));
    };
    let name: String = raw_name
        .chars()
        .filter(|c| !matches!(c, '[' | ']' | '"'))
        .collect();
    if name.is_empty() {
        return Err(PipelineError::malformed(
            path,
            format!("line {line_number}: empty constant name"),
        ));
    }
    let value = raw_value.parse::<u64>().map_err(|_| {
        PipelineError::malformed(
            path,
            format!("line {line_number}: ordinal {raw_value:?} for {name} is not a non-negative integer"),
        )
    })?;
    Ok(Some((name, value)))
}
