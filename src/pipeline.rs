//! Run sequencing: fetch, scan, request table, dump, lookup module.
//!
//! Each stage either hands its output to the next or aborts the run. Files
//! written by earlier stages stay on disk when a later stage fails.
use crate::config::PipelineConfig;
use crate::dump::OrdinalMapLoader;
use crate::emit::ArtifactEmitter;
use crate::error::PipelineResult;
use crate::fetch::DocumentFetcher;
use crate::model::constant_count;
use crate::output::{read_input, write_artifact, write_bytes};
use crate::scan::{check_constant_names, DocumentScanner};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub fetched: bool,
    pub categories: usize,
    pub constants: usize,
    pub ordinals: usize,
    pub request_path: PathBuf,
    pub lookup_path: PathBuf,
}

pub fn run(
    config: &PipelineConfig,
    fetcher: Option<&dyn DocumentFetcher>,
) -> PipelineResult<RunSummary> {
    let fetched = match fetcher {
        Some(fetcher) => {
            tracing::info!(url = %config.doc_url, "downloading API text documentation");
            let bytes = fetcher.fetch(&config.doc_url)?;
            write_bytes(&config.doc_path, &bytes)?;
            true
        }
        None => false,
    };

    tracing::info!(path = %config.doc_path.display(), "processing API text documentation");
    let doc = read_input(&config.doc_path)?;
    let scanner = DocumentScanner::new(&config.markers, config.duplicates.label)?;
    let categories = scanner.scan(&config.doc_path, &doc)?;
    check_constant_names(&config.doc_path, &categories, config.duplicates.constant)?;
    let constants = constant_count(&categories);
    tracing::info!(
        categories = categories.len(),
        constants,
        "documentation scanned"
    );

    let emitter = ArtifactEmitter::new(config);
    write_artifact(&emitter.request_table(&categories))?;

    tracing::info!(path = %config.dump_path.display(), "reading ordinal dump");
    let dump = read_input(&config.dump_path)?;
    let ordinals = OrdinalMapLoader::new(&config.dump, config.duplicates.ordinal)
        .load(&config.dump_path, &dump)?;

    let lookup = emitter.lookup_module(&categories, &ordinals)?;
    write_artifact(&lookup)?;

    Ok(RunSummary {
        fetched,
        categories: categories.len(),
        constants,
        ordinals: ordinals.len(),
        request_path: config.request_out.clone(),
        lookup_path: config.lookup_out.clone(),
    })
}
