use crate::assemble::{assemble_project, summarize, PipelineSummary, ProjectMetadata};
use crate::error::PipelineError;
use crate::pipeline::{CsvPipeline, Diagnostics};
use epu_store::{ProjectRepository, StoredProject};
use serde::Serialize;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("csv processing failed: {0}")]
    Pipeline(#[from] PipelineError),

    #[error("failed to persist project: {0}")]
    Store(#[from] epu_store::StoreError),
}

/// Outcome of a successful import.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub project: StoredProject,
    pub summary: PipelineSummary,
    pub diagnostics: Diagnostics,
}

/// Ingest an uploaded CSV and persist the assembled project.
///
/// The upload is a temporary artifact: it is deleted before this function
/// returns, on the success path and on every failure path alike, so callers
/// never leak temp files. Partial results are never returned.
pub fn ingest_upload(
    pipeline: &CsvPipeline,
    path: &Path,
    metadata: &ProjectMetadata,
    repository: &dyn ProjectRepository,
) -> std::result::Result<ImportReport, IngestError> {
    let outcome = run(pipeline, path, metadata, repository);
    remove_upload(path);
    outcome
}

fn run(
    pipeline: &CsvPipeline,
    path: &Path,
    metadata: &ProjectMetadata,
    repository: &dyn ProjectRepository,
) -> std::result::Result<ImportReport, IngestError> {
    let (categorized, diagnostics) = pipeline.process_file(path, metadata)?;
    let summary = summarize(&categorized);
    let project = assemble_project(categorized, metadata);
    let stored = repository.create(project)?;
    log::info!(
        "project {} created from CSV import ({} activities, {} rows skipped)",
        stored.id,
        summary.total_activities,
        diagnostics.rows_skipped
    );
    Ok(ImportReport {
        project: stored,
        summary,
        diagnostics,
    })
}

fn remove_upload(path: &Path) {
    if let Err(err) = std::fs::remove_file(path) {
        if err.kind() != std::io::ErrorKind::NotFound {
            log::warn!("failed to remove uploaded file {}: {err}", path.display());
        }
    }
}
