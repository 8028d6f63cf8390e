use crate::assemble::{derive_categorized, CategorizedActivities, ProjectMetadata};
use crate::categorize::categorize;
use crate::error::Result;
use crate::normalize::{normalize_activities, IconMap};
use crate::outline::group_rows;
use crate::reader::{parse_rows, read_rows, RowReadOutcome};
use serde::Serialize;
use std::path::Path;

/// What the run dropped on the floor, reported alongside the result so
/// callers can log it without failing the import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostics {
    /// Malformed or unnamed rows skipped by the reader/grouper.
    pub rows_skipped: usize,
    /// Level-3 activities discarded for having no flagged sub-rows.
    pub activities_dropped: usize,
}

/// End-to-end runner for one CSV file.
///
/// Stateless across invocations: each call parses the whole file and
/// produces a fresh result. The icon table is injected at construction.
pub struct CsvPipeline {
    icons: IconMap,
}

impl Default for CsvPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvPipeline {
    #[must_use]
    pub fn new() -> Self {
        Self {
            icons: IconMap::default(),
        }
    }

    #[must_use]
    pub fn with_icon_map(icons: IconMap) -> Self {
        Self { icons }
    }

    /// Run the full pipeline over a file on disk.
    ///
    /// The file is read into memory, its encoding detected, and the decoded
    /// text processed. An unreadable file is the only fatal failure; a file
    /// with no level-3 rows yields three empty buckets, which is valid
    /// output.
    pub fn process_file(
        &self,
        path: &Path,
        metadata: &ProjectMetadata,
    ) -> Result<(CategorizedActivities, Diagnostics)> {
        log::info!("processing CSV import: {}", path.display());
        let outcome = read_rows(path)?;
        self.process_rows(outcome, metadata)
    }

    /// Run the pipeline over already-decoded CSV text.
    pub fn process_text(
        &self,
        text: &str,
        metadata: &ProjectMetadata,
    ) -> Result<(CategorizedActivities, Diagnostics)> {
        let outcome = parse_rows(text)?;
        self.process_rows(outcome, metadata)
    }

    fn process_rows(
        &self,
        outcome: RowReadOutcome,
        metadata: &ProjectMetadata,
    ) -> Result<(CategorizedActivities, Diagnostics)> {
        let (nodes, counts) = group_rows(&outcome.rows);
        log::info!(
            "grouped {} activities from {} rows",
            nodes.len(),
            outcome.rows.len()
        );

        let normalized = normalize_activities(nodes, &self.icons);
        let set = categorize(normalized);
        log::info!(
            "categorized: parada={} manutencao={} partida={}",
            set.procedimento_parada.len(),
            set.manutencao.len(),
            set.procedimento_partida.len()
        );

        let categorized = derive_categorized(set, metadata);
        let diagnostics = Diagnostics {
            rows_skipped: outcome.skipped + counts.unnamed_rows,
            activities_dropped: counts.childless_dropped,
        };
        Ok((categorized, diagnostics))
    }
}
