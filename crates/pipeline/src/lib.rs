//! # EPU Pipeline
//!
//! CSV ingestion pipeline that turns a loosely structured schedule export
//! into a three-phase categorized activity tree used to seed or refresh a
//! project record.
//!
//! ## Pipeline
//!
//! ```text
//! CSV file
//!     │
//!     ├──> Encoding detector (chardetng, windows-1252 fallback)
//!     │      └─> Decoded text
//!     │
//!     ├──> Row reader (semicolon-delimited, header-driven)
//!     │      └─> Raw rows
//!     │
//!     ├──> Outline grouper (level 3 / flagged level 4)
//!     │      └─> Activity nodes
//!     │
//!     ├──> Name normalizer + icon mapper
//!     │      └─> Normalized activities
//!     │
//!     ├──> Phase categorizer (reverse-scan sentinel fold)
//!     │      └─> Shutdown / maintenance / startup buckets
//!     │
//!     └──> Field deriver + project assembler
//!            └─> Persistable project payload
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use epu_pipeline::{CsvPipeline, ProjectMetadata};
//!
//! fn main() -> epu_pipeline::Result<()> {
//!     let pipeline = CsvPipeline::new();
//!     let metadata = ProjectMetadata::default();
//!     let (categorized, diagnostics) =
//!         pipeline.process_file("cronograma.csv".as_ref(), &metadata)?;
//!
//!     println!(
//!         "{} activities, {} rows skipped",
//!         categorized.total(),
//!         diagnostics.rows_skipped
//!     );
//!     Ok(())
//! }
//! ```

mod assemble;
mod categorize;
mod derive;
mod encoding;
mod error;
mod export;
mod ingest;
mod normalize;
mod outline;
mod pipeline;
mod reader;

pub use assemble::{
    assemble_project, derive_categorized, summarize, CategorizedActivities, PipelineSummary,
    ProjectMetadata,
};
pub use categorize::{categorize, CategorizedSet, ScanState, SENTINEL_ACTIVITY};
pub use derive::{
    activity_priority, activity_status, actual_hours, build_activity, build_phase_activities,
    efficiency, estimated_hours, ingestion_progress, progress_color, CSV_IMPORT_TAG,
    DEFAULT_TEAM,
};
pub use encoding::{decode_buffer, detect_encoding};
pub use error::{PipelineError, Result};
pub use export::{export_rows, to_csv_text, EXPORT_HEADER};
pub use ingest::{ingest_upload, ImportReport, IngestError};
pub use normalize::{
    normalize_activities, normalize_name, IconMap, NormalizedActivity, NormalizedSub,
    DEFAULT_ICON,
};
pub use outline::{group_rows, parse_decimal, GroupingCounts, OutlineNode, OutlineSub};
pub use pipeline::{CsvPipeline, Diagnostics};
pub use reader::{
    parse_rows, read_rows, RawRow, RowReadOutcome, COL_DASHBOARD, COL_LEVEL, COL_NAME,
    COL_PERCENT_PLANNED, COL_PERCENT_REAL,
};
