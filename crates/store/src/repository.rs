use crate::error::Result;
use epu_domain::Project;
use serde::{Deserialize, Serialize};

/// A project with the identity assigned by the storage backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredProject {
    pub id: String,
    #[serde(flatten)]
    pub project: Project,
}

/// Contract the ingestion use case persists through.
///
/// Callers only ever invoke `create` or `update` with an assembled project;
/// reads go through `find_by_id`. Last write wins on concurrent updates —
/// arbitration beyond that is the backend's problem.
pub trait ProjectRepository {
    fn create(&self, project: Project) -> Result<StoredProject>;

    fn find_by_id(&self, id: &str) -> Result<Option<StoredProject>>;

    fn update(&self, id: &str, project: Project) -> Result<StoredProject>;
}
