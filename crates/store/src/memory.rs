use crate::error::{Result, StoreError};
use crate::repository::{ProjectRepository, StoredProject};
use epu_domain::Project;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

/// In-memory repository backed by a `RwLock`ed map.
///
/// Projects are validated on the way in, the same gate a document store
/// applies through schema validation.
#[derive(Default)]
pub struct MemoryRepository {
    projects: RwLock<HashMap<String, StoredProject>>,
    next_id: AtomicU64,
}

impl MemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        read_or_recover(&self.projects).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ProjectRepository for MemoryRepository {
    fn create(&self, project: Project) -> Result<StoredProject> {
        project.validate()?;
        let id = format!("proj-{:04}", self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        let stored = StoredProject {
            id: id.clone(),
            project,
        };
        write_or_recover(&self.projects).insert(id.clone(), stored.clone());
        log::debug!("stored project {id} ({})", stored.project.name);
        Ok(stored)
    }

    fn find_by_id(&self, id: &str) -> Result<Option<StoredProject>> {
        Ok(read_or_recover(&self.projects).get(id).cloned())
    }

    fn update(&self, id: &str, project: Project) -> Result<StoredProject> {
        project.validate()?;
        let mut projects = write_or_recover(&self.projects);
        let slot = projects
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        slot.project = project;
        Ok(slot.clone())
    }
}

fn read_or_recover<T>(lock: &RwLock<T>) -> std::sync::RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write_or_recover<T>(lock: &RwLock<T>) -> std::sync::RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use epu_domain::{Priority, ProjectStatus};
    use pretty_assertions::assert_eq;

    fn project(name: &str) -> Project {
        Project {
            name: name.to_string(),
            description: String::new(),
            status: ProjectStatus::Draft,
            priority: Priority::Medium,
            start_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 8, 30).unwrap(),
            assigned_to: "Equipe Responsável".to_string(),
            tags: vec![],
            procedimento_parada: vec![],
            manutencao: vec![],
            procedimento_partida: vec![],
        }
    }

    #[test]
    fn test_create_assigns_sequential_ids() {
        let repo = MemoryRepository::new();
        let first = repo.create(project("A")).unwrap();
        let second = repo.create(project("B")).unwrap();
        assert_eq!(first.id, "proj-0001");
        assert_eq!(second.id, "proj-0002");
        assert_eq!(repo.len(), 2);
    }

    #[test]
    fn test_find_and_update_round_trip() {
        let repo = MemoryRepository::new();
        let stored = repo.create(project("Parada Geral")).unwrap();

        let found = repo.find_by_id(&stored.id).unwrap().unwrap();
        assert_eq!(found.project.name, "Parada Geral");
        assert!(repo.find_by_id("proj-9999").unwrap().is_none());

        let updated = repo.update(&stored.id, project("Parada Geral 2024")).unwrap();
        assert_eq!(updated.project.name, "Parada Geral 2024");
        assert!(matches!(
            repo.update("proj-9999", project("X")),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn test_create_rejects_invalid_project() {
        let repo = MemoryRepository::new();
        assert!(repo.create(project("  ")).is_err());
    }
}
