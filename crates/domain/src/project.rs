use crate::activity::{sanitize_name, Activity, Phase, Priority};
use crate::error::{DomainError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Draft,
    Active,
    InProgress,
    Completed,
}

impl ProjectStatus {
    /// Status implied by the overall progress figure.
    #[must_use]
    pub fn from_progress(progress: f64) -> Self {
        if progress >= 100.0 {
            Self::Completed
        } else if progress > 0.0 {
            Self::Active
        } else {
            Self::Draft
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Active => "active",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }
}

/// Per-phase slice of the aggregate statistics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseStats {
    pub total: usize,
    pub completed: usize,
    pub avg_progress: f64,
}

/// Aggregate statistics recomputed by the project itself.
///
/// These are authoritative; the ingestion pipeline's summary is advisory and
/// only used for logging and responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectStats {
    pub total_activities: usize,
    pub completed_activities: usize,
    pub total_sub_activities: usize,
    pub overall_progress: f64,
    pub procedimento_parada: PhaseStats,
    pub manutencao: PhaseStats,
    pub procedimento_partida: PhaseStats,
}

/// The project aggregate: scalar metadata plus the three phase buckets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub status: ProjectStatus,
    pub priority: Priority,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub assigned_to: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub procedimento_parada: Vec<Activity>,
    pub manutencao: Vec<Activity>,
    pub procedimento_partida: Vec<Activity>,
}

impl Project {
    /// Default project span when the caller supplies no end date.
    pub const DEFAULT_SPAN_DAYS: i64 = 90;

    /// All activities in operational order (shutdown, maintenance, startup).
    pub fn activities(&self) -> impl Iterator<Item = &Activity> {
        self.procedimento_parada
            .iter()
            .chain(self.manutencao.iter())
            .chain(self.procedimento_partida.iter())
    }

    #[must_use]
    pub fn phase_activities(&self, phase: Phase) -> &[Activity] {
        match phase {
            Phase::Parada => &self.procedimento_parada,
            Phase::Manutencao => &self.manutencao,
            Phase::Partida => &self.procedimento_partida,
        }
    }

    /// Validate the aggregate: a non-empty name and well-formed activities
    /// whose phase tag matches the bucket they sit in.
    pub fn validate(&self) -> Result<()> {
        if sanitize_name(&self.name).is_empty() {
            return Err(DomainError::EmptyProjectName);
        }
        for phase in Phase::ALL {
            for activity in self.phase_activities(phase) {
                activity.clone().validated()?;
                if activity.phase != phase {
                    return Err(DomainError::InvalidActivityType(
                        activity.phase.as_str().to_string(),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Recompute the aggregate statistics from the persisted progress field.
    #[must_use]
    pub fn stats(&self) -> ProjectStats {
        let per_phase: Vec<PhaseStats> = Phase::ALL
            .iter()
            .map(|&phase| phase_stats(self.phase_activities(phase)))
            .collect();

        let total_activities: usize = per_phase.iter().map(|s| s.total).sum();
        let completed_activities: usize = per_phase.iter().map(|s| s.completed).sum();
        let total_sub_activities = self
            .activities()
            .map(|activity| activity.sub_activities.len())
            .sum();

        let weighted: f64 = per_phase
            .iter()
            .map(|s| s.avg_progress * s.total as f64)
            .sum();
        let overall_progress = if total_activities > 0 {
            round2(weighted / total_activities as f64)
        } else {
            0.0
        };

        ProjectStats {
            total_activities,
            completed_activities,
            total_sub_activities,
            overall_progress,
            procedimento_parada: per_phase[0],
            manutencao: per_phase[1],
            procedimento_partida: per_phase[2],
        }
    }

    /// Re-derive the project status from the recomputed overall progress.
    pub fn refresh_status(&mut self) {
        self.status = ProjectStatus::from_progress(self.stats().overall_progress);
    }
}

fn phase_stats(activities: &[Activity]) -> PhaseStats {
    let total = activities.len();
    let completed = activities
        .iter()
        .filter(|activity| activity.progress >= 100.0)
        .count();
    let avg_progress = if total > 0 {
        round2(activities.iter().map(|a| a.progress).sum::<f64>() / total as f64)
    } else {
        0.0
    };
    PhaseStats {
        total,
        completed,
        avg_progress,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::ActivityStatus;
    use pretty_assertions::assert_eq;

    fn activity(name: &str, phase: Phase, progress: f64) -> Activity {
        Activity {
            name: name.to_string(),
            phase,
            planned: 100.0,
            real: progress,
            progress,
            status: ActivityStatus::InProgress,
            priority: Priority::Medium,
            image: None,
            order: 0,
            description: String::new(),
            assigned_to: None,
            estimated_hours: 0,
            actual_hours: 0,
            tags: vec![],
            dependencies: vec![],
            sub_activities: vec![],
            efficiency: 0,
            progress_color: String::new(),
        }
    }

    fn project() -> Project {
        Project {
            name: "Parada Geral 2024".to_string(),
            description: String::new(),
            status: ProjectStatus::Draft,
            priority: Priority::Medium,
            start_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 8, 30).unwrap(),
            assigned_to: "Equipe Responsável".to_string(),
            tags: vec!["csv-import".to_string()],
            procedimento_parada: vec![activity("Forno", Phase::Parada, 100.0)],
            manutencao: vec![
                activity("Secagem", Phase::Manutencao, 50.0),
                activity("Mistura", Phase::Manutencao, 25.5),
            ],
            procedimento_partida: vec![],
        }
    }

    #[test]
    fn test_stats_counts_and_averages() {
        let stats = project().stats();
        assert_eq!(stats.total_activities, 3);
        assert_eq!(stats.completed_activities, 1);
        assert_eq!(stats.procedimento_parada.avg_progress, 100.0);
        assert_eq!(stats.manutencao.avg_progress, 37.75);
        assert_eq!(stats.procedimento_partida.total, 0);
        // (100 * 1 + 37.75 * 2) / 3
        assert_eq!(stats.overall_progress, 58.5);
    }

    #[test]
    fn test_refresh_status_follows_progress() {
        let mut subject = project();
        subject.refresh_status();
        assert_eq!(subject.status, ProjectStatus::Active);

        subject.manutencao.clear();
        subject.procedimento_parada[0].progress = 100.0;
        subject.refresh_status();
        assert_eq!(subject.status, ProjectStatus::Completed);

        subject.procedimento_parada.clear();
        subject.refresh_status();
        assert_eq!(subject.status, ProjectStatus::Draft);
    }

    #[test]
    fn test_validate_rejects_misfiled_activity() {
        let mut subject = project();
        assert!(subject.validate().is_ok());
        subject.manutencao.push(activity("Intrusa", Phase::Partida, 0.0));
        assert!(matches!(
            subject.validate(),
            Err(DomainError::InvalidActivityType(_))
        ));
    }

    #[test]
    fn test_project_status_from_progress() {
        assert_eq!(ProjectStatus::from_progress(0.0), ProjectStatus::Draft);
        assert_eq!(ProjectStatus::from_progress(0.1), ProjectStatus::Active);
        assert_eq!(ProjectStatus::from_progress(100.0), ProjectStatus::Completed);
    }

    #[test]
    fn test_serde_uses_bucket_field_names() {
        let json = serde_json::to_value(project()).unwrap();
        assert!(json.get("procedimentoParada").is_some());
        assert!(json.get("procedimentoPartida").is_some());
        assert_eq!(json["status"], "draft");
    }
}
