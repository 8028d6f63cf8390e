use crate::categorize::CategorizedSet;
use crate::derive::{build_phase_activities, CSV_IMPORT_TAG, DEFAULT_TEAM};
use chrono::{Duration, Local, NaiveDate};
use epu_domain::{Activity, Phase, Priority, Project, ProjectStatus};
use serde::{Deserialize, Serialize};

/// Caller-supplied configuration for one ingestion run.
///
/// This is an open object at the boundary: unrecognized keys in the incoming
/// JSON are ignored, absent keys fall back to the legacy defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectMetadata {
    pub name: Option<String>,
    pub description: Option<String>,
    /// Assignee override for every imported activity and the project itself.
    pub default_team: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub tags: Vec<String>,
}

impl ProjectMetadata {
    #[must_use]
    pub fn team(&self) -> &str {
        self.default_team.as_deref().unwrap_or(DEFAULT_TEAM)
    }
}

/// The pipeline's output: one persisted-shape activity list per phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorizedActivities {
    pub procedimento_parada: Vec<Activity>,
    pub manutencao: Vec<Activity>,
    pub procedimento_partida: Vec<Activity>,
}

impl CategorizedActivities {
    pub fn activities(&self) -> impl Iterator<Item = &Activity> {
        self.procedimento_parada
            .iter()
            .chain(self.manutencao.iter())
            .chain(self.procedimento_partida.iter())
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.procedimento_parada.len() + self.manutencao.len() + self.procedimento_partida.len()
    }
}

/// Derive the business fields for every categorized bucket.
#[must_use]
pub fn derive_categorized(
    set: CategorizedSet,
    metadata: &ProjectMetadata,
) -> CategorizedActivities {
    let team = metadata.team();
    CategorizedActivities {
        procedimento_parada: build_phase_activities(set.procedimento_parada, Phase::Parada, team),
        manutencao: build_phase_activities(set.manutencao, Phase::Manutencao, team),
        procedimento_partida: build_phase_activities(set.procedimento_partida, Phase::Partida, team),
    }
}

/// Advisory per-run figures for logging and responses.
///
/// Not authoritative: the project aggregate recomputes its own statistics
/// after persistence.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineSummary {
    pub total_activities: usize,
    pub procedimento_parada: usize,
    pub manutencao: usize,
    pub procedimento_partida: usize,
    pub total_sub_activities: usize,
    pub avg_progress: f64,
}

#[must_use]
pub fn summarize(categorized: &CategorizedActivities) -> PipelineSummary {
    let total = categorized.total();
    let total_sub_activities = categorized
        .activities()
        .map(|activity| activity.sub_activities.len())
        .sum();
    let avg_progress = if total > 0 {
        let sum: f64 = categorized.activities().map(|a| a.progress).sum();
        ((sum / total as f64) * 100.0).round() / 100.0
    } else {
        0.0
    };

    PipelineSummary {
        total_activities: total,
        procedimento_parada: categorized.procedimento_parada.len(),
        manutencao: categorized.manutencao.len(),
        procedimento_partida: categorized.procedimento_partida.len(),
        total_sub_activities,
        avg_progress,
    }
}

/// Wrap the categorized activities and caller metadata into the project
/// payload handed to the persistence collaborator.
#[must_use]
pub fn assemble_project(
    categorized: CategorizedActivities,
    metadata: &ProjectMetadata,
) -> Project {
    let total = categorized.total();
    let start_date = metadata
        .start_date
        .unwrap_or_else(|| Local::now().date_naive());
    let end_date = metadata
        .end_date
        .unwrap_or(start_date + Duration::days(Project::DEFAULT_SPAN_DAYS));

    let mut tags = vec![CSV_IMPORT_TAG.to_string(), "cronograma-operacional".to_string()];
    tags.extend(metadata.tags.iter().cloned());

    let mut project = Project {
        name: metadata
            .name
            .clone()
            .unwrap_or_else(|| "Projeto EPU".to_string()),
        description: metadata.description.clone().unwrap_or_else(|| {
            format!("Projeto importado de CSV - {total} atividades processadas")
        }),
        status: ProjectStatus::Draft,
        priority: Priority::Medium,
        start_date,
        end_date,
        assigned_to: metadata.team().to_string(),
        tags,
        procedimento_parada: categorized.procedimento_parada,
        manutencao: categorized.manutencao,
        procedimento_partida: categorized.procedimento_partida,
    };
    project.refresh_status();
    project
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::NormalizedActivity;
    use pretty_assertions::assert_eq;

    fn set_with(names: &[&str]) -> CategorizedSet {
        CategorizedSet {
            procedimento_parada: names
                .iter()
                .map(|name| NormalizedActivity {
                    name: (*name).to_string(),
                    planned: 80.0,
                    real: 40.0,
                    image: String::new(),
                    sub_activities: vec![],
                })
                .collect(),
            manutencao: vec![],
            procedimento_partida: vec![],
        }
    }

    #[test]
    fn test_metadata_team_defaults() {
        let metadata = ProjectMetadata::default();
        assert_eq!(metadata.team(), "Equipe Responsável");

        let metadata = ProjectMetadata {
            default_team: Some("Equipe Noturna".to_string()),
            ..Default::default()
        };
        assert_eq!(metadata.team(), "Equipe Noturna");
    }

    #[test]
    fn test_metadata_ignores_unknown_json_keys() {
        let metadata: ProjectMetadata = serde_json::from_str(
            r#"{"defaultTeam":"Equipe A","totallyUnknown":123,"nested":{"x":1}}"#,
        )
        .unwrap();
        assert_eq!(metadata.team(), "Equipe A");
    }

    #[test]
    fn test_summarize_averages_ingestion_progress() {
        let categorized = derive_categorized(set_with(&["A", "B"]), &ProjectMetadata::default());
        let summary = summarize(&categorized);
        assert_eq!(summary.total_activities, 2);
        assert_eq!(summary.procedimento_parada, 2);
        assert_eq!(summary.avg_progress, 40.0);
    }

    #[test]
    fn test_summarize_empty_result_is_valid() {
        let categorized =
            derive_categorized(CategorizedSet::default(), &ProjectMetadata::default());
        let summary = summarize(&categorized);
        assert_eq!(summary.total_activities, 0);
        assert_eq!(summary.avg_progress, 0.0);
    }

    #[test]
    fn test_assemble_project_applies_metadata_and_defaults() {
        let metadata = ProjectMetadata {
            name: Some("Parada Geral 2024".to_string()),
            start_date: NaiveDate::from_ymd_opt(2024, 6, 1),
            tags: vec!["unidade-3".to_string()],
            ..Default::default()
        };
        let categorized = derive_categorized(set_with(&["A"]), &metadata);
        let project = assemble_project(categorized, &metadata);

        assert_eq!(project.name, "Parada Geral 2024");
        assert_eq!(project.end_date, NaiveDate::from_ymd_opt(2024, 8, 30).unwrap());
        assert_eq!(project.assigned_to, "Equipe Responsável");
        assert_eq!(
            project.tags,
            vec![
                "csv-import".to_string(),
                "cronograma-operacional".to_string(),
                "unidade-3".to_string()
            ]
        );
        // one activity at 40% progress makes the project active
        assert_eq!(project.status, ProjectStatus::Active);
        assert_eq!(project.description, "Projeto importado de CSV - 1 atividades processadas");
    }

    #[test]
    fn test_assemble_empty_project_stays_draft() {
        let categorized =
            derive_categorized(CategorizedSet::default(), &ProjectMetadata::default());
        let project = assemble_project(categorized, &ProjectMetadata::default());
        assert_eq!(project.status, ProjectStatus::Draft);
        assert_eq!(project.name, "Projeto EPU");
    }
}
