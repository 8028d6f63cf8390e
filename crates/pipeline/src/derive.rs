use crate::normalize::{NormalizedActivity, NormalizedSub};
use epu_domain::{Activity, ActivityStatus, Phase, Priority, SubActivity};

/// Marker tag attached to every imported activity.
pub const CSV_IMPORT_TAG: &str = "csv-import";

/// Assignee used when the caller supplies no team.
pub const DEFAULT_TEAM: &str = "Equipe Responsável";

const COLOR_BEHIND: &str = "#F44336";
const COLOR_AT_RISK: &str = "#FF9800";
const COLOR_ON_TRACK: &str = "#4CAF50";

/// Ingestion progress: the realized percentage itself, capped at 100.
///
/// The domain entity divides by `planned` instead
/// ([`epu_domain::domain_progress`]); the two formulas differ by design and
/// must not be unified.
#[must_use]
pub fn ingestion_progress(real: f64) -> f64 {
    real.min(100.0)
}

#[must_use]
pub fn activity_status(real: f64) -> ActivityStatus {
    if real == 0.0 {
        ActivityStatus::NotStarted
    } else if real >= 100.0 {
        ActivityStatus::Completed
    } else {
        ActivityStatus::InProgress
    }
}

/// Priority from the realized percentage: the further behind, the hotter.
#[must_use]
pub fn activity_priority(real: f64) -> Priority {
    if real < 30.0 {
        Priority::High
    } else if real < 70.0 {
        Priority::Medium
    } else {
        Priority::Low
    }
}

/// Estimated effort: 80% of the planned percentage in hours, floor of 8.
#[must_use]
pub fn estimated_hours(planned: f64) -> u32 {
    (planned * 0.8).round().max(8.0) as u32
}

/// Actual effort: estimated hours scaled by the realized/planned ratio.
/// Zero when nothing was planned.
#[must_use]
pub fn actual_hours(real: f64, planned: f64) -> u32 {
    if planned > 0.0 {
        (f64::from(estimated_hours(planned)) * (real / planned)).round() as u32
    } else {
        0
    }
}

/// Realized over planned as a percentage, capped at 100. An unplanned
/// activity counts as fully efficient.
#[must_use]
pub fn efficiency(real: f64, planned: f64) -> u32 {
    if planned == 0.0 {
        100
    } else {
        (((real / planned) * 100.0).round() as u32).min(100)
    }
}

#[must_use]
pub fn progress_color(real: f64) -> &'static str {
    if real < 30.0 {
        COLOR_BEHIND
    } else if real < 70.0 {
        COLOR_AT_RISK
    } else {
        COLOR_ON_TRACK
    }
}

/// Build the persisted activity shape from a normalized node.
///
/// The stored `planned`/`real` are clamped to 100; the derivations read the
/// raw values, which the grouper already guaranteed non-negative.
#[must_use]
pub fn build_activity(
    activity: NormalizedActivity,
    phase: Phase,
    order: usize,
    assigned_to: &str,
) -> Activity {
    let NormalizedActivity {
        name,
        planned,
        real,
        image,
        sub_activities,
    } = activity;
    let description = format!("{name} - Atividade de {}", phase.as_str());

    Activity {
        name,
        phase,
        planned: planned.min(100.0),
        real: real.min(100.0),
        progress: ingestion_progress(real),
        status: activity_status(real),
        priority: activity_priority(real),
        image: Some(image),
        order,
        description,
        assigned_to: Some(assigned_to.to_string()),
        estimated_hours: estimated_hours(planned),
        actual_hours: actual_hours(real, planned),
        tags: vec![phase.as_str().to_string(), CSV_IMPORT_TAG.to_string()],
        dependencies: Vec::new(),
        sub_activities: sub_activities
            .into_iter()
            .enumerate()
            .map(|(index, sub)| build_sub_activity(sub, index))
            .collect(),
        efficiency: efficiency(real, planned),
        progress_color: progress_color(real).to_string(),
    }
}

fn build_sub_activity(sub: NormalizedSub, order: usize) -> SubActivity {
    SubActivity {
        name: sub.name,
        planned: sub.planned.min(100.0),
        real: sub.real.min(100.0),
        progress: ingestion_progress(sub.real),
        status: activity_status(sub.real),
        order,
    }
}

/// Derive a whole bucket, assigning zero-based order within it.
#[must_use]
pub fn build_phase_activities(
    bucket: Vec<NormalizedActivity>,
    phase: Phase,
    assigned_to: &str,
) -> Vec<Activity> {
    bucket
        .into_iter()
        .enumerate()
        .map(|(order, activity)| build_activity(activity, phase, order, assigned_to))
        .collect()
}
