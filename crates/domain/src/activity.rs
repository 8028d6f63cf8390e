use crate::error::{DomainError, Result};
use serde::{Deserialize, Serialize};

/// Operational phase an activity belongs to.
///
/// Serialized with the legacy lowercase tags (`parada`, `manutencao`,
/// `partida`) used by the persisted project documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Shutdown procedure
    Parada,
    /// Maintenance window
    Manutencao,
    /// Startup procedure
    Partida,
}

impl Phase {
    /// All phases in operational order (shutdown, maintenance, startup).
    pub const ALL: [Self; 3] = [Self::Parada, Self::Manutencao, Self::Partida];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Parada => "parada",
            Self::Manutencao => "manutencao",
            Self::Partida => "partida",
        }
    }

    /// Name of the categorized bucket in the project document.
    #[must_use]
    pub const fn bucket_name(self) -> &'static str {
        match self {
            Self::Parada => "procedimentoParada",
            Self::Manutencao => "manutencao",
            Self::Partida => "procedimentoPartida",
        }
    }

    /// Parse a phase tag; any unknown tag is rejected outright.
    pub fn parse(tag: &str) -> Result<Self> {
        match tag {
            "parada" => Ok(Self::Parada),
            "manutencao" => Ok(Self::Manutencao),
            "partida" => Ok(Self::Partida),
            other => Err(DomainError::InvalidActivityType(other.to_string())),
        }
    }
}

/// Execution status of an activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityStatus {
    NotStarted,
    Started,
    InProgress,
    Completed,
}

impl ActivityStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::Started => "started",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

impl Priority {
    /// Parse a priority label, falling back to `medium` for anything
    /// unrecognized instead of failing the whole record.
    #[must_use]
    pub fn parse_or_default(label: &str) -> Self {
        match label {
            "low" => Self::Low,
            "medium" => Self::Medium,
            "high" => Self::High,
            "urgent" => Self::Urgent,
            _ => Self::Medium,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }
}

/// Schedule assessment derived from the domain progress formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScheduleHealth {
    Completed,
    OnTrack,
    Delayed,
}

impl ScheduleHealth {
    /// Display color for dashboard rendering.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Completed => "#4CAF50",
            Self::OnTrack => "#FF9800",
            Self::Delayed => "#F44336",
        }
    }
}

/// Domain progress: how much of the planned percentage was realized.
///
/// Distinct from the ingestion pipeline's progress figure, which reports
/// `real` alone. Both formulas coexist by design; do not unify them.
#[must_use]
pub fn domain_progress(real: f64, planned: f64) -> f64 {
    if planned == 0.0 {
        return 0.0;
    }
    (real / planned * 100.0).clamp(0.0, 100.0)
}

/// A flagged sub-activity surfaced on the dashboard under its parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubActivity {
    pub name: String,
    pub planned: f64,
    pub real: f64,
    pub progress: f64,
    pub status: ActivityStatus,
    pub order: usize,
}

/// A project activity as persisted in the document store.
///
/// `planned` and `real` are the two raw percentages everything else derives
/// from. The remaining business fields (`progress`, `status`, `priority`,
/// hours, `efficiency`, `progress_color`) are filled in at ingestion time;
/// the entity methods below recompute their own view of them on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub name: String,
    #[serde(rename = "type")]
    pub phase: Phase,
    pub planned: f64,
    pub real: f64,
    pub progress: f64,
    pub status: ActivityStatus,
    pub priority: Priority,
    #[serde(default)]
    pub image: Option<String>,
    pub order: usize,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub estimated_hours: u32,
    #[serde(default)]
    pub actual_hours: u32,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub sub_activities: Vec<SubActivity>,
    #[serde(default)]
    pub efficiency: u32,
    #[serde(default)]
    pub progress_color: String,
}

impl Activity {
    /// Validate and coerce the entity into its canonical shape.
    ///
    /// An empty name is a hard error. Negative or non-finite percentages are
    /// coerced to zero rather than rejected, matching the tolerant policy
    /// applied throughout ingestion.
    pub fn validated(mut self) -> Result<Self> {
        self.name = sanitize_name(&self.name);
        if self.name.is_empty() {
            return Err(DomainError::EmptyActivityName);
        }
        self.planned = coerce_non_negative(self.planned);
        self.real = coerce_non_negative(self.real);
        self.progress = coerce_non_negative(self.progress);
        for sub in &mut self.sub_activities {
            sub.name = sanitize_name(&sub.name);
            sub.planned = coerce_non_negative(sub.planned);
            sub.real = coerce_non_negative(sub.real);
            sub.progress = coerce_non_negative(sub.progress);
        }
        Ok(self)
    }

    /// Progress according to the domain formula (`real / planned`).
    #[must_use]
    pub fn calculated_progress(&self) -> f64 {
        domain_progress(self.real, self.planned)
    }

    /// Status derived from [`Activity::calculated_progress`].
    #[must_use]
    pub fn calculated_status(&self) -> ActivityStatus {
        let progress = self.calculated_progress();
        if progress == 0.0 {
            ActivityStatus::NotStarted
        } else if progress >= 100.0 {
            ActivityStatus::Completed
        } else if progress >= 50.0 {
            ActivityStatus::InProgress
        } else {
            ActivityStatus::Started
        }
    }

    #[must_use]
    pub fn schedule_health(&self) -> ScheduleHealth {
        let progress = self.calculated_progress();
        if progress >= 100.0 {
            ScheduleHealth::Completed
        } else if progress >= 80.0 {
            ScheduleHealth::OnTrack
        } else {
            ScheduleHealth::Delayed
        }
    }

    /// Hours-based efficiency: estimated over actual, capped at 100.
    #[must_use]
    pub fn hours_efficiency(&self) -> f64 {
        if self.estimated_hours == 0 {
            return 0.0;
        }
        let actual = self.actual_hours.max(1) as f64;
        (f64::from(self.estimated_hours) / actual * 100.0).min(100.0)
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status == ActivityStatus::Completed
    }

    /// Update the realized percentage and re-derive the status.
    pub fn update_real(&mut self, value: f64) {
        self.real = coerce_non_negative(value);
        self.status = self.calculated_status();
    }

    pub fn add_sub_activity(&mut self, mut sub: SubActivity) {
        sub.name = sanitize_name(&sub.name);
        sub.order = self.sub_activities.len();
        self.sub_activities.push(sub);
        self.roll_up_from_sub_activities();
    }

    /// Update a sub-activity's realized percentage and re-derive its
    /// progress and status with the domain formula.
    pub fn update_sub_activity(&mut self, name: &str, real: f64) -> Result<()> {
        let sub = self
            .sub_activities
            .iter_mut()
            .find(|sub| sub.name == name)
            .ok_or_else(|| DomainError::SubActivityNotFound(name.to_string()))?;
        sub.real = coerce_non_negative(real);
        sub.progress = domain_progress(sub.real, sub.planned);
        sub.status = if sub.progress == 0.0 {
            ActivityStatus::NotStarted
        } else if sub.progress >= 100.0 {
            ActivityStatus::Completed
        } else if sub.progress >= 50.0 {
            ActivityStatus::InProgress
        } else {
            ActivityStatus::Started
        };
        self.roll_up_from_sub_activities();
        Ok(())
    }

    pub fn remove_sub_activity(&mut self, name: &str) -> Result<()> {
        let before = self.sub_activities.len();
        self.sub_activities.retain(|sub| sub.name != name);
        if self.sub_activities.len() == before {
            return Err(DomainError::SubActivityNotFound(name.to_string()));
        }
        for (index, sub) in self.sub_activities.iter_mut().enumerate() {
            sub.order = index;
        }
        self.roll_up_from_sub_activities();
        Ok(())
    }

    /// Recompute `planned`/`real` as the sum over sub-activities, when any
    /// exist, and re-derive the status.
    pub fn roll_up_from_sub_activities(&mut self) {
        if !self.sub_activities.is_empty() {
            self.planned = self.sub_activities.iter().map(|sub| sub.planned).sum();
            self.real = self.sub_activities.iter().map(|sub| sub.real).sum();
        }
        self.status = self.calculated_status();
    }
}

/// Trim and collapse internal whitespace runs to a single space.
#[must_use]
pub(crate) fn sanitize_name(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn coerce_non_negative(value: f64) -> f64 {
    if value.is_finite() && value >= 0.0 {
        value
    } else {
        0.0
    }
}
