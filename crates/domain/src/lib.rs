//! # EPU Domain
//!
//! Domain entities for operational shutdown projects: activities grouped into
//! the three operational phases (shutdown, maintenance, startup) and the
//! project aggregate that owns them.
//!
//! The entities re-validate and re-derive their own figures independently of
//! whatever produced them. In particular, [`domain_progress`] divides `real`
//! by `planned`; the ingestion pipeline ships its own progress formula and the
//! two are intentionally kept apart.

mod activity;
mod error;
mod project;

pub use activity::{
    domain_progress, Activity, ActivityStatus, Phase, Priority, ScheduleHealth, SubActivity,
};
pub use error::{DomainError, Result};
pub use project::{PhaseStats, Project, ProjectStats, ProjectStatus};
