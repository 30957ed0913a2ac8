// src/domain/workflow.rs
//
// Guarded status transitions shared by every entity with a lifecycle.
// Validation happens at the parse boundary (`EntityStatus::parse`); a
// transition applied to an already-validated status cannot fail.
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::user::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A closed set of statuses for one entity type.
pub trait EntityStatus: Copy + Eq + fmt::Debug + Sized + 'static {
    fn all() -> &'static [Self];
    fn as_str(&self) -> &'static str;

    fn parse(raw: &str) -> DomainResult<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|status| status.as_str() == raw)
            .ok_or_else(|| {
                let allowed = Self::all()
                    .iter()
                    .map(|status| status.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                DomainError::Validation(format!(
                    "the selected status is invalid; allowed values: {allowed}"
                ))
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub status: String,
    pub note: Option<String>,
    pub changed_at: DateTime<Utc>,
    pub changed_by: Option<UserId>,
}

/// Append-only sequence of status changes. There is deliberately no way
/// to remove or reorder entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusTimeline(Vec<TimelineEntry>);

impl StatusTimeline {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn seeded(entry: TimelineEntry) -> Self {
        Self(vec![entry])
    }

    pub fn append(&mut self, entry: TimelineEntry) {
        self.0.push(entry);
    }

    pub fn entries(&self) -> &[TimelineEntry] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

pub trait HasStatusWorkflow {
    type Status: EntityStatus;

    fn status(&self) -> Self::Status;
    fn set_status(&mut self, status: Self::Status);

    /// Entities without a timeline keep the default.
    fn timeline_mut(&mut self) -> Option<&mut StatusTimeline> {
        None
    }
}

/// Overwrites the entity status and, when the entity keeps a timeline,
/// appends one entry preserving everything already recorded.
pub fn transition<E: HasStatusWorkflow>(
    entity: &mut E,
    target: E::Status,
    note: Option<String>,
    actor: Option<UserId>,
    now: DateTime<Utc>,
) {
    entity.set_status(target);
    let status_label = target.as_str().to_string();
    if let Some(timeline) = entity.timeline_mut() {
        timeline.append(TimelineEntry {
            status: status_label,
            note,
            changed_at: now,
            changed_by: actor,
        });
    }
}

pub fn timeline_entry(
    status: &str,
    note: Option<String>,
    actor: Option<UserId>,
    now: DateTime<Utc>,
) -> TimelineEntry {
    TimelineEntry {
        status: status.to_string(),
        note,
        changed_at: now,
        changed_by: actor,
    }
}
