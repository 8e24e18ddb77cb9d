//! Events streamed to subscribers while a generation job runs.

use serde::{Deserialize, Serialize};

use crate::models::{Subject, SubjectId};

/// A progress checkpoint within one job.
///
/// Within one job, `percent` is non-decreasing across successively emitted
/// events and reaches exactly 100 on the terminal success event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProgressEvent {
    /// Completion percentage, 0-100
    pub percent: u8,
    /// Short stage label
    pub stage: String,
    /// Human-readable detail
    pub message: String,
}

impl ProgressEvent {
    /// Create a progress checkpoint
    pub fn new(percent: u8, stage: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            percent,
            stage: stage.into(),
            message: message.into(),
        }
    }
}

/// The wire envelope broadcast to subscribers of a subject.
///
/// Serializes as `{type, subjectId, ...}` with the variant tag in `type`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GenerationEvent {
    /// The pipeline entered a new stage
    StageChanged {
        #[serde(rename = "subjectId")]
        subject_id: SubjectId,
        stage: String,
        percent: u8,
        message: String,
    },
    /// A progress checkpoint within the current stage
    Progress {
        #[serde(rename = "subjectId")]
        subject_id: SubjectId,
        percent: u8,
        stage: String,
        message: String,
    },
    /// Terminal success, carrying the refreshed subject snapshot
    Completed {
        #[serde(rename = "subjectId")]
        subject_id: SubjectId,
        subject: Box<Subject>,
    },
    /// Terminal failure with a human-readable cause
    Failed {
        #[serde(rename = "subjectId")]
        subject_id: SubjectId,
        error: String,
    },
}

impl GenerationEvent {
    /// Create a stage-change event
    pub fn stage_changed(subject_id: impl Into<SubjectId>, progress: &ProgressEvent) -> Self {
        Self::StageChanged {
            subject_id: subject_id.into(),
            stage: progress.stage.clone(),
            percent: progress.percent,
            message: progress.message.clone(),
        }
    }

    /// Create a progress event
    pub fn progress(subject_id: impl Into<SubjectId>, progress: &ProgressEvent) -> Self {
        Self::Progress {
            subject_id: subject_id.into(),
            percent: progress.percent,
            stage: progress.stage.clone(),
            message: progress.message.clone(),
        }
    }

    /// Create a terminal completion event
    pub fn completed(subject: Subject) -> Self {
        Self::Completed {
            subject_id: subject.id.clone(),
            subject: Box::new(subject),
        }
    }

    /// Create a terminal failure event
    pub fn failed(subject_id: impl Into<SubjectId>, error: impl Into<String>) -> Self {
        Self::Failed {
            subject_id: subject_id.into(),
            error: error.into(),
        }
    }

    /// The subject this event belongs to
    pub fn subject_id(&self) -> &str {
        match self {
            Self::StageChanged { subject_id, .. }
            | Self::Progress { subject_id, .. }
            | Self::Completed { subject_id, .. }
            | Self::Failed { subject_id, .. } => subject_id,
        }
    }

    /// The percent carried by this event, if any.
    ///
    /// Terminal completion counts as 100; failures carry no percent.
    pub fn percent(&self) -> Option<u8> {
        match self {
            Self::StageChanged { percent, .. } | Self::Progress { percent, .. } => Some(*percent),
            Self::Completed { .. } => Some(100),
            Self::Failed { .. } => None,
        }
    }

    /// Whether this event is terminal for its job
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed { .. } | Self::Failed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_wire_shape() {
        let event = GenerationEvent::progress("proj-1", &ProgressEvent::new(25, "Planning", "ok"));
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "progress");
        assert_eq!(json["subjectId"], "proj-1");
        assert_eq!(json["percent"], 25);
    }

    #[test]
    fn test_failed_event_has_no_percent() {
        let event = GenerationEvent::failed("proj-1", "boom");
        assert_eq!(event.percent(), None);
        assert!(event.is_terminal());
    }

    #[test]
    fn test_completed_counts_as_100() {
        let event = GenerationEvent::completed(Subject::new("proj-1"));
        assert_eq!(event.percent(), Some(100));
        assert_eq!(event.subject_id(), "proj-1");
    }
}
