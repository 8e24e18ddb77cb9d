//! Pipeline stages and their progress checkpoints.

use serde::{Deserialize, Serialize};

/// The states a generation job moves through.
///
/// `Idle` is the state before admission; `Ready` and `Error` are terminal
/// and irreversible for a job instance. A new prompt starts a new job.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Stage {
    Idle,
    Analyzing,
    Planning,
    GeneratingFiles,
    Finalizing,
    Ready,
    Error,
}

impl Stage {
    /// Display label used in progress events
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Analyzing => "Analyzing",
            Self::Planning => "Planning",
            Self::GeneratingFiles => "Generating files",
            Self::Finalizing => "Finalizing",
            Self::Ready => "Ready",
            Self::Error => "Error",
        }
    }

    /// The checkpoint percent emitted when the stage is entered.
    ///
    /// `GeneratingFiles` reaches 80 through cosmetic sub-steps; `Error`
    /// carries no percent.
    pub fn checkpoint(&self) -> Option<u8> {
        match self {
            Self::Idle => Some(0),
            Self::Analyzing => Some(10),
            Self::Planning => Some(25),
            Self::GeneratingFiles => Some(40),
            Self::Finalizing => Some(95),
            Self::Ready => Some(100),
            Self::Error => None,
        }
    }

    /// Whether the job can leave this stage
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Ready | Self::Error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkpoints_are_increasing() {
        let order = [
            Stage::Idle,
            Stage::Analyzing,
            Stage::Planning,
            Stage::GeneratingFiles,
            Stage::Finalizing,
            Stage::Ready,
        ];
        let percents: Vec<u8> = order.iter().filter_map(|s| s.checkpoint()).collect();
        assert!(percents.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(percents.last(), Some(&100));
    }

    #[test]
    fn test_terminal_stages() {
        assert!(Stage::Ready.is_terminal());
        assert!(Stage::Error.is_terminal());
        assert!(!Stage::Finalizing.is_terminal());
    }
}
