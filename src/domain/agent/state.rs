//! Run lifecycle as a validated state machine.

use serde::{Deserialize, Serialize};

use super::RunStatus;
use crate::domain::foundation::StateMachine;

/// Where a run currently is in its loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunPhase {
    Starting,
    AwaitingModel,
    Dispatching,
    Nudging,
    Decided,
    MaxIterations,
    Cancelled,
    Failed,
}

impl RunPhase {
    /// Status reported for a terminal phase.
    pub fn terminal_status(&self) -> Option<RunStatus> {
        match self {
            RunPhase::Decided => Some(RunStatus::Decided),
            RunPhase::MaxIterations => Some(RunStatus::MaxIterations),
            RunPhase::Cancelled => Some(RunStatus::Cancelled),
            RunPhase::Failed => Some(RunStatus::Failed),
            _ => None,
        }
    }
}

impl StateMachine for RunPhase {
    fn can_transition_to(&self, target: &Self) -> bool {
        self.valid_transitions().contains(target)
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use RunPhase::*;
        match self {
            Starting => vec![AwaitingModel, Cancelled],
            AwaitingModel => vec![Dispatching, Nudging, Failed],
            Dispatching => vec![AwaitingModel, Decided, MaxIterations, Cancelled],
            Nudging => vec![AwaitingModel, MaxIterations, Cancelled],
            Decided | MaxIterations | Cancelled | Failed => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_response_paths() {
        let phase = RunPhase::AwaitingModel;
        assert!(phase.can_transition_to(&RunPhase::Dispatching));
        assert!(phase.can_transition_to(&RunPhase::Nudging));
        assert!(phase.can_transition_to(&RunPhase::Failed));
        assert!(!phase.can_transition_to(&RunPhase::Decided));
    }

    #[test]
    fn decision_only_reached_from_dispatch() {
        assert!(RunPhase::Dispatching.can_transition_to(&RunPhase::Decided));
        assert!(!RunPhase::Nudging.can_transition_to(&RunPhase::Decided));
        assert!(RunPhase::Starting.transition_to(RunPhase::Decided).is_err());
    }

    #[test]
    fn terminal_phases_have_status() {
        for phase in [
            RunPhase::Decided,
            RunPhase::MaxIterations,
            RunPhase::Cancelled,
            RunPhase::Failed,
        ] {
            assert!(phase.is_terminal());
            assert!(phase.terminal_status().is_some());
        }
        assert!(RunPhase::Nudging.terminal_status().is_none());
    }
}
