//! Rebuilds the outcome of a run from its event log alone.

use thiserror::Error;

use super::{AgentDecision, AgentEvent, AgentEventType, RunStatus};
use crate::domain::foundation::RunId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReplayError {
    #[error("event log is empty")]
    Empty,

    #[error("event log mixes runs {expected} and {found}")]
    MixedRuns { expected: RunId, found: RunId },

    #[error("event {sequence} is out of order (expected {expected})")]
    OutOfOrder { sequence: u64, expected: u64 },

    #[error("run has no terminal event")]
    Unterminated,

    #[error("malformed {event} payload: {reason}")]
    MalformedPayload { event: &'static str, reason: String },
}

/// What an event log says happened.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReplay {
    pub run_id: RunId,
    pub iterations: u32,
    pub status: RunStatus,
    pub decision: Option<AgentDecision>,
    /// Confidence of every rejected submission, in order.
    pub rejected_confidences: Vec<u8>,
    pub tool_calls: usize,
    pub nudges: usize,
    pub error: Option<String>,
}

impl RunReplay {
    pub fn from_events(events: &[AgentEvent]) -> Result<Self, ReplayError> {
        let first = events.first().ok_or(ReplayError::Empty)?;
        let run_id = first.run_id;

        let mut iterations = 0;
        let mut decision = None;
        let mut rejected_confidences = Vec::new();
        let mut tool_calls = 0;
        let mut nudges = 0;
        let mut terminal: Option<(RunStatus, Option<String>)> = None;

        for (expected, event) in events.iter().enumerate() {
            if event.run_id != run_id {
                return Err(ReplayError::MixedRuns {
                    expected: run_id,
                    found: event.run_id,
                });
            }
            if event.sequence != expected as u64 {
                return Err(ReplayError::OutOfOrder {
                    sequence: event.sequence,
                    expected: expected as u64,
                });
            }

            match event.event_type {
                AgentEventType::IterationStart => {
                    iterations = event.iteration.unwrap_or(iterations + 1);
                }
                AgentEventType::ToolCallStart => tool_calls += 1,
                AgentEventType::Nudge => nudges += 1,
                AgentEventType::DecisionRejected => {
                    let confidence = event
                        .get("confidence")
                        .and_then(|v| v.as_u64())
                        .ok_or_else(|| malformed("decision_rejected", "missing confidence"))?;
                    rejected_confidences.push(confidence.min(100) as u8);
                }
                AgentEventType::DecisionAccepted => {
                    let raw = event
                        .get("decision")
                        .cloned()
                        .ok_or_else(|| malformed("decision_accepted", "missing decision"))?;
                    let parsed: AgentDecision = serde_json::from_value(raw)
                        .map_err(|e| malformed("decision_accepted", e.to_string()))?;
                    decision = Some(parsed);
                }
                AgentEventType::Complete => {
                    let raw = event
                        .get("status")
                        .cloned()
                        .ok_or_else(|| malformed("complete", "missing status"))?;
                    let status: RunStatus = serde_json::from_value(raw)
                        .map_err(|e| malformed("complete", e.to_string()))?;
                    terminal = Some((status, None));
                }
                AgentEventType::Error => {
                    let message = event
                        .get("message")
                        .and_then(|v| v.as_str())
                        .map(str::to_string);
                    terminal = Some((RunStatus::Failed, message));
                }
                AgentEventType::Cancelled => terminal = Some((RunStatus::Cancelled, None)),
                AgentEventType::Start
                | AgentEventType::Thinking
                | AgentEventType::ToolCallResult => {}
            }
        }

        let (status, error) = terminal.ok_or(ReplayError::Unterminated)?;
        if status != RunStatus::Decided {
            decision = None;
        }

        Ok(Self {
            run_id,
            iterations,
            status,
            decision,
            rejected_confidences,
            tool_calls,
            nudges,
            error,
        })
    }
}

fn malformed(event: &'static str, reason: impl Into<String>) -> ReplayError {
    ReplayError::MalformedPayload {
        event,
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::agent::AgentEventKind;
    use crate::domain::foundation::Confidence;

    struct Log {
        run_id: RunId,
        events: Vec<AgentEvent>,
    }

    impl Log {
        fn new() -> Self {
            Self {
                run_id: RunId::new(),
                events: Vec::new(),
            }
        }

        fn push(&mut self, iteration: Option<u32>, kind: AgentEventKind) {
            let seq = self.events.len() as u64;
            self.events.push(AgentEvent::new(self.run_id, seq, iteration, kind));
        }
    }

    #[test]
    fn replays_budget_exhaustion() {
        let mut log = Log::new();
        log.push(
            None,
            AgentEventKind::Start {
                input: "x".to_string(),
                variant: "standard".to_string(),
                max_iterations: 2,
                threshold: Confidence::saturating(75),
            },
        );
        for i in 1..=2 {
            log.push(Some(i), AgentEventKind::IterationStart);
            log.push(
                Some(i),
                AgentEventKind::Nudge {
                    message: "use a tool".to_string(),
                },
            );
        }
        log.push(
            Some(2),
            AgentEventKind::Complete {
                status: RunStatus::MaxIterations,
                decision: None,
            },
        );

        let replay = RunReplay::from_events(&log.events).unwrap();
        assert_eq!(replay.iterations, 2);
        assert_eq!(replay.status, RunStatus::MaxIterations);
        assert_eq!(replay.nudges, 2);
        assert!(replay.decision.is_none());
    }

    #[test]
    fn replays_error_message() {
        let mut log = Log::new();
        log.push(Some(1), AgentEventKind::IterationStart);
        log.push(
            Some(1),
            AgentEventKind::Error {
                message: "provider unavailable".to_string(),
            },
        );

        let replay = RunReplay::from_events(&log.events).unwrap();
        assert_eq!(replay.status, RunStatus::Failed);
        assert_eq!(replay.error.as_deref(), Some("provider unavailable"));
    }

    #[test]
    fn rejects_unterminated_log() {
        let mut log = Log::new();
        log.push(Some(1), AgentEventKind::IterationStart);
        assert_eq!(RunReplay::from_events(&log.events), Err(ReplayError::Unterminated));
    }

    #[test]
    fn rejects_gap_in_sequence() {
        let mut log = Log::new();
        log.push(Some(1), AgentEventKind::IterationStart);
        log.push(Some(1), AgentEventKind::Cancelled);
        log.events.remove(0);
        assert!(matches!(
            RunReplay::from_events(&log.events),
            Err(ReplayError::OutOfOrder { sequence: 1, expected: 0 })
        ));
    }

    #[test]
    fn rejects_empty_log() {
        assert_eq!(RunReplay::from_events(&[]), Err(ReplayError::Empty));
    }
}
