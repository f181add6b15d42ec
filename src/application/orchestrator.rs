//! Agent orchestrator - the iterative tool-calling loop.
//!
//! One call to [`AgentOrchestrator::run`] drives a single research run:
//!
//! 1. Seed the transcript with the variant's instruction.
//! 2. Ask the model for a turn.
//! 3. Dispatch each proposed tool call in order; decisions go through the
//!    confidence gate.
//! 4. Feed the results back and repeat until a decision is accepted, the
//!    iteration budget runs out, the model or transport fails, or the
//!    cancellation probe fires.
//!
//! `run` itself never returns an error. Every ending, including failures,
//! is reported in the returned [`AgentResult`] and closed by exactly one
//! terminal event.

use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::dispatcher::ToolDispatcher;
use crate::domain::agent::prompts::NUDGE_MESSAGE;
use crate::domain::agent::{
    AgentDecision, AgentError, AgentEvent, AgentEventKind, AgentResult, AgentVariant, ContentBlock,
    GateVerdict, Message, RunPhase, RunStatus, Transcript,
};
use crate::domain::foundation::{RunId, StateMachine, Timestamp};
use crate::domain::tools::{ToolRegistry, ToolResult};
use crate::ports::{
    provider_for_run, CallOptions, CancellationProbe, EventSink, ModelProvider, NeverCancel,
    ResearchCapabilities, StopReason, TokenUsage,
};

/// Runs research agents for one variant.
///
/// Each `run` resolves its own provider through [`provider_for_run`], so
/// run-scoped provider state (such as a failover switch) is never shared.
pub struct AgentOrchestrator {
    provider: Arc<dyn ModelProvider>,
    dispatcher: ToolDispatcher,
    variant: AgentVariant,
    cancellation: Arc<dyn CancellationProbe>,
}

impl AgentOrchestrator {
    /// Validates the variant and builds the tool registry it selects.
    pub fn new(
        provider: Arc<dyn ModelProvider>,
        capabilities: ResearchCapabilities,
        variant: AgentVariant,
    ) -> Result<Self, AgentError> {
        variant.validate()?;
        let registry = ToolRegistry::for_toolset(variant.toolset);

        Ok(Self {
            provider,
            dispatcher: ToolDispatcher::new(registry, capabilities),
            variant,
            cancellation: Arc::new(NeverCancel),
        })
    }

    pub fn with_cancellation(mut self, probe: Arc<dyn CancellationProbe>) -> Self {
        self.cancellation = probe;
        self
    }

    pub fn variant(&self) -> &AgentVariant {
        &self.variant
    }

    pub fn registry(&self) -> &ToolRegistry {
        self.dispatcher.registry()
    }

    /// Runs the agent on `input`, streaming events into `sink`.
    pub async fn run(&self, input: &str, sink: &dyn EventSink) -> AgentResult {
        let run_id = RunId::new();
        let provider = provider_for_run(&self.provider);
        let mut events = EventEmitter::new(run_id, sink);
        let mut run = RunState::new(self.variant.instruction_for(input));
        let gate = self.variant.gate();
        let max_iterations = self.variant.max_iterations;
        let options = CallOptions::new(self.variant.max_tokens_per_call)
            .with_temperature(self.variant.temperature);

        info!(
            run_id = %run_id,
            variant = %self.variant.name,
            provider = %provider.provider_info().name,
            max_iterations,
            "agent run started"
        );
        events.emit(
            None,
            AgentEventKind::Start {
                input: input.to_string(),
                variant: self.variant.name.clone(),
                max_iterations,
                threshold: gate.threshold(),
            },
        );

        let ending = loop {
            if run.iteration >= max_iterations {
                run.advance(RunPhase::MaxIterations);
                info!(run_id = %run_id, "iteration budget exhausted");
                events.emit(
                    Some(run.iteration),
                    AgentEventKind::Complete {
                        status: RunStatus::MaxIterations,
                        decision: None,
                    },
                );
                break Ending::Undecided;
            }

            if self.cancellation.is_cancelled().await {
                run.advance(RunPhase::Cancelled);
                info!(run_id = %run_id, completed = run.iteration, "agent run cancelled");
                events.emit(run.iteration_tag(), AgentEventKind::Cancelled);
                break Ending::Undecided;
            }

            run.iteration += 1;
            run.advance(RunPhase::AwaitingModel);
            debug!(run_id = %run_id, iteration = run.iteration, "iteration started");
            events.emit(Some(run.iteration), AgentEventKind::IterationStart);

            let pending = run.transcript.pending_tool_uses();
            if !pending.is_empty() {
                error!(run_id = %run_id, ?pending, "transcript has unanswered tool calls");
                debug_assert!(pending.is_empty(), "unanswered tool calls: {:?}", pending);
            }

            let response = match provider
                .call_model(
                    run.transcript.messages(),
                    self.dispatcher.registry().definitions(),
                    &options,
                )
                .await
            {
                Ok(response) => response,
                Err(err) => {
                    error!(run_id = %run_id, iteration = run.iteration, error = %err, "model call failed");
                    run.advance(RunPhase::Failed);
                    let message = err.to_string();
                    events.emit(
                        Some(run.iteration),
                        AgentEventKind::Error {
                            message: message.clone(),
                        },
                    );
                    break Ending::Failed(message);
                }
            };

            if let Some(usage) = response.usage {
                run.usage += usage;
            }

            for text in response.texts().filter(|t| !t.trim().is_empty()) {
                events.emit(
                    Some(run.iteration),
                    AgentEventKind::Thinking {
                        text: text.to_string(),
                    },
                );
            }

            if response.stop_reason == StopReason::MaxTokens {
                let message = format!(
                    "model output truncated at {} tokens",
                    self.variant.max_tokens_per_call
                );
                error!(run_id = %run_id, iteration = run.iteration, "{}", message);
                run.advance(RunPhase::Failed);
                events.emit(
                    Some(run.iteration),
                    AgentEventKind::Error {
                        message: message.clone(),
                    },
                );
                break Ending::Failed(message);
            }

            if !response.has_tool_uses() {
                run.advance(RunPhase::Nudging);
                let text = response.texts().collect::<Vec<_>>().join("\n");
                if !text.trim().is_empty() {
                    run.transcript.push(Message::assistant(text));
                }
                run.transcript.push(Message::user(NUDGE_MESSAGE));
                debug!(run_id = %run_id, iteration = run.iteration, "model answered without tools, nudging");
                events.emit(
                    Some(run.iteration),
                    AgentEventKind::Nudge {
                        message: NUDGE_MESSAGE.to_string(),
                    },
                );
                continue;
            }

            run.advance(RunPhase::Dispatching);
            let mut results = Vec::new();
            let mut accepted: Option<AgentDecision> = None;

            for call in response.content.iter().filter_map(ContentBlock::as_tool_use) {
                events.emit(
                    Some(run.iteration),
                    AgentEventKind::ToolCallStart {
                        tool_use_id: call.id.to_string(),
                        tool: call.name.to_string(),
                        input: call.input.clone(),
                    },
                );

                let outcome = self.dispatcher.dispatch(call.name, call.input).await;
                let mut result = outcome.result;

                if let Some(decision) = outcome.decision {
                    match gate.evaluate(&decision) {
                        GateVerdict::Accepted => {
                            info!(
                                run_id = %run_id,
                                iteration = run.iteration,
                                recommendation = %decision.recommendation,
                                confidence = decision.confidence.value(),
                                "decision accepted"
                            );
                            events.emit(
                                Some(run.iteration),
                                AgentEventKind::DecisionAccepted {
                                    decision: decision.clone(),
                                },
                            );
                            accepted = Some(decision);
                        }
                        GateVerdict::Rejected {
                            confidence,
                            threshold,
                        } => {
                            warn!(
                                run_id = %run_id,
                                iteration = run.iteration,
                                confidence = confidence.value(),
                                threshold = threshold.value(),
                                "decision rejected by confidence gate"
                            );
                            events.emit(
                                Some(run.iteration),
                                AgentEventKind::DecisionRejected {
                                    confidence,
                                    threshold,
                                },
                            );
                            result = ToolResult::failure_with_data(
                                "Decision rejected: confidence below threshold",
                                gate.rejection_feedback(&decision),
                            );
                        }
                    }
                }

                events.emit(
                    Some(run.iteration),
                    AgentEventKind::ToolCallResult {
                        tool_use_id: call.id.to_string(),
                        tool: call.name.to_string(),
                        result: result.clone(),
                    },
                );
                results.push(ContentBlock::tool_result(call.id, result.to_content_string()));

                // Calls after an accepted decision in the same turn are dropped.
                if accepted.is_some() {
                    break;
                }
            }

            run.transcript.push(Message::assistant_blocks(response.content));
            run.transcript.push(Message::tool_results(results));

            if let Some(decision) = accepted {
                run.advance(RunPhase::Decided);
                events.emit(
                    Some(run.iteration),
                    AgentEventKind::Complete {
                        status: RunStatus::Decided,
                        decision: Some(decision.clone()),
                    },
                );
                break Ending::Decided(decision);
            }
        };

        let status = run
            .phase
            .terminal_status()
            .unwrap_or(RunStatus::Failed);
        info!(
            run_id = %run_id,
            status = %status,
            iterations = run.iteration,
            total_tokens = run.usage.total_tokens,
            "agent run finished"
        );

        let (decision, error) = match ending {
            Ending::Decided(decision) => (Some(decision), None),
            Ending::Undecided => (None, None),
            Ending::Failed(message) => (None, Some(message)),
        };

        AgentResult {
            run_id,
            input: input.to_string(),
            iterations: run.iteration,
            decision,
            status,
            error,
            usage: run.usage,
            timestamp: Timestamp::now(),
        }
    }
}

enum Ending {
    Decided(AgentDecision),
    Undecided,
    Failed(String),
}

/// Mutable state owned by one run.
struct RunState {
    phase: RunPhase,
    iteration: u32,
    transcript: Transcript,
    usage: TokenUsage,
}

impl RunState {
    fn new(instruction: String) -> Self {
        Self {
            phase: RunPhase::Starting,
            iteration: 0,
            transcript: Transcript::seeded(instruction),
            usage: TokenUsage::default(),
        }
    }

    fn advance(&mut self, next: RunPhase) {
        match self.phase.transition_to(next) {
            Ok(phase) => self.phase = phase,
            Err(err) => {
                error!(error = %err, "illegal run phase transition");
                debug_assert!(false, "{}", err);
                self.phase = next;
            }
        }
    }

    fn iteration_tag(&self) -> Option<u32> {
        (self.iteration > 0).then_some(self.iteration)
    }
}

/// Stamps run id and sequence numbers onto outgoing events.
struct EventEmitter<'a> {
    run_id: RunId,
    next_sequence: u64,
    sink: &'a dyn EventSink,
}

impl<'a> EventEmitter<'a> {
    fn new(run_id: RunId, sink: &'a dyn EventSink) -> Self {
        Self {
            run_id,
            next_sequence: 0,
            sink,
        }
    }

    fn emit(&mut self, iteration: Option<u32>, kind: AgentEventKind) {
        let event = AgentEvent::new(self.run_id, self.next_sequence, iteration, kind);
        self.next_sequence += 1;
        self.sink.on_event(&event);
    }
}
