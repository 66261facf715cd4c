//! Dialogue loop controller.
//!
//! Drives one conversation turn to completion: the user's text goes into
//! history, the model is invoked with the full ordered history, and its
//! reply is classified. Plain text ends the turn; a function request is
//! executed and its result re-injected so the model can chain further
//! lookups within the same turn.
//!
//! ```text
//! user text ──► [pending confirmation?] ──yes──► execute / cancel, done
//!                      │ no
//!                      ▼
//!              invoke model (drain stream)
//!                      │
//!              classify reply ──► Respond ───────► reply, done
//!                      │                ├► Confirm ───► store pending, prompt, done
//!                      │                └► Execute ──► action
//!                      ▲                                │ success: result into history
//!                      └────────────────────────────────┘ error: report, done
//! ```
//!
//! Termination: the loop only continues when an action succeeds and the
//! model is re-invoked; any plain reply or any error ends the turn, and
//! [`EngineConfig::max_action_rounds`] bounds the chain regardless of model
//! behavior. Every turn produces exactly one user-visible reply.

use crate::error::{EngineError, Result};
use crate::executor::{bind_params, ActionOutcome, Executor};
use crate::llm::{ChatModel, ChatRequest};
use crate::prompts::{system_instruction, CONFIRM_KEYWORD};
use crate::registry::ActionKind;
use crate::session::{PendingConfirmation, Session};
use crate::wire::{parse_reply, ActionCall, ActionParams, ModelReply, WireFormat};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Configuration for the dialogue engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Wire grammar this deployment uses for function requests.
    pub wire_format: WireFormat,

    /// Sampling temperature passed to the model.
    pub temperature: Option<f32>,

    /// Maximum output tokens per model invocation.
    pub max_tokens: Option<usize>,

    /// Maximum successful actions per turn before the loop is failed.
    pub max_action_rounds: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            wire_format: WireFormat::Delimited,
            temperature: Some(0.2),
            max_tokens: Some(500),
            max_action_rounds: 8,
        }
    }
}

impl EngineConfig {
    /// Set the wire grammar.
    pub fn with_wire_format(mut self, format: WireFormat) -> Self {
        self.wire_format = format;
        self
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the per-invocation output-token cap.
    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set the per-turn action-round cap.
    pub fn with_max_action_rounds(mut self, rounds: usize) -> Self {
        self.max_action_rounds = rounds;
        self
    }
}

/// The single user-visible message a turn produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnReply {
    /// Ordinary assistant reply.
    Assistant(String),

    /// Prompt asking the user to confirm a pending purchase.
    ConfirmationPrompt(String),

    /// A requested action failed; the turn ended without retrying.
    ActionFailed(String),

    /// A pending purchase was discarded.
    Cancelled(String),
}

impl TurnReply {
    /// The text shown to the user.
    pub fn text(&self) -> &str {
        match self {
            TurnReply::Assistant(text)
            | TurnReply::ConfirmationPrompt(text)
            | TurnReply::ActionFailed(text)
            | TurnReply::Cancelled(text) => text,
        }
    }
}

/// Progress notifications emitted while a turn runs.
///
/// These are not replies — a turn still ends with exactly one [`TurnReply`].
/// Front-ends may render them as transient status lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnEvent {
    /// An action is about to be invoked.
    ActionStarted {
        /// Wire-level action name.
        name: String,
        /// Bound or supplied arguments.
        args: Vec<String>,
    },

    /// An action completed and its result rejoined the history.
    ActionCompleted {
        /// Wire-level action name.
        name: String,
    },
}

/// Callback for [`TurnEvent`] notifications.
pub type EventSink = Arc<dyn Fn(TurnEvent) + Send + Sync>;

/// Per-reply decision taken by the loop.
///
/// Computed by the pure [`classify_reply`] transition so the confirmation
/// short-circuit and the chaining path stay independently testable.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Step {
    /// Plain chat: append to history and end the turn.
    Respond(String),

    /// A confirmation-gated action was proposed: capture it, do not run it.
    Confirm(ActionKind, ActionCall),

    /// Any other action request: hand it to the executor. Unknown names
    /// travel this path too; the executor reports them.
    Execute(ActionCall),
}

fn classify_reply(format: WireFormat, raw: &str) -> Step {
    match parse_reply(format, raw) {
        ModelReply::Chat(text) => Step::Respond(text),
        ModelReply::Action(call) => match ActionKind::resolve(&call.name) {
            Some(kind) if kind.requires_confirmation() => Step::Confirm(kind, call),
            _ => Step::Execute(call),
        },
    }
}

/// Human-readable confirmation prompt for a captured purchase.
fn purchase_prompt(args: &[String]) -> String {
    format!(
        "You're about to purchase a ticket for '{}' at {} for {}. \
         Type {} to confirm, or reply with anything else to cancel.",
        args[1], args[0], args[2], CONFIRM_KEYWORD
    )
}

/// Orchestrates conversation turns over a model and a catalog.
pub struct DialogueEngine {
    model: Arc<dyn ChatModel>,
    executor: Executor,
    config: EngineConfig,
    events: Option<EventSink>,
}

impl DialogueEngine {
    /// Create an engine over the given model and catalog.
    pub fn new(
        model: Arc<dyn ChatModel>,
        catalog: Arc<dyn crate::catalog::MovieCatalog>,
        config: EngineConfig,
    ) -> Self {
        Self {
            model,
            executor: Executor::new(catalog),
            config,
            events: None,
        }
    }

    /// Attach a progress-event callback.
    pub fn with_event_sink(mut self, sink: EventSink) -> Self {
        self.events = Some(sink);
        self
    }

    /// Create a session seeded with this deployment's system instruction.
    pub fn new_session(&self) -> Session {
        Session::new(system_instruction(self.config.wire_format))
    }

    /// Process one user turn to completion.
    ///
    /// Returns the turn's single user-visible reply, or an error for
    /// turn-level failures (model transport, round-limit exhaustion), which
    /// the front-end renders as an error explanation.
    pub async fn handle_turn(&self, session: &mut Session, user_text: &str) -> Result<TurnReply> {
        debug!(session = %session.id(), "turn started");
        session.push_user(user_text);

        // Hard short-circuit: a pending purchase is settled by keyword
        // comparison alone. The model is not consulted, and the pending
        // state is cleared whichever way this goes.
        if let Some(pending) = session.take_pending() {
            return self.settle_confirmation(pending, user_text).await;
        }

        let mut rounds = 0;
        loop {
            let raw = self.invoke_model(session).await?;

            match classify_reply(self.config.wire_format, &raw) {
                Step::Respond(text) => {
                    session.push_assistant(text.clone());
                    debug!(session = %session.id(), rounds, "turn finished with reply");
                    return Ok(TurnReply::Assistant(text));
                }

                Step::Confirm(kind, call) => {
                    let args = match bind_params(kind, &call.params) {
                        Ok(args) => args,
                        Err(message) => {
                            return Ok(TurnReply::ActionFailed(format!(
                                "An error occurred: {message}"
                            )))
                        }
                    };
                    let prompt = purchase_prompt(&args);
                    info!(session = %session.id(), action = %call.name, "purchase proposed, awaiting confirmation");
                    session.set_pending(PendingConfirmation {
                        action: call.name,
                        args,
                    });
                    return Ok(TurnReply::ConfirmationPrompt(prompt));
                }

                Step::Execute(call) => {
                    if rounds >= self.config.max_action_rounds {
                        warn!(session = %session.id(), limit = self.config.max_action_rounds, "action round limit hit");
                        return Err(EngineError::LoopLimitExceeded {
                            limit: self.config.max_action_rounds,
                        });
                    }
                    rounds += 1;

                    let args = match &call.params {
                        ActionParams::Positional(args) => args.clone(),
                        ActionParams::Named(args) => args.values().cloned().collect(),
                    };
                    self.emit(TurnEvent::ActionStarted {
                        name: call.name.clone(),
                        args,
                    });

                    match self.executor.execute(&call).await {
                        ActionOutcome::Success(payload) => {
                            self.emit(TurnEvent::ActionCompleted {
                                name: call.name.clone(),
                            });
                            // Re-inject the result and let the model read it
                            // on the next round.
                            session.push_tool_result(format!(
                                "Function {} returned: {}",
                                call.name, payload
                            ));
                        }
                        ActionOutcome::Error(message) => {
                            // Fail fast: the failure is reported to the user
                            // and does not enter history for a blind retry.
                            info!(session = %session.id(), action = %call.name, %message, "action failed, ending turn");
                            return Ok(TurnReply::ActionFailed(format!(
                                "An error occurred: {message}"
                            )));
                        }
                    }
                }
            }
        }
    }

    /// Settle a captured purchase against the user's confirmation text.
    async fn settle_confirmation(
        &self,
        pending: PendingConfirmation,
        user_text: &str,
    ) -> Result<TurnReply> {
        if !user_text.eq_ignore_ascii_case(CONFIRM_KEYWORD) {
            info!(action = %pending.action, "purchase cancelled by user");
            return Ok(TurnReply::Cancelled("Purchase cancelled.".to_string()));
        }

        // Fail safe: a captured name that no longer resolves is treated as a
        // cancellation rather than an execution attempt.
        let Some(kind) = ActionKind::resolve(&pending.action) else {
            warn!(action = %pending.action, "pending action not in registry, discarding");
            return Ok(TurnReply::Cancelled(
                "Purchase cancelled: the pending request is no longer valid.".to_string(),
            ));
        };

        self.emit(TurnEvent::ActionStarted {
            name: pending.action.clone(),
            args: pending.args.clone(),
        });

        match self.executor.invoke(kind, &pending.args).await {
            ActionOutcome::Success(payload) => {
                self.emit(TurnEvent::ActionCompleted {
                    name: pending.action.clone(),
                });
                Ok(TurnReply::Assistant(format!(
                    "Ticket purchased successfully: {payload}"
                )))
            }
            ActionOutcome::Error(message) => Ok(TurnReply::ActionFailed(format!(
                "An error occurred: {message}"
            ))),
        }
    }

    /// Invoke the model with the full history and drain the stream.
    ///
    /// The accumulated text is handed to the parser only after the model
    /// signals completion; a cut-off stream fails the turn instead.
    async fn invoke_model(&self, session: &Session) -> Result<String> {
        let mut request = ChatRequest::new(session.history().to_vec());
        if let Some(temperature) = self.config.temperature {
            request = request.with_temperature(temperature);
        }
        if let Some(max_tokens) = self.config.max_tokens {
            request = request.with_max_tokens(max_tokens);
        }

        let stream = self.model.stream(request).await?;
        stream.collect_text().await
    }

    fn emit(&self, event: TurnEvent) {
        debug!(?event, "turn event");
        if let Some(sink) = &self.events {
            sink(event);
        }
    }
}
