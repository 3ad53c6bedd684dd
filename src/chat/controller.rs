//! ConversationController - owns the transcript and the request/response cycle.

use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::client::ChatTransport;
use super::transcript::{reduce, Event, Transcript};
use super::types::{Button, ChatReply, OutboundRequest, SendError};
use crate::session::{SessionId, SessionManager};

/// Whether any request is outstanding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Sending { in_flight: usize },
}

/// How a completed send was rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendState {
    RenderedSuccess,
    RenderedError,
}

/// A request that has been echoed locally and is ready to go out.
///
/// Holds no reference to the controller, so it can run on another task while
/// the controller keeps handling input.
pub struct PendingSend {
    request: OutboundRequest,
    transport: Arc<dyn ChatTransport>,
}

impl PendingSend {
    pub fn request(&self) -> &OutboundRequest {
        &self.request
    }

    /// Perform the network exchange. Failures are logged here, out-of-band.
    pub async fn dispatch(self) -> SendOutcome {
        let result = self.transport.post_chat(&self.request).await;
        match &result {
            Ok(_) => info!(session_id = %self.request.session_id, "reply received"),
            Err(e @ SendError::Server { .. }) => {
                warn!(session_id = %self.request.session_id, error = %e, "chat request rejected")
            }
            Err(e) => {
                error!(session_id = %self.request.session_id, error = %e, "chat request failed")
            }
        }
        SendOutcome {
            request: self.request,
            result,
        }
    }
}

/// Result of one dispatched send, waiting to be applied
#[derive(Debug)]
pub struct SendOutcome {
    pub request: OutboundRequest,
    pub result: Result<ChatReply, SendError>,
}

/// Drives the conversation: local echo, request, reply rendering
pub struct ConversationController {
    session: SessionManager,
    transport: Arc<dyn ChatTransport>,
    transcript: Transcript,
    input: String,
    account: String,
    in_flight: usize,
}

impl ConversationController {
    pub fn new(session: SessionManager, transport: Arc<dyn ChatTransport>) -> Self {
        Self {
            session,
            transport,
            transcript: Transcript::new(),
            input: String::new(),
            account: String::new(),
            in_flight: 0,
        }
    }

    /// Resolve the session and show the greeting. Run once at startup.
    pub fn initialize(&mut self) -> SessionId {
        let session_id = self.session.resolve();
        info!(%session_id, "conversation started");
        self.apply(Event::Greeted);
        session_id
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn phase(&self) -> Phase {
        if self.in_flight == 0 {
            Phase::Idle
        } else {
            Phase::Sending {
                in_flight: self.in_flight,
            }
        }
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut SessionManager {
        &mut self.session
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut String {
        &mut self.input
    }

    pub fn account(&self) -> &str {
        &self.account
    }

    pub fn account_mut(&mut self) -> &mut String {
        &mut self.account
    }

    pub fn set_account(&mut self, account: impl Into<String>) {
        self.account = account.into();
    }

    /// Send text and wait for the reply to be rendered.
    ///
    /// Returns `None` for blank input, which leaves everything untouched.
    pub async fn send(&mut self, raw: &str) -> Option<SendState> {
        let pending = self.begin(raw)?;
        let outcome = pending.dispatch().await;
        Some(self.complete(outcome))
    }

    /// Submit whatever is in the input buffer
    pub fn submit(&mut self) -> Option<PendingSend> {
        let raw = std::mem::take(&mut self.input);
        let pending = self.begin(&raw);
        if pending.is_none() {
            // Blank input is a no-op, including for the buffer
            self.input = raw;
        }
        pending
    }

    /// Same as typing the button's value and submitting it
    pub fn activate(&mut self, button: &Button) -> Option<PendingSend> {
        self.input = button.submit_value().to_string();
        self.submit()
    }

    /// Echo the text, resolve identifiers and build the request.
    pub fn begin(&mut self, raw: &str) -> Option<PendingSend> {
        let text = raw.trim();
        if text.is_empty() {
            return None;
        }

        self.apply(Event::UserSubmitted(text.to_string()));
        self.input.clear();

        let session_id = self.session.resolve();
        let account = self.account.trim();
        let request = OutboundRequest {
            session_id: session_id.into(),
            text: text.to_string(),
            account_number: (!account.is_empty()).then(|| account.to_string()),
        };

        self.in_flight += 1;
        Some(PendingSend {
            request,
            transport: Arc::clone(&self.transport),
        })
    }

    /// Render the outcome of a dispatched send
    pub fn complete(&mut self, outcome: SendOutcome) -> SendState {
        self.in_flight = self.in_flight.saturating_sub(1);
        // Replies may land out of send order; tie each one to its request
        debug!(
            session_id = %outcome.request.session_id,
            text = %outcome.request.text,
            in_flight = self.in_flight,
            "applying reply"
        );
        let state = if outcome.result.is_ok() {
            SendState::RenderedSuccess
        } else {
            SendState::RenderedError
        };
        self.apply(Event::from(outcome.result));
        state
    }

    fn apply(&mut self, event: Event) {
        self.transcript = reduce(std::mem::take(&mut self.transcript), event);
    }
}
