/// Conversation core - Gateway
///
/// Data model, the pure transcript reducer, the transport seam and the
/// controller that ties them to a session.

mod client;
mod controller;
mod transcript;
mod types;

pub use client::{ChatTransport, HttpChatClient};
pub use controller::{ConversationController, PendingSend, Phase, SendOutcome, SendState};
pub use transcript::{reduce, Event, Transcript};
pub use types::{Button, ChatReply, Message, Metadata, OutboundRequest, Role, SendError};
