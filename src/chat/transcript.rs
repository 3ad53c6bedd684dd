//! Transcript state and the pure reducer that grows it.

use serde::Serialize;

use super::types::{Button, ChatReply, Message, SendError};
use crate::constants::{
    GREETING_BUTTONS, GREETING_TEXT, SERVER_ERROR_FALLBACK, TRANSPORT_ERROR_TEXT,
};

/// Ordered, append-only record of every rendered turn
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Every button in the transcript, in display order
    pub fn buttons(&self) -> Vec<&Button> {
        self.messages
            .iter()
            .flat_map(|m| m.affordances.iter())
            .collect()
    }

    /// Buttons of the newest message that has any
    pub fn latest_buttons(&self) -> &[Button] {
        self.messages
            .iter()
            .rev()
            .find(|m| !m.affordances.is_empty())
            .map(|m| m.affordances.as_slice())
            .unwrap_or(&[])
    }
}

/// Something that happened to the conversation
#[derive(Debug, Clone)]
pub enum Event {
    /// Startup greeting with the main menu
    Greeted,
    /// Local echo of trimmed user text
    UserSubmitted(String),
    ReplyReceived(ChatReply),
    ServerRejected { detail: Option<String> },
    /// Request could not complete, or its body was unusable
    TransportFailed,
}

impl From<Result<ChatReply, SendError>> for Event {
    fn from(result: Result<ChatReply, SendError>) -> Self {
        match result {
            Ok(reply) => Event::ReplyReceived(reply),
            Err(SendError::Server { detail, .. }) => Event::ServerRejected { detail },
            Err(SendError::Transport(_)) | Err(SendError::MalformedReply(_)) => {
                Event::TransportFailed
            }
        }
    }
}

/// Apply one event. Every event appends exactly one message.
pub fn reduce(mut transcript: Transcript, event: Event) -> Transcript {
    let message = match event {
        Event::Greeted => Message::bot(GREETING_TEXT)
            .with_affordances(GREETING_BUTTONS.iter().map(|label| Button::new(*label)).collect()),
        Event::UserSubmitted(text) => Message::user(text),
        Event::ReplyReceived(reply) => {
            let metadata = reply.metadata();
            Message::bot(reply.reply).with_metadata(metadata)
        }
        Event::ServerRejected { detail } => Message::bot(
            detail
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| SERVER_ERROR_FALLBACK.to_string()),
        ),
        Event::TransportFailed => Message::bot(TRANSPORT_ERROR_TEXT),
    };
    transcript.messages.push(message);
    transcript
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::Role;
    use serde_json::json;

    #[test]
    fn test_greeting_has_two_buttons() {
        let transcript = reduce(Transcript::new(), Event::Greeted);
        let greeting = &transcript.messages()[0];
        assert_eq!(greeting.role, Role::Bot);
        assert_eq!(greeting.text, GREETING_TEXT);
        let labels: Vec<_> = greeting.affordances.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["Billing", "Outage Assist"]);
    }

    #[test]
    fn test_each_event_appends_one() {
        let events = vec![
            Event::Greeted,
            Event::UserSubmitted("hi".to_string()),
            Event::ReplyReceived(ChatReply::new("hello")),
            Event::ServerRejected { detail: None },
            Event::TransportFailed,
        ];
        let mut transcript = Transcript::new();
        for (i, event) in events.into_iter().enumerate() {
            transcript = reduce(transcript, event);
            assert_eq!(transcript.len(), i + 1);
        }
    }

    #[test]
    fn test_server_detail_or_fallback() {
        let t = reduce(
            Transcript::new(),
            Event::ServerRejected {
                detail: Some("Account not found".to_string()),
            },
        );
        assert_eq!(t.last().unwrap().text, "Account not found");

        let t = reduce(t, Event::ServerRejected { detail: None });
        assert_eq!(t.last().unwrap().text, "Error");

        let t = reduce(t, Event::ServerRejected { detail: Some(String::new()) });
        assert_eq!(t.last().unwrap().text, "Error");
    }

    #[test]
    fn test_reply_carries_metadata() {
        let reply = ChatReply::from_value(&json!({"reply": "Sure", "ticket_id": "T-1"})).unwrap();
        let t = reduce(Transcript::new(), Event::ReplyReceived(reply));
        let msg = t.last().unwrap();
        assert_eq!(msg.text, "Sure");
        assert_eq!(msg.metadata.get("ticket"), Some(&json!("T-1")));
        assert!(msg.affordances.is_empty());
    }

    #[test]
    fn test_result_to_event() {
        assert!(matches!(
            Event::from(Err(SendError::Transport("refused".into()))),
            Event::TransportFailed
        ));
        assert!(matches!(
            Event::from(Err(SendError::MalformedReply("no reply".into()))),
            Event::TransportFailed
        ));
        assert!(matches!(
            Event::from(Err(SendError::Server { status: 404, detail: None })),
            Event::ServerRejected { detail: None }
        ));
    }

    #[test]
    fn test_latest_buttons() {
        let t = reduce(Transcript::new(), Event::Greeted);
        let t = reduce(t, Event::UserSubmitted("x".into()));
        assert_eq!(t.latest_buttons().len(), 2);
        assert_eq!(t.buttons().len(), 2);
    }
}
