use anyhow::Result;
use serde::Serialize;

use crate::{
    chat::{ConversationController, Role, SendState, Transcript},
    cli::OutputFormat,
    render::{render_message_plain, render_transcript_html},
};

/// Result of a non-interactive run
#[derive(Debug, Serialize)]
pub struct NonInteractiveResult {
    /// Session the message was sent under
    pub session_id: String,
    /// Whether the reply was a success payload
    pub ok: bool,
    /// Greeting, echo and reply
    pub transcript: Transcript,
}

/// Non-interactive runner for sending a single message
pub struct NonInteractiveRunner {
    controller: ConversationController,
    show_metadata: bool,
}

impl NonInteractiveRunner {
    pub fn new(controller: ConversationController, show_metadata: bool) -> Self {
        Self {
            controller,
            show_metadata,
        }
    }

    /// Initialize the conversation and send the prompt
    pub async fn execute(&mut self, prompt: String) -> Result<NonInteractiveResult> {
        let session_id = self.controller.initialize();

        let state = self
            .controller
            .send(&prompt)
            .await
            .ok_or_else(|| anyhow::anyhow!("Nothing to send: the prompt is blank"))?;

        Ok(NonInteractiveResult {
            session_id: session_id.to_string(),
            ok: state == SendState::RenderedSuccess,
            transcript: self.controller.transcript().clone(),
        })
    }

    /// Format the result for stdout
    pub fn format_result(&self, result: &NonInteractiveResult, format: OutputFormat) -> String {
        match format {
            OutputFormat::Text => result
                .transcript
                .messages()
                .iter()
                .rev()
                .find(|m| m.role == Role::Bot)
                .map(|m| render_message_plain(m, self.show_metadata))
                .unwrap_or_default(),
            OutputFormat::Json => serde_json::to_string_pretty(result)
                .unwrap_or_else(|e| format!("{{\"error\": \"Failed to serialize result: {}\"}}", e)),
            OutputFormat::Html => render_transcript_html(&result.transcript, &result.session_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::{ChatReply, ChatTransport, OutboundRequest, SendError};
    use crate::session::{MemorySessionStore, SessionManager};
    use async_trait::async_trait;
    use std::sync::Arc;

    struct Echo;

    #[async_trait]
    impl ChatTransport for Echo {
        async fn post_chat(&self, request: &OutboundRequest) -> Result<ChatReply, SendError> {
            if request.text == "fail" {
                return Err(SendError::Server {
                    status: 400,
                    detail: Some("Empty message.".to_string()),
                });
            }
            Ok(ChatReply::new(format!("echo: {}", request.text)))
        }
    }

    fn runner() -> NonInteractiveRunner {
        let session = SessionManager::new(Box::new(MemorySessionStore::with_value("s-fixed")));
        NonInteractiveRunner::new(ConversationController::new(session, Arc::new(Echo)), false)
    }

    #[tokio::test]
    async fn test_execute_success() {
        let mut runner = runner();
        let result = runner.execute("hello".to_string()).await.unwrap();
        assert!(result.ok);
        assert_eq!(result.session_id, "s-fixed");
        // greeting + echo + reply
        assert_eq!(result.transcript.len(), 3);

        colored::control::set_override(false);
        assert_eq!(runner.format_result(&result, OutputFormat::Text), "Natlang: echo: hello");

        let json: serde_json::Value =
            serde_json::from_str(&runner.format_result(&result, OutputFormat::Json)).unwrap();
        assert_eq!(json["transcript"][2]["text"], "echo: hello");
        assert_eq!(json["transcript"][1]["role"], "user");
    }

    #[tokio::test]
    async fn test_execute_server_error() {
        let mut runner = runner();
        let result = runner.execute("fail".to_string()).await.unwrap();
        assert!(!result.ok);
        let html = runner.format_result(&result, OutputFormat::Html);
        assert!(html.contains("Empty message."));
    }

    #[tokio::test]
    async fn test_blank_prompt_is_an_error() {
        let mut runner = runner();
        assert!(runner.execute("   ".to_string()).await.is_err());
    }
}
