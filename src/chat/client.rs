use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use super::types::{ChatReply, OutboundRequest, SendError};
use crate::constants::{CHAT_PATH, HEALTH_PATH};
use crate::utils::NatlangError;

/// Seam between the controller and the remote chat service
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Submit one request and classify the outcome
    async fn post_chat(&self, request: &OutboundRequest) -> Result<ChatReply, SendError>;
}

/// HTTP implementation talking to `{api_base}/chat`
pub struct HttpChatClient {
    client: Client,
    api_base: String,
}

impl HttpChatClient {
    /// Build a client. No timeout is set here; the transport default applies.
    pub fn new(api_base: impl Into<String>) -> Result<Self, NatlangError> {
        let api_base = api_base.into().trim_end_matches('/').to_string();
        Ok(Self {
            client: Client::builder().build()?,
            api_base,
        })
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Probe `/healthz` and return its JSON body
    pub async fn health(&self) -> Result<Value, NatlangError> {
        let url = format!("{}{}", self.api_base, HEALTH_PATH);
        let body = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json::<Value>()
            .await?;
        Ok(body)
    }
}

#[async_trait]
impl ChatTransport for HttpChatClient {
    async fn post_chat(&self, request: &OutboundRequest) -> Result<ChatReply, SendError> {
        let url = format!("{}{}", self.api_base, CHAT_PATH);
        debug!(%url, session_id = %request.session_id, "posting chat request");

        // `.json` declares the JSON content type
        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| SendError::Transport(format!("{} ({})", e, url)))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| SendError::Transport(e.to_string()))?;
        let body: Option<Value> = serde_json::from_slice(&bytes).ok();

        if !status.is_success() {
            let detail = body
                .as_ref()
                .and_then(|b| b.get("detail"))
                .and_then(Value::as_str)
                .map(str::to_string);
            return Err(SendError::Server {
                status: status.as_u16(),
                detail,
            });
        }

        let body = body.ok_or_else(|| {
            SendError::MalformedReply(format!("status {} with non-JSON body", status.as_u16()))
        })?;
        ChatReply::from_value(&body).ok_or_else(|| {
            SendError::MalformedReply("response has no string `reply` field".to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request(text: &str) -> OutboundRequest {
        OutboundRequest {
            session_id: "s-test".to_string(),
            text: text.to_string(),
            account_number: None,
        }
    }

    #[tokio::test]
    async fn test_success_reply() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({
                "session_id": "s-test",
                "text": "I need help",
                "account_number": null
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "reply": "Sure, what's wrong?",
                "ticket_id": "T-1"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpChatClient::new(server.uri()).unwrap();
        let reply = client.post_chat(&request("I need help")).await.unwrap();
        assert_eq!(reply.reply, "Sure, what's wrong?");
        assert_eq!(reply.ticket_id.as_deref(), Some("T-1"));
    }

    #[tokio::test]
    async fn test_error_status_with_detail() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({"detail": "Account not found"})),
            )
            .mount(&server)
            .await;

        let client = HttpChatClient::new(server.uri()).unwrap();
        match client.post_chat(&request("hi")).await {
            Err(SendError::Server { status, detail }) => {
                assert_eq!(status, 404);
                assert_eq!(detail.as_deref(), Some("Account not found"));
            }
            other => panic!("Expected server error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_error_status_without_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(ResponseTemplate::new(500).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let client = HttpChatClient::new(server.uri()).unwrap();
        assert!(matches!(
            client.post_chat(&request("hi")).await,
            Err(SendError::Server { status: 500, detail: None })
        ));
    }

    #[tokio::test]
    async fn test_success_without_reply_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"meta": {}})))
            .mount(&server)
            .await;

        let client = HttpChatClient::new(server.uri()).unwrap();
        assert!(matches!(
            client.post_chat(&request("hi")).await,
            Err(SendError::MalformedReply(_))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_failure() {
        // Port 1 is reserved and nothing listens there
        let client = HttpChatClient::new("http://127.0.0.1:1").unwrap();
        assert!(matches!(
            client.post_chat(&request("hi")).await,
            Err(SendError::Transport(_))
        ));
    }

    #[tokio::test]
    async fn test_health_probe() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/healthz"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"ok": true, "gemini_configured": false})),
            )
            .mount(&server)
            .await;

        let client = HttpChatClient::new(format!("{}/", server.uri())).unwrap();
        let body = client.health().await.unwrap();
        assert_eq!(body["ok"], json!(true));
    }
}
