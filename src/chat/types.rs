use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::constants::{META_CORRELATION_KEY, META_TICKET_KEY};

/// Who produced a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Bot,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Bot => "bot",
        }
    }
}

/// Quick-reply affordance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl Button {
    /// Button whose value is its label
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: None,
        }
    }

    pub fn with_value(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: Some(value.into()),
        }
    }

    /// Text submitted when the button is activated
    pub fn submit_value(&self) -> &str {
        self.value.as_deref().unwrap_or(&self.label)
    }
}

/// Auxiliary display data attached to a bot message
pub type Metadata = BTreeMap<String, Value>;

/// One conversational turn
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    pub role: Role,
    pub text: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub affordances: Vec<Button>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: Metadata,
    pub timestamp: DateTime<Local>,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text)
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self::new(Role::Bot, text)
    }

    fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            affordances: Vec::new(),
            metadata: Metadata::new(),
            timestamp: Local::now(),
        }
    }

    pub fn with_affordances(mut self, affordances: Vec<Button>) -> Self {
        self.affordances = affordances;
        self
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }
}

/// Body of `POST /chat`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundRequest {
    pub session_id: String,
    pub text: String,
    /// Serialized as `null` when absent
    pub account_number: Option<String>,
}

/// Successful `/chat` payload.
///
/// Only `reply` is required. Optional fields of the wrong JSON type are
/// dropped rather than failing the whole reply.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChatReply {
    pub reply: String,
    pub ticket_id: Option<String>,
    pub correlation_id: Option<String>,
    pub meta: Map<String, Value>,
}

impl ChatReply {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            ..Default::default()
        }
    }

    /// Lenient extraction from a parsed body. `None` when `reply` is missing.
    pub fn from_value(body: &Value) -> Option<Self> {
        let reply = body.get("reply")?.as_str()?.to_string();
        let string_field = |key: &str| {
            body.get(key)
                .and_then(Value::as_str)
                .map(str::to_string)
        };
        let meta = body
            .get("meta")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();

        Some(Self {
            reply,
            ticket_id: string_field("ticket_id"),
            correlation_id: string_field("correlation_id"),
            meta,
        })
    }

    /// Union of ticket, correlation id and every non-null `meta` field.
    ///
    /// `meta` entries are applied last and override the two named keys.
    pub fn metadata(&self) -> Metadata {
        let mut metadata = Metadata::new();
        if let Some(ticket) = &self.ticket_id {
            metadata.insert(META_TICKET_KEY.to_string(), Value::String(ticket.clone()));
        }
        if let Some(correlation) = &self.correlation_id {
            metadata.insert(
                META_CORRELATION_KEY.to_string(),
                Value::String(correlation.clone()),
            );
        }
        for (key, value) in &self.meta {
            if !value.is_null() {
                metadata.insert(key.clone(), value.clone());
            }
        }
        metadata
    }
}

/// Why a send did not produce a reply
#[derive(Error, Debug)]
pub enum SendError {
    /// The request never completed
    #[error("transport failure: {0}")]
    Transport(String),

    /// The server answered with a failure status
    #[error("server rejected request with status {status}")]
    Server { status: u16, detail: Option<String> },

    /// Success status, but the body was not a usable reply
    #[error("malformed reply: {0}")]
    MalformedReply(String),
}
