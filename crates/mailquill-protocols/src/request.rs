//! Inbound operations carried from the controlling UI to the page.

use serde::{Deserialize, Serialize};

/// One-shot operation requested of the page-side engine.
///
/// Wire form is internally tagged by `action`. The action names used by the
/// first browser-extension release are accepted as aliases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ContentRequest {
    /// Insert text into an already-open editor.
    #[serde(alias = "insert_email_text")]
    InsertText {
        #[serde(default)]
        text: String,
    },

    /// Read the visible text of the displayed thread.
    #[serde(alias = "get_incoming_email")]
    GetIncomingThreadText,

    /// Open a reply (or new message) if needed, wait for it, then insert.
    OpenReplyOrComposeAndInsert {
        #[serde(default)]
        text: String,
    },
}

impl ContentRequest {
    /// Action name as it appears on the wire.
    pub fn action(&self) -> &'static str {
        match self {
            Self::InsertText { .. } => "insert_text",
            Self::GetIncomingThreadText => "get_incoming_thread_text",
            Self::OpenReplyOrComposeAndInsert { .. } => "open_reply_or_compose_and_insert",
        }
    }
}

/// A request plus the optional correlation ID echoed in its response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestEnvelope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,

    #[serde(flatten)]
    pub request: ContentRequest,
}

impl RequestEnvelope {
    pub fn new(request: ContentRequest) -> Self {
        Self { id: None, request }
    }

    pub fn with_id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
