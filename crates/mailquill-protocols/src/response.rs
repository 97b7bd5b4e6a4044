//! Outbound results returned to the controlling UI.

use serde::{Deserialize, Serialize};

/// Terminal outcome category of an insertion-style operation.
///
/// Each failure cause is a separate kind so the UI can tell "no editor",
/// "editor never appeared" and "generation failed" apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    Inserted,
    EditorNotFound,
    NoAffordance,
    UnrecognizedProvider,
    Timeout,
    Cancelled,
    InjectionFailed,
    GenerationFailed,
}

impl StatusKind {
    pub fn is_success(self) -> bool {
        matches!(self, Self::Inserted)
    }
}

/// Insertion result with a short human-readable status line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertionStatus {
    #[serde(default)]
    pub ok: bool,
    pub kind: StatusKind,
    pub status: String,
}

impl InsertionStatus {
    pub fn new(kind: StatusKind, status: impl Into<String>) -> Self {
        Self {
            ok: kind.is_success(),
            kind,
            status: status.into(),
        }
    }

    pub fn inserted() -> Self {
        Self::new(StatusKind::Inserted, "Inserted into compose area.")
    }

    pub fn is_success(&self) -> bool {
        self.kind.is_success()
    }
}

/// Response to a [`ContentRequest`](crate::ContentRequest).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContentResponse {
    Insertion(InsertionStatus),
    ThreadText {
        #[serde(rename = "emailText")]
        email_text: String,
    },
    Error {
        error: String,
    },
}

impl ContentResponse {
    pub fn thread_text(text: impl Into<String>) -> Self {
        Self::ThreadText {
            email_text: text.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            error: message.into(),
        }
    }

    /// The insertion status, if this is an insertion response.
    pub fn insertion(&self) -> Option<&InsertionStatus> {
        match self {
            Self::Insertion(status) => Some(status),
            _ => None,
        }
    }
}

impl From<InsertionStatus> for ContentResponse {
    fn from(status: InsertionStatus) -> Self {
        Self::Insertion(status)
    }
}

/// A response plus the correlation ID of the request it answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,

    #[serde(flatten)]
    pub response: ContentResponse,
}

#[cfg(test)]
#[path = "response_tests.rs"]
mod tests;
