//! Page-side request handler.

use std::sync::Arc;

use mailquill_protocols::{ContentRequest, ContentResponse, InsertionStatus, StatusKind};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::injector::{InjectError, InsertionRequest, TextInjector};
use crate::locator::{EditableSurface, EditorLocator};
use crate::opener::{OpenError, ReplyOpener, WaitPolicy};
use crate::page::Page;
use crate::probes::ProbeTable;
use crate::reader::ThreadReader;

pub const STATUS_EDITOR_NOT_FOUND: &str = "Could not find a compose area on this page.";
pub const STATUS_UNRECOGNIZED_PROVIDER: &str =
    "This page is not a supported webmail provider and no editor is open.";
pub const STATUS_NO_AFFORDANCE: &str = "No reply or compose button found on this page.";
pub const STATUS_TIMEOUT: &str = "Timed out waiting for the reply editor to open.";
pub const STATUS_CANCELLED: &str = "Cancelled before the editor opened.";

/// Serves the content operations against one page.
#[derive(Debug, Clone)]
pub struct ContentAgent {
    page: Page,
    locator: EditorLocator,
    injector: TextInjector,
    opener: ReplyOpener,
    reader: ThreadReader,
}

impl ContentAgent {
    pub fn new(page: Page, probes: Arc<ProbeTable>, policy: WaitPolicy) -> Self {
        let locator = EditorLocator::new(probes.clone());
        Self {
            page,
            opener: ReplyOpener::new(locator.clone(), policy),
            locator,
            injector: TextInjector::new(),
            reader: ThreadReader::new(probes),
        }
    }

    /// Agent with the built-in probes and default wait policy.
    pub fn with_defaults(page: Page) -> Self {
        Self::new(page, Arc::new(ProbeTable::builtin()), WaitPolicy::default())
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub async fn handle(&self, request: ContentRequest) -> ContentResponse {
        match request {
            ContentRequest::InsertText { text } => self.insert_text(&text).into(),
            ContentRequest::GetIncomingThreadText => ContentResponse::thread_text(self.incoming_thread_text()),
            ContentRequest::OpenReplyOrComposeAndInsert { text } => self.open_and_insert(&text).await.into(),
        }
    }

    /// Insert into the editor that is already open. Makes no change when no
    /// editor is found.
    pub fn insert_text(&self, text: &str) -> InsertionStatus {
        let provider = self.page.provider();
        let request = InsertionRequest::new(text);
        let status = self.page.write(|doc| match self.locator.locate(doc, provider) {
            Ok(located) => injection_status(self.injector.inject(doc, &located.surface, &request)),
            Err(e) => {
                warn!(%provider, error = %e, "Insert failed");
                InsertionStatus::new(StatusKind::EditorNotFound, STATUS_EDITOR_NOT_FOUND)
            }
        });
        info!(%provider, kind = ?status.kind, "insert_text finished");
        status
    }

    pub fn incoming_thread_text(&self) -> String {
        let provider = self.page.provider();
        let text = self.page.read(|doc| self.reader.read(doc, provider));
        info!(%provider, chars = text.chars().count(), "get_incoming_thread_text finished");
        text
    }

    pub async fn open_and_insert(&self, text: &str) -> InsertionStatus {
        self.open_and_insert_with_cancel(text, &CancellationToken::new()).await
    }

    /// Open an editor if none is open, then insert. Nothing is inserted when
    /// opening fails.
    pub async fn open_and_insert_with_cancel(&self, text: &str, cancel: &CancellationToken) -> InsertionStatus {
        let provider = self.page.provider();
        let status = match self.opener.open_with_cancel(&self.page, cancel).await {
            Ok(opened) => self.inject_into(&opened.located.surface, text),
            Err(e) => open_failure_status(&e),
        };
        info!(%provider, kind = ?status.kind, "open_reply_or_compose_and_insert finished");
        status
    }

    fn inject_into(&self, surface: &EditableSurface, text: &str) -> InsertionStatus {
        let request = InsertionRequest::new(text);
        self.page
            .write(|doc| injection_status(self.injector.inject(doc, surface, &request)))
    }
}

fn injection_status<T>(result: Result<T, InjectError>) -> InsertionStatus {
    match result {
        Ok(_) => InsertionStatus::inserted(),
        Err(e) => {
            warn!(error = %e, "Injection failed");
            InsertionStatus::new(
                StatusKind::InjectionFailed,
                format!("Found an editor but could not insert the text: {e}."),
            )
        }
    }
}

fn open_failure_status(err: &OpenError) -> InsertionStatus {
    match err {
        OpenError::UnrecognizedProvider => {
            InsertionStatus::new(StatusKind::UnrecognizedProvider, STATUS_UNRECOGNIZED_PROVIDER)
        }
        OpenError::NoAffordance(_) => InsertionStatus::new(StatusKind::NoAffordance, STATUS_NO_AFFORDANCE),
        OpenError::Timeout { .. } => InsertionStatus::new(StatusKind::Timeout, STATUS_TIMEOUT),
        OpenError::Cancelled => InsertionStatus::new(StatusKind::Cancelled, STATUS_CANCELLED),
    }
}

#[cfg(test)]
#[path = "agent_tests.rs"]
mod tests;
