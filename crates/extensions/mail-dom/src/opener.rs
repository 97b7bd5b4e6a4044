//! Reply/compose opener.
//!
//! ```text
//! NoEditorOpen ──editor already present──────────────▶ EditorReady
//!      │
//!      └─click reply/compose──▶ AwaitingEditor ──found─▶ EditorReady
//!                                     │
//!                                     └──timeout/cancel─▶ OpenFailed
//! ```
//!
//! After the click the locator is polled once per interval until the host
//! page has rendered an editor, bounded by both elapsed time and attempts.

use std::fmt;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::dom::ElementRef;
use crate::locator::{EditorLocator, Located};
use crate::page::{Page, ProviderIdentity};
use crate::probes::ProbeKind;

/// Default upper bound on waiting for an editor to appear.
pub const DEFAULT_OPEN_TIMEOUT: Duration = Duration::from_secs(8);

/// Default poll interval, about one animation frame.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(16);

/// How long and how often to poll for the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    pub timeout: Duration,
    pub interval: Duration,
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_OPEN_TIMEOUT,
            interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl WaitPolicy {
    pub fn new(timeout: Duration, interval: Duration) -> Self {
        Self { timeout, interval }
    }

    /// `ceil(timeout / interval)`, at least one.
    pub fn max_attempts(&self) -> u32 {
        let interval = self.interval.as_nanos().max(1);
        let attempts = self.timeout.as_nanos().div_ceil(interval);
        u32::try_from(attempts).unwrap_or(u32::MAX).max(1)
    }
}

/// Which control the opener activated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AffordanceKind {
    Reply,
    Compose,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenerState {
    NoEditorOpen,
    AwaitingEditor,
    EditorReady,
    OpenFailed,
}

impl fmt::Display for OpenerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NoEditorOpen => "no_editor_open",
            Self::AwaitingEditor => "awaiting_editor",
            Self::EditorReady => "editor_ready",
            Self::OpenFailed => "open_failed",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OpenError {
    #[error("page is not a recognized webmail provider")]
    UnrecognizedProvider,

    #[error("no reply or compose control found for {0}")]
    NoAffordance(ProviderIdentity),

    #[error("editor did not appear within {waited:?} ({attempts} attempts)")]
    Timeout { waited: Duration, attempts: u32 },

    #[error("cancelled while waiting for the editor")]
    Cancelled,
}

/// An editor is ready to receive text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opened {
    pub located: Located,
    /// Control clicked to get here; `None` when an editor was already open.
    pub affordance: Option<AffordanceKind>,
    /// Locator polls after the click.
    pub attempts: u32,
}

/// Makes the host page open an editor and waits for it.
#[derive(Debug, Clone)]
pub struct ReplyOpener {
    locator: EditorLocator,
    policy: WaitPolicy,
}

impl ReplyOpener {
    pub fn new(locator: EditorLocator, policy: WaitPolicy) -> Self {
        Self { locator, policy }
    }

    pub fn policy(&self) -> WaitPolicy {
        self.policy
    }

    pub async fn open(&self, page: &Page) -> Result<Opened, OpenError> {
        self.open_with_cancel(page, &CancellationToken::new()).await
    }

    /// Like [`open`](Self::open), aborting with [`OpenError::Cancelled`] as
    /// soon as `cancel` fires.
    pub async fn open_with_cancel(&self, page: &Page, cancel: &CancellationToken) -> Result<Opened, OpenError> {
        let provider = page.provider();
        let mut state = OpenerState::NoEditorOpen;

        if let Ok(located) = page.read(|doc| self.locator.locate(doc, provider)) {
            transition(&mut state, OpenerState::EditorReady);
            return Ok(Opened {
                located,
                affordance: None,
                attempts: 0,
            });
        }

        let (target, affordance) = match self.find_affordance(page, provider) {
            Ok(found) => found,
            Err(e) => {
                transition(&mut state, OpenerState::OpenFailed);
                warn!(%provider, error = %e, "Cannot open an editor");
                return Err(e);
            }
        };
        if let Err(e) = click_affordance(page, provider, target, affordance) {
            transition(&mut state, OpenerState::OpenFailed);
            return Err(e);
        }
        transition(&mut state, OpenerState::AwaitingEditor);

        match self.wait_for_editor(page, provider, cancel).await {
            Ok((located, attempts)) => {
                transition(&mut state, OpenerState::EditorReady);
                info!(%provider, ?affordance, attempts, probe = %located.probe, "Editor opened");
                Ok(Opened {
                    located,
                    affordance: Some(affordance),
                    attempts,
                })
            }
            Err(e) => {
                transition(&mut state, OpenerState::OpenFailed);
                warn!(%provider, error = %e, "Editor did not open");
                Err(e)
            }
        }
    }

    /// A visible reply control, else any compose control. Unknown providers
    /// only have the generic probes, if any were configured.
    fn find_affordance(&self, page: &Page, provider: ProviderIdentity) -> Result<(ElementRef, AffordanceKind), OpenError> {
        page.read(|doc| {
            if let Some((node, probe)) = self.locator.find_affordance(doc, provider, ProbeKind::Reply, true) {
                debug!(%probe, "Using reply control");
                return Ok((ElementRef::top(node), AffordanceKind::Reply));
            }
            if let Some((node, probe)) = self.locator.find_affordance(doc, provider, ProbeKind::Compose, false) {
                debug!(%probe, "Using compose control");
                return Ok((ElementRef::top(node), AffordanceKind::Compose));
            }
            Err(if provider.is_known() {
                OpenError::NoAffordance(provider)
            } else {
                OpenError::UnrecognizedProvider
            })
        })
    }

    async fn wait_for_editor(
        &self,
        page: &Page,
        provider: ProviderIdentity,
        cancel: &CancellationToken,
    ) -> Result<(Located, u32), OpenError> {
        let start = Instant::now();
        let max_attempts = self.policy.max_attempts();
        let mut attempts = 0;

        while attempts < max_attempts && start.elapsed() < self.policy.timeout {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(OpenError::Cancelled),
                _ = tokio::time::sleep(self.policy.interval) => {}
            }
            attempts += 1;
            if let Ok(located) = page.read(|doc| self.locator.locate(doc, provider)) {
                return Ok((located, attempts));
            }
        }

        Err(OpenError::Timeout {
            waited: start.elapsed(),
            attempts,
        })
    }
}

/// A control that is gone by the time the click is dispatched counts as no
/// control at all; there is nothing to wait for.
fn click_affordance(
    page: &Page,
    provider: ProviderIdentity,
    target: ElementRef,
    affordance: AffordanceKind,
) -> Result<(), OpenError> {
    if page.click(target) {
        return Ok(());
    }
    warn!(%provider, ?affordance, "Control detached before the click");
    Err(OpenError::NoAffordance(provider))
}

fn transition(state: &mut OpenerState, next: OpenerState) {
    debug!(from = %state, to = %next, "Opener state");
    *state = next;
}

#[cfg(test)]
#[path = "opener_tests.rs"]
mod tests;
