//! Reply drafting: prompt building, generation and insertion.

use std::sync::Arc;

use clap::ValueEnum;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use mailquill_dom::ContentAgent;
use mailquill_protocols::{InsertionStatus, StatusKind, TextGenerator};

/// How the generation prompt is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum PromptMode {
    /// Reply to the thread with no extra instruction
    Auto,
    /// Reply to the thread following a correction instruction
    Correct,
    /// Use the instruction as the whole prompt
    Manual,
}

/// Reasons a reply stops before anything is inserted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum ReplyError {
    #[error("Please write a prompt for the AI.")]
    EmptyPrompt,

    #[error("Could not read an email thread on this page.")]
    NoThread,

    #[error("Nothing to insert; generate content first.")]
    NothingToInsert,
}

const REPLY_INSTRUCTION: &str = "Write a reply to the email thread below. Return only the body of the reply.";

/// Prompt for `mode`. `thread` is ignored in manual mode.
pub(crate) fn build_prompt(mode: PromptMode, thread: &str, instruction: Option<&str>) -> Result<String, ReplyError> {
    let thread = thread.trim();
    let instruction = instruction.map(str::trim).filter(|s| !s.is_empty());

    match mode {
        PromptMode::Manual => instruction.map(str::to_string).ok_or(ReplyError::EmptyPrompt),
        PromptMode::Auto | PromptMode::Correct if thread.is_empty() => Err(ReplyError::NoThread),
        PromptMode::Auto => Ok(format!("{REPLY_INSTRUCTION}\n\nThread:\n{thread}")),
        PromptMode::Correct => {
            let instruction = instruction.ok_or(ReplyError::EmptyPrompt)?;
            Ok(format!(
                "{REPLY_INSTRUCTION}\nFollow this instruction: {instruction}\n\nThread:\n{thread}"
            ))
        }
    }
}

/// Drives one page through read, prompt, generate and insert.
pub(crate) struct ReplyController {
    agent: ContentAgent,
    generator: Arc<dyn TextGenerator>,
}

impl ReplyController {
    pub fn new(agent: ContentAgent, generator: Arc<dyn TextGenerator>) -> Self {
        Self { agent, generator }
    }

    pub fn agent(&self) -> &ContentAgent {
        &self.agent
    }

    /// Build the prompt for `mode`, reading the thread when the mode needs it.
    pub fn prompt(&self, mode: PromptMode, instruction: Option<&str>) -> Result<String, ReplyError> {
        let thread = match mode {
            PromptMode::Manual => String::new(),
            PromptMode::Auto | PromptMode::Correct => self.agent.incoming_thread_text(),
        };
        build_prompt(mode, &thread, instruction)
    }

    /// Open an editor if needed and insert already generated text. Waiting
    /// for the editor stops when `cancel` fires.
    pub async fn insert(&self, text: &str, cancel: &CancellationToken) -> Result<InsertionStatus, ReplyError> {
        if text.trim().is_empty() {
            return Err(ReplyError::NothingToInsert);
        }
        Ok(self.agent.open_and_insert_with_cancel(text, cancel).await)
    }

    /// Full flow. Generation failures come back as a
    /// [`StatusKind::GenerationFailed`] status with the page untouched.
    pub async fn reply(
        &self,
        mode: PromptMode,
        instruction: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<InsertionStatus, ReplyError> {
        let prompt = self.prompt(mode, instruction)?;
        info!(?mode, generator = self.generator.id(), "Generating reply");

        let text = match self.generator.generate(&prompt).await {
            Ok(text) => text,
            Err(e) => {
                warn!(generator = self.generator.id(), error = %e, "Generation failed");
                return Ok(InsertionStatus::new(
                    StatusKind::GenerationFailed,
                    format!("Failed to generate: {e}."),
                ));
            }
        };

        self.insert(&text, cancel).await
    }
}

#[cfg(test)]
#[path = "compose_tests.rs"]
mod tests;
