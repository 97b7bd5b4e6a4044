//! JSON-lines request channel.
//!
//! One [`RequestEnvelope`] per input line, one [`ResponseEnvelope`] per output
//! line, answered in order.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

use mailquill_dom::ContentAgent;
use mailquill_protocols::{ChannelError, ContentResponse, RequestEnvelope, ResponseEnvelope};

/// Best-effort correlation ID of a line that failed to decode.
fn salvage_id(line: &str) -> Option<u64> {
    serde_json::from_str::<serde_json::Value>(line)
        .ok()
        .and_then(|value| value.get("id")?.as_u64())
}

async fn respond(agent: &ContentAgent, line: &str) -> ResponseEnvelope {
    match serde_json::from_str::<RequestEnvelope>(line) {
        Ok(envelope) => {
            debug!(id = ?envelope.id, action = envelope.request.action(), "Request received");
            ResponseEnvelope {
                id: envelope.id,
                response: agent.handle(envelope.request).await,
            }
        }
        Err(e) => {
            let e = ChannelError::from(e);
            warn!(error = %e, "Rejecting request");
            ResponseEnvelope {
                id: salvage_id(line),
                response: ContentResponse::error(e.to_string()),
            }
        }
    }
}

/// Serve requests until the input ends. Returns the number of requests
/// answered.
pub(crate) async fn serve<R, W>(agent: &ContentAgent, input: R, mut output: W) -> Result<usize, ChannelError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    let mut answered = 0;

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let envelope = respond(agent, line).await;
        let mut encoded = serde_json::to_string(&envelope)?;
        encoded.push('\n');
        output.write_all(encoded.as_bytes()).await?;
        output.flush().await?;
        answered += 1;
    }

    info!(answered, "Request channel closed");
    Ok(answered)
}

#[cfg(test)]
#[path = "channel_tests.rs"]
mod tests;
