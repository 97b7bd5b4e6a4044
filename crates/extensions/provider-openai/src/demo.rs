//! Fixed-text generator.

use async_trait::async_trait;
use mailquill_protocols::{GenerationError, TextGenerator};

/// Reply returned by [`DemoGenerator`].
pub const DEMO_REPLY: &str = "Hello,\n\nThanks for your message. I enjoyed our discussion last week and wanted to follow up about next steps. Please let me know a good time to connect.\n\nBest regards,\n[Your Name]";

/// Generator used when no API key is configured. Ignores the prompt.
#[derive(Debug, Clone, Copy, Default)]
pub struct DemoGenerator;

#[async_trait]
impl TextGenerator for DemoGenerator {
    fn id(&self) -> &str {
        "demo"
    }

    async fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
        Ok(DEMO_REPLY.to_string())
    }
}
