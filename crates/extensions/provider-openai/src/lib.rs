//! Reply text generators for mailquill.
//!
//! [`OpenAIGenerator`] talks to any OpenAI-compatible chat-completions
//! endpoint; [`DemoGenerator`] returns a fixed reply so the whole flow can be
//! exercised without an API key.

mod api;
mod demo;
mod generator;

use std::sync::Arc;
use std::time::Duration;

use mailquill_config::{GenerationBackend, GenerationConfig};
use mailquill_protocols::TextGenerator;
use tracing::{info, warn};

pub use demo::{DEMO_REPLY, DemoGenerator};
pub use generator::{DEFAULT_API_URL, DEFAULT_MAX_TOKENS, DEFAULT_MODEL, OpenAIGenerator};

/// Pick the generator described by `[generation]`.
///
/// The OpenAI backend without an API key degrades to the demo reply.
pub fn generator_from_config(config: &GenerationConfig) -> Arc<dyn TextGenerator> {
    match (config.provider, config.api_key()) {
        (GenerationBackend::OpenAI, Some(key)) => {
            let url = config.base_url.clone().unwrap_or_else(|| DEFAULT_API_URL.to_string());
            info!(model = %config.model, url = %url, "Using OpenAI generator");
            Arc::new(
                OpenAIGenerator::with_url(key.to_string(), url)
                    .with_model(config.model.clone())
                    .with_max_tokens(config.max_tokens)
                    .with_timeout(Duration::from_secs(config.timeout_seconds)),
            )
        }
        (GenerationBackend::OpenAI, None) => {
            warn!("No API key configured, using built-in demo text");
            Arc::new(DemoGenerator)
        }
        (GenerationBackend::Demo, _) => Arc::new(DemoGenerator),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openai_with_key() {
        let config = GenerationConfig {
            api_key: Some("sk-test".into()),
            ..Default::default()
        };
        assert_eq!(generator_from_config(&config).id(), "openai");
    }

    #[test]
    fn test_openai_without_key_falls_back_to_demo() {
        let config = GenerationConfig::default();
        assert_eq!(generator_from_config(&config).id(), "demo");

        let blank = GenerationConfig {
            api_key: Some("   ".into()),
            ..Default::default()
        };
        assert_eq!(generator_from_config(&blank).id(), "demo");
    }

    #[test]
    fn test_demo_backend_ignores_key() {
        let config = GenerationConfig {
            provider: GenerationBackend::Demo,
            api_key: Some("sk-test".into()),
            ..Default::default()
        };
        assert_eq!(generator_from_config(&config).id(), "demo");
    }
}
