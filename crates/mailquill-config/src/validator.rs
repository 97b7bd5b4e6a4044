//! Configuration validation.

use crate::error::ConfigError;
use crate::schema::{Config, GenerationBackend, PROBE_SCOPES};

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> Result<ValidationResult, ConfigError> {
        let mut result = ValidationResult::default();

        Self::validate_generation(config, &mut result);
        Self::validate_opener(config, &mut result);
        Self::validate_logging(config, &mut result);
        Self::validate_probes(config, &mut result);

        Ok(result)
    }

    fn validate_generation(config: &Config, result: &mut ValidationResult) {
        let generation = &config.generation;

        if generation.provider == GenerationBackend::OpenAI && generation.api_key().is_none() {
            result.add_warning(ValidationWarning::new(
                "generation.api_key",
                "API key is not set, the demo reply will be used instead",
            ));
        }

        if let Some(ref url) = generation.base_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                result.add_error(ValidationError::new(
                    "generation.base_url",
                    "base_url must start with http:// or https://",
                ));
            }
        }

        if generation.model.trim().is_empty() {
            result.add_error(ValidationError::new("generation.model", "model cannot be empty"));
        }

        if generation.max_tokens == 0 {
            result.add_error(ValidationError::new(
                "generation.max_tokens",
                "max_tokens must be greater than 0",
            ));
        }

        if generation.timeout_seconds == 0 {
            result.add_error(ValidationError::new(
                "generation.timeout_seconds",
                "timeout_seconds must be greater than 0",
            ));
        }
    }

    fn validate_opener(config: &Config, result: &mut ValidationResult) {
        let opener = &config.opener;

        if opener.timeout_ms == 0 {
            result.add_error(ValidationError::new(
                "opener.timeout_ms",
                "timeout_ms must be greater than 0",
            ));
        }

        if opener.poll_interval_ms == 0 {
            result.add_error(ValidationError::new(
                "opener.poll_interval_ms",
                "poll_interval_ms must be greater than 0",
            ));
        } else if opener.poll_interval_ms >= opener.timeout_ms && opener.timeout_ms > 0 {
            result.add_error(ValidationError::new(
                "opener.poll_interval_ms",
                "poll_interval_ms must be less than timeout_ms",
            ));
        }
    }

    fn validate_logging(config: &Config, result: &mut ValidationResult) {
        if config.logging.level.trim().is_empty() {
            result.add_error(ValidationError::new("logging.level", "level cannot be empty"));
        }
    }

    fn validate_probes(config: &Config, result: &mut ValidationResult) {
        for (scope, overrides) in &config.probes {
            if !PROBE_SCOPES.contains(&scope.as_str()) {
                result.add_warning(ValidationWarning::new(
                    format!("probes.{}", scope),
                    format!(
                        "Unknown provider key '{}', valid values: {:?}; these probes are ignored",
                        scope, PROBE_SCOPES
                    ),
                ));
            }

            for (list, selectors) in overrides.lists() {
                for (i, selector) in selectors.iter().enumerate() {
                    if selector.trim().is_empty() {
                        result.add_error(ValidationError::new(
                            format!("probes.{}.{}[{}]", scope, list, i),
                            "selector cannot be empty",
                        ));
                    }
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
