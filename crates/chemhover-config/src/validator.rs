//! Configuration validation.

use crate::error::ConfigError;
use crate::schema::Config;

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
    pub fn validate(config: &Config) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_classifier(config, &mut result);
        Self::validate_channel(config, &mut result);
        Self::validate_walker(config, &mut result);
        Self::validate_overlay(config, &mut result);

        result
    }

    /// Validate and turn the first error into a [`ConfigError::InvalidValue`].
    ///
    /// Warnings are returned to the caller for logging.
    pub fn validate_strict(config: &Config) -> Result<Vec<ValidationWarning>, ConfigError> {
        let result = Self::validate(config);
        match result.errors.into_iter().next() {
            Some(error) => Err(ConfigError::InvalidValue {
                field: error.path,
                message: error.message,
            }),
            None => Ok(result.warnings),
        }
    }

    fn validate_classifier(config: &Config, result: &mut ValidationResult) {
        let threshold = config.classifier.threshold;
        if !threshold.is_finite() {
            result.add_error(ValidationError::new(
                "classifier.threshold",
                "threshold must be a finite number",
            ));
        } else if !(-10.0..=10.0).contains(&threshold) {
            result.add_warning(ValidationWarning::new(
                "classifier.threshold",
                format!("threshold {} is far outside the usual score range", threshold),
            ));
        }

        if let Some(ref url) = config.classifier.model_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                result.add_error(ValidationError::new(
                    "classifier.model_url",
                    "model_url must start with http:// or https://",
                ));
            }
        }

        if config.classifier.model_url.is_some() && config.classifier.model_path.is_some() {
            result.add_warning(ValidationWarning::new(
                "classifier.model_path",
                "both model_path and model_url are set, model_path wins",
            ));
        }
    }

    fn validate_channel(config: &Config, result: &mut ValidationResult) {
        if config.channel.max_id < 2 {
            result.add_error(ValidationError::new(
                "channel.max_id",
                "max_id must be at least 2",
            ));
        }

        if config.channel.request_timeout_ms == Some(0) {
            result.add_error(ValidationError::new(
                "channel.request_timeout_ms",
                "request_timeout_ms must be greater than 0 when set",
            ));
        }
    }

    fn validate_walker(config: &Config, result: &mut ValidationResult) {
        if config.walker.overlay_id_prefix.is_empty() {
            result.add_error(ValidationError::new(
                "walker.overlay_id_prefix",
                "overlay_id_prefix cannot be empty, the re-scan guard depends on it",
            ));
        }

        if config.walker.max_concurrent_scans == 0 {
            result.add_error(ValidationError::new(
                "walker.max_concurrent_scans",
                "max_concurrent_scans must be greater than 0",
            ));
        }

        if config.walker.max_concurrent_scans as u64 >= config.channel.max_id as u64 {
            result.add_warning(ValidationWarning::new(
                "walker.max_concurrent_scans",
                "concurrent scans can exhaust the channel id space",
            ));
        }
    }

    fn validate_overlay(config: &Config, result: &mut ValidationResult) {
        if config.overlay.width == 0 || config.overlay.height == 0 {
            result.add_error(ValidationError::new(
                "overlay",
                "width and height must be greater than 0",
            ));
        }

        if config.overlay.sparkle && config.overlay.sparkle_marker.is_empty() {
            result.add_warning(ValidationWarning::new(
                "overlay.sparkle_marker",
                "sparkle is enabled with an empty marker",
            ));
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
