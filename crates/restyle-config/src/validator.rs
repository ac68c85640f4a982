//! Configuration validation.

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

        Self::validate_browser(config, &mut result);
        Self::validate_site(config, &mut result);
        Self::validate_injector(config, &mut result);

        result
    }

    fn validate_browser(config: &Config, result: &mut ValidationResult) {
        let endpoint = &config.browser.endpoint;
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            result.add_error(ValidationError::new(
                "browser.endpoint",
                "Endpoint must start with http:// or https://",
            ));
        }

        if config.browser.permission_phrase.is_empty() {
            result.add_error(ValidationError::new(
                "browser.permission_phrase",
                "Permission phrase cannot be empty",
            ));
        }

        if config.browser.request_timeout_secs == 0 {
            result.add_error(ValidationError::new(
                "browser.request_timeout_secs",
                "request_timeout_secs must be greater than 0",
            ));
        }

        if config.browser.restricted_schemes.is_empty() {
            result.add_warning(ValidationWarning::new(
                "browser.restricted_schemes",
                "No restricted schemes; internal pages will only fail at execution time",
            ));
        }
    }

    fn validate_site(config: &Config, result: &mut ValidationResult) {
        if config.site.domain.trim().is_empty() {
            result.add_error(ValidationError::new(
                "site.domain",
                "Domain cannot be empty",
            ));
        }

        if config.site.logo_alt.is_empty() {
            result.add_error(ValidationError::new(
                "site.logo_alt",
                "Logo alt text marks the replacement and cannot be empty",
            ));
        }
    }

    fn validate_injector(config: &Config, result: &mut ValidationResult) {
        if config.injector.debounce_ms == 0 {
            result.add_error(ValidationError::new(
                "injector.debounce_ms",
                "debounce_ms must be greater than 0",
            ));
        }

        if config.injector.debounce_ms > 5_000 {
            result.add_warning(ValidationWarning::new(
                "injector.debounce_ms",
                "debounce_ms is very high (>5s), restyling will lag behind page updates",
            ));
        }

        if config.injector.feedback_ms == 0 {
            result.add_warning(ValidationWarning::new(
                "injector.feedback_ms",
                "feedback_ms is 0, copy feedback labels will not be visible",
            ));
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
