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

    /// Turn the first error, if any, into a [`ConfigError`].
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, ConfigError> {
        match self.errors.into_iter().next() {
            Some(e) => Err(ConfigError::InvalidValue {
                field: e.path,
                message: e.message,
            }),
            None => Ok(self.warnings),
        }
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

        Self::validate_team(config, &mut result);
        Self::validate_browser(config, &mut result);
        Self::validate_site(config, &mut result);
        Self::validate_calculator(config, &mut result);

        Ok(result)
    }

    fn validate_team(config: &Config, result: &mut ValidationResult) {
        let team = &config.team;

        match team.id {
            None => result.add_warning(ValidationWarning::new(
                "team.id",
                "Team id is not set, it must be passed on the command line",
            )),
            Some(0) => result.add_error(ValidationError::new(
                "team.id",
                "Team id must be greater than 0",
            )),
            Some(_) => {}
        }

        if team.expected_name.is_none() {
            result.add_warning(ValidationWarning::new(
                "team.expected_name",
                "No expected team name, the team page will not be checked before editing",
            ));
        }

        if let Some(expected) = &team.expected_name {
            let expected = expected.trim().to_lowercase();
            if team
                .forbidden_names
                .iter()
                .any(|f| f.trim().to_lowercase() == expected)
            {
                result.add_error(ValidationError::new(
                    "team.forbidden_names",
                    "Expected team name is also listed as forbidden",
                ));
            }
        }
    }

    fn validate_browser(config: &Config, result: &mut ValidationResult) {
        let browser = &config.browser;

        if browser.debug_port == 0 {
            result.add_error(ValidationError::new(
                "browser.debug_port",
                "Port cannot be 0",
            ));
        }

        if browser.viewport_width == 0 || browser.viewport_height == 0 {
            result.add_error(ValidationError::new(
                "browser.viewport",
                "Viewport dimensions must be greater than 0",
            ));
        }

        if let Some(path) = &browser.profile_dir {
            if !path.exists() {
                result.add_warning(ValidationWarning::new(
                    "browser.profile_dir",
                    format!(
                        "Profile directory does not exist, a fresh profile has no login: {:?}",
                        path
                    ),
                ));
            }
        }
    }

    fn validate_site(config: &Config, result: &mut ValidationResult) {
        let site = &config.site;

        if !site.team_url.contains("{team_id}") {
            result.add_error(ValidationError::new(
                "site.team_url",
                "team_url must contain the {team_id} placeholder",
            ));
        }

        for (path, url) in [("site.team_url", &site.team_url), ("site.home_url", &site.home_url)] {
            if !is_http_url(url) {
                result.add_error(ValidationError::new(
                    path,
                    "URL must start with http:// or https://",
                ));
            }
        }

        if site.wait_timeout_ms == 0 || site.navigation_timeout_ms == 0 {
            result.add_error(ValidationError::new(
                "site",
                "Timeouts must be greater than 0",
            ));
        }

        if site.poll_interval_ms == 0 {
            result.add_error(ValidationError::new(
                "site.poll_interval_ms",
                "poll_interval_ms must be greater than 0",
            ));
        } else if site.poll_interval_ms > site.wait_timeout_ms {
            result.add_warning(ValidationWarning::new(
                "site.poll_interval_ms",
                "poll_interval_ms is longer than wait_timeout_ms, waits will poll once",
            ));
        }
    }

    fn validate_calculator(config: &Config, result: &mut ValidationResult) {
        if !is_http_url(&config.calculator.url) {
            result.add_error(ValidationError::new(
                "calculator.url",
                "URL must start with http:// or https://",
            ));
        }

        if config.calculator.timeout_seconds == 0 {
            result.add_error(ValidationError::new(
                "calculator.timeout_seconds",
                "timeout_seconds must be greater than 0",
            ));
        }
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
