//! Configuration loader.

use std::fs;
use std::path::Path;

use regex::Regex;

use crate::error::ConfigError;
use crate::schema::Config;

/// Configuration loader with environment variable substitution.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let content = fs::read_to_string(path)?;
        Self::load_str(&content)
    }

    /// Load configuration from a file if it exists, defaults otherwise.
    pub fn load_or_default(path: &Path) -> Result<Config, ConfigError> {
        match Self::load(path) {
            Err(ConfigError::NotFound(_)) => Ok(Config::default()),
            other => other,
        }
    }

    /// Load configuration from a string.
    pub fn load_str(content: &str) -> Result<Config, ConfigError> {
        let expanded = Self::expand_env_vars(content)?;
        let mut config: Config = toml::from_str(&expanded)?;
        config.state.dir = Self::expand_path(&config.state.dir.to_string_lossy()).into();
        if let Some(dir) = &config.browser.profile_dir {
            config.browser.profile_dir = Some(Self::expand_path(&dir.to_string_lossy()).into());
        }
        Ok(config)
    }

    /// Expand environment variables in the format `${VAR}`.
    fn expand_env_vars(content: &str) -> Result<String, ConfigError> {
        let re = Regex::new(r"\$\{([^}]+)\}")
            .map_err(|e| ConfigError::InvalidFormat(e.to_string()))?;

        let mut result = content.to_string();
        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let var_value = std::env::var(var_name)
                .map_err(|_| ConfigError::EnvVarNotSet(var_name.to_string()))?;
            result = result.replace(&cap[0], &var_value);
        }

        Ok(result)
    }

    /// Expand shell-style paths (e.g., `~/.config`).
    pub fn expand_path(path: &str) -> String {
        shellexpand::tilde(path).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_empty_config() {
        let config = ConfigLoader::load_str("").unwrap();
        assert_eq!(config.browser.debug_port, 9222);
        assert!(config.team.id.is_none());
    }

    #[test]
    fn test_load_team_section() {
        let content = r#"
            [team]
            id = 3
            expected_name = "Pascal GP 1"
            forbidden_names = ["Pascal GP 2"]
        "#;
        let config = ConfigLoader::load_str(content).unwrap();
        assert_eq!(config.team.id, Some(3));
        assert_eq!(config.team.expected_name.as_deref(), Some("Pascal GP 1"));
        assert_eq!(config.team.forbidden_names, vec!["Pascal GP 2"]);
    }

    #[test]
    fn test_load_full_config() {
        let content = r#"
            [team]
            id = 1

            [browser]
            debug_port = 9333
            profile_dir = "/tmp/f1-profile"
            headless = false

            [site]
            wait_timeout_ms = 10000

            [calculator]
            url = "http://localhost:9000/team-calculator"

            [state]
            dir = "/var/lib/f1sync"
        "#;
        let config = ConfigLoader::load_str(content).unwrap();
        assert_eq!(config.browser.debug_port, 9333);
        assert!(!config.browser.headless);
        assert_eq!(config.site.wait_timeout_ms, 10000);
        assert_eq!(config.site.poll_interval_ms, 500);
        assert_eq!(config.calculator.url, "http://localhost:9000/team-calculator");
        assert_eq!(config.state.dir, std::path::PathBuf::from("/var/lib/f1sync"));
    }

    #[test]
    fn test_load_example_config() {
        let config = ConfigLoader::load_str(include_str!("../../../f1sync.toml.example")).unwrap();
        assert_eq!(config.team.id, Some(1));
        assert_eq!(config.team.forbidden_names.len(), 2);
        assert!(config.browser.profile_dir.is_none());
        assert_eq!(config.site.team_url_for(1), "https://fantasy.formula1.com/en/my-team/1");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[team]").unwrap();
        writeln!(file, "id = 7").unwrap();

        let config = ConfigLoader::load(file.path()).unwrap();
        assert_eq!(config.team.id, Some(7));
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = ConfigLoader::load(Path::new("/nonexistent/path/f1sync.toml"));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = ConfigLoader::load_or_default(Path::new("/nonexistent/f1sync.toml")).unwrap();
        assert_eq!(config.state.dir, std::path::PathBuf::from("state"));
    }

    #[test]
    fn test_load_invalid_toml() {
        let result = ConfigLoader::load_str("invalid = [unclosed");
        assert!(matches!(result, Err(ConfigError::TomlParse(_))));
    }

    #[test]
    fn test_profile_dir_tilde_expanded() {
        let content = r#"
            [browser]
            profile_dir = "~/f1-profile"
        "#;
        let config = ConfigLoader::load_str(content).unwrap();
        let dir = config.browser.profile_dir.unwrap();
        assert!(!dir.to_string_lossy().starts_with('~'));
        assert!(dir.ends_with("f1-profile"));
    }

    #[test]
    fn test_expand_env_vars() {
        // SAFETY: This test runs in isolation and sets a unique test-only env var
        unsafe {
            std::env::set_var("F1SYNC_TEST_TEAM_NAME", "Pit Wall");
        }
        let content = "expected_name = \"${F1SYNC_TEST_TEAM_NAME}\"";
        let expanded = ConfigLoader::expand_env_vars(content).unwrap();
        assert!(expanded.contains("Pit Wall"));
        unsafe {
            std::env::remove_var("F1SYNC_TEST_TEAM_NAME");
        }
    }

    #[test]
    fn test_expand_env_vars_not_set() {
        let content = "value = \"${F1SYNC_NONEXISTENT_VAR_12345}\"";
        let result = ConfigLoader::expand_env_vars(content);
        assert!(matches!(result, Err(ConfigError::EnvVarNotSet(_))));
    }

    #[test]
    fn test_expand_path_no_tilde() {
        assert_eq!(ConfigLoader::expand_path("/usr/local/bin"), "/usr/local/bin");
    }
}
