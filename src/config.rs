use anyhow::{bail, Context, Result};
#[cfg(test)]
use std::collections::HashMap;
use std::env;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct Config {
    // Report definitions consumed by the dispatcher (registry snapshot)
    pub reports_path: String,

    // Upper bound on definitions accepted from one snapshot
    pub max_reports: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env if present, ignore if missing
        Self::from_getter(|key| env::var(key).ok())
    }

    /// Parse config from a custom getter function (for testing)
    pub fn from_getter<F>(get: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Config {
            reports_path: get("REPORTS_PATH").unwrap_or_else(|| "./reports.json".to_string()),

            max_reports: get("MAX_REPORTS")
                .unwrap_or_else(|| "100".to_string())
                .parse()
                .context("MAX_REPORTS must be a non-negative integer")?,
        })
    }

    /// Create config from a HashMap (convenience for testing)
    #[cfg(test)]
    pub fn from_map(map: &HashMap<&str, &str>) -> Result<Self> {
        Self::from_getter(|key| map.get(key).map(|v| v.to_string()))
    }

    /// Validate configuration values at startup.
    /// Returns Ok(()) if all validations pass, or Err with details of what failed.
    pub fn validate(&self) -> Result<()> {
        let mut errors: Vec<String> = Vec::new();

        if !Path::new(&self.reports_path).exists() {
            errors.push(format!(
                "Report definitions not found at '{}'. Set REPORTS_PATH.",
                self.reports_path
            ));
        }

        if self.max_reports == 0 {
            errors.push("MAX_REPORTS must be greater than 0.".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            bail!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let env: HashMap<&str, &str> = HashMap::new();
        let config = Config::from_map(&env).expect("should parse empty env");
        assert_eq!(config.reports_path, "./reports.json");
        assert_eq!(config.max_reports, 100);
    }

    #[test]
    fn test_custom_values() {
        let mut env = HashMap::new();
        env.insert("REPORTS_PATH", "/etc/reportsched/reports.json");
        env.insert("MAX_REPORTS", "25");
        let config = Config::from_map(&env).expect("should parse");
        assert_eq!(config.reports_path, "/etc/reportsched/reports.json");
        assert_eq!(config.max_reports, 25);
    }

    #[test]
    fn test_invalid_max_reports_not_numeric() {
        let mut env = HashMap::new();
        env.insert("MAX_REPORTS", "lots");
        let result = Config::from_map(&env);
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("MAX_REPORTS"), "error should mention MAX_REPORTS: {}", err);
    }

    #[test]
    fn test_invalid_max_reports_negative() {
        let mut env = HashMap::new();
        env.insert("MAX_REPORTS", "-3");
        assert!(Config::from_map(&env).is_err());
    }

    #[test]
    fn test_validation_missing_reports_file() {
        let mut env = HashMap::new();
        env.insert("REPORTS_PATH", "/nonexistent/reports.json");
        let config = Config::from_map(&env).expect("should parse");
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("/nonexistent/reports.json"), "error was: {}", err);
    }

    #[test]
    fn test_validation_zero_max_reports() {
        let mut env = HashMap::new();
        env.insert("MAX_REPORTS", "0");
        let config = Config::from_map(&env).expect("should parse");
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("MAX_REPORTS"), "error was: {}", err);
    }
}
