use std::collections::HashMap;
use std::fs;
use std::path::Path;

use planner::PlannerConfig;

use crate::error::CliError;

pub const DIM_TYPE_VAR: &str = "QFRAME_DIM_TYPE";
pub const NUM_TYPE_VAR: &str = "QFRAME_NUM_TYPE";
pub const PRETTY_VAR: &str = "QFRAME_PRETTY";
pub const INDENT_VAR: &str = "QFRAME_INDENT";
pub const ENGINE_VAR: &str = "QFRAME_ENGINE";

/// Environment variable manager that loads from system and .env files
#[derive(Debug, Clone, Default)]
pub struct EnvManager {
    vars: HashMap<String, String>,
}

impl EnvManager {
    pub fn new() -> Self {
        Self {
            vars: std::env::vars().collect(),
        }
    }

    /// Load variables from a .env file. Values from the file win over the
    /// process environment.
    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), CliError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("Failed to read env file {}: {}", path.display(), e))
        })?;

        self.parse_env_content(&content)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Planner settings, starting from the defaults and overridden by any
    /// `QFRAME_*` variable that is set.
    pub fn planner_config(&self) -> Result<PlannerConfig, CliError> {
        let mut config = PlannerConfig::default();

        if let Some(dim_type) = self.get(DIM_TYPE_VAR) {
            config.dim_type = dim_type.to_string();
        }
        if let Some(num_type) = self.get(NUM_TYPE_VAR) {
            config.num_type = num_type.to_string();
        }
        if let Some(pretty) = self.get(PRETTY_VAR) {
            config.pretty = parse_bool(PRETTY_VAR, pretty)?;
        }
        if let Some(indent) = self.get(INDENT_VAR) {
            config.indent = indent.parse().map_err(|_| {
                CliError::Config(format!("{INDENT_VAR} must be a non-negative integer, got '{indent}'"))
            })?;
        }

        Ok(config)
    }

    pub fn engine(&self) -> Option<String> {
        self.get(ENGINE_VAR).map(String::from)
    }

    fn parse_env_content(&mut self, content: &str) -> Result<(), CliError> {
        for (line_num, line) in content.lines().enumerate() {
            let line = line.trim();

            // Skip empty lines and comments
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                return Err(CliError::Config(format!(
                    "Invalid env file: malformed line {} (expected KEY=VALUE)",
                    line_num + 1
                )));
            };

            let key = key.trim();
            if key.is_empty() {
                return Err(CliError::Config(format!(
                    "Invalid env file: empty key at line {}",
                    line_num + 1
                )));
            }

            self.vars
                .insert(key.to_string(), Self::unquote_value(value));
        }

        Ok(())
    }

    fn unquote_value(value: &str) -> String {
        let value = value.trim();

        for quote in ['"', '\''] {
            if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
                return value[1..value.len() - 1].to_string();
            }
        }

        value.to_string()
    }
}

fn parse_bool(var: &str, value: &str) -> Result<bool, CliError> {
    match value.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(CliError::Config(format!(
            "{var} must be a boolean, got '{value}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_quoted_values() {
        let mut env = EnvManager::default();
        let content = r#"
# Comment
QFRAME_DIM_TYPE="TEXT"
QFRAME_NUM_TYPE='DOUBLE PRECISION'
QFRAME_ENGINE=warehouse
        "#;

        env.parse_env_content(content).unwrap();
        assert_eq!(env.get(DIM_TYPE_VAR), Some("TEXT"));
        assert_eq!(env.get(NUM_TYPE_VAR), Some("DOUBLE PRECISION"));
        assert_eq!(env.engine().as_deref(), Some("warehouse"));
    }

    #[test]
    fn test_invalid_env_format() {
        let mut env = EnvManager::default();
        assert!(env.parse_env_content("INVALID LINE WITHOUT EQUALS").is_err());
        assert!(env.parse_env_content("=value").is_err());
    }

    #[test]
    fn test_planner_config_from_env_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "QFRAME_PRETTY=false").unwrap();
        writeln!(file, "QFRAME_INDENT=2").unwrap();
        writeln!(file, "QFRAME_DIM_TYPE=TEXT").unwrap();

        let mut env = EnvManager::default();
        env.load_from_file(file.path()).unwrap();
        let config = env.planner_config().unwrap();

        assert_eq!(config.dim_type, "TEXT");
        assert_eq!(config.num_type, "FLOAT(53)");
        assert!(!config.pretty);
        assert_eq!(config.indent, 2);
    }

    #[test]
    fn test_planner_config_rejects_bad_values() {
        let mut env = EnvManager::default();
        env.parse_env_content("QFRAME_PRETTY=maybe").unwrap();
        assert!(matches!(env.planner_config(), Err(CliError::Config(_))));

        let mut env = EnvManager::default();
        env.parse_env_content("QFRAME_INDENT=-1").unwrap();
        assert!(matches!(env.planner_config(), Err(CliError::Config(_))));
    }
}
