use crate::fs::SearchTool;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Explorer behavior configuration.
///
/// The root path and the currently expanded folder set are per-loader and
/// per-request inputs respectively; everything that survives across
/// invocations lives here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplorerConfig {
    /// Whether to show hidden files (starting with .) by default
    #[serde(default = "default_false")]
    pub show_hidden: bool,

    /// Whether to respect .gitignore files
    #[serde(default = "default_true")]
    pub respect_gitignore: bool,

    /// Active search. When set, loads flatten search matches instead of
    /// scanning directories.
    #[serde(default)]
    pub search: Option<SearchConfig>,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            show_hidden: false,
            respect_gitignore: true,
            search: None,
        }
    }
}

/// Parameters of an active search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Name fragment to match.
    pub term: String,

    /// Extra arguments passed through to the external tool verbatim.
    #[serde(default)]
    pub filters: Vec<String>,

    /// Which tool produces the matches.
    #[serde(default)]
    pub tool: SearchTool,

    /// Maximum number of matches to report; 0 means unlimited.
    #[serde(default = "default_search_limit")]
    pub limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            term: String::new(),
            filters: Vec::new(),
            tool: SearchTool::default(),
            limit: default_search_limit(),
        }
    }
}

fn default_false() -> bool {
    false
}

fn default_true() -> bool {
    true
}

fn default_search_limit() -> usize {
    500
}

impl ExplorerConfig {
    /// Load configuration from a JSON file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(e.to_string()))?;
        serde_json::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;
        std::fs::write(path.as_ref(), contents).map_err(|e| ConfigError::IoError(e.to_string()))
    }

    /// Default config file location (`<config dir>/frond/config.json`).
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("frond").join("config.json"))
    }

    /// Load the default config file, falling back to defaults when it
    /// does not exist.
    pub fn load_default() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from_file(path),
            _ => Ok(Self::default()),
        }
    }
}

/// Configuration loading errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    IoError(String),
    ParseError(String),
    SerializeError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(msg) => write!(f, "IO error: {msg}"),
            ConfigError::ParseError(msg) => write!(f, "Parse error: {msg}"),
            ConfigError::SerializeError(msg) => write!(f, "Serialize error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = ExplorerConfig::default();
        assert!(!config.show_hidden);
        assert!(config.respect_gitignore);
        assert!(config.search.is_none());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: ExplorerConfig = serde_json::from_str(r#"{"show_hidden": true}"#).unwrap();
        assert!(config.show_hidden);
        assert!(config.respect_gitignore);
        assert!(config.search.is_none());
    }

    #[test]
    fn test_search_config_defaults() {
        let config: ExplorerConfig =
            serde_json::from_str(r#"{"search": {"term": "todo"}}"#).unwrap();
        let search = config.search.unwrap();
        assert_eq!(search.term, "todo");
        assert_eq!(search.tool, SearchTool::Builtin);
        assert_eq!(search.limit, 500);
        assert!(search.filters.is_empty());
    }

    #[test]
    fn test_file_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");

        let mut config = ExplorerConfig::default();
        config.show_hidden = true;
        config.search = Some(SearchConfig {
            term: "report".to_string(),
            tool: SearchTool::Ripgrep,
            ..SearchConfig::default()
        });

        config.save_to_file(&path).unwrap();
        let loaded = ExplorerConfig::load_from_file(&path).unwrap();

        assert!(loaded.show_hidden);
        let search = loaded.search.unwrap();
        assert_eq!(search.term, "report");
        assert_eq!(search.tool, SearchTool::Ripgrep);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let result = ExplorerConfig::load_from_file(temp_dir.path().join("absent.json"));
        assert!(matches!(result, Err(ConfigError::IoError(_))));
    }

    #[test]
    fn test_malformed_file_is_a_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.json");
        std::fs::write(&path, "{not json").unwrap();

        let result = ExplorerConfig::load_from_file(&path);
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }
}
