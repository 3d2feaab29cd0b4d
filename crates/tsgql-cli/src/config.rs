//! `ts2gql.json` project configuration.
//!
//! ```json
//! { "root": "schema.ts", "types": ["Schema"], "output": "schema.graphql" }
//! ```
//!
//! Relative paths are resolved against the directory of the config file.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "ts2gql.json";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub root: Option<PathBuf>,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub output: Option<PathBuf>,
}

impl Config {
    /// Make relative paths relative to `base_dir`.
    fn rebase(mut self, base_dir: &Path) -> Self {
        self.root = self.root.map(|root| base_dir.join(root));
        self.output = self.output.map(|output| base_dir.join(output));
        self
    }
}

pub fn parse_config(source: &str) -> Result<Config> {
    Ok(serde_json::from_str(source)?)
}

/// Read and parse a config file.
pub fn load_config(path: &Path) -> Result<Config> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    let config = parse_config(&source)
        .with_context(|| format!("failed to parse config: {}", path.display()))?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
    Ok(config.rebase(base_dir))
}

/// The explicit config file, or `ts2gql.json` in `cwd` when it exists.
pub fn find_config(explicit: Option<&Path>, cwd: &Path) -> Result<Option<Config>> {
    if let Some(path) = explicit {
        let path = cwd.join(path);
        return load_config(&path).map(Some);
    }
    let default = cwd.join(CONFIG_FILE_NAME);
    if default.is_file() {
        return load_config(&default).map(Some);
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_keys() {
        let config = parse_config(
            r#"{ "root": "src/schema.ts", "types": ["Schema", "Extra"], "output": "schema.graphql" }"#,
        )
        .expect("config");
        assert_eq!(config.root.as_deref(), Some(Path::new("src/schema.ts")));
        assert_eq!(config.types, vec!["Schema", "Extra"]);
        assert_eq!(config.output.as_deref(), Some(Path::new("schema.graphql")));
    }

    #[test]
    fn missing_keys_default() {
        assert_eq!(parse_config("{}").expect("config"), Config::default());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = parse_config(r#"{ "roots": "schema.ts" }"#).expect_err("unknown key");
        assert!(err.to_string().contains("unknown field"), "{err}");
    }

    #[test]
    fn relative_paths_follow_the_config_file() {
        let config = Config {
            root: Some(PathBuf::from("schema.ts")),
            types: Vec::new(),
            output: Some(PathBuf::from("/abs/out.graphql")),
        }
        .rebase(Path::new("/project"));
        assert_eq!(config.root.as_deref(), Some(Path::new("/project/schema.ts")));
        assert_eq!(config.output.as_deref(), Some(Path::new("/abs/out.graphql")));
    }
}
