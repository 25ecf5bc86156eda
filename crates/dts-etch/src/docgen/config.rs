//! Build configuration
//!
//! [`EtchConfig`] is read from TOML. Every key has a default, and relative
//! paths are resolved against the directory of the configuration file.

use crate::diagnostics::{EtchError, EtchResult};
use crate::links::RewriteRule;
use crate::parser::{DEFAULT_ORIGINS, DEFAULT_PRIVACY_PATTERN};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Module names left out unless configured otherwise
pub const DEFAULT_IGNORE: &[&str] = &[
    "*.svelte",
    "svelte/types/compiler/preprocess",
    "svelte/types/compiler/interfaces",
];

/// A declaration file to extract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceConfig {
    pub path: PathBuf,

    /// Read the whole file as one module with this name instead of
    /// collecting its `declare module` blocks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
}

/// A type to take out of its module and render on its own
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DetachConfig {
    pub module: String,
    pub name: String,
    #[serde(default)]
    pub expanded: bool,
}

/// A child to drop from a type after extraction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RemoveChildConfig {
    pub declaration: String,
    pub child: String,
}

/// External snippet formatter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FormatterConfig {
    /// Program and arguments; snippets are piped through stdin
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<Vec<String>>,
}

/// Configuration for an extraction run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EtchConfig {
    /// Fully qualified module names to skip
    pub ignore: Vec<String>,
    /// Case-insensitive pattern marking members as internal
    pub privacy_pattern: String,
    /// Documentation origins stripped from links
    pub origins: Vec<String>,
    /// Directory of `*.md` files read as prose-only modules
    pub synthetic_dir: Option<PathBuf>,
    pub sources: Vec<SourceConfig>,
    pub rewrites: Vec<RewriteRule>,
    pub detach: Vec<DetachConfig>,
    pub remove_children: Vec<RemoveChildConfig>,
    pub formatter: FormatterConfig,
}

impl Default for EtchConfig {
    fn default() -> Self {
        Self {
            ignore: DEFAULT_IGNORE.iter().map(|s| s.to_string()).collect(),
            privacy_pattern: DEFAULT_PRIVACY_PATTERN.to_string(),
            origins: DEFAULT_ORIGINS.iter().map(|s| s.to_string()).collect(),
            synthetic_dir: None,
            sources: Vec::new(),
            rewrites: Vec::new(),
            detach: Vec::new(),
            remove_children: Vec::new(),
            formatter: FormatterConfig::default(),
        }
    }
}

impl EtchConfig {
    /// Parse configuration from TOML text; paths are left as written
    pub fn from_toml(text: &str) -> EtchResult<Self> {
        toml::from_str(text).map_err(|e| EtchError::config(e.to_string()))
    }

    /// Load configuration from a file, resolving relative paths against it
    pub fn from_file(path: impl AsRef<Path>) -> EtchResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| EtchError::read(path, e))?;
        let mut config = Self::from_toml(&text)
            .map_err(|e| EtchError::config(format!("{}: {}", path.display(), e)))?;

        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        Ok(config)
    }

    /// Make relative source and synthetic paths relative to `base`
    pub fn resolve_paths(&mut self, base: &Path) {
        for source in &mut self.sources {
            if source.path.is_relative() {
                source.path = base.join(&source.path);
            }
        }
        if let Some(dir) = self.synthetic_dir.as_mut() {
            if dir.is_relative() {
                *dir = base.join(&*dir);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = EtchConfig::from_toml("").unwrap();
        assert_eq!(config, EtchConfig::default());
        assert_eq!(config.privacy_pattern, "private api|DO NOT USE");
        assert!(config.ignore.contains(&"*.svelte".to_string()));
    }

    #[test]
    fn test_full_config() {
        let config = EtchConfig::from_toml(
            r#"
ignore = ["*.svelte"]
origins = ["https://example.test"]

[[sources]]
path = "types/index.d.ts"

[[sources]]
path = "src/types/private.d.ts"
module = "Private types"

[[rewrites]]
pattern = "/docs/cli"
replacement = "/docs/kit/reference/cli"

[[detach]]
module = "@sveltejs/kit"
name = "KitConfig"
expanded = true

[[remove_children]]
declaration = "ActionReturn"
child = "$$_attributes"

[formatter]
command = ["prettier", "--parser", "typescript"]
"#,
        )
        .unwrap();

        assert_eq!(config.ignore, vec!["*.svelte"]);
        assert_eq!(config.sources.len(), 2);
        assert_eq!(config.sources[1].module.as_deref(), Some("Private types"));
        assert_eq!(config.rewrites[0].replacement, "/docs/kit/reference/cli");
        assert!(config.detach[0].expanded);
        assert_eq!(config.remove_children[0].child, "$$_attributes");
        assert_eq!(
            config.formatter.command,
            Some(vec![
                "prettier".to_string(),
                "--parser".to_string(),
                "typescript".to_string()
            ])
        );
    }

    #[test]
    fn test_unknown_key_is_config_error() {
        let err = EtchConfig::from_toml("privacy = 'x'").unwrap_err();
        assert!(matches!(err, EtchError::Config(_)));
    }

    #[test]
    fn test_from_file_resolves_paths() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("etch.toml");
        fs::write(
            &path,
            "synthetic_dir = \"synthetic\"\n[[sources]]\npath = \"index.d.ts\"\n[[sources]]\npath = \"/abs/other.d.ts\"\n",
        )
        .unwrap();

        let config = EtchConfig::from_file(&path).unwrap();
        assert_eq!(config.sources[0].path, dir.path().join("index.d.ts"));
        assert_eq!(config.sources[1].path, PathBuf::from("/abs/other.d.ts"));
        assert_eq!(config.synthetic_dir, Some(dir.path().join("synthetic")));
    }
}
