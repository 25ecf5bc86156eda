//! EtchBuilder - programmatic configuration
//!
//! This module provides the builder pattern API for configuring and
//! running an extraction without a configuration file.

use crate::catalog::Catalog;
use crate::diagnostics::EtchResult;
use crate::docgen::{DetachConfig, EtchConfig, Etcher, RemoveChildConfig, SourceConfig};
use crate::include::{DetachedType, IncludeProcessor};
use crate::links::RewriteRule;
use crate::render::Renderer;
use crate::snippet::SnippetFormatter;
use std::path::PathBuf;

/// Result of a build
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildOutput {
    /// The sorted module catalog
    pub catalog: Catalog,
    /// Types detached from the catalog, in configuration order
    pub detached: Vec<DetachedType>,
}

impl BuildOutput {
    /// An include processor that knows about this build's detached types
    pub fn include_processor<'a>(&'a self, renderer: &'a Renderer) -> IncludeProcessor<'a> {
        self.detached
            .iter()
            .cloned()
            .fold(IncludeProcessor::new(&self.catalog, renderer), |p, d| {
                p.detached(d)
            })
    }

    /// The catalog as pretty-printed JSON
    pub fn to_json(&self) -> EtchResult<String> {
        Ok(serde_json::to_string_pretty(&self.catalog)?)
    }
}

/// Builder for configuring an extraction
///
/// # Example
///
/// ```no_run
/// use dts_etch::EtchBuilder;
///
/// let output = EtchBuilder::new()
///     .source("types/index.d.ts")
///     .file_module("src/types/private.d.ts", "Private types")
///     .ignore("*.svelte")
///     .detach("@sveltejs/kit", "KitConfig", true)
///     .build()
///     .expect("Failed to extract declarations");
/// println!("{} modules", output.catalog.len());
/// ```
pub struct EtchBuilder {
    config: EtchConfig,
    formatter: Option<Box<dyn SnippetFormatter>>,
}

impl Default for EtchBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EtchBuilder {
    /// Create a builder with the default configuration and no sources
    pub fn new() -> Self {
        Self {
            config: EtchConfig::default(),
            formatter: None,
        }
    }

    /// Start from an existing configuration
    pub fn from_config(config: EtchConfig) -> Self {
        Self {
            config,
            formatter: None,
        }
    }

    /// Add a file of ambient `declare module` blocks
    pub fn source(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.sources.push(SourceConfig {
            path: path.into(),
            module: None,
        });
        self
    }

    /// Add a file whose top-level exports form one module
    pub fn file_module(mut self, path: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        self.config.sources.push(SourceConfig {
            path: path.into(),
            module: Some(name.into()),
        });
        self
    }

    /// Skip a module by its fully qualified name
    pub fn ignore(mut self, name: impl Into<String>) -> Self {
        self.config.ignore.push(name.into());
        self
    }

    /// Replace the privacy pattern
    pub fn privacy_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.config.privacy_pattern = pattern.into();
        self
    }

    /// Replace the set of stripped origins
    pub fn origins<I, S>(mut self, origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.origins = origins.into_iter().map(Into::into).collect();
        self
    }

    /// Read `*.md` files in a directory as prose-only modules
    pub fn synthetic_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.synthetic_dir = Some(dir.into());
        self
    }

    /// Add a link rewrite rule
    pub fn rewrite(mut self, pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        self.config.rewrites.push(RewriteRule {
            pattern: pattern.into(),
            replacement: replacement.into(),
        });
        self
    }

    /// Detach a type so it renders on its own
    pub fn detach(
        mut self,
        module: impl Into<String>,
        name: impl Into<String>,
        expanded: bool,
    ) -> Self {
        self.config.detach.push(DetachConfig {
            module: module.into(),
            name: name.into(),
            expanded,
        });
        self
    }

    /// Drop a child from a type after extraction
    pub fn remove_child(
        mut self,
        declaration: impl Into<String>,
        child: impl Into<String>,
    ) -> Self {
        self.config.remove_children.push(RemoveChildConfig {
            declaration: declaration.into(),
            child: child.into(),
        });
        self
    }

    /// Pipe snippets through an external command
    pub fn formatter_command<I, S>(mut self, command: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.formatter.command = Some(command.into_iter().map(Into::into).collect());
        self
    }

    /// Use a custom snippet formatter
    pub fn formatter(mut self, formatter: Box<dyn SnippetFormatter>) -> Self {
        self.formatter = Some(formatter);
        self
    }

    /// The configuration built so far
    pub fn config(&self) -> &EtchConfig {
        &self.config
    }

    /// Run the extraction
    pub fn build(self) -> EtchResult<BuildOutput> {
        let mut etcher = Etcher::new(self.config);
        if let Some(formatter) = self.formatter {
            etcher = etcher.with_formatter(formatter);
        }
        etcher.run()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::EtchError;
    use crate::test::SAMPLE_DTS;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    struct Upper;

    impl SnippetFormatter for Upper {
        fn format(&self, snippet: &str) -> EtchResult<String> {
            Ok(snippet.to_uppercase())
        }
    }

    #[test]
    fn test_builder_configuration() {
        let builder = EtchBuilder::new()
            .source("index.d.ts")
            .file_module("private.d.ts", "Private types")
            .ignore("legacy")
            .origins(["https://example.test"])
            .rewrite("a", "b")
            .detach("m", "T", false)
            .remove_child("T", "c")
            .formatter_command(["prettier", "--parser", "typescript"]);

        let config = builder.config();
        assert_eq!(config.sources.len(), 2);
        assert!(config.ignore.contains(&"legacy".to_string()));
        assert_eq!(config.origins, vec!["https://example.test"]);
        assert_eq!(config.rewrites.len(), 1);
        assert_eq!(config.detach[0].name, "T");
        assert_eq!(config.remove_children[0].child, "c");
        assert_eq!(config.formatter.command.as_ref().unwrap().len(), 3);
    }

    #[test]
    fn test_build_with_custom_formatter() {
        let dir = TempDir::new().unwrap();
        let index = dir.path().join("index.d.ts");
        fs::write(&index, SAMPLE_DTS).unwrap();

        let output = EtchBuilder::new()
            .source(&index)
            .formatter(Box::new(Upper))
            .build()
            .unwrap();

        let tick = output.catalog.declaration("svelte", "tick").unwrap();
        assert_eq!(tick.snippet, "FUNCTION TICK(): PROMISE<VOID>;");

        // members are never formatted
        let readable = output.catalog.declaration("svelte/store", "Readable").unwrap();
        assert!(readable.children[0].snippet.starts_with("subscribe("));
    }

    #[test]
    fn test_include_processor_uses_detached_types() {
        let dir = TempDir::new().unwrap();
        let index = dir.path().join("index.d.ts");
        fs::write(&index, SAMPLE_DTS).unwrap();

        let output = EtchBuilder::new()
            .source(&index)
            .detach("svelte/store", "Readable", false)
            .build()
            .unwrap();

        let renderer = Renderer::new().unwrap();
        let processor = output.include_processor(&renderer);
        let rendered = processor.resolve("Readable").unwrap();
        assert!(rendered.contains("interface Readable<T> {/*…*/}"));

        let json = output.to_json().unwrap();
        assert!(!json.contains("\"Readable\""));
    }

    #[test]
    fn test_bad_privacy_pattern() {
        let err = EtchBuilder::new()
            .source("index.d.ts")
            .privacy_pattern("(")
            .build()
            .unwrap_err();
        assert!(matches!(err, EtchError::Config(_)));
    }
}
