//! Include-marker substitution
//!
//! Reference pages carry `<!-- @include NAME -->` markers. Each marker is
//! replaced with the rendered form of a detached declaration called NAME
//! if there is one, and otherwise with the module listing for NAME.

use crate::catalog::Catalog;
use crate::diagnostics::{EtchError, EtchResult};
use crate::node::Declaration;
use crate::render::Renderer;
use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;
use std::fs;
use std::path::Path;
use tracing::{debug, info};
use walkdir::WalkDir;

lazy_static! {
    static ref INCLUDE_MARKER: Regex = Regex::new(r"<!-- @include (.+?) -->").unwrap();
}

/// A type taken out of its module to be rendered on its own
#[derive(Debug, Clone, PartialEq)]
pub struct DetachedType {
    pub declaration: Declaration,
    /// Render each child as its own section
    pub expanded: bool,
}

/// Counts from one include pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IncludeReport {
    pub files_scanned: usize,
    pub files_changed: usize,
    pub markers: usize,
}

/// Resolves include markers against a catalog
pub struct IncludeProcessor<'a> {
    catalog: &'a Catalog,
    renderer: &'a Renderer,
    detached: IndexMap<String, DetachedType>,
}

impl<'a> IncludeProcessor<'a> {
    pub fn new(catalog: &'a Catalog, renderer: &'a Renderer) -> Self {
        Self {
            catalog,
            renderer,
            detached: IndexMap::new(),
        }
    }

    /// Make a detached type resolvable by its name
    pub fn detached(mut self, detached: DetachedType) -> Self {
        self.detached
            .insert(detached.declaration.name.clone(), detached);
        self
    }

    /// Render whatever NAME refers to
    pub fn resolve(&self, name: &str) -> EtchResult<String> {
        match self.detached.get(name) {
            Some(detached) if detached.expanded => self
                .renderer
                .render_expanded_declaration(&detached.declaration),
            Some(detached) => self.renderer.declaration(&detached.declaration),
            None => self.renderer.render_module(self.catalog, name),
        }
    }

    /// Replace every marker in `text`, returning the new text and marker count
    pub fn substitute(&self, text: &str) -> EtchResult<(String, usize)> {
        let mut output = String::with_capacity(text.len());
        let mut last = 0;
        let mut count = 0;

        for caps in INCLUDE_MARKER.captures_iter(text) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            output.push_str(&text[last..whole.start()]);
            output.push_str(&self.resolve(name.as_str().trim())?);
            last = whole.end();
            count += 1;
        }

        output.push_str(&text[last..]);
        Ok((output, count))
    }

    /// Substitute markers in every `.md` file under `dir`
    ///
    /// Files are only written when their content changes.
    pub fn process_dir(&self, dir: impl AsRef<Path>) -> EtchResult<IncludeReport> {
        let dir = dir.as_ref();
        let mut report = IncludeReport::default();

        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry.map_err(|e| EtchError::Io(e.into()))?;
            let path = entry.path();
            if !entry.file_type().is_file() || path.extension().is_none_or(|ext| ext != "md") {
                continue;
            }

            report.files_scanned += 1;
            let content = fs::read_to_string(path).map_err(|e| EtchError::read(path, e))?;
            let (updated, markers) = self.substitute(&content)?;
            report.markers += markers;

            if updated != content {
                fs::write(path, updated)?;
                report.files_changed += 1;
                debug!(path = %path.display(), markers, "rewrote includes");
            }
        }

        info!(
            dir = %dir.display(),
            files = report.files_scanned,
            changed = report.files_changed,
            markers = report.markers,
            "processed includes"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::{mock_catalog, mock_declaration, mock_member};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_substitute_module() {
        let catalog = mock_catalog();
        let renderer = Renderer::new().unwrap();
        let processor = IncludeProcessor::new(&catalog, &renderer);

        let (text, count) = processor
            .substitute("# svelte\n\n<!-- @include svelte -->\n")
            .unwrap();

        assert_eq!(count, 1);
        assert!(text.starts_with("# svelte\n\nThe svelte module."));
        assert!(text.ends_with("\n"));
        assert!(!text.contains("@include"));
    }

    #[test]
    fn test_detached_types_take_precedence() {
        let catalog = mock_catalog();
        let renderer = Renderer::new().unwrap();

        let mut kit_config = mock_declaration("KitConfig");
        kit_config.children.push(mock_member("adapter", &[]));

        let processor = IncludeProcessor::new(&catalog, &renderer)
            .detached(DetachedType {
                declaration: mock_declaration("Config"),
                expanded: false,
            })
            .detached(DetachedType {
                declaration: kit_config,
                expanded: true,
            });

        let config = processor.resolve("Config").unwrap();
        assert!(config.contains("interface Config {}"));

        let kit = processor.resolve("KitConfig").unwrap();
        assert!(kit.starts_with("## adapter"));
    }

    #[test]
    fn test_unknown_marker_is_lookup_error() {
        let catalog = mock_catalog();
        let renderer = Renderer::new().unwrap();
        let processor = IncludeProcessor::new(&catalog, &renderer);

        let err = processor
            .substitute("<!-- @include svelte/nope -->")
            .unwrap_err();
        assert!(matches!(err, EtchError::ModuleNotFound(ref name) if name == "svelte/nope"));
    }

    #[test]
    fn test_process_dir_rewrites_changed_files_only() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("98-reference");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("20-svelte.md"), "<!-- @include svelte -->\n").unwrap();
        fs::write(nested.join("index.md"), "No markers here.\n").unwrap();
        fs::write(nested.join("notes.txt"), "<!-- @include svelte -->\n").unwrap();

        let catalog = mock_catalog();
        let renderer = Renderer::new().unwrap();
        let report = IncludeProcessor::new(&catalog, &renderer)
            .process_dir(dir.path())
            .unwrap();

        assert_eq!(
            report,
            IncludeReport {
                files_scanned: 2,
                files_changed: 1,
                markers: 1,
            }
        );
        let rewritten = fs::read_to_string(nested.join("20-svelte.md")).unwrap();
        assert!(rewritten.contains("## tick"));
        let untouched = fs::read_to_string(nested.join("notes.txt")).unwrap();
        assert!(untouched.contains("@include"));
    }
}
