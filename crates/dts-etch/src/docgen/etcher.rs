//! Etcher - main extraction orchestrator
//!
//! This module provides the Etcher struct which runs the whole build:
//! extraction from every configured source, synthetic modules, catalog
//! assembly, and the post-processing steps the configuration asks for.

use super::config::EtchConfig;
use crate::builder::BuildOutput;
use crate::catalog::Catalog;
use crate::diagnostics::{DiagnosticsCollector, EtchError, EtchResult};
use crate::include::DetachedType;
use crate::links::LinkRewriter;
use crate::loader::read_synthetic_modules;
use crate::parser::{Extraction, Extractor};
use crate::snippet::{CommandFormatter, PlainFormatter, SnippetFormatter};
use tracing::info;

/// The main extraction pipeline
///
/// 1. Extract modules from each source file
/// 2. Load synthetic modules
/// 3. Assemble the sorted catalog
/// 4. Apply link rewrites
/// 5. Remove configured children and detach configured types
pub struct Etcher {
    config: EtchConfig,
    diagnostics: DiagnosticsCollector,
    formatter: Option<Box<dyn SnippetFormatter>>,
}

impl Etcher {
    /// Create a new Etcher with the given configuration
    pub fn new(config: EtchConfig) -> Self {
        Self {
            config,
            diagnostics: DiagnosticsCollector::new(),
            formatter: None,
        }
    }

    /// Use this formatter instead of the configured one
    pub fn with_formatter(mut self, formatter: Box<dyn SnippetFormatter>) -> Self {
        self.formatter = Some(formatter);
        self
    }

    pub fn config(&self) -> &EtchConfig {
        &self.config
    }

    /// Warnings and notes gathered by the last run
    pub fn diagnostics(&self) -> &DiagnosticsCollector {
        &self.diagnostics
    }

    fn take_formatter(&mut self) -> EtchResult<Box<dyn SnippetFormatter>> {
        if let Some(formatter) = self.formatter.take() {
            return Ok(formatter);
        }
        match &self.config.formatter.command {
            Some(command) => Ok(Box::new(CommandFormatter::new(command)?)),
            None => Ok(Box::new(PlainFormatter)),
        }
    }

    /// Run the pipeline; any fatal error aborts the whole build
    pub fn run(&mut self) -> EtchResult<BuildOutput> {
        if self.config.sources.is_empty() {
            return Err(EtchError::config("no sources configured"));
        }

        let formatter = self.take_formatter()?;
        let extractor = Extractor::new(&self.config.privacy_pattern, &self.config.origins)?
            .ignore(self.config.ignore.iter().cloned())
            .formatter(formatter);
        let rewriter = LinkRewriter::new(&self.config.rewrites)?;

        // Step 1: declaration files
        let mut extraction = Extraction::default();
        for source in &self.config.sources {
            let extracted = match &source.module {
                Some(name) => extractor.file_module(&source.path, name)?,
                None => extractor.ambient_modules(&source.path)?,
            };
            self.diagnostics.info(format!(
                "Extracted {} modules from {}",
                extracted.modules.len(),
                source.path.display()
            ));
            extraction.extend(extracted);
        }

        // Step 2: synthetic modules
        if let Some(dir) = &self.config.synthetic_dir {
            let modules = read_synthetic_modules(dir, extractor.origins())?;
            self.diagnostics.info(format!(
                "Loaded {} synthetic modules from {}",
                modules.len(),
                dir.display()
            ));
            extraction.modules.extend(modules);
        }

        self.diagnostics.extend(extraction.warnings);

        // Step 3: assemble
        let mut catalog = Catalog::from_modules(extraction.modules);

        // Step 4: site-specific links
        catalog.apply_rewrites(&rewriter);

        // Step 5: caller adjustments
        for removal in &self.config.remove_children {
            if !catalog.remove_child(&removal.declaration, &removal.child) {
                self.diagnostics.warning(format!(
                    "No child `{}` on `{}` to remove",
                    removal.child, removal.declaration
                ));
            }
        }

        let mut detached = Vec::with_capacity(self.config.detach.len());
        for detach in &self.config.detach {
            detached.push(DetachedType {
                declaration: catalog.detach_type(&detach.module, &detach.name)?,
                expanded: detach.expanded,
            });
        }

        info!(
            modules = catalog.len(),
            declarations = catalog.declaration_count(),
            detached = detached.len(),
            warnings = self.diagnostics.warning_count(),
            "built catalog"
        );

        Ok(BuildOutput { catalog, detached })
    }
}
