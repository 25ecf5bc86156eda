//! Module collection and declaration extraction
//!
//! This module walks a parsed declaration file and produces [`Module`]s:
//! - `declare module '…' { … }` blocks become one module each
//! - a whole file can be read as a single module of top-level exports
//! - exported declarations are split into `types` and `exports`
//!
//! Fatal problems (an export without a usable name) abort the file; unknown
//! JSDoc tags are returned as warnings next to the extracted modules.

use crate::decl::ExportedDecl;
use crate::diagnostics::{Diagnostic, EtchError, EtchResult};
use crate::js_doc::{restore_markers, JsDoc};
use crate::links::OriginStripper;
use crate::loader::read_declaration_file;
use crate::members::MemberContext;
use crate::node::{Declaration, Module};
use crate::snippet::{collapse_body, PlainFormatter, SnippetFormatter};
use crate::utils::swc::{module_name, parse_declaration_source, ParsedModule};
use deno_ast::swc::ast as swc_ast;
use deno_ast::swc::common::Span;
use regex::{Regex, RegexBuilder};
use std::path::Path;
use tracing::debug;

/// Comments matching this (case-insensitively) mark a member as internal
pub const DEFAULT_PRIVACY_PATTERN: &str = "private api|DO NOT USE";

/// Documentation origins stripped from links by default
pub const DEFAULT_ORIGINS: &[&str] = &["https://svelte.dev", "https://kit.svelte.dev"];

/// Modules and warnings extracted from one or more files
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    pub modules: Vec<Module>,
    pub warnings: Vec<Diagnostic>,
}

impl Extraction {
    /// Append another extraction
    pub fn extend(&mut self, other: Extraction) {
        self.modules.extend(other.modules);
        self.warnings.extend(other.warnings);
    }
}

/// Declarations of one module, already routed and sorted
#[derive(Debug, Default)]
struct Buckets {
    types: Vec<Declaration>,
    exports: Vec<Declaration>,
    warnings: Vec<Diagnostic>,
}

/// Compile a privacy pattern; matching is always case-insensitive
pub fn privacy_regex(pattern: &str) -> EtchResult<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| EtchError::config(format!("invalid privacy pattern `{}`: {}", pattern, e)))
}

/// Extracts documentation modules from declaration files
pub struct Extractor {
    ignore: Vec<String>,
    privacy: Regex,
    origins: OriginStripper,
    formatter: Box<dyn SnippetFormatter>,
}

impl std::fmt::Debug for Extractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Extractor")
            .field("ignore", &self.ignore)
            .field("privacy", &self.privacy.as_str())
            .finish_non_exhaustive()
    }
}

impl Extractor {
    /// Create an extractor with the given privacy pattern and origins
    pub fn new<S: AsRef<str>>(privacy_pattern: &str, origins: &[S]) -> EtchResult<Self> {
        Ok(Self {
            ignore: Vec::new(),
            privacy: privacy_regex(privacy_pattern)?,
            origins: OriginStripper::new(origins)?,
            formatter: Box::new(PlainFormatter),
        })
    }

    /// Create an extractor with the default privacy pattern and origins
    pub fn with_defaults() -> EtchResult<Self> {
        Self::new(DEFAULT_PRIVACY_PATTERN, DEFAULT_ORIGINS)
    }

    /// Skip modules with these fully qualified names
    pub fn ignore<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore.extend(names.into_iter().map(Into::into));
        self
    }

    /// Use a different snippet formatter
    pub fn formatter(mut self, formatter: Box<dyn SnippetFormatter>) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn origins(&self) -> &OriginStripper {
        &self.origins
    }

    /// Read a file of ambient `declare module` blocks
    pub fn ambient_modules(&self, path: impl AsRef<Path>) -> EtchResult<Extraction> {
        let path = path.as_ref();
        let text = read_declaration_file(path)?;
        let parsed = parse_declaration_source(path, text)?;
        self.collect_modules(&parsed)
    }

    /// Read a whole file as one module named `name`
    pub fn file_module(&self, path: impl AsRef<Path>, name: &str) -> EtchResult<Extraction> {
        let path = path.as_ref();
        let text = read_declaration_file(path)?;
        let parsed = parse_declaration_source(path, text)?;
        self.extract_file_module(&parsed, name)
    }

    /// Collect every non-ignored ambient module in encounter order
    pub fn collect_modules(&self, parsed: &ParsedModule) -> EtchResult<Extraction> {
        let mut extraction = Extraction::default();

        for item in &parsed.module()?.body {
            let ts_module = match item {
                swc_ast::ModuleItem::Stmt(swc_ast::Stmt::Decl(swc_ast::Decl::TsModule(m))) => m,
                swc_ast::ModuleItem::ModuleDecl(swc_ast::ModuleDecl::ExportDecl(
                    swc_ast::ExportDecl {
                        decl: swc_ast::Decl::TsModule(m),
                        ..
                    },
                )) => m,
                _ => continue,
            };

            let name = module_name(&ts_module.id);
            if self.ignore.contains(&name) {
                debug!(module = %name, "skipping ignored module");
                continue;
            }

            let comment = parsed
                .jsdoc_for_span(ts_module.span)
                .map(|raw| self.clean_comment(&JsDoc::parse(&raw).comment))
                .unwrap_or_default();

            let buckets = self.extract_declarations(parsed, &name, module_items(ts_module))?;
            extraction.modules.push(self.assemble(name, comment, buckets, &mut extraction.warnings));
        }

        Ok(extraction)
    }

    /// Treat the top-level exports of a file as one module
    pub fn extract_file_module(&self, parsed: &ParsedModule, name: &str) -> EtchResult<Extraction> {
        let buckets = self.extract_declarations(parsed, name, &parsed.module()?.body)?;
        let mut warnings = Vec::new();
        let module = self.assemble(name.to_string(), String::new(), buckets, &mut warnings);
        Ok(Extraction {
            modules: vec![module],
            warnings,
        })
    }

    fn assemble(
        &self,
        name: String,
        comment: String,
        buckets: Buckets,
        warnings: &mut Vec<Diagnostic>,
    ) -> Module {
        debug!(
            module = %name,
            types = buckets.types.len(),
            exports = buckets.exports.len(),
            "extracted module"
        );
        warnings.extend(buckets.warnings);
        Module {
            name,
            comment,
            types: buckets.types,
            exports: buckets.exports,
            exempt: false,
        }
    }

    /// Extract the exported declarations among `items`
    fn extract_declarations(
        &self,
        parsed: &ParsedModule,
        module: &str,
        items: &[swc_ast::ModuleItem],
    ) -> EtchResult<Buckets> {
        let mut buckets = Buckets::default();

        for item in items {
            let (span, decl) = match item {
                swc_ast::ModuleItem::ModuleDecl(swc_ast::ModuleDecl::ExportDecl(export)) => {
                    match ExportedDecl::from_decl(&export.decl) {
                        Some(decl) => (export.span, decl),
                        None => continue,
                    }
                }
                swc_ast::ModuleItem::ModuleDecl(swc_ast::ModuleDecl::ExportDefaultDecl(export)) => {
                    (export.span, ExportedDecl::from_default_decl(&export.decl))
                }
                // Not exported, or a re-export without a declaration of its own
                _ => continue,
            };

            let (declaration, warnings) = self.extract_declaration(parsed, module, span, decl)?;
            buckets.warnings.extend(warnings);

            if decl.kind().is_export() {
                buckets.exports.push(declaration);
            } else {
                buckets.types.push(declaration);
            }
        }

        buckets.types.sort_by(|a, b| a.name.cmp(&b.name));
        buckets.exports.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(buckets)
    }

    /// Extract one exported declaration; `span` is the whole export statement
    fn extract_declaration(
        &self,
        parsed: &ParsedModule,
        module: &str,
        span: Span,
        decl: ExportedDecl<'_>,
    ) -> EtchResult<(Declaration, Vec<Diagnostic>)> {
        let info = &parsed.source_info;

        let name = decl.name().ok_or_else(|| {
            let text = info.text_for_span(span);
            EtchError::malformed(
                module,
                format!(
                    "cannot name {} declaration `{}`",
                    decl.kind(),
                    text.lines().next().unwrap_or_default().trim()
                ),
            )
        })?;

        let doc = parsed
            .jsdoc_for_span(span)
            .map(|raw| JsDoc::parse(&raw))
            .unwrap_or_default();

        let members = decl.members();
        let (children, warnings) = if decl.kind().has_members() {
            let ctx = MemberContext {
                parsed,
                privacy: &self.privacy,
                origins: &self.origins,
            };
            ctx.extract_all(&members, 1)
        } else {
            (Vec::new(), Vec::new())
        };

        let raw = raw_snippet(parsed, span, &decl, !members.is_empty());
        let snippet = self.formatter.format(&raw)?;

        debug!(module, declaration = %name, kind = %decl.kind(), "extracted declaration");

        let declaration = Declaration {
            name,
            comment: self.clean_comment(&doc.comment),
            snippet,
            deprecated: doc.deprecation_notice().map(|n| self.origins.strip(&n)),
            children,
            bullets: None,
        };
        Ok((declaration, warnings))
    }

    fn clean_comment(&self, comment: &str) -> String {
        self.origins.strip(&restore_markers(comment))
    }
}

/// The statement text after its `export` keyword, member body collapsed
fn raw_snippet(parsed: &ParsedModule, span: Span, decl: &ExportedDecl<'_>, collapse: bool) -> String {
    let info = &parsed.source_info;
    let start = info.byte_index(span.lo);
    let text = info.text_for_span(span);
    let offset = text.find("export").map_or(0, |i| i + "export".len());
    let body_text = &text[offset..];

    let body = if collapse { decl.body_span(info) } else { None };
    let snippet = match body {
        Some(body) => {
            let lo = info.byte_index(body.lo).checked_sub(start + offset);
            let hi = info.byte_index(body.hi).checked_sub(start + offset);
            match (lo, hi) {
                (Some(lo), Some(hi)) => collapse_body(body_text, lo..hi),
                _ => body_text.to_string(),
            }
        }
        None => body_text.to_string(),
    };

    snippet.trim().to_string()
}

/// Statements inside a `declare module` or (possibly dotted) namespace
fn module_items(decl: &swc_ast::TsModuleDecl) -> &[swc_ast::ModuleItem] {
    let mut body = decl.body.as_ref();
    while let Some(current) = body {
        match current {
            swc_ast::TsNamespaceBody::TsModuleBlock(block) => return &block.body,
            swc_ast::TsNamespaceBody::TsNamespaceDecl(inner) => body = Some(&*inner.body),
        }
    }
    &[]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::SAMPLE_DTS;
    use pretty_assertions::assert_eq;

    fn extract(source: &str) -> Extraction {
        let parsed = parse_declaration_source("/tmp/index.d.ts", source).unwrap();
        Extractor::with_defaults()
            .unwrap()
            .collect_modules(&parsed)
            .unwrap()
    }

    fn module_of(source: &str) -> Module {
        extract(source).modules.remove(0)
    }

    #[test]
    fn test_collapsed_interface_keeps_documented_members() {
        let module = module_of(
            "declare module 'm' {\n\texport interface Foo { /** a */ a: string; /** @private */ b: number }\n}",
        );

        let foo = &module.types[0];
        assert_eq!(foo.name, "Foo");
        assert_eq!(foo.snippet, "interface Foo {/*…*/}");
        assert_eq!(foo.children.len(), 1);
        assert_eq!(foo.children[0].name, "a");
        assert_eq!(foo.children[0].comment, "a");
        assert!(!foo.snippet.contains("a: string"));
    }

    #[test]
    fn test_same_line_privacy_pattern_drops_member() {
        let module = module_of(
            "declare module 'm' {\n\texport interface Foo { /** Shown */ a: string; /** DO NOT USE */ b: number }\n}",
        );

        let foo = &module.types[0];
        let children: Vec<_> = foo
            .children
            .iter()
            .map(|c| (c.name.as_str(), c.comment.as_str()))
            .collect();
        assert_eq!(children, vec![("a", "Shown")]);
        assert_eq!(foo.snippet, "interface Foo {/*…*/}");
    }

    #[test]
    fn test_empty_interface_is_not_collapsed() {
        let module = module_of("declare module 'm' {\n\texport interface Empty {}\n}");
        assert_eq!(module.types[0].snippet, "interface Empty {}");
        assert!(module.types[0].children.is_empty());
    }

    #[test]
    fn test_all_private_members_still_collapse() {
        let module = module_of(
            "declare module 'm' {\n\texport interface Hidden {\n\t\t/** DO NOT USE */\n\t\tx: number;\n\t}\n}",
        );
        assert_eq!(module.types[0].snippet, "interface Hidden {/*…*/}");
        assert!(module.types[0].children.is_empty());
    }

    #[test]
    fn test_deprecation_notice() {
        let module = module_of(
            "declare module 'm' {\n\t/** @deprecated Use Bar instead */\n\texport function foo(): void;\n}",
        );
        assert_eq!(module.exports[0].deprecated.as_deref(), Some("Use Bar instead"));
    }

    #[test]
    fn test_buckets_sorted_by_name() {
        let module = module_of(
            "declare module 'm' {\n\texport interface Banana {}\n\texport type Apple = string;\n\texport const zeta: number;\n\texport function alpha(): void;\n}",
        );

        let types: Vec<_> = module.types.iter().map(|d| d.name.as_str()).collect();
        let exports: Vec<_> = module.exports.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(types, vec!["Apple", "Banana"]);
        assert_eq!(exports, vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_non_exported_statements_skipped() {
        let module = module_of(
            "declare module 'm' {\n\tinterface Internal {}\n\texport interface Public {}\n}",
        );
        assert_eq!(module.names(), vec!["Public"]);
    }

    #[test]
    fn test_ignored_modules_skipped() {
        let parsed = parse_declaration_source(
            "/tmp/index.d.ts",
            "declare module '*.svelte' {\n\texport const x: number;\n}\ndeclare module 'svelte' {}\n",
        )
        .unwrap();
        let extraction = Extractor::with_defaults()
            .unwrap()
            .ignore(["*.svelte"])
            .collect_modules(&parsed)
            .unwrap();

        let names: Vec<_> = extraction.modules.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["svelte"]);
    }

    #[test]
    fn test_module_comment_strips_origin() {
        let module = module_of(
            "/**\n * See https://svelte.dev/docs/svelte\n */\ndeclare module 'svelte' {}\n",
        );
        assert_eq!(module.comment, "See /docs/svelte");
    }

    #[test]
    fn test_anonymous_default_export_is_malformed() {
        let parsed = parse_declaration_source(
            "/tmp/index.d.ts",
            "declare module 'm' {\n\texport default function (): void;\n}",
        )
        .unwrap();
        let err = Extractor::with_defaults()
            .unwrap()
            .collect_modules(&parsed)
            .unwrap_err();
        assert!(matches!(err, EtchError::MalformedSource { ref module, .. } if module == "m"));
    }

    #[test]
    fn test_sample_is_deterministic() {
        assert_eq!(extract(SAMPLE_DTS), extract(SAMPLE_DTS));
    }

    #[test]
    fn test_sample_shape() {
        let parsed = parse_declaration_source("/tmp/index.d.ts", SAMPLE_DTS).unwrap();
        let extraction = Extractor::with_defaults()
            .unwrap()
            .ignore(["*.svelte"])
            .collect_modules(&parsed)
            .unwrap();

        let names: Vec<_> = extraction.modules.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["svelte", "svelte/store"]);

        let svelte = &extraction.modules[0];
        assert_eq!(
            svelte.names(),
            vec!["tick", "ComponentConstructorOptions", "SvelteComponent"]
        );

        let options = svelte.declaration("ComponentConstructorOptions").unwrap();
        assert_eq!(
            options.snippet,
            "interface ComponentConstructorOptions<Props extends Record<string, any> = Record<string, any>> {/*…*/}"
        );
        let children: Vec<_> = options.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(children, vec!["target", "props", "hydrate"]);

        let component = svelte.declaration("SvelteComponent").unwrap();
        assert_eq!(
            component.snippet,
            "class SvelteComponent<Props extends Record<string, any> = any> {/*…*/}"
        );
        assert_eq!(component.comment, "Base class for Svelte components.\nSee /docs/svelte/svelte for more.");
        let children: Vec<_> = component.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(children, vec!["constructor", "$destroy"]);

        assert!(svelte.declaration("tick").unwrap().children.is_empty());
        assert!(svelte.declaration("NotExported").is_none());

        // `@since` on `hydrate`
        assert_eq!(extraction.warnings.len(), 1);
    }

    #[test]
    fn test_file_module() {
        let parsed = parse_declaration_source(
            "/tmp/private.d.ts",
            "export interface Logger {\n\t/** Log a message */\n\t(msg: string): void;\n}\nexport type MaybePromise<T> = T | Promise<T>;\n",
        )
        .unwrap();
        let extraction = Extractor::with_defaults()
            .unwrap()
            .extract_file_module(&parsed, "Private types")
            .unwrap();

        let module = &extraction.modules[0];
        assert_eq!(module.name, "Private types");
        assert_eq!(module.names(), vec!["Logger", "MaybePromise"]);
        assert_eq!(module.types[0].children[0].name, "unknown");
    }
}
