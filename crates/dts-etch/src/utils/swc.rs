//! SWC/deno_ast TypeScript parsing utilities
//!
//! This module provides utilities for parsing declaration files using
//! deno_ast (which wraps SWC). It handles:
//! - Parsing `.d.ts` sources
//! - Extracting JSDoc comments attached to a node
//! - Converting SWC byte positions into indices into the source text

use crate::diagnostics::{EtchError, EtchResult};
use deno_ast::swc::ast as swc_ast;
use deno_ast::swc::common::comments::{Comment, CommentKind};
use deno_ast::swc::common::{BytePos, Span};
use deno_ast::{MediaType, ParseParams, ParsedSource, SourcePos, StartSourcePos};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Information about the source file
#[derive(Debug, Clone)]
pub struct SourceInfo {
    /// The file path
    pub path: PathBuf,
    /// The source text
    pub text: Arc<str>,
}

impl SourceInfo {
    /// Create source info from a file path and content
    pub fn new(path: impl Into<PathBuf>, text: impl Into<Arc<str>>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }

    /// Get the source text as a string slice
    pub fn source_text(&self) -> &str {
        &self.text
    }

    /// Convert an SWC byte position into an index into the source text
    pub fn byte_index(&self, pos: BytePos) -> usize {
        SourcePos::unsafely_from_byte_pos(pos)
            .as_byte_index(StartSourcePos::START_SOURCE_POS)
            .min(self.text.len())
    }

    /// Extract source text for a span
    pub fn text_for_span(&self, span: Span) -> &str {
        self.text_between(span.lo, span.hi)
    }

    /// Extract source text between two positions
    pub fn text_between(&self, lo: BytePos, hi: BytePos) -> &str {
        let start = self.byte_index(lo);
        let end = self.byte_index(hi).max(start);
        &self.text[start..end]
    }

    /// Whitespace between the start of the line and `pos`
    ///
    /// Empty when anything other than whitespace precedes `pos` on its line.
    pub fn line_indent(&self, pos: BytePos) -> &str {
        let index = self.byte_index(pos);
        let line_start = self.text[..index].rfind('\n').map_or(0, |i| i + 1);
        let prefix = &self.text[line_start..index];
        if prefix.chars().all(|c| c == ' ' || c == '\t') {
            prefix
        } else {
            ""
        }
    }
}

/// A parsed declaration file with source information
#[derive(Debug)]
pub struct ParsedModule {
    /// The parsed source from deno_ast
    pub source: ParsedSource,
    /// Source information for text lookups
    pub source_info: SourceInfo,
}

impl ParsedModule {
    /// Get the module AST
    pub fn module(&self) -> EtchResult<&swc_ast::Module> {
        match self.source.program_ref() {
            deno_ast::ProgramRef::Module(m) => Ok(m),
            deno_ast::ProgramRef::Script(_) => Err(EtchError::TypeScriptParse(format!(
                "{} parsed as a script, expected a module",
                self.path().display()
            ))),
        }
    }

    /// Get the source text
    pub fn source_text(&self) -> &str {
        self.source_info.source_text()
    }

    /// Get the file path
    pub fn path(&self) -> &Path {
        &self.source_info.path
    }

    /// Extract source text for a span
    pub fn text_for_span(&self, span: Span) -> &str {
        self.source_info.text_for_span(span)
    }

    /// Get leading comments for a position
    pub fn leading_comments(&self, pos: BytePos) -> Vec<Comment> {
        let source_pos = SourcePos::unsafely_from_byte_pos(pos);
        self.source
            .comments()
            .get_leading(source_pos)
            .map(|v| v.to_vec())
            .unwrap_or_default()
    }

    /// Get trailing comments for a position
    pub fn trailing_comments(&self, pos: BytePos) -> Vec<Comment> {
        let source_pos = SourcePos::unsafely_from_byte_pos(pos);
        self.source
            .comments()
            .get_trailing(source_pos)
            .map(|v| v.to_vec())
            .unwrap_or_default()
    }

    /// Get the JSDoc comment body for a span (the closest leading `/** */`)
    ///
    /// A doc comment sharing a line with the previous token (`{ /** a */ a`)
    /// is attached to that token as a trailing comment, so those are
    /// considered too when nothing leads the span.
    pub fn jsdoc_for_span(&self, span: Span) -> Option<String> {
        let leading = self.leading_comments(span.lo);
        if let Some(comment) = leading.iter().rev().find(|c| is_jsdoc(c)) {
            return Some(comment.text.to_string());
        }

        self.source
            .comments()
            .get_vec()
            .into_iter()
            .filter(|c| is_jsdoc(c) && c.span.hi <= span.lo)
            .filter(|c| {
                self.source_info
                    .text_between(c.span.hi, span.lo)
                    .trim()
                    .is_empty()
            })
            .max_by_key(|c| c.span.hi)
            .map(|c| c.text.to_string())
    }
}

fn is_jsdoc(comment: &Comment) -> bool {
    comment.kind == CommentKind::Block && comment.text.starts_with('*')
}

/// Parse declaration source code from a string
pub fn parse_declaration_source(
    path: impl AsRef<Path>,
    source: impl Into<Arc<str>>,
) -> EtchResult<ParsedModule> {
    let path = absolute_path(path.as_ref())?;
    let source: Arc<str> = source.into();

    // `.d.ts` resolves to MediaType::Dts
    let media_type = MediaType::from_path(&path);

    let specifier = deno_ast::ModuleSpecifier::from_file_path(&path)
        .map_err(|_| EtchError::InvalidPath(path.display().to_string()))?;

    let parsed = deno_ast::parse_module(ParseParams {
        specifier,
        text: source.clone(),
        media_type,
        capture_tokens: true,
        scope_analysis: false,
        maybe_syntax: None,
    })
    .map_err(|e| EtchError::TypeScriptParse(format!("{}: {}", path.display(), e)))?;

    Ok(ParsedModule {
        source: parsed,
        source_info: SourceInfo::new(path, source),
    })
}

/// Module specifiers need absolute paths
fn absolute_path(path: &Path) -> EtchResult<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

/// Helper to convert Wtf8Atom to String
pub fn wtf8_to_string(s: &swc_ast::Str) -> String {
    String::from_utf8_lossy(s.value.as_bytes()).into_owned()
}

/// Name of an ambient module or namespace
pub fn module_name(name: &swc_ast::TsModuleName) -> String {
    match name {
        swc_ast::TsModuleName::Ident(i) => i.sym.to_string(),
        swc_ast::TsModuleName::Str(s) => wtf8_to_string(s),
    }
}

/// Name of an interface or type-literal member key
pub fn expr_key_name(expr: &swc_ast::Expr) -> Option<String> {
    match expr {
        swc_ast::Expr::Ident(i) => Some(i.sym.to_string()),
        swc_ast::Expr::Lit(swc_ast::Lit::Str(s)) => Some(wtf8_to_string(s)),
        swc_ast::Expr::Lit(swc_ast::Lit::Num(n)) => Some(n.value.to_string()),
        _ => None,
    }
}

/// Get the name of a class member key
pub fn prop_name_str(name: &swc_ast::PropName) -> Option<String> {
    match name {
        swc_ast::PropName::Ident(i) => Some(i.sym.to_string()),
        swc_ast::PropName::Str(s) => Some(wtf8_to_string(s)),
        swc_ast::PropName::Num(n) => Some(n.value.to_string()),
        swc_ast::PropName::BigInt(b) => Some(b.value.to_string()),
        swc_ast::PropName::Computed(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deno_ast::swc::common::Spanned;

    #[test]
    fn test_parse_declaration_source() {
        let source = "declare module 'svelte' {\n\texport function tick(): Promise<void>;\n}\n";

        // deno_ast requires absolute paths for file specifiers
        let parsed = parse_declaration_source("/tmp/index.d.ts", source).unwrap();
        assert_eq!(parsed.module().unwrap().body.len(), 1);
    }

    #[test]
    fn test_text_for_span_matches_source() {
        let source = "export interface Foo {\n\ta: string;\n}\n";
        let parsed = parse_declaration_source("/tmp/test.d.ts", source).unwrap();
        let item = &parsed.module().unwrap().body[0];

        assert_eq!(
            parsed.text_for_span(item.span()),
            "export interface Foo {\n\ta: string;\n}"
        );
    }

    #[test]
    fn test_jsdoc_extraction() {
        let source = r#"
/** not this one */
/**
 * This is a JSDoc comment
 * @param x - The input
 */
export function test(x: number): void;
"#;

        let parsed = parse_declaration_source("/tmp/test.d.ts", source).unwrap();
        let item = &parsed.module().unwrap().body[0];

        let jsdoc = parsed.jsdoc_for_span(item.span()).unwrap();
        assert!(jsdoc.contains("This is a JSDoc comment"));
        assert!(jsdoc.contains("@param"));
        assert!(!jsdoc.contains("not this one"));
    }

    #[test]
    fn test_jsdoc_on_same_line_as_previous_token() {
        let source = "export interface Foo { /** a */ a: string; /** b */ b: number }\n";
        let parsed = parse_declaration_source("/tmp/test.d.ts", source).unwrap();
        let start = StartSourcePos::START_SOURCE_POS.as_byte_pos();
        let span_at = |needle: &str| {
            let at = source.find(needle).unwrap() as u32;
            Span::new(start + BytePos(at), start + BytePos(at + 1))
        };

        assert_eq!(parsed.jsdoc_for_span(span_at("a: string")).as_deref(), Some("* a "));
        assert_eq!(parsed.jsdoc_for_span(span_at("b: number")).as_deref(), Some("* b "));
        assert!(parsed.jsdoc_for_span(span_at("string")).is_none());
    }

    #[test]
    fn test_line_indent() {
        let source = "declare module 'a' {\n\t\texport const x: number;\n}\n";
        let info = SourceInfo::new("/tmp/a.d.ts", source);
        let export_at = source.find("export").unwrap();
        let pos = StartSourcePos::START_SOURCE_POS.as_byte_pos() + BytePos(export_at as u32);

        assert_eq!(info.line_indent(pos), "\t\t");
    }
}
