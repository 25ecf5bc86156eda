//! Member extraction
//!
//! Members of interfaces, classes, and documented type literals become
//! child [`Declaration`]s. Extraction is a pure recursive function: each
//! call returns the owned subtree for one member together with the
//! warnings raised while rendering its tags.

use crate::decl::Member;
use crate::diagnostics::Diagnostic;
use crate::js_doc::{restore_markers, JsDoc, TagKind};
use crate::links::OriginStripper;
use crate::node::Declaration;
use crate::snippet::{dedent, ELLIPSIS};
use crate::tags::render_tags;
use crate::utils::swc::{ParsedModule, SourceInfo};
use deno_ast::swc::common::Span;
use regex::Regex;
use tracing::debug;

/// Everything member extraction reads; shared by every call in a tree
#[derive(Clone, Copy)]
pub struct MemberContext<'a> {
    pub parsed: &'a ParsedModule,
    pub privacy: &'a Regex,
    pub origins: &'a OriginStripper,
}

/// A member subtree and the warnings raised while extracting it
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extracted {
    pub declaration: Declaration,
    pub warnings: Vec<Diagnostic>,
}

impl<'a> MemberContext<'a> {
    fn info(&self) -> &'a SourceInfo {
        &self.parsed.source_info
    }

    fn doc_for(&self, span: Span) -> JsDoc {
        self.parsed
            .jsdoc_for_span(span)
            .map(|raw| JsDoc::parse(&raw))
            .unwrap_or_default()
    }

    /// Whether a member is internal and must be left out entirely
    pub fn is_private(&self, doc: &JsDoc) -> bool {
        self.privacy.is_match(&doc.comment)
            || doc
                .tags
                .iter()
                .any(|tag| tag.kind == TagKind::Private && tag.comment.is_empty())
    }

    /// Extract every member of a body in source order, skipping private ones
    pub fn extract_all(
        &self,
        members: &[Member<'_>],
        depth: usize,
    ) -> (Vec<Declaration>, Vec<Diagnostic>) {
        let mut children = Vec::with_capacity(members.len());
        let mut warnings = Vec::new();

        for member in members {
            if let Some(extracted) = self.extract(*member, depth) {
                children.push(extracted.declaration);
                warnings.extend(extracted.warnings);
            }
        }

        (children, warnings)
    }

    /// Extract one member at `depth` (1 for direct members of a declaration)
    pub fn extract(&self, member: Member<'_>, depth: usize) -> Option<Extracted> {
        let span = member.span();
        let doc = self.doc_for(span);
        let info = self.info();
        let name = member.name(info);

        if self.is_private(&doc) {
            debug!(member = %name, depth, "skipping private member");
            return None;
        }

        let mut snippet = dedent(&member_text(info, span), info.line_indent(span.lo));
        let mut children = Vec::new();
        let mut warnings = Vec::new();

        if let Some(literal) = member.type_literal() {
            let nested: Vec<Member<'_>> = literal.members.iter().map(Member::Type).collect();
            let documented = nested.iter().any(|m| self.doc_for(m.span()).has_comment());

            if documented {
                let head = info.text_between(span.lo, literal.span.lo);
                snippet = format!("{}{{{}}}", head, ELLIPSIS);

                let (nested_children, nested_warnings) = self.extract_all(&nested, depth + 1);
                children = nested_children;
                warnings.extend(nested_warnings);
            }
        }

        let rendered = render_tags(&doc.tags);
        warnings.extend(
            rendered
                .warnings
                .into_iter()
                .map(|w| w.in_file(&info.path)),
        );

        let bullets = rendered
            .bullets
            .iter()
            .map(|b| self.origins.strip(b))
            .collect();

        Some(Extracted {
            declaration: Declaration {
                name,
                comment: self.origins.strip(&restore_markers(&doc.comment)),
                snippet,
                deprecated: None,
                children,
                bullets: Some(bullets),
            },
            warnings,
        })
    }
}

/// Member source text, including a directly following `;`
fn member_text(info: &SourceInfo, span: Span) -> String {
    let text = info.text_for_span(span);
    let end = info.byte_index(span.hi);
    if !text.ends_with(';') && info.source_text()[end..].starts_with(';') {
        format!("{};", text)
    } else {
        text.to_string()
    }
}
