//! JSDoc parsing and representation
//!
//! This module turns the raw text of a `/** ... */` comment into a
//! [`JsDoc`]: the reconstructed comment text (with inline `{@link}`
//! references joined back in as code-styled names) plus the ordered
//! list of block tags that follow it.

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::fmt;

lazy_static! {
    /// Regex for {@link ...} references
    static ref LINK_REGEX: Regex = Regex::new(
        r"\{@(?:link|linkcode|linkplain)\s+([^\s|}]+)(?:\s*\|\s*|\s+)?([^}]*)\}"
    ).unwrap();

    /// Marker inserted by the loader in place of `// @errors:` directives
    static ref ERRORS_MARKER: Regex = Regex::new(r"/// errors: (.+)").unwrap();

    /// Shorthand for `/** @type {...} */` inside examples
    static ref TYPE_MARKER: Regex = Regex::new(r"/// type: (.+)").unwrap();

    /// Two-space indentation at the start of a line
    static ref SPACE_INDENT: Regex = Regex::new(r"(?m)^(?:  )+").unwrap();
}

/// Closed set of tag kinds the documentation renderer knows about
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TagKind {
    Private,
    Readonly,
    Param,
    Default,
    Returns,
    Deprecated,
    /// Any other tag, keeping the name as written
    Other(String),
}

impl TagKind {
    /// Classify a tag by the name written after `@`
    pub fn from_name(name: &str) -> Self {
        match name {
            "private" => TagKind::Private,
            "readonly" => TagKind::Readonly,
            "param" => TagKind::Param,
            "default" => TagKind::Default,
            "returns" => TagKind::Returns,
            "deprecated" => TagKind::Deprecated,
            other => TagKind::Other(other.to_string()),
        }
    }

    /// The tag name as it appears in source
    pub fn name(&self) -> &str {
        match self {
            TagKind::Private => "private",
            TagKind::Readonly => "readonly",
            TagKind::Param => "param",
            TagKind::Default => "default",
            TagKind::Returns => "returns",
            TagKind::Deprecated => "deprecated",
            TagKind::Other(name) => name,
        }
    }
}

impl fmt::Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.name())
    }
}

/// A single block tag (`@name ...`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsDocTag {
    pub kind: TagKind,

    /// Parameter name, for `@param`
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub name: Option<String>,

    /// Free text following the tag (and the parameter name)
    #[serde(default)]
    pub comment: String,
}

impl JsDocTag {
    /// Free text, or `None` when the tag has none
    pub fn text(&self) -> Option<&str> {
        if self.comment.is_empty() {
            None
        } else {
            Some(&self.comment)
        }
    }
}

/// Parsed JSDoc documentation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsDoc {
    /// Comment text preceding the first tag
    pub comment: String,

    /// Block tags in source order
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub tags: Vec<JsDocTag>,
}

impl JsDoc {
    /// Parse JSDoc from a comment string
    ///
    /// Accepts either a full `/** ... */` comment or the body SWC hands
    /// back for a block comment (which starts at the second `*`).
    pub fn parse(raw: &str) -> Self {
        let lines = clean_jsdoc_lines(raw);

        let mut description: Vec<&str> = Vec::new();
        let mut blocks: Vec<(String, Vec<&str>)> = Vec::new();

        let mut in_fence = false;
        for line in &lines {
            let trimmed = line.trim_start();
            if trimmed.starts_with("```") {
                in_fence = !in_fence;
            }
            let tag = if in_fence { None } else { tag_start(trimmed) };
            match tag {
                Some((name, rest)) => blocks.push((name.to_string(), vec![rest])),
                None => match blocks.last_mut() {
                    Some((_, content)) => content.push(line),
                    None => description.push(line),
                },
            }
        }

        let tags = blocks
            .into_iter()
            .map(|(name, content)| parse_tag(&name, &content.join("\n")))
            .collect();

        Self {
            comment: render_links(description.join("\n").trim()),
            tags,
        }
    }

    /// Whether the comment text is non-empty
    pub fn has_comment(&self) -> bool {
        !self.comment.is_empty()
    }

    /// The deprecation notice, when `@deprecated` is the first tag
    pub fn deprecation_notice(&self) -> Option<String> {
        self.tags
            .first()
            .filter(|tag| tag.kind == TagKind::Deprecated)
            .and_then(|tag| tag.text())
            .map(str::to_string)
    }
}

/// Strip the comment delimiters and the `*` gutter from every line
///
/// One space of margin after the gutter is removed; deeper indentation is
/// kept so fenced examples retain their shape.
fn clean_jsdoc_lines(raw: &str) -> Vec<String> {
    let mut body = raw.trim();
    body = body.strip_prefix("/**").unwrap_or(body);
    if !raw.trim_start().starts_with("/**") {
        body = body.strip_prefix('*').unwrap_or(body);
    }
    body = body.strip_suffix("*/").unwrap_or(body);

    let mut lines: Vec<String> = body
        .lines()
        .enumerate()
        .map(|(i, line)| {
            if i == 0 {
                return line.trim().to_string();
            }
            let content = line.trim_start();
            let content = match content.strip_prefix('*') {
                Some(rest) => rest.strip_prefix(' ').unwrap_or(rest),
                None => content,
            };
            content.trim_end().to_string()
        })
        .collect();

    while lines.first().is_some_and(|l| l.is_empty()) {
        lines.remove(0);
    }
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines
}

/// Recognise `@name rest` at the start of a line
fn tag_start(line: &str) -> Option<(&str, &str)> {
    let after_at = line.strip_prefix('@')?;
    let end = after_at
        .find(|c: char| !(c.is_alphanumeric() || c == '_' || c == '$'))
        .unwrap_or(after_at.len());
    if end == 0 {
        return None;
    }
    Some((&after_at[..end], after_at[end..].trim_start()))
}

fn parse_tag(name: &str, content: &str) -> JsDocTag {
    let kind = TagKind::from_name(name);
    let content = content.trim();

    if kind == TagKind::Param {
        let (param_name, rest) = split_param(content);
        return JsDocTag {
            kind,
            name: Some(param_name),
            comment: render_links(rest.trim_start_matches('-').trim()),
        };
    }

    JsDocTag {
        kind,
        name: None,
        comment: render_links(content),
    }
}

/// Split `{type} [name=default] - text` into the name and the text
fn split_param(content: &str) -> (String, &str) {
    let mut rest = content;
    if rest.starts_with('{') {
        if let Some(close) = find_matching_brace(rest) {
            rest = rest[close + 1..].trim_start();
        }
    }

    if let Some(inner) = rest.strip_prefix('[') {
        if let Some(close) = inner.find(']') {
            let name = inner[..close].split('=').next().unwrap_or("").trim();
            return (name.to_string(), inner[close + 1..].trim_start());
        }
    }

    match rest.find(char::is_whitespace) {
        Some(pos) => (rest[..pos].to_string(), rest[pos..].trim_start()),
        None => (rest.to_string(), ""),
    }
}

/// Find matching closing brace, handling nested braces
fn find_matching_brace(s: &str) -> Option<usize> {
    let mut depth = 0;
    for (i, c) in s.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Join inline cross references back into the text
///
/// `{@link Foo}` becomes `` `Foo` ``; a link to an absolute URL keeps the
/// URL and its label as plain text.
pub fn render_links(text: &str) -> String {
    LINK_REGEX
        .replace_all(text, |caps: &Captures| {
            let target = &caps[1];
            let label = caps.get(2).map(|m| m.as_str().trim()).unwrap_or("");
            if target.contains("://") {
                if label.is_empty() {
                    target.to_string()
                } else {
                    format!("{} {}", target, label)
                }
            } else {
                format!("`{}`", target)
            }
        })
        .into_owned()
}

/// Undo the loader's example-code markers and normalise indentation
pub fn restore_markers(comment: &str) -> String {
    let text = TYPE_MARKER.replace_all(comment, "/** @type {$1} */");
    let text = ERRORS_MARKER.replace_all(&text, "// @errors: $1");
    SPACE_INDENT
        .replace_all(&text, |caps: &Captures| "\t".repeat(caps[0].len() / 2))
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_simple_jsdoc() {
        let doc = JsDoc::parse("/** Hello world */");
        assert_eq!(doc.comment, "Hello world");
        assert!(doc.tags.is_empty());
    }

    #[test]
    fn test_parse_swc_comment_body() {
        // SWC strips the leading `/*` and trailing `*/`
        let doc = JsDoc::parse("*\n\t * First line.\n\t * Second line.\n\t ");
        assert_eq!(doc.comment, "First line.\nSecond line.");
    }

    #[test]
    fn test_link_fragments_are_joined() {
        let doc = JsDoc::parse("/** Works like {@link mount} but hydrates. */");
        assert_eq!(doc.comment, "Works like `mount` but hydrates.");
    }

    #[test]
    fn test_link_to_url_keeps_label() {
        assert_eq!(
            render_links("see {@link https://example.test/docs the docs}"),
            "see https://example.test/docs the docs"
        );
    }

    #[test]
    fn test_tags_in_order() {
        let doc = JsDoc::parse(
            r#"/**
             * Does something.
             * @param {string} path - The file path
             * @default 'utf-8'
             * @returns the contents
             *   across two lines
             */"#,
        );

        assert_eq!(doc.comment, "Does something.");
        let kinds: Vec<_> = doc.tags.iter().map(|t| t.kind.clone()).collect();
        assert_eq!(
            kinds,
            vec![TagKind::Param, TagKind::Default, TagKind::Returns]
        );
        assert_eq!(doc.tags[0].name.as_deref(), Some("path"));
        assert_eq!(doc.tags[0].comment, "The file path");
        assert_eq!(doc.tags[1].comment, "'utf-8'");
        assert_eq!(doc.tags[2].comment, "the contents\n  across two lines");
    }

    #[test]
    fn test_optional_param_name() {
        let doc = JsDoc::parse("/** @param [encoding=utf-8] The encoding */");
        assert_eq!(doc.tags[0].name.as_deref(), Some("encoding"));
        assert_eq!(doc.tags[0].comment, "The encoding");
    }

    #[test]
    fn test_deprecation_notice() {
        let doc = JsDoc::parse("/** @deprecated Use Bar instead */");
        assert_eq!(doc.deprecation_notice().as_deref(), Some("Use Bar instead"));

        let doc = JsDoc::parse("/** @deprecated */");
        assert_eq!(doc.deprecation_notice(), None);

        // Only counts as the first tag
        let doc = JsDoc::parse("/**\n * @since 4\n * @deprecated gone\n */");
        assert_eq!(doc.deprecation_notice(), None);
    }

    #[test]
    fn test_unknown_tag_keeps_name() {
        let doc = JsDoc::parse("/** @since 5.0 */");
        assert_eq!(doc.tags[0].kind, TagKind::Other("since".into()));
        assert_eq!(doc.tags[0].kind.to_string(), "@since");
    }

    #[test]
    fn test_code_indentation_is_preserved() {
        let doc = JsDoc::parse("/**\n * ```js\n * if (x) {\n *   y();\n * }\n * ```\n */");
        assert_eq!(doc.comment, "```js\nif (x) {\n  y();\n}\n```");
    }

    #[test]
    fn test_at_lines_inside_fence_are_content() {
        let doc = JsDoc::parse(
            "/**\n * Styles example:\n * ```css\n * @media (min-width: 600px) {}\n * ```\n * More text after the example.\n * @default 1\n */",
        );
        assert_eq!(
            doc.comment,
            "Styles example:\n```css\n@media (min-width: 600px) {}\n```\nMore text after the example."
        );
        assert_eq!(doc.tags.len(), 1);
        assert_eq!(doc.tags[0].kind, TagKind::Default);
    }

    #[test]
    fn test_restore_markers() {
        let text = "```js\n/// errors: 7031\n/// type: import('./$types').PageLoad\n  foo();\n```";
        assert_eq!(
            restore_markers(text),
            "```js\n// @errors: 7031\n/** @type {import('./$types').PageLoad} */\n\tfoo();\n```"
        );
    }
}
