//! Tag-to-bullet rendering
//!
//! Each recognised [`TagKind`] maps to one bullet line. Anything else is
//! reported as an unknown-tag warning and contributes no bullet.

use crate::diagnostics::Diagnostic;
use crate::js_doc::{JsDocTag, TagKind};
use tracing::warn;

/// Bullets rendered for one member, plus warnings for tags that were skipped
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderedTags {
    pub bullets: Vec<String>,
    pub warnings: Vec<Diagnostic>,
}

/// Render a single tag, or `None` for an unrecognised kind
pub fn render_tag(tag: &JsDocTag) -> Option<String> {
    let text = tag.comment.as_str();
    let line = match &tag.kind {
        TagKind::Private => marker("tag", "private", text),
        TagKind::Readonly => marker("tag", "readonly", text),
        TagKind::Param => {
            let name = tag.name.as_deref().unwrap_or_default();
            join(format!("- `{}`", name), text)
        }
        TagKind::Default => format!("- <span class=\"tag\">default</span> `{}`", text),
        TagKind::Returns => marker("tag", "returns", text),
        TagKind::Deprecated => marker("tag deprecated", "deprecated", text),
        TagKind::Other(_) => return None,
    };
    Some(line)
}

/// Render every tag in order, collecting a warning per unknown tag
pub fn render_tags(tags: &[JsDocTag]) -> RenderedTags {
    let mut rendered = RenderedTags::default();

    for tag in tags {
        match render_tag(tag) {
            Some(bullet) => rendered.bullets.push(bullet),
            None => {
                warn!(tag = %tag.kind, "unhandled JSDoc tag");
                rendered.warnings.push(Diagnostic::unknown_tag(tag.kind.name()));
            }
        }
    }

    rendered
}

fn marker(class: &str, label: &str, text: &str) -> String {
    join(
        format!("- <span class=\"{}\">{}</span>", class, label),
        text,
    )
}

fn join(head: String, text: &str) -> String {
    if text.is_empty() {
        head
    } else {
        format!("{} {}", head, text)
    }
}
