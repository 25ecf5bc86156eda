//! Catalog data model
//!
//! A [`Module`] is one ambient namespace of the documentation surface and
//! holds its exported [`Declaration`]s split into two buckets: `types`
//! (classes, interfaces, type aliases, namespaces) and `exports`
//! (variables and functions). The same `Declaration` record is used for
//! nested members, which hang off their parent's `children`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of an exported top-level declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DeclKind {
    Class,
    Interface,
    TypeAlias,
    Namespace,
    Variable,
    Function,
}

impl DeclKind {
    /// Whether this kind lands in a module's `exports` bucket
    pub fn is_export(&self) -> bool {
        matches!(self, DeclKind::Variable | DeclKind::Function)
    }

    /// Whether the declaration has a member body that gets collapsed
    pub fn has_members(&self) -> bool {
        matches!(self, DeclKind::Class | DeclKind::Interface)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DeclKind::Class => "class",
            DeclKind::Interface => "interface",
            DeclKind::TypeAlias => "type",
            DeclKind::Namespace => "namespace",
            DeclKind::Variable => "variable",
            DeclKind::Function => "function",
        }
    }
}

impl fmt::Display for DeclKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An extracted documentation record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Declaration {
    pub name: String,

    /// Reconstructed documentation comment
    #[serde(default)]
    pub comment: String,

    /// Source text, with member bodies collapsed to `{/*…*/}`
    pub snippet: String,

    /// Notice from a leading `@deprecated` tag
    #[serde(default)]
    pub deprecated: Option<String>,

    /// Documented members in source order
    #[serde(default)]
    pub children: Vec<Declaration>,

    /// Rendered tag bullets (members only)
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub bullets: Option<Vec<String>>,
}

impl Declaration {
    /// Create a declaration with a name and snippet
    pub fn new(name: impl Into<String>, snippet: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            snippet: snippet.into(),
            ..Default::default()
        }
    }

    /// Set the comment
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    /// Find a direct child by name
    pub fn child(&self, name: &str) -> Option<&Declaration> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Visit every text field of this declaration and its subtree
    ///
    /// Names are left alone so catalog lookups keep working.
    pub fn rewrite_strings(&mut self, f: &mut impl FnMut(&str) -> String) {
        self.comment = f(&self.comment);
        self.snippet = f(&self.snippet);
        if let Some(notice) = self.deprecated.as_mut() {
            *notice = f(notice);
        }
        if let Some(bullets) = self.bullets.as_mut() {
            for bullet in bullets.iter_mut() {
                *bullet = f(bullet);
            }
        }
        for child in &mut self.children {
            child.rewrite_strings(f);
        }
    }
}

/// One ambient module of the documentation surface
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    pub name: String,

    #[serde(default)]
    pub comment: String,

    /// Classes, interfaces, type aliases and namespaces, sorted by name
    #[serde(default)]
    pub types: Vec<Declaration>,

    /// Variables and functions, sorted by name
    #[serde(default)]
    pub exports: Vec<Declaration>,

    /// Prose-only module without declarations of its own
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub exempt: bool,
}

impl Module {
    /// Create an empty module
    pub fn new(name: impl Into<String>, comment: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            comment: comment.into(),
            ..Default::default()
        }
    }

    /// Sort both buckets by name (ordinal, stable)
    pub fn sort(&mut self) {
        self.types.sort_by(|a, b| a.name.cmp(&b.name));
        self.exports.sort_by(|a, b| a.name.cmp(&b.name));
    }

    /// Look up a declaration in either bucket, exports first
    pub fn declaration(&self, name: &str) -> Option<&Declaration> {
        self.exports
            .iter()
            .chain(self.types.iter())
            .find(|d| d.name == name)
    }

    /// Names of every export and type, in rendering order
    pub fn names(&self) -> Vec<&str> {
        self.exports
            .iter()
            .chain(self.types.iter())
            .map(|d| d.name.as_str())
            .collect()
    }

    /// Append another module's declarations (a module declared twice)
    pub fn merge(&mut self, other: Module) {
        if self.comment.is_empty() {
            self.comment = other.comment;
        }
        self.types.extend(other.types);
        self.exports.extend(other.exports);
        self.exempt &= other.exempt;
    }

    /// Visit every string field of the module and its declarations
    pub fn rewrite_strings(&mut self, f: &mut impl FnMut(&str) -> String) {
        self.comment = f(&self.comment);
        for decl in self.types.iter_mut().chain(self.exports.iter_mut()) {
            decl.rewrite_strings(f);
        }
    }
}
