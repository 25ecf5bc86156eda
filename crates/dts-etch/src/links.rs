//! Link rewriting
//!
//! Declaration files carry fully qualified documentation URLs so they turn
//! into links inside editors. [`OriginStripper`] removes the known origins
//! so those links become root-relative; [`LinkRewriter`] applies the
//! site-specific route rules configured on top of that.

use crate::diagnostics::{EtchError, EtchResult};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Removes known documentation origins from absolute links
#[derive(Debug, Clone, Default)]
pub struct OriginStripper {
    pattern: Option<Regex>,
}

impl OriginStripper {
    /// Build a stripper for a set of origins such as `https://svelte.dev`
    pub fn new<S: AsRef<str>>(origins: &[S]) -> EtchResult<Self> {
        let mut origins: Vec<&str> = origins
            .iter()
            .map(|o| o.as_ref().trim_end_matches('/'))
            .filter(|o| !o.is_empty())
            .collect();
        if origins.is_empty() {
            return Ok(Self::default());
        }

        // Longest first so a more specific origin wins
        origins.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
        let alternation = origins
            .iter()
            .map(|o| regex::escape(o))
            .collect::<Vec<_>>()
            .join("|");

        let pattern = Regex::new(&format!(r"(?:{})(?P<rest>[/#?]|$|[^\w.\-:])", alternation))
            .map_err(|e| EtchError::config(format!("invalid origin list: {}", e)))?;
        Ok(Self {
            pattern: Some(pattern),
        })
    }

    /// Strip every known origin from the text
    pub fn strip(&self, text: &str) -> String {
        match &self.pattern {
            Some(pattern) => pattern.replace_all(text, "$rest").into_owned(),
            None => text.to_string(),
        }
    }
}

/// A single regex rewrite rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteRule {
    pub pattern: String,
    pub replacement: String,
}

/// Ordered set of compiled rewrite rules
#[derive(Debug, Clone, Default)]
pub struct LinkRewriter {
    rules: Vec<(Regex, String)>,
}

impl LinkRewriter {
    /// Compile the rules, failing on the first invalid pattern
    pub fn new(rules: &[RewriteRule]) -> EtchResult<Self> {
        let rules = rules
            .iter()
            .map(|rule| {
                Regex::new(&rule.pattern)
                    .map(|re| (re, rule.replacement.clone()))
                    .map_err(|e| {
                        EtchError::config(format!("invalid rewrite `{}`: {}", rule.pattern, e))
                    })
            })
            .collect::<EtchResult<Vec<_>>>()?;
        Ok(Self { rules })
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Apply every rule in order
    pub fn rewrite(&self, text: &str) -> String {
        self.rules
            .iter()
            .fold(text.to_string(), |acc, (re, replacement)| {
                re.replace_all(&acc, replacement.as_str()).into_owned()
            })
    }
}
