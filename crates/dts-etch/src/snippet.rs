//! Snippet shaping
//!
//! Declaration snippets are sliced straight out of the source text. This
//! module collapses member bodies into the `{/*…*/}` placeholder, strips
//! ancestor indentation from nested member snippets, and hands top-level
//! snippets to a [`SnippetFormatter`] for their final printed form.

use crate::diagnostics::{EtchError, EtchResult};
use lazy_static::lazy_static;
use regex::Regex;
use std::io::Write;
use std::process::{Command, Stdio};

/// Placeholder that replaces a collapsed member list
pub const ELLIPSIS: &str = "/*…*/";

lazy_static! {
    static ref PLACEHOLDER_SPACING: Regex = Regex::new(r"\s*(/\*…\*/)\s*").unwrap();
}

/// Replace the byte range `body` (braces included) of `text` with `{/*…*/}`
///
/// `body` is relative to `text`. Out-of-range bodies leave the text as is.
pub fn collapse_body(text: &str, body: std::ops::Range<usize>) -> String {
    if body.start >= body.end
        || body.end > text.len()
        || !text.is_char_boundary(body.start)
        || !text.is_char_boundary(body.end)
    {
        return text.to_string();
    }

    let mut collapsed = String::with_capacity(text.len());
    collapsed.push_str(&text[..body.start]);
    collapsed.push('{');
    collapsed.push_str(ELLIPSIS);
    collapsed.push('}');
    collapsed.push_str(&text[body.end..]);
    collapsed
}

/// Strip the member's own source indentation from its continuation lines
///
/// The first line starts at the member itself and carries no indentation;
/// every following line loses up to `indent.len()` leading whitespace
/// characters, leaving only indentation relative to the member.
pub fn dedent(snippet: &str, indent: &str) -> String {
    if indent.is_empty() {
        return snippet.to_string();
    }

    snippet
        .split('\n')
        .enumerate()
        .map(|(i, line)| {
            if i == 0 {
                return line;
            }
            if let Some(rest) = line.strip_prefix(indent) {
                return rest;
            }
            let strip = line
                .char_indices()
                .take(indent.len())
                .take_while(|(_, c)| *c == ' ' || *c == '\t')
                .last()
                .map_or(0, |(i, c)| i + c.len_utf8());
            &line[strip..]
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Tighten whitespace around collapsed bodies: `{ /*…*/ }` → `{/*…*/}`
pub fn normalize_placeholder(snippet: &str) -> String {
    PLACEHOLDER_SPACING
        .replace_all(snippet, "$1")
        .trim()
        .to_string()
}

/// Produces the printed form of a declaration snippet
///
/// Each call is keyed only by its input, so implementations may be called
/// for any declaration in any order.
pub trait SnippetFormatter: Send + Sync {
    fn format(&self, snippet: &str) -> EtchResult<String>;
}

/// Default formatter: trims trailing whitespace and normalises placeholders
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainFormatter;

impl SnippetFormatter for PlainFormatter {
    fn format(&self, snippet: &str) -> EtchResult<String> {
        let trimmed = snippet
            .lines()
            .map(str::trim_end)
            .collect::<Vec<_>>()
            .join("\n");
        Ok(normalize_placeholder(&trimmed))
    }
}

/// Pipes snippets through an external formatter such as prettier
#[derive(Debug, Clone)]
pub struct CommandFormatter {
    program: String,
    args: Vec<String>,
}

impl CommandFormatter {
    /// Create from a command line, program first
    pub fn new(command: &[String]) -> EtchResult<Self> {
        let (program, args) = command
            .split_first()
            .ok_or_else(|| EtchError::config("formatter command is empty"))?;
        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }
}

impl SnippetFormatter for CommandFormatter {
    fn format(&self, snippet: &str) -> EtchResult<String> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| EtchError::Format(format!("failed to run {}: {}", self.program, e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(snippet.as_bytes())?;
        }

        let output = child.wait_with_output()?;
        if !output.status.success() {
            return Err(EtchError::Format(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(normalize_placeholder(&String::from_utf8_lossy(
            &output.stdout,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_collapse_body() {
        let text = "interface Foo {\n\ta: string;\n}";
        let start = text.find('{').unwrap();
        assert_eq!(
            collapse_body(text, start..text.len()),
            "interface Foo {/*…*/}"
        );
    }

    #[test]
    fn test_collapse_keeps_trailing_text() {
        let text = "nested?: { a: string };";
        let start = text.find('{').unwrap();
        let end = text.find('}').unwrap() + 1;
        assert_eq!(collapse_body(text, start..end), "nested?: {/*…*/};");
    }

    #[test]
    fn test_collapse_out_of_range_is_noop() {
        assert_eq!(collapse_body("abc", 2..10), "abc");
    }

    #[test]
    fn test_dedent_tabs() {
        let snippet = "compilerOptions?: {\n\t\t\tdev?: boolean;\n\t\t};";
        assert_eq!(
            dedent(snippet, "\t\t"),
            "compilerOptions?: {\n\tdev?: boolean;\n};"
        );
    }

    #[test]
    fn test_dedent_spaces_partial() {
        let snippet = "a(\n      x: number,\n  ): void;";
        assert_eq!(dedent(snippet, "    "), "a(\n  x: number,\n): void;");
    }

    #[test]
    fn test_plain_formatter() {
        let formatted = PlainFormatter
            .format("  interface Foo {  /*…*/  }   \n")
            .unwrap();
        assert_eq!(formatted, "interface Foo {/*…*/}");
    }

    #[test]
    fn test_empty_command_is_config_error() {
        assert!(matches!(
            CommandFormatter::new(&[]),
            Err(EtchError::Config(_))
        ));
    }
}
