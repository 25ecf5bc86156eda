//! Declaration file loading
//!
//! JSDoc cannot nest JSDoc, so `js` examples inside doc comments declare
//! their expected compiler errors with a `/// errors:` line instead of a
//! `// @errors:` directive (which the comment parser would read as a tag).
//! The loader inserts that marker after every opening ` ```js ` fence;
//! [`crate::js_doc::restore_markers`] turns it back afterwards.

use crate::diagnostics::{EtchError, EtchResult};
use crate::links::OriginStripper;
use crate::node::Module;
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::fs;
use std::path::Path;
use tracing::debug;

lazy_static! {
    /// A ```js fence inside a comment, with the gutter that precedes it
    static ref JS_FENCE: Regex = Regex::new(r"(\s*\*\s*)```js([\s\S]+?)```").unwrap();
}

/// Error code ignored in examples (JSDoc types in a JS file)
pub const IGNORED_EXAMPLE_ERROR: &str = "7031";

/// Read a declaration file, neutralising example-code directives
pub fn read_declaration_file(path: impl AsRef<Path>) -> EtchResult<String> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| EtchError::read(path, e))?;
    debug!(path = %path.display(), len = text.len(), "read declaration file");
    Ok(mark_examples(&text))
}

/// Insert the `/// errors:` marker after each ```js fence
pub fn mark_examples(text: &str) -> String {
    JS_FENCE
        .replace_all(text, |caps: &Captures| {
            let prefix = &caps[1];
            format!(
                "{prefix}```js{prefix}/// errors: {code}{body}```",
                prefix = prefix,
                code = IGNORED_EXAMPLE_ERROR,
                body = &caps[2],
            )
        })
        .into_owned()
}

/// Read every `*.md` file in `dir` as a prose-only module
///
/// The module name is the file stem with `+` standing in for `/`, so
/// `$env+static+private.md` documents `$env/static/private`.
pub fn read_synthetic_modules(
    dir: impl AsRef<Path>,
    origins: &OriginStripper,
) -> EtchResult<Vec<Module>> {
    let dir = dir.as_ref();
    let entries = fs::read_dir(dir).map_err(|e| EtchError::read(dir, e))?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| EtchError::read(dir, e))?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "md") {
            paths.push(path);
        }
    }
    paths.sort();

    let mut modules = Vec::with_capacity(paths.len());
    for path in paths {
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            return Err(EtchError::InvalidPath(path.display().to_string()));
        };
        let mut module = Module::new(
            stem.replace('+', "/"),
            origins.strip(&read_declaration_file(&path)?),
        );
        module.exempt = true;
        debug!(module = %module.name, "loaded synthetic module");
        modules.push(module);
    }

    Ok(modules)
}
