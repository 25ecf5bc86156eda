//! Markdown rendering
//!
//! Modules and declarations are rendered through embedded Handlebars
//! templates. HTML escaping is disabled since the output is Markdown that
//! already contains the markup it needs.
//!
//! The two lookup operations used by the include pass are
//! [`Renderer::render_module`] and [`Renderer::render_declaration`]; both
//! fail with a lookup error when the catalog has no such entity.

use crate::catalog::Catalog;
use crate::diagnostics::{EtchError, EtchResult};
use crate::node::{Declaration, Module};
use handlebars::Handlebars;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

const MODULE_TEMPLATE: &str = include_str!("templates/module.hbs");
const DECLARATION_TEMPLATE: &str = include_str!("templates/declaration.hbs");
const MEMBER_TEMPLATE: &str = include_str!("templates/member.hbs");
const EXPANDED_TEMPLATE: &str = include_str!("templates/expanded.hbs");

lazy_static! {
    static ref BLANK_LINES: Regex = Regex::new(r"\n{3,}").unwrap();
}

/// Template context for a module listing
#[derive(Serialize)]
struct ModuleView<'a> {
    name: &'a str,
    comment: &'a str,
    exempt: bool,
    names: Vec<&'a str>,
    exports: &'a [Declaration],
    types: &'a [Declaration],
}

impl<'a> From<&'a Module> for ModuleView<'a> {
    fn from(module: &'a Module) -> Self {
        Self {
            name: &module.name,
            comment: &module.comment,
            exempt: module.exempt,
            names: module.names(),
            exports: &module.exports,
            types: &module.types,
        }
    }
}

/// Renders catalog entries to Markdown
pub struct Renderer {
    registry: Handlebars<'static>,
}

impl Renderer {
    /// Create a renderer with the built-in templates registered
    pub fn new() -> EtchResult<Self> {
        let mut registry = Handlebars::new();
        registry.register_escape_fn(handlebars::no_escape);

        for (name, template) in [
            ("module", MODULE_TEMPLATE),
            ("declaration", DECLARATION_TEMPLATE),
            ("member", MEMBER_TEMPLATE),
            ("expanded", EXPANDED_TEMPLATE),
        ] {
            registry
                .register_template_string(name, template)
                .map_err(|e| EtchError::Template(format!("{}: {}", name, e)))?;
        }

        Ok(Self { registry })
    }

    /// Render a module by name
    pub fn render_module(&self, catalog: &Catalog, name: &str) -> EtchResult<String> {
        self.module(catalog.module(name)?)
    }

    /// Render one declaration of a module
    pub fn render_declaration(
        &self,
        catalog: &Catalog,
        module: &str,
        name: &str,
    ) -> EtchResult<String> {
        self.declaration(catalog.declaration(module, name)?)
    }

    /// Render a declaration with each child as its own section
    pub fn render_expanded_declaration(&self, declaration: &Declaration) -> EtchResult<String> {
        self.render("expanded", declaration)
    }

    /// Render a module listing
    pub fn module(&self, module: &Module) -> EtchResult<String> {
        self.render("module", &ModuleView::from(module))
    }

    /// Render a single declaration block
    pub fn declaration(&self, declaration: &Declaration) -> EtchResult<String> {
        self.render("declaration", declaration)
    }

    fn render<T: Serialize>(&self, template: &str, data: &T) -> EtchResult<String> {
        let output = self
            .registry
            .render(template, data)
            .map_err(|e| EtchError::Template(e.to_string()))?;
        Ok(BLANK_LINES.replace_all(output.trim(), "\n\n").into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::{mock_catalog, mock_member};

    #[test]
    fn test_render_module() {
        let catalog = mock_catalog();
        let output = Renderer::new()
            .unwrap()
            .render_module(&catalog, "svelte")
            .unwrap();

        assert!(output.starts_with("The svelte module."));
        assert!(output.contains("\ttick,"));
        assert!(output.contains("\tComponent\n"));
        assert!(output.contains("} from 'svelte';"));
        assert!(output.contains("## tick"));
        assert!(output.contains("```dts\nfunction tick(): Promise<void>;\n```"));
        assert!(output.find("## tick").unwrap() < output.find("## Component").unwrap());
        assert!(!output.contains("\n\n\n"));
    }

    #[test]
    fn test_render_declaration_with_children() {
        let catalog = mock_catalog();
        let output = Renderer::new()
            .unwrap()
            .render_declaration(&catalog, "svelte/compiler", "Config")
            .unwrap();

        assert!(output.contains("interface Config {/*…*/}"));
        assert!(output.contains("compilerOptions: string;"));
        assert!(output.contains("- <span class=\"tag\">default</span> `[]`"));
        assert!(!output.contains("&lt;span"));
    }

    #[test]
    fn test_deprecated_notice_rendered() {
        let mut decl = Declaration::new("old", "function old(): void;");
        decl.deprecated = Some("Use `new` instead".into());

        let output = Renderer::new().unwrap().declaration(&decl).unwrap();
        assert!(output.contains("Use `new` instead"));
    }

    #[test]
    fn test_exempt_module_renders_comment_only() {
        let mut module = Module::new("$env/static/private", "Environment variables.");
        module.exempt = true;

        let output = Renderer::new().unwrap().module(&module).unwrap();
        assert_eq!(output, "Environment variables.");
    }

    #[test]
    fn test_expanded_declaration() {
        let mut decl = Declaration::new("KitConfig", "interface KitConfig {/*…*/}");
        let mut adapter = mock_member("adapter", &["- <span class=\"tag\">default</span> `undefined`"]);
        adapter.children.push(mock_member("name", &[]));
        decl.children.push(adapter);

        let output = Renderer::new()
            .unwrap()
            .render_expanded_declaration(&decl)
            .unwrap();

        assert!(output.starts_with("## adapter"));
        assert!(output.contains("name: string;"));
        assert!(!output.contains("interface KitConfig"));
    }

    #[test]
    fn test_lookup_errors() {
        let catalog = mock_catalog();
        let renderer = Renderer::new().unwrap();

        let err = renderer
            .render_declaration(&catalog, "svelte", "DoesNotExist")
            .unwrap_err();
        assert!(matches!(err, EtchError::DeclarationNotFound { ref name, .. } if name == "DoesNotExist"));

        let err = renderer.render_module(&catalog, "ModuleX").unwrap_err();
        assert!(err.is_lookup());
    }
}
