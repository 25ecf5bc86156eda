//! The assembled module catalog
//!
//! [`Catalog::from_modules`] is the Module Assembler: duplicate modules are
//! merged, buckets are sorted by name, and modules are sorted by name. The
//! catalog answers the lookups the renderer and include pass need, and
//! supports the few adjustments a build makes before rendering.

use crate::diagnostics::{EtchError, EtchResult};
use crate::links::LinkRewriter;
use crate::node::{Declaration, Module};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Sorted list of documentation modules
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    modules: Vec<Module>,
}

impl Catalog {
    /// Assemble a catalog from modules in encounter order
    pub fn from_modules(modules: impl IntoIterator<Item = Module>) -> Self {
        let mut merged: IndexMap<String, Module> = IndexMap::new();

        for module in modules {
            match merged.get_mut(&module.name) {
                Some(existing) => {
                    debug!(module = %module.name, "merging duplicate module");
                    existing.merge(module);
                }
                None => {
                    merged.insert(module.name.clone(), module);
                }
            }
        }

        let mut modules: Vec<Module> = merged.into_values().collect();
        for module in &mut modules {
            module.sort();
        }
        modules.sort_by(|a, b| a.name.cmp(&b.name));

        Self { modules }
    }

    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    pub fn into_modules(self) -> Vec<Module> {
        self.modules
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Total number of top-level declarations across all modules
    pub fn declaration_count(&self) -> usize {
        self.modules
            .iter()
            .map(|m| m.types.len() + m.exports.len())
            .sum()
    }

    /// Look up a module by name
    pub fn module(&self, name: &str) -> EtchResult<&Module> {
        self.modules
            .iter()
            .find(|m| m.name == name)
            .ok_or_else(|| EtchError::ModuleNotFound(name.to_string()))
    }

    /// Look up a declaration in a module
    pub fn declaration(&self, module: &str, name: &str) -> EtchResult<&Declaration> {
        self.module(module)?
            .declaration(name)
            .ok_or_else(|| EtchError::DeclarationNotFound {
                module: module.to_string(),
                name: name.to_string(),
            })
    }

    /// Apply a transform to every string of every module
    pub fn rewrite_strings(&mut self, mut f: impl FnMut(&str) -> String) {
        for module in &mut self.modules {
            module.rewrite_strings(&mut f);
        }
    }

    /// Apply link rewrite rules to every string
    pub fn apply_rewrites(&mut self, rewriter: &LinkRewriter) {
        if rewriter.is_empty() {
            return;
        }
        self.rewrite_strings(|s| rewriter.rewrite(s));
    }

    /// Remove a type from its module so it can be rendered on its own
    pub fn detach_type(&mut self, module: &str, name: &str) -> EtchResult<Declaration> {
        let owner = self
            .modules
            .iter_mut()
            .find(|m| m.name == module)
            .ok_or_else(|| EtchError::ModuleNotFound(module.to_string()))?;

        let index = owner
            .types
            .iter()
            .position(|d| d.name == name)
            .ok_or_else(|| EtchError::DeclarationNotFound {
                module: module.to_string(),
                name: name.to_string(),
            })?;

        debug!(module, declaration = name, "detached type");
        Ok(owner.types.remove(index))
    }

    /// Remove a named child from the first type called `type_name`
    ///
    /// Returns whether anything was removed.
    pub fn remove_child(&mut self, type_name: &str, child_name: &str) -> bool {
        let target = self
            .modules
            .iter_mut()
            .flat_map(|m| m.types.iter_mut())
            .find(|d| d.name == type_name);

        match target {
            Some(decl) => {
                let before = decl.children.len();
                decl.children.retain(|c| c.name != child_name);
                before != decl.children.len()
            }
            None => false,
        }
    }
}
