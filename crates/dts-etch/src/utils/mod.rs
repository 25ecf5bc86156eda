//! Utility modules for dts-etch
//!
//! - `swc`: deno_ast/SWC parsing helpers and source-text lookups

pub mod swc;

pub use swc::{parse_declaration_source, ParsedModule, SourceInfo};
