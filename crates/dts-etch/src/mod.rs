//! dts-etch: Documentation extractor for ambient TypeScript declarations
//!
//! This crate turns `.d.ts` files into a documentation catalog by:
//! - Parsing declaration files using deno_ast/SWC
//! - Collecting `declare module` blocks and their exported declarations
//! - Extracting documented members recursively, dropping internal ones
//! - Collapsing member bodies into `{/*…*/}` placeholders
//! - Rendering modules and declarations as markdown for reference pages
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐    ┌──────────────────┐
//! │ index.d.ts      │    │ synthetic/*.md   │
//! │ (SWC parse)     │    │ (prose modules)  │
//! └────────┬────────┘    └────────┬─────────┘
//!          │                      │
//!          └──────────┬───────────┘
//!                     ▼
//!              ┌──────────────┐
//!              │   Catalog    │
//!              └──────┬───────┘
//!                     │
//!          ┌──────────┴──────────┐
//!          ▼                     ▼
//!    ┌──────────┐         ┌────────────┐
//!    │   JSON   │         │ @include   │
//!    └──────────┘         └────────────┘
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use dts_etch::{EtchBuilder, Renderer};
//!
//! let output = EtchBuilder::new()
//!     .source("types/index.d.ts")
//!     .build()
//!     .expect("Failed to extract declarations");
//!
//! let renderer = Renderer::new().expect("templates");
//! let markdown = renderer
//!     .render_module(&output.catalog, "svelte")
//!     .expect("module exists");
//! println!("{}", markdown);
//! ```

// Core types
pub mod catalog;
pub mod decl;
pub mod js_doc;
pub mod node;

// Extraction
pub mod links;
pub mod loader;
pub mod members;
pub mod parser;
pub mod snippet;
pub mod tags;

// Infrastructure
pub mod diagnostics;
pub mod printer;

// Output and orchestration
pub mod builder;
pub mod docgen;
pub mod include;
pub mod render;
pub mod utils;

pub use catalog::Catalog;
pub use diagnostics::{Diagnostic, DiagnosticsCollector, EtchError, EtchResult};
pub use js_doc::{JsDoc, JsDocTag, TagKind};
pub use node::{DeclKind, Declaration, Module};

pub use builder::{BuildOutput, EtchBuilder};
pub use docgen::{EtchConfig, Etcher};
pub use include::{DetachedType, IncludeProcessor, IncludeReport};
pub use links::{LinkRewriter, OriginStripper, RewriteRule};
pub use parser::{Extraction, Extractor};
pub use printer::CatalogPrinter;
pub use render::Renderer;
pub use snippet::{CommandFormatter, PlainFormatter, SnippetFormatter};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
