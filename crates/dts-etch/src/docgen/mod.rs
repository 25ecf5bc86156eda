//! Extraction pipeline
//!
//! This module ties the pieces together: [`EtchConfig`] describes a build
//! and [`Etcher`] runs it, producing a catalog plus any detached types.

mod config;
mod etcher;

pub use config::{
    DetachConfig, EtchConfig, FormatterConfig, RemoveChildConfig, SourceConfig, DEFAULT_IGNORE,
};
pub use etcher::Etcher;
