//! Builder API for dts-etch
//!
//! This module provides the programmatic counterpart of the TOML
//! configuration, for use from build scripts and tests.

mod etch_builder;

pub use etch_builder::{BuildOutput, EtchBuilder};
