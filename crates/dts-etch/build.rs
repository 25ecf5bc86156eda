//! Build script for dts-etch
//!
//! The markdown templates are embedded with `include_str!`; rebuild when
//! they change.

fn main() {
    println!("cargo:rerun-if-changed=src/render/templates/");
    println!("cargo:rerun-if-changed=build.rs");
}
