//! Terminal catalog printer
//!
//! Prints a colored tree of modules, their exports and types, and each
//! type's documented members. Used for previewing a build.
//!
//! # Example
//!
//! ```no_run
//! use dts_etch::catalog::Catalog;
//! use dts_etch::printer::CatalogPrinter;
//!
//! let catalog = Catalog::default();
//! CatalogPrinter::new(&catalog, true).print_to_stdout();
//! ```

use crate::catalog::Catalog;
use crate::node::{Declaration, Module};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::io;
use termcolor::{Color, ColorChoice, ColorSpec, NoColor, StandardStream, WriteColor};

/// Terminal catalog printer
pub struct CatalogPrinter<'a> {
    catalog: &'a Catalog,
    use_color: bool,
}

impl<'a> CatalogPrinter<'a> {
    pub fn new(catalog: &'a Catalog, use_color: bool) -> Self {
        Self { catalog, use_color }
    }

    /// Print directly to stdout
    pub fn print_to_stdout(&self) {
        let choice = if self.use_color {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        };
        let mut stdout = StandardStream::stdout(choice);
        if let Err(e) = self.write_colored(&mut stdout) {
            eprintln!("Error printing catalog: {}", e);
        }
    }

    /// Write the tree to a WriteColor implementor
    pub fn write_colored<W: WriteColor>(&self, w: &mut W) -> io::Result<()> {
        for module in self.catalog.modules() {
            self.write_module(w, module)?;
            writeln!(w)?;
        }
        Ok(())
    }

    fn write_module<W: WriteColor>(&self, w: &mut W, module: &Module) -> io::Result<()> {
        w.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true))?;
        write!(w, "{}", module.name)?;
        w.reset()?;
        if module.exempt {
            w.set_color(ColorSpec::new().set_fg(Some(Color::White)).set_italic(true))?;
            write!(w, " (prose)")?;
            w.reset()?;
        }
        writeln!(w)?;

        for decl in &module.exports {
            self.write_declaration(w, decl, "export", 1)?;
        }
        for decl in &module.types {
            self.write_declaration(w, decl, "type", 1)?;
        }
        Ok(())
    }

    fn write_declaration<W: WriteColor>(
        &self,
        w: &mut W,
        decl: &Declaration,
        label: &str,
        depth: usize,
    ) -> io::Result<()> {
        write!(w, "{}", "  ".repeat(depth))?;
        w.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)))?;
        write!(w, "{} ", label)?;
        w.reset()?;

        w.set_color(ColorSpec::new().set_bold(true))?;
        write!(w, "{}", decl.name)?;
        w.reset()?;

        if decl.deprecated.is_some() {
            w.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)))?;
            write!(w, " deprecated")?;
            w.reset()?;
        }
        if let Some(summary) = decl.comment.lines().next().filter(|l| !l.is_empty()) {
            w.set_color(ColorSpec::new().set_fg(Some(Color::White)).set_italic(true))?;
            write!(w, "  {}", summary)?;
            w.reset()?;
        }
        writeln!(w)?;

        for child in &decl.children {
            self.write_declaration(w, child, "member", depth + 1)?;
        }
        Ok(())
    }
}

impl Display for CatalogPrinter<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let mut buffer = NoColor::new(Vec::new());
        self.write_colored(&mut buffer).map_err(|_| std::fmt::Error)?;
        f.write_str(&String::from_utf8_lossy(&buffer.into_inner()))
    }
}
