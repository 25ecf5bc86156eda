//! `etch` - extract documentation from ambient declaration files
//!
//! Loads a TOML configuration, builds the catalog, reports diagnostics, and
//! optionally writes JSON, substitutes `@include` markers in a docs tree,
//! or prints a preview of the catalog.

use anyhow::{bail, Context, Result};
use dts_etch::{CatalogPrinter, EtchConfig, Etcher, Renderer};
use std::env;
use std::fs;
use std::path::PathBuf;
use tracing::info;

/// Parsed command line
#[derive(Debug, PartialEq)]
struct EtchCommand {
    /// Configuration file
    config: PathBuf,
    /// Write the catalog as JSON here
    json: Option<PathBuf>,
    /// Substitute include markers in this documentation tree
    docs: Option<PathBuf>,
    /// Print the catalog tree
    preview: bool,
    use_color: bool,
}

impl EtchCommand {
    fn parse(args: &[String]) -> Result<Self> {
        let mut cmd = EtchCommand {
            config: PathBuf::from("etch.toml"),
            json: None,
            docs: None,
            preview: false,
            use_color: true,
        };

        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "--config" | "-c" => {
                    if i + 1 < args.len() {
                        cmd.config = PathBuf::from(&args[i + 1]);
                        i += 2;
                    } else {
                        bail!("--config requires a value");
                    }
                }
                "--json" => {
                    if i + 1 < args.len() {
                        cmd.json = Some(PathBuf::from(&args[i + 1]));
                        i += 2;
                    } else {
                        bail!("--json requires an output path");
                    }
                }
                "--docs" | "-d" => {
                    if i + 1 < args.len() {
                        cmd.docs = Some(PathBuf::from(&args[i + 1]));
                        i += 2;
                    } else {
                        bail!("--docs requires a directory");
                    }
                }
                "--preview" | "-p" => {
                    cmd.preview = true;
                    i += 1;
                }
                "--no-color" => {
                    cmd.use_color = false;
                    i += 1;
                }
                _ => {
                    bail!("Unknown flag: {}", args[i]);
                }
            }
        }

        Ok(cmd)
    }
}

fn usage() {
    eprintln!("etch [options]");
    eprintln!();
    eprintln!("Extract documentation from ambient TypeScript declaration files.");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config, -c <file>    Configuration file (default: etch.toml)");
    eprintln!("  --json <file>          Write the catalog as JSON");
    eprintln!("  --docs, -d <dir>       Replace <!-- @include NAME --> markers in *.md files");
    eprintln!("  --preview, -p          Print the catalog tree");
    eprintln!("  --no-color             Disable colored output");
    eprintln!();
    eprintln!("Set ETCH_LOG (e.g. ETCH_LOG=debug) to control logging.");
}

fn run(cmd: &EtchCommand) -> Result<()> {
    let config = EtchConfig::from_file(&cmd.config)
        .with_context(|| format!("loading {}", cmd.config.display()))?;

    let mut etcher = Etcher::new(config);
    let output = etcher.run()?;
    etcher.diagnostics().print(cmd.use_color)?;

    if let Some(ref path) = cmd.json {
        fs::write(path, output.to_json()?)
            .with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), "wrote catalog");
    }

    if let Some(ref dir) = cmd.docs {
        let renderer = Renderer::new()?;
        let report = output.include_processor(&renderer).process_dir(dir)?;
        println!(
            "Substituted {} includes in {} of {} files",
            report.markers, report.files_changed, report.files_scanned
        );
    }

    if cmd.preview {
        CatalogPrinter::new(&output.catalog, cmd.use_color).print_to_stdout();
    }

    Ok(())
}

fn main() -> Result<()> {
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_from_env("ETCH_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        usage();
        return Ok(());
    }

    let cmd = match EtchCommand::parse(&args) {
        Ok(cmd) => cmd,
        Err(e) => {
            usage();
            return Err(e);
        }
    };
    run(&cmd)
}
