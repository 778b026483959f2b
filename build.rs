//! Build script for generating the `octo-infra` man page.
//!
//! Packaging picks the page up from the build output directory.

use std::env;
use std::io::Write;

use camino::Utf8PathBuf;
use clap::CommandFactory;
use clap_mangen::Man;

#[path = "src/cli/mod.rs"]
mod cli;

use cli::Cli;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut stdout = std::io::stdout();
    writeln!(stdout, "cargo:rerun-if-changed=build.rs")?;
    writeln!(stdout, "cargo:rerun-if-changed=src/cli/mod.rs")?;

    let out_dir = env::var("OUT_DIR").map(Utf8PathBuf::from)?;

    let mut page = Vec::new();
    Man::new(Cli::command()).render(&mut page)?;
    std::fs::write(out_dir.join("octo-infra.1"), page)?;

    Ok(())
}
