use std::error::Error;
use std::path::PathBuf;
use std::process::exit;

use clap::Parser;
use env_logger::{Builder, Env};
use log::debug;

/// Packs a file into a zip archive and deletes the original
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The archive to create (overwritten if it exists)
    archive: PathBuf,

    /// The file to compress, then remove
    source: PathBuf,
}

fn main() {
    let cli = Cli::parse();
    Builder::from_env(Env::default().default_filter_or("warn")).init();

    debug!("archiving {:?} into {:?}", cli.source, cli.archive);
    if let Err(e) = zipper::archive_and_remove(&cli.archive, &cli.source) {
        eprintln!("{e}");
        let mut cause = e.source();
        while let Some(inner) = cause {
            eprintln!("caused by: {inner}");
            cause = inner.source();
        }
        exit(1);
    }
}
