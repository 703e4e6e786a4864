//! Version information display
//!
//! Prints version and data-asset metadata in human or JSON format.

use crate::cli::args::{OutputFormat, VersionArgs};
use crate::reading::ReadingTable;

/// Print version and build information.
pub fn run(args: &VersionArgs) {
    let name = env!("CARGO_PKG_NAME");
    let version = env!("CARGO_PKG_VERSION");
    let readings = ReadingTable::embedded().map_or(0, |table| table.len());

    match args.format {
        OutputFormat::Human => {
            println!("{name} {version} ({readings} embedded readings)");
        }
        OutputFormat::Json => {
            println!(r#"{{"name":"{name}","version":"{version}","readings":{readings}}}"#);
        }
    }
}
