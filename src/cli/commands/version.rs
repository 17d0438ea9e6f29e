//! Version display.

use crate::cli::args::{OutputFormat, VersionArgs};
use crate::error::SwanError;

/// Print name and version.
///
/// # Errors
///
/// Returns `SwanError::Json` if the JSON form cannot be serialized.
pub fn run(args: &VersionArgs) -> Result<(), SwanError> {
    let name = env!("CARGO_PKG_NAME");
    let version = env!("CARGO_PKG_VERSION");

    match args.format {
        OutputFormat::Human => println!("{name} {version}"),
        OutputFormat::Json => {
            let info = serde_json::json!({ "name": name, "version": version });
            println!("{}", serde_json::to_string(&info)?);
        }
    }
    Ok(())
}
