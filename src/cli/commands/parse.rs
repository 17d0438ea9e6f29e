//! `parse`: shows how duration strings are read.

use std::io::Write;

use crate::cli::args::ParseArgs;
use crate::config::DurationUnit;
use crate::countdown::format::format_clock;
use crate::error::SwanError;

/// Prints one `<value> = <seconds>s (<MMM:SS>)` line per value.
///
/// # Errors
///
/// Returns `SwanError::Io` if stdout cannot be written.
pub fn run(args: &ParseArgs) -> Result<(), SwanError> {
    let mut out = std::io::stdout().lock();
    report(&mut out, &args.values, args.unit)?;
    Ok(())
}

fn report(out: &mut impl Write, values: &[String], unit: DurationUnit) -> std::io::Result<()> {
    for value in values {
        let seconds = unit.to_seconds(value);
        writeln!(out, "{value} = {seconds}s ({})", format_clock(seconds))?;
    }
    out.flush()
}
