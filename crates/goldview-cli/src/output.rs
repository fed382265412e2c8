use std::io::Write;

use serde::Serialize;

use crate::error::CliError;

/// Writes one JSON document per call, newline-terminated.
pub fn render<W, T>(out: &mut W, value: &T, pretty: bool) -> Result<(), CliError>
where
    W: Write,
    T: Serialize,
{
    let payload = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    writeln!(out, "{payload}")?;
    out.flush()?;
    Ok(())
}
