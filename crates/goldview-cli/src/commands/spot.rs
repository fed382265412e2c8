use std::io::Write;

use goldview_core::Goldview;

use crate::error::CliError;
use crate::output::render;

pub async fn run<W: Write>(goldview: &Goldview, pretty: bool, out: &mut W) -> Result<(), CliError> {
    let record = goldview.spot().await?;
    render(out, &record, pretty)
}
