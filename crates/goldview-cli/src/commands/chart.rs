use std::io::Write;

use goldview_core::{ChartBox, ChartView, Goldview, HistoryRange};
use serde::Serialize;

use crate::cli::ChartArgs;
use crate::error::CliError;
use crate::output::render;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ChartOutput {
    range: HistoryRange,
    source: String,
    point_count: usize,
    #[serde(flatten)]
    view: ChartView,
}

pub async fn run<W: Write>(
    args: &ChartArgs,
    goldview: &Goldview,
    pretty: bool,
    out: &mut W,
) -> Result<(), CliError> {
    let range = args.range.parse::<HistoryRange>()?;
    let chart_box = chart_box(args)?;

    let history = goldview.history(range).await?;
    let output = ChartOutput {
        range: history.range,
        source: history.source,
        point_count: history.points.len(),
        view: ChartView::from_points(&history.points, chart_box),
    };
    render(out, &output, pretty)
}

fn chart_box(args: &ChartArgs) -> Result<ChartBox, CliError> {
    let dimensions = [args.width, args.height, args.inset];
    if dimensions.iter().any(|value| !value.is_finite() || *value < 0.0) {
        return Err(CliError::Usage(String::from(
            "chart dimensions must be finite and non-negative",
        )));
    }
    if args.width <= 2.0 * args.inset || args.height <= 2.0 * args.inset {
        return Err(CliError::Usage(format!(
            "inset {} leaves no drawing area in a {}x{} box",
            args.inset, args.width, args.height
        )));
    }
    Ok(ChartBox::new(args.width, args.height, args.inset))
}
