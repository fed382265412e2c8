use std::io::Write;

use goldview_core::{Goldview, HistoryRange};

use crate::cli::HistoryArgs;
use crate::error::CliError;
use crate::output::render;

pub async fn run<W: Write>(
    args: &HistoryArgs,
    goldview: &Goldview,
    pretty: bool,
    out: &mut W,
) -> Result<(), CliError> {
    let range = args.range.parse::<HistoryRange>()?;
    let result = goldview.history(range).await?;
    render(out, &result, pretty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{goldview, healthy_stub, output_json};

    #[tokio::test]
    async fn prints_aligned_history() {
        let args = HistoryArgs {
            range: String::from("6mo"),
        };
        let mut out = Vec::new();

        run(&args, &goldview(healthy_stub()), false, &mut out)
            .await
            .expect("history succeeds");

        let lines = output_json(&out);
        assert_eq!(lines[0]["range"], "6mo");
        assert_eq!(lines[0]["points"][1]["usdKrw"], 1350.0);
    }

    #[tokio::test]
    async fn unknown_range_is_a_usage_error() {
        let args = HistoryArgs {
            range: String::from("2y"),
        };
        let mut out = Vec::new();

        let error = run(&args, &goldview(healthy_stub()), false, &mut out)
            .await
            .expect_err("strict range parse");

        assert_eq!(error.exit_code(), 2);
    }
}
