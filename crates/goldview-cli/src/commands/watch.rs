use std::io::Write;
use std::time::Duration;

use goldview_core::{ChangeSet, ChangeTracker, Goldview, SourceError, SpotRecord};
use serde::Serialize;
use tokio::time::{interval, MissedTickBehavior};
use tracing::warn;

use crate::cli::WatchArgs;
use crate::error::CliError;
use crate::output::render;

#[derive(Debug, Serialize)]
struct WatchFrame {
    record: SpotRecord,
    changes: ChangeSet,
}

/// Polls until `count` is reached. A failed poll is logged and skipped; the
/// command only fails when no poll succeeded.
pub async fn run<W: Write>(
    args: &WatchArgs,
    goldview: &Goldview,
    pretty: bool,
    out: &mut W,
) -> Result<(), CliError> {
    let tracker = ChangeTracker::default();
    let mut ticker = interval(Duration::from_secs(args.interval_secs));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut polls = 0_u64;
    let mut delivered = 0_u64;
    let mut last_error: Option<SourceError> = None;

    loop {
        ticker.tick().await;
        polls += 1;

        match goldview.spot().await {
            Ok(record) => {
                let changes = tracker.observe(record.clone());
                render(out, &WatchFrame { record, changes }, pretty)?;
                delivered += 1;
            }
            Err(error) => {
                warn!(kind = %error.kind(), %error, poll = polls, "spot poll failed");
                last_error = Some(error);
            }
        }

        if args.count.is_some_and(|count| polls >= count) {
            break;
        }
    }

    match last_error {
        Some(error) if delivered == 0 => Err(error.into()),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use goldview_core::StubHttpClient;

    use super::*;
    use crate::commands::test_support::{goldview, healthy_stub, output_json};

    #[tokio::test]
    async fn first_frame_flags_nothing() {
        let args = WatchArgs {
            interval_secs: 1,
            count: Some(1),
        };
        let mut out = Vec::new();

        run(&args, &goldview(healthy_stub()), false, &mut out)
            .await
            .expect("watch succeeds");

        let frames = output_json(&out);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0]["record"]["goldPriceUsdPerOunce"], 2100.0);
        assert!(frames[0]["changes"]["domesticKrwPerGram"].is_null());
    }

    #[tokio::test]
    async fn unchanged_prices_produce_empty_change_sets() {
        let args = WatchArgs {
            interval_secs: 1,
            count: Some(2),
        };
        let mut out = Vec::new();

        run(&args, &goldview(healthy_stub()), false, &mut out)
            .await
            .expect("watch succeeds");

        let frames = output_json(&out);
        assert_eq!(frames.len(), 2);
        assert!(frames[1]["changes"]
            .as_object()
            .expect("change object")
            .values()
            .all(|value| value.is_null()));
    }

    #[tokio::test]
    async fn every_poll_failing_is_an_upstream_error() {
        let args = WatchArgs {
            interval_secs: 1,
            count: Some(1),
        };
        let mut out = Vec::new();

        let error = run(&args, &goldview(StubHttpClient::new()), false, &mut out)
            .await
            .expect_err("nothing delivered");

        assert_eq!(error.exit_code(), 3);
        assert!(out.is_empty());
    }
}
