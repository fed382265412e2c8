mod chart;
mod history;
mod spot;
mod watch;

use std::io::{self, Write};

use goldview_core::{Goldview, GoldviewConfig};

use crate::cli::{Cli, Command};
use crate::error::CliError;

pub async fn run(cli: &Cli, config: &GoldviewConfig) -> Result<(), CliError> {
    let goldview = Goldview::from_config(config);
    let mut out = io::stdout();
    dispatch(&cli.command, &goldview, cli.pretty, &mut out).await
}

pub async fn dispatch<W: Write>(
    command: &Command,
    goldview: &Goldview,
    pretty: bool,
    out: &mut W,
) -> Result<(), CliError> {
    match command {
        Command::Spot => spot::run(goldview, pretty, out).await,
        Command::History(args) => history::run(args, goldview, pretty, out).await,
        Command::Chart(args) => chart::run(args, goldview, pretty, out).await,
        Command::Watch(args) => watch::run(args, goldview, pretty, out).await,
    }
}

/// Environment configuration with the global flag overrides applied.
pub fn resolve_config(cli: &Cli) -> Result<GoldviewConfig, CliError> {
    let mut config = GoldviewConfig::from_env()?;
    if let Some(source) = cli.source {
        config = config.with_domestic_source(source.kind());
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        if timeout_ms == 0 {
            return Err(CliError::Usage(String::from(
                "--timeout-ms must be greater than 0",
            )));
        }
        config = config.with_timeout_ms(timeout_ms);
    }
    Ok(config)
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use goldview_core::{Goldview, GoldviewConfig, HttpResponse, StubHttpClient};
    use serde_json::json;

    pub const SCRAPE_HTML: &str = r#"<span class="price">135,000</span>
        <span class="change up">0.50%</span><span class="date">2024.05.01 14:30</span>"#;

    pub fn chart_body(price: f64, points: &[(i64, f64)]) -> String {
        let timestamps = points.iter().map(|(ts, _)| *ts).collect::<Vec<_>>();
        let closes = points.iter().map(|(_, close)| *close).collect::<Vec<_>>();
        json!({"chart": {"result": [{
            "meta": {"regularMarketPrice": price},
            "timestamp": timestamps,
            "indicators": {"quote": [{"close": closes}]}
        }], "error": null}})
        .to_string()
    }

    pub fn healthy_stub() -> StubHttpClient {
        StubHttpClient::new()
            .respond("domestic.test", HttpResponse::ok(SCRAPE_HTML))
            .respond(
                "GC%3DF",
                HttpResponse::ok(chart_body(2100.0, &[(100, 2000.0), (200, 2100.0)])),
            )
            .respond(
                "KRW%3DX",
                HttpResponse::ok(chart_body(1350.0, &[(100, 1300.0), (200, 1350.0)])),
            )
    }

    pub fn goldview(stub: StubHttpClient) -> Goldview {
        let mut config = GoldviewConfig::default().with_chart_base_url("https://chart.test");
        config.scrape_url = String::from("https://domestic.test/goldDetail");
        Goldview::new(&config, Arc::new(stub))
    }

    pub fn output_json(out: &[u8]) -> Vec<serde_json::Value> {
        String::from_utf8_lossy(out)
            .lines()
            .map(|line| serde_json::from_str(line).expect("json line"))
            .collect()
    }
}
