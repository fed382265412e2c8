use std::process::ExitCode;

use goldview_core::{Goldview, GoldviewConfig};
use goldview_web::{app, AppState, ServerError};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), ServerError> {
    dotenv::dotenv().ok();

    let config = GoldviewConfig::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            format!(
                "goldview_web={level},goldview_core={level},tower_http={level}",
                level = config.log_level
            )
            .into()
        }))
        .init();

    let goldview = Goldview::from_config(&config);
    info!(
        domestic_source = %goldview.domestic_kind(),
        metal = %config.metal_symbol,
        fx = %config.fx_symbol,
        "goldview configured"
    );

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: config.bind_addr.clone(),
            source,
        })?;
    info!(addr = %config.bind_addr, "listening");

    axum::serve(listener, app(AppState::new(goldview)))
        .await
        .map_err(ServerError::Serve)
}
