use std::{process, sync::Arc};

use postboard::{
    application::{
        board::{BoardService, FetchApplied, Paging},
        error::AppError,
    },
    config,
    infra::{
        error::InfraError,
        http::{self, BoardAppState},
        rest::RestPostsRepo,
        telemetry,
    },
};
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
    }
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let repo = RestPostsRepo::new(&settings.backend.base_url)?;
    let board = Arc::new(BoardService::new(
        Arc::new(repo),
        Paging::from(&settings.board),
    ));

    // The first fetch mirrors the page mount; a failure only shows on the board.
    match board.refresh().await {
        FetchApplied::Replaced { count } => info!(count, "initial posts loaded"),
        FetchApplied::Failed(err) => warn!(error = %err, "initial posts fetch failed"),
        FetchApplied::Stale => {}
    }

    serve_http(&settings, BoardAppState::new(board)).await
}

async fn serve_http(settings: &config::Settings, state: BoardAppState) -> Result<(), AppError> {
    let router = http::build_router(state);

    let listener = tokio::net::TcpListener::bind(settings.server.addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;
    info!(
        addr = %settings.server.addr,
        backend = %settings.backend.base_url,
        "postboard listening"
    );

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| AppError::unexpected(format!("server error: {err}")))?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to listen for shutdown signal");
        return;
    }
    info!("shutdown signal received");
}
