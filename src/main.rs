use crate::{
    cli::Args,
    errors::Result,
    settings::SettingsStore,
    state::AppState,
    vault::{FsVault, TrashMode, Vault},
    vars::{
        MDSWEEP_API_KEY, MDSWEEP_HOST, MDSWEEP_PORT, MDSWEEP_SETTINGS_FILE, MDSWEEP_TRASH_MODE,
        MDSWEEP_VAULT_DIR, init_started_at,
    },
};
use axum::{
    Router,
    body::Body,
    extract::MatchedPath,
    http::Request,
    middleware,
    routing::{get, put},
};
use clap::Parser;
use log::info;
use std::sync::Arc;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::{info_span, warn};

mod cli;
mod errors;
mod janitor;
mod keys;
mod logger;
mod middlewares;
mod models;
mod notice;
mod routes;
mod scheduler;
mod settings;
mod state;
mod vars;
mod vault;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file if it exists
    let dotenv_loaded = dotenvy::dotenv().is_ok();
    let bind = format!("{}:{}", *MDSWEEP_HOST, *MDSWEEP_PORT);
    let args = Args::parse();
    if args.healthcheck {
        cli::healthcheck::run(args, bind);
    } else if args.sweep {
        cli::sweep::run().await?;
    } else {
        logger::init();
        if dotenv_loaded {
            info!("loaded .env file");
        }
        serve(&bind).await?;
    }

    Ok(())
}

async fn serve(bind: &str) -> Result<()> {
    let trash_mode = MDSWEEP_TRASH_MODE.parse::<TrashMode>()?;
    let vault = FsVault::open(*MDSWEEP_VAULT_DIR, trash_mode)?;
    let vault_root = vault.root().display().to_string();
    let settings = Arc::new(SettingsStore::load(*MDSWEEP_SETTINGS_FILE)?);
    info!(
        "Vault at {vault_root} (trash mode: {trash_mode}), settings at {}",
        *MDSWEEP_SETTINGS_FILE
    );

    let state = Arc::new(
        AppState::new(
            settings,
            Arc::new(vault) as Arc<dyn Vault>,
            vault_root,
            trash_mode,
        )
        .await?,
    );
    state.scheduler.launch().await?;
    state.scheduler.start().await?;

    let is_auth_enabled = !MDSWEEP_API_KEY.is_empty();
    let mut app = router(Arc::clone(&state));
    app = if is_auth_enabled {
        keys::check_key(&MDSWEEP_API_KEY)?;
        info!("API authentication is enabled");
        app.route_layer(middleware::from_fn(middlewares::auth))
    } else {
        warn!("API authentication is not enabled, anyone who can reach {bind} can change the settings");
        app
    };
    // 将日志追踪层添加到最后面
    app = app.layer(trace_layer());

    init_started_at();
    info!("Starting server at http://{bind}");
    let listener = tokio::net::TcpListener::bind(bind).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.scheduler.shutdown().await?;

    Ok(())
}

fn router(state: Arc<AppState>) -> Router {
    let janitor_routes = Router::new()
        .route("/status", get(routes::janitor::status))
        .route("/sweep", put(routes::janitor::sweep));
    let server_routes = Router::new().route("/info", get(routes::server::info));

    Router::new()
        .route(
            "/api/settings",
            get(routes::settings::get).patch(routes::settings::patch),
        )
        .route("/api/settings/reset", put(routes::settings::reset))
        .nest("/api/janitor", janitor_routes)
        .nest("/api/server", server_routes)
        .route("/api/healthcheck", get(routes::healthcheck))
        .with_state(state)
}

type MyTraceLayer<M> = TraceLayer<
    tower_http::classify::SharedClassifier<tower_http::classify::ServerErrorsAsFailures>,
    M,
>;

fn trace_layer() -> MyTraceLayer<impl Fn(&Request<Body>) -> tracing::Span + Clone> {
    TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
        let matched_path = request
            .extensions()
            .get::<MatchedPath>()
            .map(MatchedPath::as_str);

        info_span!(
            "http_request",
            method = %request.method(),
            matched_path = matched_path,
            query = request.uri().query(),
        )
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}
