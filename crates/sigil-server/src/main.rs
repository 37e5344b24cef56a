//! Sigil HTTP server entrypoint.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tokio::signal;

use sigil::config::Config;
use sigil::model::select_device;
use sigil::{artifact, ops};
use sigil_server::gateway::{HandlerState, create_router_with_state};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    println!(
        r#"
███████╗██╗ ██████╗ ██╗██╗
██╔════╝██║██╔════╝ ██║██║
███████╗██║██║  ███╗██║██║
╚════██║██║██║   ██║██║██║
███████║██║╚██████╔╝██║███████╗
╚══════╝╚═╝ ╚═════╝ ╚═╝╚══════╝

        COMPARE. WEIGH. DECIDE.
                       AGPL-3.0
"#
    );

    if std::env::args().any(|arg| arg == "--health-check") {
        std::process::exit(run_health_check());
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    if std::env::args().nth(1).as_deref() == Some("train") {
        return sigil_server::train::run_training();
    }

    let config = Config::from_env()?;
    config.validate()?;
    let addr: SocketAddr = config.socket_addr().parse()?;

    tracing::info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        artifact = %config.artifact_path.display(),
        "Sigil starting"
    );

    // The merge-op registry must be populated before the artifact is opened;
    // an artifact referencing an unregistered operation aborts startup.
    ops::register_builtin_ops();

    let device = select_device()?;
    let verifier = artifact::load(&config.artifact_path, &device)?;

    tracing::info!(
        embedding_dim = verifier.config().embedding_dim,
        merge_op = %verifier.config().merge_op,
        "Model artifact loaded"
    );

    let state = HandlerState::new(Arc::new(verifier), config.artifact_path.clone());
    let app = create_router_with_state(state);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Sigil shutdown complete");
    Ok(())
}

fn run_health_check() -> i32 {
    let port = std::env::var("SIGIL_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8080);

    let url = format!("http://127.0.0.1:{}/healthz", port);

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("failed to build runtime");

    rt.block_on(async {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(1))
            .build()
            .expect("failed to build client");

        match client.get(&url).send().await {
            Ok(res) if res.status().is_success() => 0,
            _ => 1,
        }
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
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
