use std::sync::Arc;

use anyhow::Context;

use omniscience::assistant::AssistantClient;
use omniscience::config::Config;
use omniscience::llm::{GeminiClient, GenerativeBackend};
use omniscience::runner::CodeRunner;
use omniscience::server::{AppState, api_routes};
use omniscience::session::SessionHandle;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("configuration")?;

    // Initialize tracing; an optional non-blocking file layer is kept alive
    // by the guard for the life of the process.
    let env_filter = || {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
    };
    let _file_guard = match &config.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "omniscience.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_writer(writer)
                .with_ansi(false)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_target(false)
                .init();
            None
        }
    };

    eprintln!("🧠 OmniScience v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Model: {}", config.model);
    eprintln!("   API: http://0.0.0.0:{}/api", config.port);
    eprintln!("   Events: ws://0.0.0.0:{}/ws", config.port);

    let backend: Arc<dyn GenerativeBackend> = Arc::new(GeminiClient::new(
        config.base_url.clone(),
        config.model.clone(),
        config.api_key.clone(),
    ));

    let session = SessionHandle::new();
    let state = AppState {
        session,
        assistant: AssistantClient::new(Arc::clone(&backend), config.thinking_budget),
        runner: CodeRunner::new(backend),
    };

    let app = api_routes(state);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port))
        .await
        .with_context(|| format!("binding port {}", config.port))?;
    tracing::info!(port = config.port, "OmniScience server started");
    axum::serve(listener, app).await.context("serving")?;

    Ok(())
}
