use anyhow::{Context, Result};
use axum::{
    Router,
    extract::{Path as UrlPath, State},
    http::{StatusCode, header},
    response::{
        IntoResponse, Response,
        sse::{Event, KeepAlive, Sse},
    },
    routing::get,
};
use madeen_core::{Section, parse_content_document};
use notify::{Event as NotifyEvent, EventKind, RecursiveMode, Watcher};
use std::{net::SocketAddr, path::PathBuf};
use tokio::sync::broadcast;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::{error, info, warn};

use super::load_site;

/// Directory under the site root holding pages and assets
const STATIC_DIR: &str = "static";

/// Script pages include to reload when content changes
const RELOAD_SCRIPT: &str = r#"(() => {
    const source = new EventSource('/_reload');
    source.onmessage = () => location.reload();
    source.onerror = () => source.close();
})();
"#;

#[derive(Clone)]
struct AppState {
    content_dir: PathBuf,
    reload_tx: broadcast::Sender<()>,
}

/// Serve the site under its base path for local development.
///
/// - Pages and assets come from `<site>/static`
/// - `<base>/data/<section>.json` comes from the configured content directory
/// - Content changes are pushed to `/_reload` subscribers
pub async fn run(path: PathBuf, port: u16) -> Result<()> {
    let config = load_site(&path)?;
    let content_dir = path.join(&config.content_dir);
    let static_dir = path.join(STATIC_DIR);

    println!("🌐 Starting preview server...");
    println!("   Site: {}", path.display());
    println!("   Content: {}", content_dir.display());

    if !content_dir.is_dir() {
        anyhow::bail!(
            "Content directory not found: {}\nRun 'madeen check {}' for details",
            content_dir.display(),
            path.display()
        );
    }

    let (reload_tx, _) = broadcast::channel::<()>(100);

    let state = AppState {
        content_dir: content_dir.clone(),
        reload_tx: reload_tx.clone(),
    };

    let app = router(&config.base, static_dir, state);

    let watcher_tx = reload_tx.clone();
    tokio::spawn(async move {
        if let Err(e) = watch_files(content_dir, watcher_tx).await {
            error!(error = %e, "File watcher error");
        }
    });

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    println!(
        "\n🚀 Preview ready at: http://localhost:{}{}/",
        port, config.base
    );
    println!("   Press Ctrl+C to stop\n");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to port")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

fn router(base: &str, static_dir: PathBuf, state: AppState) -> Router {
    let site = Router::new()
        .route("/data/{file}", get(section_handler))
        .fallback_service(ServeDir::new(static_dir));

    let site = if base.is_empty() {
        site
    } else {
        Router::new().nest(base, site)
    };

    site.route("/_reload", get(sse_handler))
        .route("/_reload.js", get(reload_script_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve one section document. Unknown sections are 404; documents that
/// fail validation are served anyway so the page shows the same failure a
/// deployed site would, but a warning is logged.
async fn section_handler(
    State(state): State<AppState>,
    UrlPath(file): UrlPath<String>,
) -> Response {
    let Some(section) = file.strip_suffix(".json").and_then(Section::from_name) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let path = state.content_dir.join(section.file_name());
    match tokio::fs::read_to_string(&path).await {
        Ok(body) => {
            if let Err(e) = parse_content_document(&body) {
                warn!(%section, error = %e, "Serving invalid section document");
            }
            ([(header::CONTENT_TYPE, "application/json")], body).into_response()
        }
        Err(e) => {
            warn!(%section, path = %path.display(), error = %e, "Section document unavailable");
            StatusCode::NOT_FOUND.into_response()
        }
    }
}

async fn reload_script_handler() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/javascript")], RELOAD_SCRIPT)
}

/// Watch for content changes and trigger reload
async fn watch_files(path: PathBuf, reload_tx: broadcast::Sender<()>) -> Result<()> {
    let (tx, mut rx) = tokio::sync::mpsc::channel(100);

    let mut watcher =
        notify::recommended_watcher(move |res: Result<NotifyEvent, notify::Error>| {
            if let Ok(event) = res {
                let _ = tx.blocking_send(event);
            }
        })?;

    watcher.watch(&path, RecursiveMode::Recursive)?;

    while let Some(event) = rx.recv().await {
        match event.kind {
            EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_) => {
                // Skip editor swap and hidden files
                if event.paths.iter().any(|p| {
                    let filename = p.file_name().unwrap_or_default().to_string_lossy();
                    !filename.starts_with('.') && !filename.ends_with('~')
                }) {
                    info!("Content changed, reloading");
                    let _ = reload_tx.send(());
                }
            }
            _ => {}
        }
    }

    Ok(())
}

/// SSE endpoint for hot reload
async fn sse_handler(
    State(state): State<AppState>,
) -> Sse<impl futures::Stream<Item = Result<Event, std::convert::Infallible>>> {
    let mut rx = state.reload_tx.subscribe();

    let stream = async_stream::stream! {
        loop {
            match rx.recv().await {
                Ok(()) => yield Ok(Event::default().data("reload")),
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}
