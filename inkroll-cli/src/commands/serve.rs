//! Serve command: local static server with rebuild on change.

use super::build::build_site_with_index;
use anyhow::{Context, Result};
use axum::{
    body::Body,
    extract::State,
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tokio::sync::mpsc;

#[derive(Clone)]
struct AppState {
    output_dir: PathBuf,
}

/// Start the local server with file watching
pub async fn serve_site(config_path: &Path, port: u16) -> Result<()> {
    // Initial build
    let (config, _) = build_site_with_index(config_path).context("Failed to build site")?;
    let output_dir = config.output_dir();
    let content_dir = config.content_dir();
    let config_path_buf = config_path.to_path_buf();

    tracing::info!("Starting server on http://localhost:{}", port);
    println!("\nServing at http://localhost:{}", port);
    println!("Press Ctrl+C to stop\n");

    // Set up file watching for rebuilds
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut _watcher = RecommendedWatcher::new(
        move |res| {
            let _ = tx.send(res);
        },
        notify::Config::default(),
    )
    .context("Failed to initialize file watcher")?;

    _watcher
        .watch(&content_dir, RecursiveMode::Recursive)
        .with_context(|| format!("Failed to watch {:?}", content_dir))?;

    tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match event {
                Ok(_ev) => {
                    // Debounce a bit by draining pending events
                    while rx.try_recv().is_ok() {}
                    tracing::info!("Change detected, rebuilding site...");
                    let res = tokio::task::spawn_blocking({
                        let config_path = config_path_buf.clone();
                        move || build_site_with_index(&config_path)
                    })
                    .await;

                    match res {
                        Ok(Ok(_)) => tracing::info!("Rebuild complete"),
                        Ok(Err(e)) => tracing::error!("Rebuild failed: {:?}", e),
                        Err(e) => tracing::error!("Rebuild task panicked: {}", e),
                    }
                }
                Err(err) => tracing::warn!("Watcher error: {}", err),
            }
        }
    });

    let state = AppState {
        output_dir: output_dir.clone(),
    };

    let app = Router::new()
        .route("/", get(serve_index))
        .route("/{*path}", get(serve_with_404))
        .fallback(serve_404)
        .with_state(state);

    let addr = format!("127.0.0.1:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

/// Serve index.html for the root path
async fn serve_index(State(state): State<AppState>) -> Response {
    let index_path = state.output_dir.join("index.html");
    match fs::read_to_string(&index_path).await {
        Ok(content) => Html(content).into_response(),
        Err(_) => (StatusCode::NOT_FOUND, "Index not found").into_response(),
    }
}

/// Serve files with custom 404 handling
async fn serve_with_404(State(state): State<AppState>, uri: Uri) -> Response {
    let path = uri.path().trim_start_matches('/');

    // Keep requests inside the output dir
    if Path::new(path)
        .components()
        .any(|c| matches!(c, Component::ParentDir))
    {
        return serve_404_inner(state).await;
    }

    let file_path = state.output_dir.join(path);

    match fs::read(&file_path).await {
        Ok(content) => {
            let builder = Response::builder()
                .status(StatusCode::OK)
                .header("Content-Type", content_type_for_path(path));
            match builder.body(Body::from(content)) {
                Ok(response) => response,
                Err(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
            }
        }
        Err(_) => serve_404_inner(state).await,
    }
}

/// Serve the custom 404 page
async fn serve_404(State(state): State<AppState>) -> Response {
    serve_404_inner(state).await
}

async fn serve_404_inner(state: AppState) -> Response {
    let not_found_path = state.output_dir.join("404.html");

    match fs::read_to_string(&not_found_path).await {
        Ok(content) => (StatusCode::NOT_FOUND, Html(content)).into_response(),
        Err(_) => (StatusCode::NOT_FOUND, "404 Not Found").into_response(),
    }
}

fn content_type_for_path(path: &str) -> &'static str {
    match Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
        .as_str()
    {
        "html" => "text/html; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "js" => "application/javascript; charset=utf-8",
        "json" => "application/json; charset=utf-8",
        "xml" => "application/xml; charset=utf-8",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "otf" => "font/otf",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}
