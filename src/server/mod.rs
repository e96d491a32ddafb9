//! Development preview server with live reload
//!
//! Builds in development mode, serves the public directory and rebuilds
//! whenever the content directory or `_config.yml` changes.

use anyhow::Result;
use axum::{
    body::Body,
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    http::{Request, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use notify_debouncer_mini::new_debouncer;
use notify_debouncer_mini::notify::RecursiveMode;
use std::net::SocketAddr;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tower_http::services::ServeDir;

use crate::publish::BuildMode;
use crate::Site;

/// Live reload script injected into HTML pages
const LIVE_RELOAD_SCRIPT: &str = r#"
<script>
(function() {
    var ws = new WebSocket('ws://' + location.host + '/__livereload');
    ws.onmessage = function(msg) {
        if (msg.data === 'reload') {
            location.reload();
        }
    };
})();
</script>
</body>
"#;

struct ServerState {
    public_dir: PathBuf,
    reload_tx: broadcast::Sender<()>,
}

/// Start the preview server; runs until interrupted
pub async fn start(site: &Site, ip: &str, port: u16, open: bool) -> Result<()> {
    site.build(BuildMode::Development)?;

    let (reload_tx, _) = broadcast::channel::<()>(16);

    let state = Arc::new(ServerState {
        public_dir: site.public_dir.clone(),
        reload_tx: reload_tx.clone(),
    });

    let app = Router::new()
        .route("/__livereload", get(livereload_handler))
        .fallback(fallback_handler)
        .with_state(state);

    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    let url = format!("http://{}:{}/{}", ip, port, site.config.blog_prefix);
    println!("Preview running at {}", url);
    println!("Press Ctrl+C to stop.");

    if open {
        if let Err(e) = open_browser(&url) {
            tracing::warn!("Failed to open browser: {}", e);
        }
    }

    let watched_site = site.clone();
    tokio::task::spawn_blocking(move || {
        if let Err(e) = watch_and_rebuild(&watched_site, reload_tx) {
            tracing::error!("File watcher error: {}", e);
        }
    });

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Rebuild on content or config changes and tell browsers to reload
fn watch_and_rebuild(site: &Site, reload_tx: broadcast::Sender<()>) -> Result<()> {
    let (tx, rx) = std::sync::mpsc::channel();
    let mut debouncer = new_debouncer(Duration::from_millis(300), tx)?;

    let config_path = site.config_path();
    for (path, mode) in [
        (site.content_dir.as_path(), RecursiveMode::Recursive),
        (config_path.as_path(), RecursiveMode::NonRecursive),
    ] {
        if path.exists() {
            debouncer.watcher().watch(path, mode)?;
            tracing::debug!("Watching: {:?}", path);
        }
    }

    for result in rx {
        match result {
            Ok(events) => {
                if !events.iter().any(|e| is_relevant(&e.path)) {
                    continue;
                }
                tracing::info!("Change detected, rebuilding...");
                match site.reload_config().and_then(|s| s.build(BuildMode::Development)) {
                    Ok(report) => {
                        tracing::info!("Rebuilt {} post pages", report.post_pages);
                        let _ = reload_tx.send(());
                    }
                    Err(e) => tracing::error!("Rebuild failed: {:#}", e),
                }
            }
            Err(e) => tracing::error!("Watch error: {:?}", e),
        }
    }

    Ok(())
}

/// Editor swap files and VCS internals never trigger a rebuild
fn is_relevant(path: &Path) -> bool {
    if path.components().any(|c| c.as_os_str() == ".git") {
        return false;
    }

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();
    file_name != ".DS_Store" && !file_name.ends_with('~') && !file_name.ends_with(".swp")
}

/// Map a request path onto the public directory, refusing anything that escapes it
fn resolve_request_path(public_dir: &Path, request_path: &str) -> Option<PathBuf> {
    let relative = Path::new(request_path.trim_start_matches('/'));
    if !relative
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
    {
        return None;
    }
    Some(public_dir.join(relative))
}

async fn livereload_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<ServerState>>,
) -> impl IntoResponse {
    let reload_rx = state.reload_tx.subscribe();
    ws.on_upgrade(move |socket| handle_livereload_socket(socket, reload_rx))
}

async fn handle_livereload_socket(mut socket: WebSocket, mut reload_rx: broadcast::Receiver<()>) {
    tracing::debug!("Live reload client connected");

    loop {
        tokio::select! {
            result = reload_rx.recv() => {
                match result {
                    Ok(_) => {
                        if socket.send(Message::Text("reload".to_string())).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                }
            }
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    _ => {}
                }
            }
        }
    }

    tracing::debug!("Live reload client disconnected");
}

/// Serve HTML with the reload script injected, everything else via ServeDir
async fn fallback_handler(
    State(state): State<Arc<ServerState>>,
    request: Request<Body>,
) -> Response {
    let Some(candidate) = resolve_request_path(&state.public_dir, request.uri().path()) else {
        return (StatusCode::NOT_FOUND, "Not found").into_response();
    };
    let file_path = if candidate.is_dir() {
        candidate.join("index.html")
    } else {
        candidate
    };

    let is_html = file_path
        .extension()
        .map(|ext| ext == "html" || ext == "htm")
        .unwrap_or(false);

    if is_html {
        match tokio::fs::read_to_string(&file_path).await {
            Ok(content) => Html(inject_live_reload(&content)).into_response(),
            Err(_) => (StatusCode::NOT_FOUND, "Not found").into_response(),
        }
    } else {
        let mut service = ServeDir::new(&state.public_dir).append_index_html_on_directories(true);
        match service.try_call(request).await {
            Ok(response) => response.into_response(),
            Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response(),
        }
    }
}

fn inject_live_reload(html: &str) -> String {
    if html.contains("</body>") {
        html.replacen("</body>", LIVE_RELOAD_SCRIPT, 1)
    } else {
        format!("{}{}", html, LIVE_RELOAD_SCRIPT)
    }
}

/// Open a URL in the default browser
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(url).spawn()?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(url).spawn()?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/c", "start", url])
            .spawn()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inject_live_reload() {
        let html = inject_live_reload("<html><body><p>x</p></body></html>");
        assert!(html.contains("/__livereload"));
        assert_eq!(html.matches("</body>").count(), 1);
        assert!(html.ends_with("</html>"));
    }

    #[test]
    fn test_is_relevant() {
        assert!(is_relevant(Path::new("src/content/blog/a.md")));
        assert!(!is_relevant(Path::new("src/content/blog/.a.md.swp")));
        assert!(!is_relevant(Path::new("src/content/blog/a.md~")));
        assert!(!is_relevant(Path::new("src/content/blog/.DS_Store")));
        assert!(!is_relevant(Path::new(".git/index")));
    }

    #[test]
    fn test_is_relevant_in_github_io_checkout() {
        assert!(is_relevant(Path::new(
            "/home/me/me.github.io/src/content/blog/a.md"
        )));
        assert!(is_relevant(Path::new("/home/me/me.github.io/_config.yml")));
        assert!(!is_relevant(Path::new("/home/me/me.github.io/.git/HEAD")));
    }

    #[test]
    fn test_resolve_request_path() {
        let public = Path::new("/site/dist");
        assert_eq!(
            resolve_request_path(public, "/blog/a/index.html"),
            Some(PathBuf::from("/site/dist/blog/a/index.html"))
        );
        assert_eq!(
            resolve_request_path(public, "/"),
            Some(PathBuf::from("/site/dist"))
        );
        assert_eq!(resolve_request_path(public, "/../../x.html"), None);
        assert_eq!(resolve_request_path(public, "/blog/../../x.html"), None);
        assert_eq!(
            resolve_request_path(public, "//etc/passwd.html"),
            Some(PathBuf::from("/site/dist/etc/passwd.html"))
        );
    }
}
