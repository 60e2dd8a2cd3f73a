//! HTTP front end for the development server.
//!
//! Routing, in order:
//! - [`LIVE_RELOAD_PATH`] upgrades to a WebSocket and registers the client
//! - `/` and `*.html` are read through the [`FileCache`] with the reload
//!   script injected
//! - everything else is served from the output directory as-is
//!
//! Every response carries `Cache-Control: no-cache`.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Request, State,
    },
    http::{header, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use cssg_config::ConfigHandle;
use futures_util::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    set_header::SetResponseHeaderLayer,
};

use crate::dev::cache::FileCache;
use crate::dev::clients::ClientRegistry;
use crate::error::{CliError, Result};

/// WebSocket endpoint for live-reload clients.
pub const LIVE_RELOAD_PATH: &str = "/_ws";

/// Where the injected client script is served from.
pub const RELOAD_SCRIPT_PATH: &str = "/_cssg/reload.js";

const RELOAD_SCRIPT: &str = include_str!("../../assets/dev/reload-client.js");

const NOT_FOUND_BODY: &str = "404 - Page not found";

/// State shared by every request handler.
#[derive(Clone)]
pub struct ServerState {
    pub config: ConfigHandle,
    pub cache: Arc<FileCache>,
    pub clients: ClientRegistry,
}

impl ServerState {
    pub fn new(config: ConfigHandle, clients: ClientRegistry) -> Self {
        Self {
            config,
            cache: Arc::new(FileCache::new()),
            clients,
        }
    }
}

/// Build the router. Static files come from the output directory in effect
/// right now; HTML pages always follow the current configuration.
pub fn router(state: ServerState) -> Router {
    let out_dir = state.config.current().out_dir.clone();

    Router::new()
        .route(LIVE_RELOAD_PATH, get(handle_ws))
        .route(RELOAD_SCRIPT_PATH, get(handle_reload_script))
        .fallback_service(ServeDir::new(out_dir))
        .layer(middleware::from_fn_with_state(state.clone(), serve_html))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-cache"),
        ))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Bind the listener. This is the one fatal error of the dev loop.
pub async fn bind(addr: SocketAddr) -> Result<TcpListener> {
    TcpListener::bind(addr)
        .await
        .map_err(|e| CliError::Server(format!("Failed to bind to {addr}: {e}")))
}

/// Serve `app` until the listener fails.
pub async fn serve(listener: TcpListener, app: Router) -> Result<()> {
    axum::serve(listener, app)
        .await
        .map_err(|e| CliError::Server(format!("Server error: {e}")))
}

async fn handle_ws(State(state): State<ServerState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| client_session(socket, state.clients))
}

/// Pump notifications into one socket until either side goes away.
async fn client_session(socket: WebSocket, clients: ClientRegistry) {
    let (id, mut outgoing) = clients.register();
    tracing::debug!(client = id, total = clients.len(), "live-reload client connected");

    let (mut sink, mut stream) = socket.split();
    loop {
        tokio::select! {
            message = outgoing.recv() => {
                let Some(text) = message else { break };
                if sink.send(Message::Text(text.into())).await.is_err() {
                    break;
                }
            }
            incoming = stream.next() => match incoming {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
        }
    }

    clients.unregister(id);
    tracing::debug!(client = id, "live-reload client disconnected");
}

async fn handle_reload_script() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript; charset=utf-8")],
        RELOAD_SCRIPT,
    )
}

async fn serve_html(State(state): State<ServerState>, request: Request, next: Next) -> Response {
    let path = request.uri().path();
    let is_read = matches!(*request.method(), Method::GET | Method::HEAD);
    if !is_read || !is_html_route(path) {
        return next.run(request).await;
    }

    let out_dir = state.config.current().out_dir.clone();
    let Some(file) = html_file(&out_dir, path) else {
        return not_found();
    };

    match state.cache.get(&file).await {
        Ok(html) => (
            [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
            inject_reload_script(&html),
        )
            .into_response(),
        Err(err) => {
            tracing::debug!(path, error = %err, "page not served");
            not_found()
        }
    }
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, NOT_FOUND_BODY).into_response()
}

/// Whether `path` is handled by the HTML route.
pub fn is_html_route(path: &str) -> bool {
    path == "/" || path.ends_with(".html")
}

/// Map a request path to a file under `out_dir`. `/` is the index page.
///
/// Returns `None` for paths that try to leave the output directory.
pub fn html_file(out_dir: &Path, path: &str) -> Option<PathBuf> {
    if path == "/" {
        return Some(out_dir.join("index.html"));
    }

    let mut file = out_dir.to_path_buf();
    for component in Path::new(path.trim_start_matches('/')).components() {
        match component {
            Component::Normal(part) => file.push(part),
            Component::CurDir => {}
            _ => return None,
        }
    }
    Some(file)
}

/// Insert the reload script before the last `</body>`, or append it.
pub fn inject_reload_script(html: &str) -> String {
    let tag = format!(r#"<script src="{RELOAD_SCRIPT_PATH}"></script>"#);

    match html.rfind("</body>") {
        Some(pos) => {
            let mut out = String::with_capacity(html.len() + tag.len() + 1);
            out.push_str(&html[..pos]);
            out.push_str(&tag);
            out.push('\n');
            out.push_str(&html[pos..]);
            out
        }
        None => format!("{html}\n{tag}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inject_reload_script_with_body() {
        let result = inject_reload_script("<html><body><h1>Test</h1></body></html>");

        let script_pos = result.find(RELOAD_SCRIPT_PATH).unwrap();
        let body_pos = result.find("</body>").unwrap();
        assert!(script_pos < body_pos);
        assert!(result.ends_with("</body></html>"));
    }

    #[test]
    fn test_inject_reload_script_without_body() {
        let result = inject_reload_script("<h1>Test</h1>");
        assert!(result.starts_with("<h1>Test</h1>"));
        assert!(result.ends_with(r#"<script src="/_cssg/reload.js"></script>"#));
    }

    #[test]
    fn test_inject_uses_last_body_tag() {
        let html = "<body><pre>&lt;/body&gt; </body></pre></body>";
        let result = inject_reload_script(html);
        assert!(result.ends_with("</script>\n</body>"));
    }

    #[test]
    fn test_html_routes() {
        assert!(is_html_route("/"));
        assert!(is_html_route("/about.html"));
        assert!(is_html_route("/blog/post.html"));
        assert!(!is_html_route("/assets/css/style.css"));
        assert!(!is_html_route("/about"));
    }

    #[test]
    fn test_html_file_mapping() {
        let out = Path::new("/site/dist");
        assert_eq!(html_file(out, "/").unwrap(), out.join("index.html"));
        assert_eq!(
            html_file(out, "/blog/post.html").unwrap(),
            out.join("blog/post.html")
        );
    }

    #[test]
    fn test_html_file_rejects_parent_components() {
        let out = Path::new("/site/dist");
        assert!(html_file(out, "/../secret.html").is_none());
        assert!(html_file(out, "/a/../../b.html").is_none());
    }

    #[test]
    fn test_reload_script_targets_ws_endpoint() {
        assert!(RELOAD_SCRIPT.contains(LIVE_RELOAD_PATH));
        assert!(RELOAD_SCRIPT.contains("css-update"));
    }
}
