//! `serve` command: bundles over HTTP.
//!
//! `GET <asset_root><logical path>` resolves and builds the bundle for that
//! asset with a fresh store, so edits on disk show up on the next request.
//! Requests are handled one at a time. Ctrl+C unblocks the server and ends
//! the request loop.

use super::args::SearchArgs;
use super::common::{open_store, resolve, search_paths};
use anyhow::{Result, anyhow};
use percent_encoding::percent_decode_str;
use quire::asset::output_extension;
use quire::utils::mime;
use quire::{AssetError, AssetStore, DiskFs, EngineConfig, ProcessorRegistry, ProjectConfig, log};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use tiny_http::{Header, Method, Request, Response, Server, StatusCode};

const MAX_PORT_RETRIES: u16 = 10;

/// Everything a request needs; built once at startup.
struct ServeState {
    paths: Vec<PathBuf>,
    registry: Arc<ProcessorRegistry>,
    config: EngineConfig,
}

/// Bind and serve until Ctrl+C.
pub fn serve(
    project: &ProjectConfig,
    search: &SearchArgs,
    interface: Option<IpAddr>,
    port: Option<u16>,
) -> Result<()> {
    let registry = Arc::new(project.build_registry()?);
    let config = project.engine_config();
    // Normalize once; fails before binding when no search path is set
    let store = open_store(&search_paths(project, search), Arc::clone(&registry), config.clone())?;
    let state = ServeState {
        paths: store.search_paths().to_vec(),
        registry,
        config,
    };

    let interface = interface.unwrap_or(project.serve.interface);
    let port = port.unwrap_or(project.serve.port);
    let (server, addr) = bind_with_retry(interface, port)?;
    let server = Arc::new(server);

    let handle = Arc::clone(&server);
    ctrlc::set_handler(move || {
        log!("serve"; "shutting down...");
        handle.unblock();
    })
    .map_err(|e| anyhow!("failed to set Ctrl+C handler: {}", e))?;

    log!("serve"; "http://{}{}", addr, state.config.asset_root);

    for request in server.incoming_requests() {
        if let Err(e) = handle_request(request, &state) {
            log!("serve"; "request error: {e}");
        }
    }
    Ok(())
}

/// Bind to `base_port`, moving up when the port is taken.
fn bind_with_retry(interface: IpAddr, base_port: u16) -> Result<(Server, SocketAddr)> {
    let mut last_error = None;
    for offset in 0..MAX_PORT_RETRIES {
        let port = base_port.saturating_add(offset);
        let addr = SocketAddr::new(interface, port);

        match Server::http(addr) {
            Ok(server) => {
                if offset > 0 {
                    log!("serve"; "port {} in use, using {} instead", base_port, port);
                }
                return Ok((server, addr));
            }
            Err(e) => last_error = Some(e),
        }
    }
    Err(anyhow!(
        "failed to bind after {} attempts (ports {}-{}): {}",
        MAX_PORT_RETRIES,
        base_port,
        base_port.saturating_add(MAX_PORT_RETRIES - 1),
        last_error.map(|e| e.to_string()).unwrap_or_default()
    ))
}

fn handle_request(request: Request, state: &ServeState) -> Result<()> {
    let url = request.url().to_string();

    if request.method() != &Method::Get {
        return send(request, &url, 405, mime::types::PLAIN, "405 Method Not Allowed".into());
    }

    let Some(logical) = logical_path(&url, &state.config.asset_root) else {
        return send(request, &url, 404, mime::types::PLAIN, "404 Not Found".into());
    };

    match build_for(&logical, state) {
        Ok(bundle) => {
            let content_type = mime::from_extension(output_extension(&logical));
            send(request, &url, 200, content_type, bundle)
        }
        Err(e) => {
            let status = status_for(&e);
            let body = format!("{:#}", anyhow::Error::from(e));
            send(request, &url, status, mime::types::PLAIN, body)
        }
    }
}

/// Build the bundle for `logical` with a fresh store.
fn build_for(logical: &str, state: &ServeState) -> quire::AssetResult<String> {
    let mut store = AssetStore::new(Arc::new(DiskFs), Arc::clone(&state.registry), state.config.clone());
    for path in &state.paths {
        store.search_path(path)?;
    }
    let resolution = resolve(&store, logical)?;
    quire::build(&resolution, &store)
}

/// Logical path requested by `url`, if it lies under `asset_root`.
fn logical_path(url: &str, asset_root: &str) -> Option<String> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let decoded = percent_decode_str(path).decode_utf8().ok()?;

    let root = asset_root.trim_end_matches('/');
    let rest = decoded.strip_prefix(root)?.strip_prefix('/')?;
    if rest.is_empty() || rest.split('/').any(|segment| segment == "..") {
        return None;
    }
    Some(rest.to_string())
}

fn status_for(error: &AssetError) -> u16 {
    if error.is_not_found() { 404 } else { 500 }
}

fn send(
    request: Request,
    url: &str,
    status: u16,
    content_type: &'static str,
    body: String,
) -> Result<()> {
    log!("serve"; "GET {} {}", url, status);
    let header = Header::from_bytes("Content-Type", content_type)
        .map_err(|()| anyhow!("invalid content type {content_type}"))?;
    let response = Response::from_string(body)
        .with_status_code(StatusCode(status))
        .with_header(header);
    request.respond(response)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logical_path_under_root() {
        assert_eq!(logical_path("/assets/app.js", "/assets/").as_deref(), Some("app.js"));
        assert_eq!(
            logical_path("/assets/lib/a%20b.js?v=1", "/assets/").as_deref(),
            Some("lib/a b.js")
        );
        assert_eq!(logical_path("/static/app.css", "/static").as_deref(), Some("app.css"));
    }

    #[test]
    fn test_logical_path_rejects_outside_root() {
        assert_eq!(logical_path("/other/app.js", "/assets/"), None);
        assert_eq!(logical_path("/assets/", "/assets/"), None);
        assert_eq!(logical_path("/assetsx/app.js", "/assets/"), None);
        assert_eq!(logical_path("/assets/../secret.js", "/assets/"), None);
    }

    #[test]
    fn test_status_for_errors() {
        assert_eq!(status_for(&AssetError::MissingExtension("app".into())), 404);
        assert_eq!(
            status_for(&AssetError::AssetNotFound {
                path: "a.js".into(),
                searched: Vec::new(),
            }),
            404
        );
        assert_eq!(status_for(&AssetError::UnknownFilter("scss".into())), 500);
        assert_eq!(
            status_for(&AssetError::CircularDependency {
                from: "a.js".into(),
                to: "b.js".into(),
            }),
            500
        );
    }
}
