//! Shared utilities for integration tests.

use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use payload_router::config::AppConfig;
use payload_router::lifecycle::{build_app, Shutdown};
use payload_router::{HttpServer, RouteCollection};
use tempfile::TempDir;
use tokio::net::TcpListener;

/// A resource tree in a temporary directory, removed on drop.
pub struct Site {
    dir: TempDir,
}

impl Site {
    pub fn new() -> Self {
        let dir = tempfile::Builder::new()
            .prefix("payload-router-")
            .tempdir()
            .unwrap();
        Self { dir }
    }

    pub fn file(self, name: &str, content: impl AsRef<[u8]>) -> Self {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
        self
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }
}

/// A running server; stops when dropped.
pub struct TestServer {
    pub addr: SocketAddr,
    shutdown: Shutdown,
    _site: Site,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Serve `site` with `routes` on an ephemeral port.
#[allow(dead_code)]
pub async fn start_server(site: Site, routes: RouteCollection) -> TestServer {
    let mut config = AppConfig::default();
    config.resources.root = site.root().to_string_lossy().into_owned();
    start_server_with(site, config, routes).await
}

/// Serve with a prepared configuration; `config.resources.root` must point
/// at the site.
#[allow(dead_code)]
pub async fn start_server_with(site: Site, mut config: AppConfig, routes: RouteCollection) -> TestServer {
    config.server.bind_address = "127.0.0.1:0".to_string();
    let app = Arc::new(build_app(&config, routes));

    let listener = TcpListener::bind(&config.server.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config.server.clone(), app);
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });
    tokio::time::sleep(Duration::from_millis(50)).await;

    TestServer {
        addr,
        shutdown,
        _site: site,
    }
}

/// Client that never follows redirects, so 303s stay visible.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
