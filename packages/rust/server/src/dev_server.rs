//! Development server: watch-mode bundler behind a static file layer.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use axum::Router;
use docsite_shared::{BundlerKind, DevServerConfig, DocsiteError, Result};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::services::{ServeDir, ServeFile};
use tracing::{info, instrument, warn};

use crate::bundler::{
    BuildStep, BundleOptions, CommandStep, CopyStep, WatchBundler, WatchSubscription,
};

/// Name of the entry page inside the static root.
pub const ENTRY_FILE: &str = "index.html";

/// Build output directory inside the static root.
pub const DIST_DIR: &str = ".dist";

/// Static asset directory inside the static root, served under `/static`.
pub const STATIC_DIR: &str = "static";

// ---------------------------------------------------------------------------
// SiteLayout
// ---------------------------------------------------------------------------

/// Resolved paths under a static root.
#[derive(Debug, Clone)]
pub struct SiteLayout {
    pub root: PathBuf,
    pub entry: PathBuf,
    pub dist_dir: PathBuf,
    pub static_dir: PathBuf,
}

impl SiteLayout {
    /// Resolve `static_root` and check that its entry page exists.
    pub fn resolve(static_root: &Path) -> Result<Self> {
        let root =
            std::fs::canonicalize(static_root).map_err(|e| DocsiteError::io(static_root, e))?;
        let entry = root.join(ENTRY_FILE);
        if !entry.is_file() {
            return Err(DocsiteError::config(format!(
                "entry page not found: {}",
                entry.display()
            )));
        }

        Ok(Self {
            dist_dir: root.join(DIST_DIR),
            static_dir: root.join(STATIC_DIR),
            entry,
            root,
        })
    }
}

/// Routes: the build output first, `/static/*` next from the static
/// directory, and the entry page for any path neither can serve.
///
/// Bundled assets emitted under `<dist>/static` shadow same-named files in
/// the static directory.
pub fn router(layout: &SiteLayout) -> Router {
    let entry = ServeFile::new(&layout.entry);
    let static_assets = ServeDir::new(&layout.static_dir).fallback(entry.clone());

    Router::new()
        .nest_service(
            "/static",
            ServeDir::new(layout.dist_dir.join(STATIC_DIR)).fallback(static_assets),
        )
        .fallback_service(ServeDir::new(&layout.dist_dir).fallback(entry))
}

// ---------------------------------------------------------------------------
// DevServer
// ---------------------------------------------------------------------------

/// A running development server.
///
/// Created by [`DevServer::start`] and torn down by [`DevServer::dispose`],
/// which consumes it.
pub struct DevServer {
    addr: SocketAddr,
    shutdown: oneshot::Sender<()>,
    server: JoinHandle<std::io::Result<()>>,
    subscription: WatchSubscription,
}

impl DevServer {
    /// Start with the build step selected by `config.bundler`.
    pub async fn start(config: &DevServerConfig) -> Result<Self> {
        match config.bundler {
            BundlerKind::Copy => Self::start_with(config, CopyStep).await,
            BundlerKind::Command => {
                let step = CommandStep::from_command(&config.command)?;
                Self::start_with(config, step).await
            }
        }
    }

    /// Start with an explicit build step.
    ///
    /// Waits for the initial build before binding, so the first request
    /// never sees an empty output directory.
    #[instrument(skip_all, fields(static_root = %config.static_root.display()))]
    pub async fn start_with<S: BuildStep>(config: &DevServerConfig, step: S) -> Result<Self> {
        let layout = SiteLayout::resolve(&config.static_root)?;

        let options = BundleOptions {
            entries: vec![layout.entry.clone()],
            dist_dir: layout.dist_dir.clone(),
            source_maps: false,
            debounce: config.debounce,
        };
        let subscription = WatchBundler::new(step, options, &layout.root).watch().await?;

        let port = config.effective_port();
        let listener = match TcpListener::bind(SocketAddr::from(([0, 0, 0, 0], port))).await {
            Ok(listener) => listener,
            Err(source) => {
                if let Err(e) = subscription.unsubscribe().await {
                    warn!(error = %e, "failed to stop watcher after bind failure");
                }
                return Err(DocsiteError::Bind { port, source });
            }
        };
        let addr = listener
            .local_addr()
            .map_err(|e| DocsiteError::Server(e.to_string()))?;

        let app = router(&layout);
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let server = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                })
                .await
        });

        info!(port = addr.port(), "website ready");

        Ok(Self {
            addr,
            shutdown: shutdown_tx,
            server,
            subscription,
        })
    }

    /// The address the HTTP layer is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Stop accepting connections, then stop the watch session.
    pub async fn dispose(self) -> Result<()> {
        let _ = self.shutdown.send(());
        self.server
            .await
            .map_err(|e| DocsiteError::Server(format!("server task failed: {e}")))?
            .map_err(|e| DocsiteError::Server(e.to_string()))?;

        self.subscription.unsubscribe().await?;
        info!(port = self.addr.port(), "website stopped");
        Ok(())
    }
}
