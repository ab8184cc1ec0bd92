//! Server lifecycle: bind, serve until cancelled, drain with a deadline.

use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder;
use hyper_util::service::TowerToHyperService;
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use tally_core::error::{Result, TallyError};

use crate::app_state::AppState;

/// Supervised HTTP server owning the listener.
///
/// Every connection runs in a task owned by the server. Cancelling the token
/// stops accepting, asks each connection to finish its in-flight request and
/// close, and aborts whatever is still open once `grace` has elapsed.
pub struct Server {
    listener: TcpListener,
    state: AppState,
    grace: Duration,
    cancel: CancellationToken,
}

impl Server {
    pub async fn bind(state: AppState) -> Result<Self> {
        let addr = state.cfg().server.listen_addr()?;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| TallyError::Internal(format!("bind {addr} failed: {e}")))?;
        Ok(Self::from_listener(listener, state))
    }

    pub fn from_listener(listener: TcpListener, state: AppState) -> Self {
        let grace = Duration::from_millis(state.cfg().server.shutdown_grace_ms);
        Self {
            listener,
            state,
            grace,
            cancel: CancellationToken::new(),
        }
    }

    /// Token that triggers graceful shutdown when cancelled.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.listener
            .local_addr()
            .map_err(|e| TallyError::Internal(format!("local_addr failed: {e}")))
    }

    pub async fn run(self, app: Router) -> Result<()> {
        let Server { listener, state, grace, cancel } = self;
        let mut conns = JoinSet::new();

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                Some(_) = conns.join_next(), if !conns.is_empty() => {}
                accepted = listener.accept() => {
                    let (stream, peer) = match accepted {
                        Ok(pair) => pair,
                        Err(e) => {
                            tracing::warn!(error = %e, "accept failed");
                            tokio::time::sleep(ACCEPT_BACKOFF).await;
                            continue;
                        }
                    };
                    conns.spawn(serve_connection(stream, peer, app.clone(), cancel.clone()));
                }
            }
        }

        state.set_draining();
        drop(listener);
        tracing::info!(connections = conns.len(), "shutdown requested; draining in-flight requests");

        let drained = tokio::time::timeout(grace, async {
            while conns.join_next().await.is_some() {}
        })
        .await;

        match drained {
            Ok(()) => tracing::info!("server drained"),
            Err(_) => {
                tracing::warn!(
                    grace_ms = grace.as_millis() as u64,
                    connections = conns.len(),
                    "drain deadline hit; aborting remaining connections"
                );
                conns.abort_all();
                while conns.join_next().await.is_some() {}
            }
        }
        Ok(())
    }
}

const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Serve one connection; on cancellation, finish the in-flight request and close.
async fn serve_connection(stream: TcpStream, peer: SocketAddr, app: Router, cancel: CancellationToken) {
    let builder = Builder::new(TokioExecutor::new());
    let conn = builder.serve_connection_with_upgrades(TokioIo::new(stream), TowerToHyperService::new(app));
    tokio::pin!(conn);

    let res = tokio::select! {
        res = conn.as_mut() => res,
        _ = cancel.cancelled() => {
            conn.as_mut().graceful_shutdown();
            conn.await
        }
    };
    if let Err(e) = res {
        tracing::debug!(%peer, error = %e, "connection closed with error");
    }
}

/// Resolves on Ctrl+C, or SIGTERM on unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("signal received, starting graceful shutdown");
}
