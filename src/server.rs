//! HTTP server lifecycle for the redirect delivery.
//!
//! [`RedirectController`] binds the configured address, serves plaintext or
//! TLS, and stops on request: new connections are refused while in-flight
//! requests get until a caller-supplied grace period to finish.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::ServiceExt;
use axum::extract::Request;
use axum_server::Handle;
use axum_server::tls_rustls::RustlsConfig;
use tracing::{info, warn};

use crate::api::routes::redirect_app;
use crate::application::services::LinkApi;
use crate::domain::redirect::RedirectOptions;
use crate::error::AppError;
use crate::state::AppState;

/// A long-running delivery that can be told to stop.
#[async_trait]
pub trait Controller: Send + Sync {
    /// Serves until shut down.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Io`] if binding fails, TLS material cannot be
    /// loaded, or the server hits a fatal runtime error.
    async fn run(&self) -> Result<(), AppError>;

    /// Stops accepting connections and gives in-flight requests up to
    /// `grace` to complete. A pending or later [`Controller::run`] returns
    /// once they have drained or the grace period ends.
    async fn shutdown(&self, grace: Duration);
}

/// Serves `GET /{id}` redirects for a [`LinkApi`].
pub struct RedirectController {
    link_api: Arc<dyn LinkApi>,
    options: RedirectOptions,
    handle: Handle,
}

impl RedirectController {
    pub fn new(link_api: Arc<dyn LinkApi>, options: RedirectOptions) -> Self {
        Self {
            link_api,
            options,
            handle: Handle::new(),
        }
    }

    pub fn options(&self) -> &RedirectOptions {
        &self.options
    }

    /// Resolves to the bound address once the listener is up, or `None` if
    /// the server stopped before binding. Useful with port `0`.
    pub async fn listening(&self) -> Option<SocketAddr> {
        self.handle.listening().await
    }

    /// Number of connections currently being served.
    pub fn connection_count(&self) -> usize {
        self.handle.connection_count()
    }
}

/// Installs `ring` as the process-wide rustls provider.
///
/// A provider installed earlier (by a previous run or an embedding process)
/// is kept.
fn install_crypto_provider() {
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        tracing::debug!("rustls crypto provider already installed");
    }
}

#[async_trait]
impl Controller for RedirectController {
    async fn run(&self) -> Result<(), AppError> {
        let state = AppState::new(self.link_api.clone(), &self.options);
        let app = ServiceExt::<Request>::into_make_service(redirect_app(state));
        let addr = self.options.socket_addr();

        match self.options.tls() {
            Some(tls) => {
                install_crypto_provider();
                let config = RustlsConfig::from_pem_file(&tls.cert_file, &tls.key_file)
                    .await
                    .inspect_err(|e| warn!(error = %e, "Failed to load TLS certificate or key"))?;

                info!("Running redirect delivery on https://{addr}");
                axum_server::bind_rustls(addr, config)
                    .handle(self.handle.clone())
                    .serve(app)
                    .await?;
            }
            None => {
                info!("Running redirect delivery on http://{addr}");
                axum_server::bind(addr)
                    .handle(self.handle.clone())
                    .serve(app)
                    .await?;
            }
        }

        info!("Redirect delivery stopped");
        Ok(())
    }

    async fn shutdown(&self, grace: Duration) {
        info!(
            grace = ?grace,
            connections = self.handle.connection_count(),
            "Shutting down redirect delivery"
        );
        self.handle.graceful_shutdown(Some(grace));
    }
}
