//! ServerBuilder for fluent API to build HTTP servers

use super::exposure::RestExposure;
use super::host::ServerHost;
use crate::core::access::AccessPolicy;
use crate::core::auth::{AuthProvider, HeaderAuthProvider};
use crate::core::service::Repositories;
use crate::orders::OrderService;
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Builder for creating the bakery HTTP server
///
/// # Example
///
/// ```ignore
/// let store = InMemoryDataStore::new();
/// let app = ServerBuilder::new()
///     .with_repositories(store.repositories())
///     .with_access_policy(AccessPolicy::strict())
///     .build()?;
/// ```
pub struct ServerBuilder {
    repositories: Option<Repositories>,
    auth_provider: Option<Arc<dyn AuthProvider>>,
    access_policy: AccessPolicy,
    custom_routes: Vec<Router>,
}

impl ServerBuilder {
    /// Create a new ServerBuilder
    pub fn new() -> Self {
        Self {
            repositories: None,
            auth_provider: None,
            access_policy: AccessPolicy::default(),
            custom_routes: Vec::new(),
        }
    }

    /// Set the repositories backing the services (required)
    pub fn with_repositories(mut self, repositories: Repositories) -> Self {
        self.repositories = Some(repositories);
        self
    }

    /// Set the identity provider
    ///
    /// Defaults to a `HeaderAuthProvider` reading `x-username`.
    pub fn with_auth_provider(mut self, provider: impl AuthProvider + 'static) -> Self {
        self.auth_provider = Some(Arc::new(provider));
        self
    }

    /// Set which operations enforce ownership
    pub fn with_access_policy(mut self, policy: AccessPolicy) -> Self {
        self.access_policy = policy;
        self
    }

    /// Add custom routes to the server
    ///
    /// Use this for endpoints outside the order resource, such as login
    /// flows or webhooks.
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Build the transport-agnostic host
    pub fn build_host(mut self) -> Result<ServerHost> {
        let repositories = self.repositories.take().ok_or_else(|| {
            anyhow::anyhow!("Repositories are required. Call .with_repositories()")
        })?;

        let auth_provider = self
            .auth_provider
            .take()
            .unwrap_or_else(|| Arc::new(HeaderAuthProvider::default()));

        let order_service = Arc::new(OrderService::new(repositories, self.access_policy));

        Ok(ServerHost::new(order_service, auth_provider))
    }

    /// Build the final REST router
    pub fn build(mut self) -> Result<Router> {
        let custom_routes = std::mem::take(&mut self.custom_routes);
        let host = Arc::new(self.build_host()?);
        RestExposure::build_router(host, custom_routes)
    }

    /// Serve the application with graceful shutdown
    ///
    /// Binds to the provided address and stops on SIGTERM or Ctrl+C.
    pub async fn serve(self, addr: &str) -> Result<()> {
        let app = self.build()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Wait for a shutdown signal (SIGTERM or Ctrl+C)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
