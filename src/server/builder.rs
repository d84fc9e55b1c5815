//! ServerBuilder for fluent API to build HTTP servers

use super::router::{build_api_routes, build_health_routes};
use super::state::AppState;
use crate::config::AppConfig;
use crate::core::store::{CommentStore, FollowStore, LikeStore, PostStore, Stores, UserDirectory};
use anyhow::{Result, anyhow};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Builder for the snapgraph HTTP server
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new()
///     .with_config(AppConfig::default())
///     .with_backend(InMemoryStore::new())
///     .build()?;
/// ```
pub struct ServerBuilder {
    stores: Option<Stores>,
    config: AppConfig,
    custom_routes: Vec<Router>,
}

impl ServerBuilder {
    /// Create a new ServerBuilder with default configuration
    pub fn new() -> Self {
        Self {
            stores: None,
            config: AppConfig::default(),
            custom_routes: Vec::new(),
        }
    }

    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the stores (required)
    pub fn with_stores(mut self, stores: Stores) -> Self {
        self.stores = Some(stores);
        self
    }

    /// Use a single backend for every store
    pub fn with_backend<B>(self, backend: B) -> Self
    where
        B: FollowStore + UserDirectory + PostStore + CommentStore + LikeStore + 'static,
    {
        self.with_stores(Stores::from_backend(backend))
    }

    /// Add routes outside `/api`, such as a login endpoint owned by user management
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Validate the configuration and wire the services
    pub fn build_state(&self) -> Result<AppState> {
        self.config.validate()?;

        let stores = self
            .stores
            .clone()
            .ok_or_else(|| anyhow!("Stores are required. Call .with_stores() or .with_backend() first."))?;

        Ok(AppState::new(stores, self.config.clone()))
    }

    /// Build the final router
    pub fn build(self) -> Result<Router> {
        let state = self.build_state()?;

        let mut app = build_health_routes().nest("/api", build_api_routes(state));
        for custom_router in self.custom_routes {
            app = app.merge(custom_router);
        }

        Ok(app
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()))
    }

    /// Serve the application with graceful shutdown
    ///
    /// This method will:
    /// - Bind to the provided address
    /// - Start serving requests
    /// - Handle SIGTERM and SIGINT (Ctrl+C) for graceful shutdown
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

/// Wait for shutdown signal (SIGTERM or Ctrl+C)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!("Failed to install Ctrl+C handler: {}", e);
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
                tracing::warn!("Failed to install SIGTERM handler: {}", e);
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
