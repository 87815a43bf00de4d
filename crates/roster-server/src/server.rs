use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use roster_api::UserService;
use roster_auth::TokenService;
use roster_cache_redis::RedisListingCache;
use roster_db_memory::{MemoryDocumentStore, MemoryListingCache};
use roster_storage::DynCache;

use crate::{
    config::{AppConfig, RedisConfig},
    handlers,
    middleware as app_middleware,
};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserService>,
}

pub struct RosterServer {
    addr: SocketAddr,
    app: Router,
}

/// Build the listing cache named by the redis section. When redis is
/// disabled, or the pool cannot be created, the in-process cache is used
/// instead so the server still starts.
pub fn create_listing_cache(cfg: &RedisConfig) -> DynCache {
    if !cfg.enabled {
        tracing::info!("Redis disabled, using in-process listing cache");
        return Arc::new(MemoryListingCache::new());
    }

    tracing::info!(url = %cfg.url, "Connecting to Redis");
    match RedisListingCache::from_url(&cfg.url) {
        Ok(cache) => Arc::new(cache),
        Err(e) => {
            tracing::warn!(error = %e, "Redis pool creation failed, falling back to in-process cache");
            Arc::new(MemoryListingCache::new())
        }
    }
}

/// Assemble the shared state from configuration.
pub fn build_state(cfg: &AppConfig) -> AppState {
    let store = Arc::new(MemoryDocumentStore::new());
    let cache = create_listing_cache(&cfg.redis);
    let tokens = TokenService::new(
        &cfg.auth.token_secret,
        cfg.auth.issuer.clone(),
        time::Duration::seconds(cfg.auth.token_ttl_secs as i64),
    );
    let users = UserService::new(store, cache, tokens)
        .with_listing_ttl(Duration::from_secs(cfg.cache.listing_ttl_secs));

    AppState {
        users: Arc::new(users),
    }
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        // Health and info endpoints
        .route("/", get(handlers::root))
        .route("/healthz", get(handlers::healthz))
        .route("/readyz", get(handlers::readyz))
        // Accounts and login
        .route(
            "/users",
            get(handlers::get_users).post(handlers::create_user),
        )
        .route("/login", post(handlers::login))
        .route(
            "/users/{id}",
            get(handlers::get_user_by_id)
                .put(handlers::update_user_by_id)
                .delete(handlers::delete_user_by_id),
        )
        .route("/users/{id}/password", post(handlers::change_password))
        .route("/users/{id}/feed", get(handlers::get_activity_feed))
        .with_state(state)
        // Middleware stack (order: request id -> cors -> trace)
        .layer(middleware::from_fn(app_middleware::request_id))
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    use tracing::field::Empty;
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    let req_id = req
                        .extensions()
                        .get::<axum::http::HeaderValue>()
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("")
                        .to_string();
                    tracing::info_span!(
                        "http.request",
                        http.method = %method,
                        http.target = %uri,
                        http.status_code = Empty,
                        request_id = %req_id
                    )
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        span.record(
                            "http.status_code",
                            tracing::field::display(res.status().as_u16()),
                        );
                        tracing::info!(
                            http.status = %res.status().as_u16(),
                            elapsed_ms = %latency.as_millis(),
                            "request handled"
                        );
                    },
                ),
        )
}

pub struct ServerBuilder {
    addr: SocketAddr,
    config: AppConfig,
}

impl ServerBuilder {
    pub fn new() -> Self {
        let cfg = AppConfig::default();
        Self {
            addr: cfg.addr(),
            config: cfg,
        }
    }

    pub fn with_addr(mut self, addr: SocketAddr) -> Self {
        self.addr = addr;
        self
    }

    pub fn with_config(mut self, cfg: AppConfig) -> Self {
        self.addr = cfg.addr();
        self.config = cfg;
        self
    }

    pub fn build(self) -> RosterServer {
        let state = build_state(&self.config);
        let app = build_app(state);

        RosterServer {
            addr: self.addr,
            app,
        }
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RosterServer {
    pub async fn run(self) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        tracing::info!("listening on {}", self.addr);
        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }
}

async fn shutdown_signal() {
    // Wait for Ctrl+C
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}
