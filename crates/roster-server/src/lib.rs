pub mod config;
pub mod handlers;
pub mod middleware;
pub mod observability;
pub mod server;

pub use config::{
    AppConfig, AuthConfig, CacheConfig, LoggingConfig, RedisConfig, ServerConfig, StorageConfig,
};
pub use observability::{apply_logging_level, init_tracing};
pub use server::{AppState, RosterServer, ServerBuilder, build_app, build_state};
