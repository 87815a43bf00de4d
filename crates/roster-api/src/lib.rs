//! # roster-api
//!
//! The user-service operations layer: account CRUD, credential login, the
//! cache-aside directory listing with explicit delete-time invalidation,
//! and the activity feed - plus the response envelope shared by every
//! operation.

mod error;
mod response;
mod users;

pub use error::{ApiError, ApiResult};
pub use response::ApiResponse;
pub use users::{
    ActivityFeed, DEFAULT_LISTING_TTL, NewAccount, USERS_LISTING_KEY, UserService,
};
