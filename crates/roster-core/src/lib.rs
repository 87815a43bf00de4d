pub mod account;
pub mod error;

pub use account::{
    AccountRecord, PASSWORD_HASH_FIELD, Role, USERS_COLLECTION, strip_sensitive_fields,
};
pub use error::{CoreError, ErrorCategory, Result};
