//! # roster-auth
//!
//! Authentication for the Roster user service: Argon2id password hashing,
//! HS256 JWT access tokens, and the credential-verification login flow.

pub mod error;
pub mod password;
pub mod token;
pub mod verifier;

pub use error::{AuthError, AuthResult};
pub use password::{dummy_verify, hash_password, verify_password};
pub use token::{AccessTokenClaims, TokenService};
pub use verifier::{CredentialVerifier, LoginOutcome};
