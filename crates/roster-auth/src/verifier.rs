//! Credential verification and token issuance (the login flow).

use serde_json::{Value, json};
use tracing::{debug, info};

use roster_core::{AccountRecord, USERS_COLLECTION};
use roster_storage::DynStore;

use crate::error::{AuthError, AuthResult};
use crate::password;
use crate::token::TokenService;

/// Outcome of a successful login: the public profile plus the access token.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    /// Public-safe profile of the authenticated account.
    pub profile: Value,
    /// Signed, time-bounded access token.
    pub token: String,
}

impl LoginOutcome {
    /// The outcome as a response payload.
    #[must_use]
    pub fn into_payload(self) -> Value {
        json!({
            "user": self.profile,
            "token": self.token,
        })
    }
}

/// Verifies claimed credentials against the store and issues access tokens.
///
/// Read-only: never mutates the store and never touches the listing cache.
pub struct CredentialVerifier {
    store: DynStore,
    tokens: TokenService,
}

impl CredentialVerifier {
    /// Creates a verifier over the given store and token service.
    #[must_use]
    pub fn new(store: DynStore, tokens: TokenService) -> Self {
        Self { store, tokens }
    }

    /// The token service used for issuance.
    #[must_use]
    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// Verifies `email` + `password` and issues a token on success.
    ///
    /// Exactly one store query per call. Unknown email and wrong password
    /// collapse to the same `AuthError::Unauthorized`; the unknown-email
    /// path burns a dummy verification so the two failures take comparable
    /// time. If a prior uniqueness race left multiple accounts with the
    /// same email, the first query result is used, order unspecified.
    ///
    /// # Errors
    ///
    /// `AuthError::Unauthorized` on bad credentials; `AuthError::Storage`
    /// on infrastructure faults, which propagate unhandled.
    pub async fn login(&self, email: &str, password: &str) -> AuthResult<LoginOutcome> {
        let matches = self
            .store
            .find_by_field(USERS_COLLECTION, "email", &json!(email))
            .await?;

        let Some(stored) = matches.into_iter().next() else {
            password::dummy_verify(password);
            debug!(email, "login rejected: unknown email");
            return Err(AuthError::Unauthorized);
        };

        let account = AccountRecord::from_document(&stored.document)
            .map_err(|e| AuthError::malformed_account(e.to_string()))?;

        if !password::verify_password(password, &account.password_hash)? {
            debug!(account_id = %account.id, "login rejected: wrong password");
            return Err(AuthError::Unauthorized);
        }

        let token = self.tokens.issue(&account.id, account.role)?;
        info!(account_id = %account.id, role = %account.role, "login successful");

        let profile = account
            .public_profile()
            .map_err(|e| AuthError::malformed_account(e.to_string()))?;
        Ok(LoginOutcome { profile, token })
    }
}
