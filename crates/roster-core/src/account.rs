//! Account record model.
//!
//! The authoritative persisted representation of a user, plus the
//! public-profile projection shared by every outward-facing shape.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use time::OffsetDateTime;

/// Default datetime value for deserialization when field is missing.
fn default_datetime() -> OffsetDateTime {
    OffsetDateTime::now_utc()
}

/// The field stripped from every outward projection.
pub const PASSWORD_HASH_FIELD: &str = "password_hash";

/// The store collection holding account records.
pub const USERS_COLLECTION: &str = "users";

// =============================================================================
// Role
// =============================================================================

/// Account role, a small closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular account holder, the creation default.
    #[default]
    Member,
    /// Elevated content privileges.
    Moderator,
    /// Full administrative access.
    Admin,
}

impl Role {
    /// String form used in token claims and log fields.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::Moderator => "moderator",
            Self::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "member" => Ok(Self::Member),
            "moderator" => Ok(Self::Moderator),
            "admin" => Ok(Self::Admin),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

// =============================================================================
// Account Record
// =============================================================================

/// An account in the user service.
///
/// Accounts authenticate with email + password and carry arbitrary extra
/// profile fields supplied by the caller at creation time. The password is
/// stored only as an Argon2 hash, never in plaintext.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountRecord {
    /// Unique identifier, assigned by the store on creation.
    #[serde(default)]
    pub id: String,

    /// Email address, unique across accounts (checked by query-before-insert).
    pub email: String,

    /// Argon2 PHC-format password hash.
    ///
    /// Filter this field out whenever the record leaves the service;
    /// see [`AccountRecord::public_profile`].
    #[serde(default, alias = "passwordHash")]
    pub password_hash: String,

    /// Account role, default `member`.
    #[serde(default)]
    pub role: Role,

    /// When the account was created.
    #[serde(default = "default_datetime", with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,

    /// When the account was last updated. Refreshed on every mutation.
    #[serde(default = "default_datetime", with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,

    /// Arbitrary additional profile fields, preserved verbatim.
    #[serde(flatten)]
    pub profile: Map<String, Value>,
}

impl AccountRecord {
    /// Creates a new account with both timestamps set to now.
    ///
    /// The id is left empty; the store assigns it on insert.
    #[must_use]
    pub fn new(email: impl Into<String>, password_hash: impl Into<String>) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            id: String::new(),
            email: email.into(),
            password_hash: password_hash.into(),
            role: Role::default(),
            created_at: now,
            updated_at: now,
            profile: Map::new(),
        }
    }

    /// Adds an extra profile field.
    #[must_use]
    pub fn with_profile_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.profile.insert(key.into(), value);
        self
    }

    /// Parses an account from a stored document.
    pub fn from_document(document: &Value) -> crate::Result<Self> {
        Ok(serde_json::from_value(document.clone())?)
    }

    /// The public-safe projection of this account: every field except the
    /// password hash.
    pub fn public_profile(&self) -> crate::Result<Value> {
        let mut value = serde_json::to_value(self)?;
        strip_sensitive_fields(&mut value);
        Ok(value)
    }
}

/// Removes sensitive fields from a raw account document in place.
///
/// Used both for single-profile responses and for every entry of the cached
/// listing, so the stripping rule lives in exactly one place.
pub fn strip_sensitive_fields(document: &mut Value) {
    if let Some(map) = document.as_object_mut() {
        map.remove(PASSWORD_HASH_FIELD);
        // Legacy camelCase spelling from imported documents.
        map.remove("passwordHash");
    }
}
