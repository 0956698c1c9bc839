//! Bearer-token access control.
//!
//! Tokens are configured as SHA-256 hex digests, each bound to a role.
//! Plain tokens never appear in configuration files.

use axum::http::{header, HeaderMap};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Missing bearer token")]
    MissingToken,

    #[error("Unknown or revoked token")]
    InvalidToken,

    #[error("Role '{0}' may not perform this operation")]
    InsufficientRole(Role),
}

/// Caller roles, from most to least privileged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    DataEntry,
    ReadOnly,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::DataEntry => write!(f, "data_entry"),
            Role::ReadOnly => write!(f, "read_only"),
        }
    }
}

/// Roles allowed to create, update or delete records.
pub const EDITOR_ROLES: &[Role] = &[Role::Admin, Role::DataEntry];

/// A configured API token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenEntry {
    /// Human-readable owner, used in logs
    pub label: String,
    pub role: Role,
    /// Lowercase hex SHA-256 of the token
    pub token_sha256: String,
}

/// A verified caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub label: String,
    pub role: Role,
}

/// Hash a plain token the way configuration stores it.
pub fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// Verifies bearer tokens against configured digests.
#[derive(Debug, Clone, Default)]
pub struct AccessControl {
    tokens: Vec<TokenEntry>,
}

impl AccessControl {
    pub fn new(tokens: Vec<TokenEntry>) -> Self {
        let tokens = tokens
            .into_iter()
            .map(|mut t| {
                t.token_sha256 = t.token_sha256.to_lowercase();
                t
            })
            .collect();
        Self { tokens }
    }

    pub fn verify(&self, token: &str) -> Result<Caller, AuthError> {
        let digest = hash_token(token);
        self.tokens
            .iter()
            .find(|t| t.token_sha256 == digest)
            .map(|t| Caller {
                label: t.label.clone(),
                role: t.role,
            })
            .ok_or(AuthError::InvalidToken)
    }

    /// Verify the request's bearer token and check its role.
    pub fn authorize(&self, headers: &HeaderMap, allowed: &[Role]) -> Result<Caller, AuthError> {
        let token = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::MissingToken)?;

        let caller = self.verify(token)?;
        if !allowed.contains(&caller.role) {
            tracing::warn!("Rejected {} ({}) for insufficient role", caller.label, caller.role);
            return Err(AuthError::InsufficientRole(caller.role));
        }

        Ok(caller)
    }
}
