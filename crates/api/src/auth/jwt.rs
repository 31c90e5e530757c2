//! Verification of access tokens issued by the hosted auth service.
//!
//! Tokens are HS256-signed with the project's JWT secret and carry the
//! audience `authenticated`. The role claim of the token itself is the
//! database role (`authenticated`), not the application role; the
//! application role comes from the profile table, falling back to the
//! `user_metadata` / `app_metadata` role carried in the token.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use marches_auth::wire::metadata_role;
use marches_core::identity::Identity;
use marches_core::types::DbId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Audience of tokens issued to signed-in users.
pub const AUDIENCE: &str = "authenticated";

/// Claims of an access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the auth user id.
    pub sub: DbId,
    pub aud: String,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    #[serde(default)]
    pub iat: i64,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: Value,
    #[serde(default)]
    pub app_metadata: Value,
}

impl Claims {
    /// The identity behind the token. `user_metadata.role` wins over
    /// `app_metadata.role`.
    pub fn identity(&self) -> Identity {
        Identity {
            id: self.sub,
            email: self.email.clone(),
            metadata_role: metadata_role(&self.user_metadata, &self.app_metadata),
        }
    }
}

/// Validate and decode an access token.
///
/// Checks the signature, expiration and audience.
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[AUDIENCE]);
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )?;
    Ok(data.claims)
}

/// Sign claims with the given secret. The hosted service issues the real
/// tokens; this exists for local tooling and tests.
pub fn encode_claims(claims: &Claims, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}
