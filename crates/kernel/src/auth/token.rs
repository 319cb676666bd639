//! JWT issuance and verification for landlord and tenant accounts.

use std::fmt;

use anyhow::{Context, Result};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::AuthError;

/// Account kinds that can hold a token.
///
/// Serialized as the collection name, which is what the `model` claim holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    Landlords,
    Tenants,
}

impl AccountKind {
    /// Singular account name used in user-facing messages.
    pub fn singular(self) -> &'static str {
        match self {
            AccountKind::Landlords => "landlord",
            AccountKind::Tenants => "tenant",
        }
    }
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountKind::Landlords => f.write_str("landlords"),
            AccountKind::Tenants => f.write_str("tenants"),
        }
    }
}

/// JWT claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Account id.
    pub id: i64,
    /// Account kind.
    pub model: AccountKind,
    /// Issued at (Unix timestamp).
    pub iat: i64,
    /// Expiration (Unix timestamp).
    pub exp: i64,
}

/// Extract the token from an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Signs and verifies account tokens with HMAC-SHA256.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    lifetime: chrono::TimeDelta,
}

impl TokenService {
    /// Create a token service. `lifetime_minutes` bounds every issued token
    /// and must be positive.
    pub fn new(secret: &[u8], lifetime_minutes: i64) -> Result<Self> {
        anyhow::ensure!(
            lifetime_minutes >= 1,
            "token lifetime must be at least one minute"
        );
        let lifetime = chrono::TimeDelta::try_minutes(lifetime_minutes).with_context(|| {
            format!("token lifetime of {lifetime_minutes} minutes is out of range")
        })?;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            lifetime,
        })
    }

    /// Issue a token for an account.
    pub fn issue(&self, id: i64, model: AccountKind) -> Result<String> {
        let now = chrono::Utc::now();
        let claims = Claims {
            id,
            model,
            iat: now.timestamp(),
            exp: now
                .checked_add_signed(self.lifetime)
                .context("token expiry is out of range")?
                .timestamp(),
        };
        self.encode(&claims)
    }

    fn encode(&self, claims: &Claims) -> Result<String> {
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .context("failed to encode token")
    }

    /// Verify a token and return its claims.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        self.decode(token, None)
    }

    fn decode(&self, token: &str, kind: Option<AccountKind>) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!(error = %e, "token rejected");
                match e.kind() {
                    ErrorKind::ExpiredSignature => AuthError::Expired(kind),
                    _ => AuthError::Invalid(kind),
                }
            })
    }

    /// Verify the bearer token of an `Authorization` header value.
    ///
    /// With `kind` set, tokens of any other account kind are rejected.
    pub fn require(
        &self,
        header: Option<&str>,
        kind: Option<AccountKind>,
    ) -> Result<Claims, AuthError> {
        let token = header
            .and_then(bearer_token)
            .ok_or(AuthError::Missing(kind))?;
        let claims = self.decode(token, kind)?;

        match kind {
            Some(expected) if claims.model != expected => Err(AuthError::WrongAccount(expected)),
            _ => Ok(claims),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test-secret-key-at-least-32-bytes-long!";

    #[test]
    fn issue_and_verify() {
        let tokens = TokenService::new(SECRET, 30).unwrap();
        let token = tokens.issue(7, AccountKind::Landlords).unwrap();

        let claims = tokens.verify(&token).unwrap();
        assert_eq!(claims.id, 7);
        assert_eq!(claims.model, AccountKind::Landlords);
        assert_eq!(claims.exp - claims.iat, 30 * 60);
    }

    #[test]
    fn model_claim_uses_collection_name() {
        let json = serde_json::to_string(&AccountKind::Tenants).unwrap();
        assert_eq!(json, "\"tenants\"");
        assert_eq!(AccountKind::Landlords.to_string(), "landlords");
    }

    #[test]
    fn expired_token() {
        let tokens = TokenService::new(SECRET, 30).unwrap();
        let now = chrono::Utc::now().timestamp();
        let token = tokens
            .encode(&Claims {
                id: 1,
                model: AccountKind::Tenants,
                iat: now - 3600,
                exp: now - 60,
            })
            .unwrap();

        assert!(matches!(tokens.verify(&token), Err(AuthError::Expired(None))));
    }

    #[test]
    fn wrong_secret_is_invalid() {
        let token = TokenService::new(SECRET, 30)
            .unwrap()
            .issue(1, AccountKind::Landlords)
            .unwrap();
        let other = TokenService::new(b"another-secret-key-of-enough-length", 30).unwrap();

        assert!(matches!(other.verify(&token), Err(AuthError::Invalid(None))));
        assert!(matches!(other.verify("invalid.jwt.token"), Err(AuthError::Invalid(None))));
    }

    #[test]
    fn require_checks_header_and_kind() {
        let tokens = TokenService::new(SECRET, 30).unwrap();
        let token = tokens.issue(3, AccountKind::Tenants).unwrap();
        let header = format!("Bearer {token}");

        assert!(matches!(
            tokens.require(None, None),
            Err(AuthError::Missing(None))
        ));
        assert!(matches!(
            tokens.require(Some("Basic abc"), Some(AccountKind::Tenants)),
            Err(AuthError::Missing(Some(AccountKind::Tenants)))
        ));
        assert!(matches!(
            tokens.require(Some("Bearer garbage"), Some(AccountKind::Landlords)),
            Err(AuthError::Invalid(Some(AccountKind::Landlords)))
        ));
        assert!(matches!(
            tokens.require(Some(&header), Some(AccountKind::Landlords)),
            Err(AuthError::WrongAccount(AccountKind::Landlords))
        ));

        let claims = tokens
            .require(Some(&header), Some(AccountKind::Tenants))
            .unwrap();
        assert_eq!(claims.id, 3);
        assert!(tokens.require(Some(&header), None).is_ok());
    }

    #[test]
    fn bearer_parsing() {
        assert_eq!(bearer_token("Bearer abc.def"), Some("abc.def"));
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("Token abc"), None);
    }

    #[test]
    fn lifetime_must_be_representable() {
        assert!(TokenService::new(SECRET, 0).is_err());
        assert!(TokenService::new(SECRET, -5).is_err());
        assert!(TokenService::new(SECRET, i64::MAX).is_err());
    }

    #[test]
    fn expiry_overflow_is_an_error() {
        // Representable as a duration, but far past the last valid date.
        let tokens = TokenService::new(SECRET, i64::MAX / 60_000 - 1).unwrap();
        assert!(tokens.issue(1, AccountKind::Landlords).is_err());
    }
}
