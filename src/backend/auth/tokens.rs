/**
 * Session Token Service
 *
 * Issues and verifies the signed, expiring session tokens (HS256 JWTs) that
 * ride the session cookie and the socket handshake. The signing key is
 * process-wide configuration: the service is built once at startup and
 * handlers never re-read the key.
 *
 * Verification distinguishes three rejection kinds - malformed, bad
 * signature, expired - so logs can tell garbage from tampering from
 * staleness. Callers treat all three identically: the session is invalid.
 */
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::shared::roles::Role;
use crate::shared::staff::StaffProfile;

/// Why a session token was rejected
///
/// The three variants reject identically; they exist so the log line can say
/// which kind of bad token arrived. The token itself is never logged.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    /// Not a parseable token at all
    #[error("Malformed session token")]
    Malformed,
    /// Parseable, but not signed by this server's key
    #[error("Session token signature is invalid")]
    InvalidSignature,
    /// Signed by us, but its expiry time has passed
    #[error("Session token has expired")]
    Expired,
}

/// Claims embedded in a session token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Staff ID (UUID)
    pub sub: String,
    /// Display name
    pub name: String,
    /// Staff role, checked by the access gate
    pub role: Role,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
    /// Issued at time (Unix timestamp)
    pub iat: u64,
}

impl SessionClaims {
    /// Parse the token subject back into a staff id
    pub fn staff_id(&self) -> Result<Uuid, TokenError> {
        Uuid::parse_str(&self.sub).map_err(|_| TokenError::Malformed)
    }

    /// Rebuild the public profile carried by the claims
    pub fn profile(&self) -> Result<StaffProfile, TokenError> {
        Ok(StaffProfile::new(
            self.staff_id()?,
            self.name.clone(),
            self.role,
        ))
    }
}

/// Issues and verifies session tokens with a fixed signing key
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    default_ttl: Duration,
}

impl TokenService {
    /// Build the service from the configured signing key
    ///
    /// # Arguments
    /// * `secret` - HMAC signing key from configuration
    /// * `default_ttl` - session lifetime used by `issue_default`
    pub fn new(secret: &str, default_ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_ref()),
            decoding: DecodingKey::from_secret(secret.as_ref()),
            default_ttl,
        }
    }

    /// Issue a token for a staff member with an explicit lifetime
    ///
    /// The expiry is `iat + ttl`; a zero `ttl` produces a token that is
    /// already expired by the at-or-past rule in [`TokenService::verify`].
    pub fn issue(
        &self,
        staff: &StaffProfile,
        ttl: Duration,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = unix_now();
        let claims = SessionClaims {
            sub: staff.id.to_string(),
            name: staff.name.clone(),
            role: staff.role,
            exp: now + ttl.as_secs(),
            iat: now,
        };
        encode(&Header::default(), &claims, &self.encoding)
    }

    /// Issue a token with the configured default lifetime
    pub fn issue_default(&self, staff: &StaffProfile) -> Result<String, jsonwebtoken::errors::Error> {
        self.issue(staff, self.default_ttl)
    }

    /// Verify a token and return its claims
    ///
    /// Signature is checked first; a token that fails it is never inspected
    /// further. Expiry is applied manually with zero leeway: the token is
    /// expired when the current time is at or past `exp`, which makes the
    /// boundary deterministic.
    pub fn verify(&self, token: &str) -> Result<SessionClaims, TokenError> {
        let mut validation = Validation::default();
        validation.validate_exp = false;
        validation.required_spec_claims = Default::default();

        let data =
            decode::<SessionClaims>(token, &self.decoding, &validation).map_err(classify)?;
        if data.claims.exp <= unix_now() {
            return Err(TokenError::Expired);
        }
        Ok(data.claims)
    }

    /// The configured default session lifetime
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }
}

/// Map a jsonwebtoken failure onto the rejection taxonomy
fn classify(err: jsonwebtoken::errors::Error) -> TokenError {
    use jsonwebtoken::errors::ErrorKind;
    match err.kind() {
        ErrorKind::InvalidSignature => TokenError::InvalidSignature,
        ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Malformed,
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
