use std::sync::Arc;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

use super::{Claims, Principal};
use crate::{clock::Clock, error::AppError};

#[derive(Clone)]
pub struct JwtKeys {
    pub enc: EncodingKey,
    pub dec: DecodingKey,
}

impl JwtKeys {
    pub fn from_secret(secret: &[u8]) -> Self {
        Self {
            enc: EncodingKey::from_secret(secret),
            dec: DecodingKey::from_secret(secret),
        }
    }
}

/// Signs and checks HS256 session tokens against the service clock.
#[derive(Clone)]
pub struct TokenService {
    keys: JwtKeys,
    clock: Arc<dyn Clock>,
}

impl TokenService {
    pub fn new(secret: &[u8], clock: Arc<dyn Clock>) -> Self {
        Self {
            keys: JwtKeys::from_secret(secret),
            clock,
        }
    }

    pub fn issue(&self, principal: &Principal, ttl_secs: u64) -> Result<String, AppError> {
        let iat = self.clock.now_secs();
        let ttl = i64::try_from(ttl_secs).unwrap_or(i64::MAX);
        let claims = Claims {
            kind: principal.kind,
            id: principal.id.clone(),
            role: principal.role,
            iat,
            exp: iat.saturating_add(ttl),
        };

        let mut header = Header::new(Algorithm::HS256);
        header.typ = Some("JWT".into());

        encode(&header, &claims, &self.keys.enc)
            .map_err(|err| AppError::internal(format!("Token encoding failed: {err}")))
    }

    /// `None` for anything that is not a well-formed, correctly signed,
    /// unexpired token with a role matching its type.
    pub fn verify(&self, token: &str) -> Option<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        // expiry is judged against the service clock below
        validation.validate_exp = false;

        let claims = match decode::<Claims>(token, &self.keys.dec, &validation) {
            Ok(data) => data.claims,
            Err(err) => {
                tracing::debug!(error = %err, "rejected token");
                return None;
            }
        };

        if self.clock.now_secs() > claims.exp {
            tracing::debug!(id = %claims.id, "rejected expired token");
            return None;
        }

        if claims.role.kind() != claims.kind {
            tracing::debug!(id = %claims.id, "rejected token with mismatched type and role");
            return None;
        }

        Some(claims)
    }
}
